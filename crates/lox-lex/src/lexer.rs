//! The scanner: source text -> token stream (`spec.md` S4.1).
//!
//! A single left-to-right pass with one character of lookahead. Errors
//! (`UnexpectedCharacter`, `UnterminatedString`) are reported to the shared
//! [`ErrorSink`] and scanning continues; the token stream produced always
//! ends in a single synthetic `Eof` token.

use lox_util::ErrorSink;

use crate::cursor::Cursor;
use crate::{Literal, Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    errors: &'a ErrorSink,
    /// Byte offset where the token currently being scanned started.
    start: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, errors: &'a ErrorSink) -> Self {
        Self {
            cursor: Cursor::new(source),
            errors,
            start: 0,
            line: 1,
        }
    }

    /// Scan the entire source into a token stream, terminated by `Eof`.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            self.start = self.cursor.position();
            if self.cursor.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", None, self.line));
                return tokens;
            }
            if let Some(token) = self.scan_token() {
                tokens.push(token);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' => {
                    self.cursor.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_char(1) == '/' => {
                    while self.cursor.current_char() != '\n' && !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self) -> Option<Token> {
        let c = self.cursor.current_char();
        self.cursor.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            ';' => TokenKind::Semicolon,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '!' => self.one_or_two(TokenKind::Bang, '=', TokenKind::BangEqual),
            '=' => self.one_or_two(TokenKind::Equal, '=', TokenKind::EqualEqual),
            '<' => self.one_or_two(TokenKind::Less, '=', TokenKind::LessEqual),
            '>' => self.one_or_two(TokenKind::Greater, '=', TokenKind::GreaterEqual),
            '"' => return self.string(),
            c if c.is_ascii_digit() => return Some(self.number()),
            c if is_alpha(c) => return Some(self.identifier()),
            other => {
                self.errors
                    .scan_error(self.line, format!("Unexpected character: {other}"));
                return None;
            }
        };
        Some(self.make_token(kind, None))
    }

    fn one_or_two(&mut self, one: TokenKind, expected: char, two: TokenKind) -> TokenKind {
        if self.cursor.match_char(expected) {
            two
        } else {
            one
        }
    }

    fn string(&mut self) -> Option<Token> {
        let start_line = self.line;
        while self.cursor.current_char() != '"' && !self.cursor.is_at_end() {
            if self.cursor.current_char() == '\n' {
                self.line += 1;
            }
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            self.errors.scan_error(start_line, "Unterminated string.");
            return None;
        }
        // Consume the closing quote.
        self.cursor.advance();
        let lexeme = self.cursor.slice_from(self.start).to_string();
        let value = lexeme[1..lexeme.len() - 1].to_string();
        Some(Token::new(
            TokenKind::String,
            lexeme,
            Some(Literal::String(value)),
            start_line,
        ))
    }

    fn number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance(); // consume the '.'
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        let lexeme = self.cursor.slice_from(self.start);
        let value: f64 = lexeme.parse().expect("number grammar only admits valid floats");
        self.make_token(TokenKind::Number, Some(Literal::Number(value)))
    }

    fn identifier(&mut self) -> Token {
        // Spec S4.1: identifier-continuation characters belong to the same
        // "alpha" class as the start character; digits do NOT extend an
        // identifier (a faithfulness choice - see spec.md S9's open question).
        while is_alpha(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let lexeme = self.cursor.slice_from(self.start);
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, None)
    }

    fn make_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        Token::new(kind, self.cursor.slice_from(self.start), literal, self.line)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
