//! lox-par - Recursive-descent parser: token stream -> AST (`spec.md` S4.2).
//!
//! The grammar is implemented by precedence level, lowest to highest, each
//! as its own method (`assignment` -> `logic_or` -> ... -> `primary`). Parse
//! errors are reported to the shared [`lox_util::ErrorSink`] and recovered
//! from via `synchronize`: the parser discards tokens until it believes it's
//! at a statement boundary, then resumes at `declaration`. A statement that
//! failed to parse contributes no node to the AST.

pub mod ast;
mod expr;
mod items;
pub mod printer;
mod stmt;

pub use ast::{Expr, FunctionDecl, LiteralValue, NodeId, Stmt};

use lox_lex::{Token, TokenKind};
use lox_util::ErrorSink;

/// Maximum number of parameters/arguments before `TooManyParameters` /
/// `TooManyArguments` is reported (spec S4.2's arity cap); parsing continues
/// past the limit regardless.
pub const MAX_ARGS: usize = 255;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    errors: &'a ErrorSink,
}

/// Signals that the current statement/declaration could not be parsed and
/// the parser should synchronize and resume at the next declaration. This is
/// an internal control-flow error, never surfaced to callers: every reported
/// parse error has already gone to the [`ErrorSink`] by the time this is
/// returned.
struct ParseError;

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, errors: &'a ErrorSink) -> Self {
        Self {
            tokens,
            current: 0,
            errors,
        }
    }

    /// Parse a full program: `declaration* EOF`.
    ///
    /// A declaration that fails to parse is skipped (via `synchronize`) and
    /// contributes nothing to the returned statement list; the error has
    /// already been reported.
    pub fn parse(mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(ParseError) => self.synchronize(),
            }
        }
        statements
    }

    // ---- token stream primitives ----

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error(self.peek().clone(), message))
    }

    /// Report a parse error at `token` in the spec's stable `<WHERE>` form
    /// and return the sentinel [`ParseError`] for the caller to propagate.
    fn error(&self, token: Token, message: &str) -> ParseError {
        let is_eof = token.kind == TokenKind::Eof;
        self.errors
            .token_error(token.line, is_eof, &token.lexeme, message);
        ParseError
    }

    /// Discard tokens until a likely statement boundary, so that one parse
    /// error does not cascade into spurious follow-on errors (spec S4.2).
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            use TokenKind::*;
            if matches!(
                self.peek().kind,
                Class | Fun | Var | For | If | While | Print | Return
            ) {
                return;
            }
            self.advance();
        }
    }
}
