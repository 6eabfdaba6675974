//! Class and function declarations (`spec.md` S4.2):
//!
//! ```text
//! classDecl  -> "class" IDENT "{" function* "}"
//! funDecl    -> "fun" function
//! function   -> IDENT "(" parameters? ")" block
//! parameters -> IDENT ("," IDENT)*        // <= 255; else error but continue
//! ```

use lox_lex::TokenKind;

use crate::{FunctionDecl, PResult, Parser, Stmt, MAX_ARGS};

impl<'a> Parser<'a> {
    pub(crate) fn class_declaration(&mut self) -> PResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?;
        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(self.function_declaration("method")?);
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;
        Ok(Stmt::Class { name, methods })
    }

    /// Parses `IDENT "(" parameters? ")" block`, used for both top-level
    /// `fun` declarations and class methods (`kind` only changes error text).
    pub(crate) fn function_declaration(&mut self, kind: &str) -> PResult<FunctionDecl> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {kind} name."))?;
        self.consume(
            TokenKind::LeftParen,
            &format!("Expect '(' after {kind} name."),
        )?;

        let mut parameters = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if parameters.len() >= MAX_ARGS {
                    self.error(self.peek().clone(), "Can't have more than 255 parameters.");
                }
                parameters.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.match_any(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(
            TokenKind::LeftBrace,
            &format!("Expect '{{' before {kind} body."),
        )?;
        let body = self.block()?;

        Ok(FunctionDecl {
            name,
            parameters,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_util::ErrorSink;

    fn parse(src: &str) -> (Vec<Stmt>, bool) {
        let errors = ErrorSink::new();
        let tokens = lox_lex::Lexer::new(src, &errors).scan_tokens();
        let stmts = crate::Parser::new(tokens, &errors).parse();
        (stmts, errors.had_error())
    }

    #[test]
    fn class_with_multiple_methods() {
        let (stmts, had_error) = parse("class C { init() { this.x = 1; } area() { return 0; } }");
        assert!(!had_error);
        match &stmts[0] {
            Stmt::Class { name, methods } => {
                assert_eq!(name.lexeme, "C");
                assert_eq!(methods.len(), 2);
                assert_eq!(methods[0].name.lexeme, "init");
                assert_eq!(methods[1].name.lexeme, "area");
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn function_with_parameters() {
        let (stmts, had_error) = parse("fun add(a, b) { return a + b; }");
        assert!(!had_error);
        match &stmts[0] {
            Stmt::Function(decl) => {
                assert_eq!(decl.name.lexeme, "add");
                assert_eq!(decl.parameters.len(), 2);
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn more_than_255_parameters_reports_error_but_still_parses() {
        let params: Vec<String> = (0..260).map(|i| format!("p{i}")).collect();
        let src = format!("fun f({}) {{}}", params.join(", "));
        let (stmts, had_error) = parse(&src);
        assert!(had_error);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn empty_class_body() {
        let (stmts, had_error) = parse("class Empty {}");
        assert!(!had_error);
        assert!(matches!(&stmts[0], Stmt::Class { methods, .. } if methods.is_empty()));
    }
}
