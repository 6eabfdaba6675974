//! Expression grammar, precedence low to high (`spec.md` S4.2):
//!
//! ```text
//! expression -> assignment
//! assignment -> ( call "." IDENT | IDENT ) "=" assignment | logic_or
//! logic_or   -> logic_and ( "or" logic_and )*
//! logic_and  -> equality ( "and" equality )*
//! equality   -> comparison (("!="|"==") comparison)*
//! comparison -> term (( ">" | ">=" | "<" | "<=" ) term)*
//! term       -> factor (("-"|"+") factor)*
//! factor     -> unary (("/"|"*") unary)*
//! unary      -> ("!"|"-") unary | call
//! call       -> primary ( "(" arguments? ")" | "." IDENT )*
//! primary    -> "true" | "false" | "nil" | "this"
//!             | NUMBER | STRING | IDENT | "(" expression ")"
//! ```

use lox_lex::{Literal, Token, TokenKind};

use crate::{Expr, LiteralValue, PResult, Parser, MAX_ARGS};

impl<'a> Parser<'a> {
    pub(crate) fn expression(&mut self) -> PResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let expr = self.logic_or()?;

        if self.match_any(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;
            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::assign(name, value)),
                Expr::Get { object, name } => Ok(Expr::Set {
                    object,
                    name,
                    value: Box::new(value),
                }),
                other => {
                    // spec S4.2: report but do not throw - keep `value` as
                    // the expression's result and continue parsing.
                    self.error(equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn logic_or(&mut self) -> PResult<Expr> {
        let mut expr = self.logic_and()?;
        while self.match_any(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.logic_and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> PResult<Expr> {
        let mut expr = self.equality()?;
        while self.match_any(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> PResult<Expr> {
        self.left_assoc_binary(
            Self::comparison,
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
        )
    }

    fn comparison(&mut self) -> PResult<Expr> {
        self.left_assoc_binary(
            Self::term,
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
        )
    }

    fn term(&mut self) -> PResult<Expr> {
        self.left_assoc_binary(Self::factor, &[TokenKind::Minus, TokenKind::Plus])
    }

    fn factor(&mut self) -> PResult<Expr> {
        self.left_assoc_binary(Self::unary, &[TokenKind::Slash, TokenKind::Star])
    }

    /// Shared shape for every left-associative binary precedence level:
    /// `next (op next)*`.
    fn left_assoc_binary(
        &mut self,
        mut next: impl FnMut(&mut Self) -> PResult<Expr>,
        operators: &[TokenKind],
    ) -> PResult<Expr> {
        let mut expr = next(self)?;
        while self.match_any(operators) {
            let operator = self.previous().clone();
            let right = next(self)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> PResult<Expr> {
        if self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }
        self.call()
    }

    fn call(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.match_any(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_any(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> PResult<Expr> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    // Reported but non-fatal: parsing continues (spec S4.2).
                    self.error(self.peek().clone(), "Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.match_any(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> PResult<Expr> {
        if self.match_any(&[TokenKind::False]) {
            return Ok(Expr::Literal {
                value: LiteralValue::Bool(false),
            });
        }
        if self.match_any(&[TokenKind::True]) {
            return Ok(Expr::Literal {
                value: LiteralValue::Bool(true),
            });
        }
        if self.match_any(&[TokenKind::Nil]) {
            return Ok(Expr::Literal {
                value: LiteralValue::Nil,
            });
        }
        if self.match_any(&[TokenKind::Number]) {
            return Ok(Expr::Literal {
                value: LiteralValue::Number(number_literal(self.previous())),
            });
        }
        if self.match_any(&[TokenKind::String]) {
            return Ok(Expr::Literal {
                value: LiteralValue::String(string_literal(self.previous())),
            });
        }
        if self.match_any(&[TokenKind::This]) {
            return Ok(Expr::this(self.previous().clone()));
        }
        if self.match_any(&[TokenKind::Identifier]) {
            return Ok(Expr::variable(self.previous().clone()));
        }
        if self.match_any(&[TokenKind::LeftParen]) {
            let inner = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping {
                inner: Box::new(inner),
            });
        }
        Err(self.error(self.peek().clone(), "Expect expression."))
    }
}

fn number_literal(token: &Token) -> f64 {
    match &token.literal {
        Some(Literal::Number(n)) => *n,
        _ => unreachable!("Number token always carries a Literal::Number"),
    }
}

fn string_literal(token: &Token) -> String {
    match &token.literal {
        Some(Literal::String(s)) => s.clone(),
        _ => unreachable!("String token always carries a Literal::String"),
    }
}
