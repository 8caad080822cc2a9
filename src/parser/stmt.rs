//! Statement parsing

use crate::ast::{ForInit, Span, Spanned, Stmt};
use crate::lexer::Token;

use super::Parser;
use super::error::ParseResult;

impl Parser<'_> {
    /// Parse a statement
    pub fn parse_stmt(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.current_span();

        if self.is_type_start(self.peek()) {
            let decls = self.parse_var_decl_list()?;
            return Ok(self.spanned_from(start, Stmt::Decl(decls)));
        }

        match self.peek().cloned() {
            Some(Token::LBrace) => self.parse_block(),

            Some(Token::If) => {
                self.advance();
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.eat(&Token::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(self.spanned_from(
                    start,
                    Stmt::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                ))
            }

            Some(Token::While) => {
                self.advance();
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(self.spanned_from(
                    start,
                    Stmt::While {
                        cond,
                        body,
                        check_after: false,
                    },
                ))
            }

            Some(Token::Do) => {
                self.advance();
                let body = Box::new(self.parse_stmt()?);
                self.expect(&Token::While)?;
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                self.expect(&Token::Semi)?;
                Ok(self.spanned_from(
                    start,
                    Stmt::While {
                        cond,
                        body,
                        check_after: true,
                    },
                ))
            }

            Some(Token::For) => {
                self.advance();
                self.expect(&Token::LParen)?;

                let init = if self.eat(&Token::Semi) {
                    None
                } else if self.is_type_start(self.peek()) {
                    // The declaration list consumes its own semicolon
                    Some(ForInit::Decl(self.parse_var_decl_list()?))
                } else {
                    let e = self.parse_expr()?;
                    self.expect(&Token::Semi)?;
                    Some(ForInit::Expr(e))
                };

                let cond = if self.check(&Token::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&Token::Semi)?;

                let step = if self.check(&Token::RParen) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&Token::RParen)?;

                let body = Box::new(self.parse_stmt()?);
                Ok(self.spanned_from(
                    start,
                    Stmt::For {
                        init,
                        cond,
                        step,
                        body,
                    },
                ))
            }

            Some(Token::Return) => {
                self.advance();
                let value = if self.check(&Token::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&Token::Semi)?;
                Ok(self.spanned_from(start, Stmt::Return(value)))
            }

            Some(Token::Break) => {
                self.advance();
                self.expect(&Token::Semi)?;
                Ok(self.spanned_from(start, Stmt::Break))
            }

            Some(Token::Semi) => {
                self.advance();
                Ok(self.spanned_from(start, Stmt::Empty))
            }

            _ => {
                let e = self.parse_expr()?;
                self.expect(&Token::Semi)?;
                Ok(self.spanned_from(start, Stmt::Expr(e)))
            }
        }
    }

    /// Parse a braced block
    fn parse_block(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.current_span();
        self.expect(&Token::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&Token::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;

        Ok(self.spanned_from(start, Stmt::Block(stmts)))
    }

    fn spanned_from(&self, start: Span, stmt: Stmt) -> Spanned<Stmt> {
        Spanned::new(stmt, start.merge(self.previous_span()))
    }
}
