//! Expression parsing

use crate::ast::{BinOp, Expr, ExprKind, Literal, Spanned, TypeExpr, UnOp};
use crate::lexer::Token;

use super::Parser;
use super::error::{ParseError, ParseResult};

impl Parser<'_> {
    /// Parse a full expression, including the comma operator
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_assign()?;

        while self.check(&Token::Comma) {
            self.advance();
            let rhs = self.parse_assign()?;
            lhs = Expr::binary(lhs, BinOp::Comma, rhs);
        }

        Ok(lhs)
    }

    /// Parse an assignment expression (right-associative), the element level
    /// for call arguments and initializers
    pub fn parse_assign(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_ternary()?;

        if let Some(op) = self.peek().and_then(assign_op) {
            self.advance();
            let rhs = self.parse_assign()?;
            return Ok(Expr::binary(lhs, op, rhs));
        }

        Ok(lhs)
    }

    /// Parse a ternary conditional
    fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let cond = self.parse_binary_bp(0)?;

        if self.eat(&Token::Question) {
            let then_val = self.parse_assign()?;
            self.expect(&Token::Colon)?;
            let else_val = self.parse_assign()?;
            let span = cond.span.merge(else_val.span);
            return Ok(Expr::new(
                ExprKind::Ternary {
                    cond: Box::new(cond),
                    then_val: Box::new(then_val),
                    else_val: Box::new(else_val),
                },
                span,
            ));
        }

        Ok(cond)
    }

    /// Parse binary operators with Pratt parsing (binding power)
    fn parse_binary_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Some(tok) => tok.clone(),
                None => break,
            };

            let (l_bp, r_bp) = match infix_binding_power(&op) {
                Some(bp) => bp,
                None => break,
            };

            if l_bp < min_bp {
                break;
            }

            self.advance();
            let rhs = self.parse_binary_bp(r_bp)?;

            let bin_op = token_to_bin_op(&op).expect("already checked");
            lhs = Expr::binary(lhs, bin_op, rhs);
        }

        Ok(lhs)
    }

    /// Parse prefix operators, casts, and sizeof
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let prefix = match self.peek() {
            Some(Token::Plus) => Some(UnOp::Plus),
            Some(Token::Minus) => Some(UnOp::Neg),
            Some(Token::Bang) => Some(UnOp::Not),
            Some(Token::Tilde) => Some(UnOp::BitNot),
            Some(Token::Star) => Some(UnOp::Deref),
            Some(Token::Amp) => Some(UnOp::AddrOf),
            Some(Token::PlusPlus) => Some(UnOp::Inc),
            Some(Token::MinusMinus) => Some(UnOp::Dec),
            _ => None,
        };

        if let Some(op) = prefix {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::unary(op, operand, span));
        }

        if self.check(&Token::Sizeof) {
            self.advance();
            if self.check(&Token::LParen) && self.is_type_start(self.peek_ahead(1)) {
                self.advance();
                let target = self.parse_type_expr()?;
                self.expect(&Token::RParen)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::SizeofType(target), span));
            }
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::SizeofValue(Box::new(operand)), span));
        }

        // A parenthesized type is a cast or a compound literal
        if self.check(&Token::LParen) && self.is_type_start(self.peek_ahead(1)) {
            self.advance();
            let target = self.parse_type_expr()?;
            self.expect(&Token::RParen)?;

            if self.check(&Token::LBrace) {
                let init = self.parse_initializer()?;
                let span = start.merge(self.previous_span());
                let lit = Expr::new(
                    ExprKind::CompoundLiteral {
                        target,
                        init: Box::new(init),
                    },
                    span,
                );
                return self.parse_postfix(lit);
            }

            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Cast {
                    target,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    /// Parse postfix operations: indexing, calls, member access, ++/--
    fn parse_postfix(&mut self, mut expr: Expr) -> ParseResult<Expr> {
        loop {
            if self.check(&Token::LBracket) {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                let span = expr.span.merge(self.previous_span());
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.check(&Token::LParen) {
                self.advance();
                let mut args = Vec::new();
                while !self.check(&Token::RParen) {
                    args.push(self.parse_assign()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
                let span = expr.span.merge(self.previous_span());
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else if self.check(&Token::Dot) || self.check(&Token::Arrow) {
                let through = self.check(&Token::Arrow);
                self.advance();
                let field = self.expect_ident()?;
                let span = expr.span.merge(field.span);
                expr = Expr::new(
                    ExprKind::Member {
                        through,
                        object: Box::new(expr),
                        field,
                    },
                    span,
                );
            } else if self.check(&Token::PlusPlus) || self.check(&Token::MinusMinus) {
                let op = if self.check(&Token::PlusPlus) {
                    UnOp::Inc
                } else {
                    UnOp::Dec
                };
                self.advance();
                let span = expr.span.merge(self.previous_span());
                expr = Expr::unary(op, expr, span);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parse a primary expression: literals, identifiers, parentheses
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        match self.peek().cloned() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }

            Some(Token::Integer(n)) => {
                self.advance();
                Ok(Expr::int(n, start))
            }
            Some(Token::CharLit(c)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::Char(c)), start))
            }
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::Str(s)), start))
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(true)), start))
            }
            Some(Token::False) => {
                self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(false)), start))
            }

            Some(Token::Ident(name)) => {
                self.advance();
                Ok(Expr::ident(name, start))
            }

            Some(tok) => Err(ParseError::unexpected_token(start, "expression", Some(tok))),
            None => Err(ParseError::unexpected_eof(start, "expression")),
        }
    }

    /// Parse an initializer: a brace list or an assignment expression
    pub fn parse_initializer(&mut self) -> ParseResult<Expr> {
        if !self.check(&Token::LBrace) {
            return self.parse_assign();
        }

        let start = self.current_span();
        self.advance();

        let mut elems = Vec::new();
        while !self.check(&Token::RBrace) {
            elems.push(self.parse_initializer()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBrace)?;
        let span = start.merge(self.previous_span());

        Ok(Expr::new(ExprKind::Init(elems), span))
    }

    /// Parse a type expression: base name with pointer and array derivations
    pub fn parse_type_expr(&mut self) -> ParseResult<Spanned<TypeExpr>> {
        let mut ty = self.parse_type_base()?;

        loop {
            if self.check(&Token::Star) {
                self.advance();
                let span = ty.span.merge(self.previous_span());
                ty = Spanned::new(TypeExpr::pointer(ty), span);
            } else if self.check(&Token::LBracket) {
                self.advance();
                let size = match self.peek().cloned() {
                    Some(Token::Integer(n)) => {
                        self.advance();
                        Some(n)
                    }
                    _ => None,
                };
                self.expect(&Token::RBracket)?;
                let span = ty.span.merge(self.previous_span());
                ty = Spanned::new(TypeExpr::array(ty, size), span);
            } else {
                break;
            }
        }

        Ok(ty)
    }

    /// Parse the base of a type expression: a builtin or declared type name
    pub fn parse_type_base(&mut self) -> ParseResult<Spanned<TypeExpr>> {
        let span = self.current_span();
        let name = match self.peek().cloned() {
            Some(Token::Void) => "void".to_string(),
            Some(Token::Bool) => "bool".to_string(),
            Some(Token::Char) => "char".to_string(),
            Some(Token::Int) => "int".to_string(),
            Some(Token::Ident(name)) if self.type_names.contains(&name) => name,
            tok => return Err(ParseError::unexpected_token(span, "type name", tok)),
        };
        self.advance();
        Ok(Spanned::new(TypeExpr::named(name), span))
    }
}

/// Get the binding power for infix operators
fn infix_binding_power(token: &Token) -> Option<(u8, u8)> {
    Some(match token {
        // Logical OR (lowest precedence)
        Token::OrOr => (1, 2),
        // Logical AND
        Token::AndAnd => (3, 4),
        // Bitwise OR
        Token::Pipe => (5, 6),
        // Bitwise XOR
        Token::Caret => (7, 8),
        // Bitwise AND
        Token::Amp => (9, 10),
        // Equality
        Token::EqEq | Token::Ne => (11, 12),
        // Comparison
        Token::Lt | Token::Gt | Token::Le | Token::Ge => (13, 14),
        // Bit shifts
        Token::Shl | Token::Shr => (15, 16),
        // Addition/subtraction
        Token::Plus | Token::Minus => (17, 18),
        // Multiplication/division/modulo
        Token::Star | Token::Slash | Token::Percent => (19, 20),
        _ => return None,
    })
}

/// Convert a token to its binary operator
fn token_to_bin_op(token: &Token) -> Option<BinOp> {
    Some(match token {
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Percent => BinOp::Mod,
        Token::Amp => BinOp::BitAnd,
        Token::Pipe => BinOp::BitOr,
        Token::Caret => BinOp::BitXor,
        Token::Shl => BinOp::Shl,
        Token::Shr => BinOp::Shr,
        Token::EqEq => BinOp::Eq,
        Token::Ne => BinOp::Ne,
        Token::Lt => BinOp::Lt,
        Token::Gt => BinOp::Gt,
        Token::Le => BinOp::Le,
        Token::Ge => BinOp::Ge,
        Token::AndAnd => BinOp::And,
        Token::OrOr => BinOp::Or,
        _ => return None,
    })
}

/// Convert a token to its assignment operator
fn assign_op(token: &Token) -> Option<BinOp> {
    Some(match token {
        Token::Eq => BinOp::Assign,
        Token::PlusEq => BinOp::AddAssign,
        Token::MinusEq => BinOp::SubAssign,
        Token::StarEq => BinOp::MulAssign,
        Token::SlashEq => BinOp::DivAssign,
        Token::PercentEq => BinOp::ModAssign,
        Token::AmpEq => BinOp::AndAssign,
        Token::PipeEq => BinOp::OrAssign,
        Token::CaretEq => BinOp::XorAssign,
        Token::ShlEq => BinOp::ShlAssign,
        Token::ShrEq => BinOp::ShrAssign,
        _ => return None,
    })
}
