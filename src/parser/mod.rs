//! Parser for the minic language
//!
//! A recursive descent parser that builds an AST from tokens. Binary
//! operators use Pratt parsing; declarations use C declarator syntax.

mod error;
mod expr;
mod item;
mod stmt;

pub use error::{ParseError, ParseErrorKind, ParseResult};

use rustc_hash::FxHashSet;

use crate::ast::{Module, Span, Spanned};
use crate::lexer::{SpannedToken, Token};

/// The minic parser
pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    /// Names that denote types, so casts and declarations can be told apart
    /// from expressions without a symbol table. Seeded with the builtins,
    /// extended by struct and enum declarations as they are parsed.
    type_names: FxHashSet<String>,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            type_names: FxHashSet::default(),
        }
    }

    /// Parse a complete translation unit
    pub fn parse(tokens: &'a [SpannedToken]) -> ParseResult<Module> {
        let mut parser = Parser::new(tokens);
        parser.parse_module()
    }

    // === Token navigation ===

    /// Peek at the current token
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek ahead at a future token (n=1 is the next token)
    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance to the next token
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Check if the current token matches
    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Consume the current token if it matches
    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token or return an error
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(
                self.current_span(),
                format!("{:?}", expected),
                self.peek().cloned(),
            ))
        }
    }

    /// Expect an identifier and return it
    fn expect_ident(&mut self) -> ParseResult<Spanned<String>> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(Spanned::new(name, span))
            }
            tok => Err(ParseError::unexpected_token(span, "identifier", tok)),
        }
    }

    /// Expect a string literal and return it
    fn expect_string(&mut self) -> ParseResult<Spanned<String>> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Spanned::new(s, span))
            }
            tok => Err(ParseError::unexpected_token(span, "string literal", tok)),
        }
    }

    /// Get the span of the current token
    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| Span::new(t.span.start, t.span.end))
            .unwrap_or_else(|| {
                // EOF span - use end of last token or 0
                self.tokens
                    .last()
                    .map(|t| Span::new(t.span.end, t.span.end))
                    .unwrap_or_default()
            })
    }

    /// Get the span of the previous token
    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            let t = &self.tokens[self.pos - 1];
            Span::new(t.span.start, t.span.end)
        } else {
            Span::default()
        }
    }

    /// Does this token open a type expression?
    fn is_type_start(&self, token: Option<&Token>) -> bool {
        match token {
            Some(Token::Void) | Some(Token::Bool) | Some(Token::Char) | Some(Token::Int) => true,
            Some(Token::Ident(name)) => self.type_names.contains(name),
            _ => false,
        }
    }
}
