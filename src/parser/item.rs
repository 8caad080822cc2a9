//! Item and declaration parsing

use crate::ast::{
    EnumDecl, FieldDecl, FuncDecl, Item, Module, Param, Spanned, StructDecl, TypeExpr, Using,
    VarDecl,
};
use crate::lexer::Token;

use super::Parser;
use super::error::{ParseError, ParseResult};

/// A parsed declarator: the name plus the type built around the base
pub(super) enum Declarator {
    Var {
        name: Spanned<String>,
        ty: Spanned<TypeExpr>,
    },
    Func {
        name: Spanned<String>,
        ret: Spanned<TypeExpr>,
        params: Vec<Param>,
        variadic: bool,
    },
}

impl Parser<'_> {
    /// Parse a complete translation unit
    pub fn parse_module(&mut self) -> ParseResult<Module> {
        let mut items = Vec::new();

        while self.peek().is_some() {
            self.parse_item(&mut items)?;
        }

        Ok(Module::with_items(items))
    }

    /// Parse one top-level construct. A single source construct may yield
    /// several items (struct declaration with trailing declarators, or a
    /// multi-declarator line).
    fn parse_item(&mut self, items: &mut Vec<Item>) -> ParseResult<()> {
        if self.is_type_start(self.peek()) {
            return self.parse_declaration_item(items);
        }

        match self.peek().cloned() {
            Some(Token::Using) => {
                self.advance();
                let path = self.expect_string()?;
                self.expect(&Token::Semi)?;
                items.push(Item::Using(Using { path }));
                Ok(())
            }

            Some(Token::Struct) => self.parse_struct_item(items),

            Some(Token::Enum) => {
                let e = self.parse_enum_decl()?;
                items.push(Item::Enum(e));
                Ok(())
            }

            Some(tok) => Err(ParseError::unexpected_token(
                self.current_span(),
                "item",
                Some(tok),
            )),
            None => Err(ParseError::unexpected_eof(self.current_span(), "item")),
        }
    }

    /// Parse `struct S { fields } [declarators] ;`
    fn parse_struct_item(&mut self, items: &mut Vec<Item>) -> ParseResult<()> {
        self.expect(&Token::Struct)?;
        let name = self.expect_ident()?;

        // The tag becomes a type name immediately so fields may refer to
        // their own record through a pointer
        self.type_names.insert(name.node.clone());

        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(&Token::RBrace) {
            let base = self.parse_type_base()?;
            loop {
                match self.parse_declarator(&base)? {
                    Declarator::Var { name, ty } => fields.push(FieldDecl { name, ty }),
                    Declarator::Func { name, .. } => {
                        return Err(ParseError::custom(
                            name.span,
                            format!("field '{}' may not have function type", name.node),
                        ));
                    }
                }
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::Semi)?;
        }
        self.expect(&Token::RBrace)?;

        let base = Spanned::new(TypeExpr::named(name.node.clone()), name.span);

        items.push(Item::Struct(StructDecl { name, fields }));

        while !self.check(&Token::Semi) {
            let var = self.parse_var_declarator(&base)?;
            items.push(Item::Var(var));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semi)?;
        Ok(())
    }

    /// Parse `enum E { A, B, C };`
    fn parse_enum_decl(&mut self) -> ParseResult<EnumDecl> {
        self.expect(&Token::Enum)?;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace)?;

        let mut constants = Vec::new();
        while !self.check(&Token::RBrace) {
            constants.push(self.expect_ident()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBrace)?;
        self.expect(&Token::Semi)?;

        self.type_names.insert(name.node.clone());
        Ok(EnumDecl { name, constants })
    }

    /// Parse a declaration line: either a function definition or a
    /// comma-separated list of variables and prototypes
    fn parse_declaration_item(&mut self, items: &mut Vec<Item>) -> ParseResult<()> {
        let base = self.parse_type_base()?;

        match self.parse_declarator(&base)? {
            // A function declarator followed by a body is a definition and
            // terminates the line
            Declarator::Func {
                name,
                ret,
                params,
                variadic,
            } => {
                if self.check(&Token::LBrace) {
                    let body = self.parse_stmt()?;
                    items.push(Item::Func(FuncDecl {
                        name,
                        ret,
                        params,
                        variadic,
                        body: Some(body),
                    }));
                    return Ok(());
                }
                items.push(Item::Func(FuncDecl {
                    name,
                    ret,
                    params,
                    variadic,
                    body: None,
                }));
            }
            Declarator::Var { name, ty } => {
                let init = self.parse_optional_init()?;
                items.push(Item::Var(VarDecl { name, ty, init }));
            }
        }

        while self.eat(&Token::Comma) {
            match self.parse_declarator(&base)? {
                Declarator::Var { name, ty } => {
                    let init = self.parse_optional_init()?;
                    items.push(Item::Var(VarDecl { name, ty, init }));
                }
                Declarator::Func {
                    name,
                    ret,
                    params,
                    variadic,
                } => {
                    items.push(Item::Func(FuncDecl {
                        name,
                        ret,
                        params,
                        variadic,
                        body: None,
                    }));
                }
            }
        }
        self.expect(&Token::Semi)?;
        Ok(())
    }

    /// Parse a local declaration list (variables only), consuming the `;`
    pub(super) fn parse_var_decl_list(&mut self) -> ParseResult<Vec<VarDecl>> {
        let base = self.parse_type_base()?;
        let mut decls = Vec::new();

        loop {
            let var = self.parse_var_declarator(&base)?;
            decls.push(var);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semi)?;
        Ok(decls)
    }

    fn parse_var_declarator(&mut self, base: &Spanned<TypeExpr>) -> ParseResult<VarDecl> {
        match self.parse_declarator(base)? {
            Declarator::Var { name, ty } => {
                let init = self.parse_optional_init()?;
                Ok(VarDecl { name, ty, init })
            }
            Declarator::Func { name, .. } => Err(ParseError::custom(
                name.span,
                format!("'{}' may not be declared as a function here", name.node),
            )),
        }
    }

    fn parse_optional_init(&mut self) -> ParseResult<Option<crate::ast::Expr>> {
        if self.eat(&Token::Eq) {
            Ok(Some(self.parse_initializer()?))
        } else {
            Ok(None)
        }
    }

    /// Parse one declarator against a base type: `*`s, the name, then either
    /// a parameter list (function) or array brackets
    pub(super) fn parse_declarator(
        &mut self,
        base: &Spanned<TypeExpr>,
    ) -> ParseResult<Declarator> {
        let mut ty = base.clone();
        while self.check(&Token::Star) {
            self.advance();
            let span = ty.span.merge(self.previous_span());
            ty = Spanned::new(TypeExpr::pointer(ty), span);
        }

        let name = self.expect_ident()?;

        if self.check(&Token::LParen) {
            let (params, variadic) = self.parse_params()?;
            return Ok(Declarator::Func {
                name,
                ret: ty,
                params,
                variadic,
            });
        }

        // Array brackets nest outside-in: a[2][3] is an array of 2 arrays of 3
        let mut sizes = Vec::new();
        while self.eat(&Token::LBracket) {
            let size = match self.peek().cloned() {
                Some(Token::Integer(n)) => {
                    self.advance();
                    Some(n)
                }
                _ => None,
            };
            self.expect(&Token::RBracket)?;
            sizes.push(size);
        }
        for size in sizes.into_iter().rev() {
            let span = ty.span.merge(self.previous_span());
            ty = Spanned::new(TypeExpr::array(ty, size), span);
        }

        Ok(Declarator::Var { name, ty })
    }

    /// Parse a parameter list, handling `(void)`, `()` and a trailing `...`
    fn parse_params(&mut self) -> ParseResult<(Vec<Param>, bool)> {
        self.expect(&Token::LParen)?;

        if self.eat(&Token::RParen) {
            return Ok((Vec::new(), false));
        }
        if self.check(&Token::Void) && self.peek_ahead(1) == Some(&Token::RParen) {
            self.advance();
            self.advance();
            return Ok((Vec::new(), false));
        }

        let mut params = Vec::new();
        let mut variadic = false;

        loop {
            if self.eat(&Token::Ellipsis) {
                variadic = true;
                break;
            }

            let base = self.parse_type_base()?;
            let mut ty = base;
            while self.check(&Token::Star) {
                self.advance();
                let span = ty.span.merge(self.previous_span());
                ty = Spanned::new(TypeExpr::pointer(ty), span);
            }

            let name = if matches!(self.peek(), Some(Token::Ident(_))) {
                Some(self.expect_ident()?)
            } else {
                None
            };

            let mut sizes = Vec::new();
            while self.eat(&Token::LBracket) {
                let size = match self.peek().cloned() {
                    Some(Token::Integer(n)) => {
                        self.advance();
                        Some(n)
                    }
                    _ => None,
                };
                self.expect(&Token::RBracket)?;
                sizes.push(size);
            }
            for size in sizes.into_iter().rev() {
                let span = ty.span.merge(self.previous_span());
                ty = Spanned::new(TypeExpr::array(ty, size), span);
            }

            params.push(Param { name, ty });

            if !self.eat(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::RParen)?;
        Ok((params, variadic))
    }
}
