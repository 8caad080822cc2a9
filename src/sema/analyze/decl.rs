//! Declaration analysis
//!
//! Resolves type expressions against the symbol table and declares
//! variables, functions, structs, and enums, diagnosing redeclarations and
//! conflicting types.

use crate::ast::{EnumDecl, ExprKind, FuncDecl, Spanned, StructDecl, TypeExpr, VarDecl};
use crate::sema::table::{Builtin, Symbol, SymbolId, SymbolKind, TypeMask};
use crate::sema::types::Type;

use super::Analyzer;

impl Analyzer {
    /// Resolve a type expression into a semantic type. Unknown names and
    /// value symbols in type position diagnose and yield `Invalid`.
    pub(super) fn resolve_type(&mut self, te: &Spanned<TypeExpr>) -> Type {
        match &te.node {
            TypeExpr::Named(name) => match self.table.lookup(name) {
                None => {
                    self.diagnostics.undefined_symbol(te.span, name.as_str());
                    Type::Invalid
                }
                Some(id) => match self.table.get(id).kind {
                    SymbolKind::Type | SymbolKind::Struct => Type::Basic(id),
                    kind => {
                        self.diagnostics
                            .illegal_symbol_as_type(te.span, kind.describe());
                        Type::Invalid
                    }
                },
            },
            TypeExpr::Pointer(inner) => Type::pointer(self.resolve_type(inner)),
            TypeExpr::Array { element, size } => {
                Type::array(self.resolve_type(element), size.unwrap_or(-1))
            }
        }
    }

    /// Declare a value symbol in the current scope. A name already bound
    /// there at another type is a conflict; at the same type it is a
    /// redeclaration, except that function prototypes may repeat.
    pub(super) fn declare_value(
        &mut self,
        name: &Spanned<String>,
        kind: SymbolKind,
        ty: Type,
    ) -> SymbolId {
        if let Some(existing) = self.table.lookup_current(&name.node) {
            let existing_sym = self.table.get(existing);
            let same = match &existing_sym.ty {
                Some(t) => t.is_equal(&ty, &self.table),
                None => false,
            };

            if !same {
                let symbol = match &existing_sym.ty {
                    Some(t) => t.render_declarator(&self.table, &name.node),
                    None => name.node.clone(),
                };
                let found = ty.render(&self.table);
                self.diagnostics
                    .conflicting_declaration(name.span, symbol, found);
            } else if !matches!(ty, Type::Function { .. }) {
                let symbol = ty.render_declarator(&self.table, &name.node);
                self.diagnostics.redeclaration(name.span, symbol);
            }
            return existing;
        }

        let id = self
            .table
            .intern(Symbol::value(name.node.as_str(), kind, ty));
        self.table.declare(&name.node, id);
        id
    }

    /// Analyze a variable declaration, including its initializer
    pub(super) fn analyze_var_decl(&mut self, decl: &mut VarDecl) {
        let ty = self.resolve_type(&decl.ty);
        self.declare_value(&decl.name, SymbolKind::Id, ty.clone());

        if let Some(init) = &mut decl.init {
            if matches!(init.kind, ExprKind::Init(_)) {
                self.analyze_initializer(init, &ty);
            } else {
                let value = self.analyze_value(init);
                if !value.ty.is_compatible(&ty, &self.table) {
                    let expected = ty.render(&self.table);
                    let found = value.ty.render(&self.table);
                    self.diagnostics.type_expected(
                        init.span,
                        "variable initialization",
                        expected,
                        found,
                    );
                }
            }
        }
    }

    /// Analyze a function prototype or definition
    pub(super) fn analyze_function(&mut self, decl: &mut FuncDecl) {
        let ret = self.resolve_type(&decl.ret);
        let mut param_tys = Vec::new();
        for param in &decl.params {
            param_tys.push(self.resolve_type(&param.ty));
        }
        let fn_ty = Type::function(ret, param_tys.clone(), decl.variadic);

        let id = self.declare_value(&decl.name, SymbolKind::Id, fn_ty.clone());

        let Some(body) = &mut decl.body else {
            return;
        };

        // The implemented symbol must be function-typed; a conflicting
        // earlier declaration may have left it as something else
        let declared = self.table.get(id).ty.clone().unwrap_or(Type::Invalid);
        if !declared.is_function() {
            let found = declared.render(&self.table);
            self.diagnostics
                .type_expected(decl.name.span, "implementation", "function", found);
        }

        if self.table.get(id).defined {
            let symbol = fn_ty.render_declarator(&self.table, &decl.name.node);
            self.diagnostics.redeclaration(decl.name.span, symbol);
        }
        self.table.get_mut(id).defined = true;

        // Save the surrounding expected return type and restore it on the
        // way out, along every path
        let saved = self.return_type.take();
        self.return_type = Some(fn_ty.derive_return());

        self.table.enter_scope();
        for (param, ty) in decl.params.iter().zip(param_tys) {
            if let Some(name) = &param.name {
                self.declare_value(name, SymbolKind::Param, ty);
            }
        }
        self.analyze_stmt(body);
        self.table.exit_scope();

        self.return_type = saved;
    }

    /// Analyze a struct declaration: the tag symbol owns the ordered field
    /// symbols and records the summed size
    pub(super) fn analyze_struct(&mut self, decl: &StructDecl) {
        if self.table.lookup_current(&decl.name.node).is_some() {
            self.diagnostics
                .redeclaration(decl.name.span, format!("struct {}", decl.name.node));
        }

        // The tag goes in before the fields so they may reference their own
        // record through a pointer
        let id = self
            .table
            .intern(Symbol::new(decl.name.node.as_str(), SymbolKind::Struct));
        self.table.declare(&decl.name.node, id);

        let mut children: Vec<SymbolId> = Vec::new();
        let mut size = 0;
        for field in &decl.fields {
            let fty = self.resolve_type(&field.ty);

            let duplicate = children
                .iter()
                .any(|&c| self.table.get(c).ident == field.name.node);
            if duplicate {
                let symbol = fty.render_declarator(&self.table, &field.name.node);
                self.diagnostics.redeclaration(field.name.span, symbol);
                continue;
            }

            size += fty.size(&self.table);
            let fid = self
                .table
                .intern(Symbol::value(field.name.node.as_str(), SymbolKind::Id, fty));
            children.push(fid);
        }

        let sym = self.table.get_mut(id);
        sym.children = children;
        sym.size = size;
    }

    /// Analyze an enum declaration: the tag is an int-like basic type and
    /// each constant is typed as it
    pub(super) fn analyze_enum(&mut self, decl: &EnumDecl) {
        if self.table.lookup_current(&decl.name.node).is_some() {
            self.diagnostics
                .redeclaration(decl.name.span, format!("enum {}", decl.name.node));
        }

        let int_size = self.table.get(self.table.builtin(Builtin::Int)).size;
        let id = self.table.intern(Symbol::basic(
            decl.name.node.as_str(),
            TypeMask::arithmetic(),
            int_size,
        ));
        self.table.declare(&decl.name.node, id);

        let mut children = Vec::new();
        for constant in &decl.constants {
            let cid = self.declare_value(constant, SymbolKind::EnumConstant, Type::Basic(id));
            children.push(cid);
        }
        self.table.get_mut(id).children = children;
    }
}
