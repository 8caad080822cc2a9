//! Top-level items: declarations, definitions, and module inclusion

use super::expr::Expr;
use super::span::Spanned;
use super::stmt::Stmt;
use super::types::TypeExpr;

/// A parsed translation unit
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// A top-level item
#[derive(Debug, Clone)]
pub enum Item {
    /// using "path";
    Using(Using),
    /// struct S { ... };
    Struct(StructDecl),
    /// enum E { A, B };
    Enum(EnumDecl),
    /// A variable declaration or function prototype's variable form
    Var(VarDecl),
    /// A function prototype or definition
    Func(FuncDecl),
}

/// Module inclusion, resolved during analysis relative to the importing file
#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    pub path: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Spanned<String>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Spanned<String>,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Spanned<String>,
    pub constants: Vec<Spanned<String>>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Spanned<String>,
    pub ty: Spanned<TypeExpr>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Prototypes may omit parameter names
    pub name: Option<Spanned<String>>,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Spanned<String>,
    pub ret: Spanned<TypeExpr>,
    pub params: Vec<Param>,
    pub variadic: bool,
    /// Present for definitions, absent for prototypes
    pub body: Option<Spanned<Stmt>>,
}
