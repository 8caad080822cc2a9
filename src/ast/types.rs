//! Type expressions as written in source

use super::span::Spanned;

/// A type expression: a named base type with pointer/array derivations.
///
/// These are syntax only; `sema` resolves them against the symbol table into
/// semantic types.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A builtin or declared type name (int, bool, S, ...)
    Named(String),

    /// Pointer type: T*
    Pointer(Box<Spanned<TypeExpr>>),

    /// Array type: T[n], or T[] when the size is left unspecified
    Array {
        element: Box<Spanned<TypeExpr>>,
        size: Option<i64>,
    },
}

impl TypeExpr {
    /// Create a named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    /// Create a pointer type
    pub fn pointer(pointee: Spanned<TypeExpr>) -> Self {
        TypeExpr::Pointer(Box::new(pointee))
    }

    /// Create an array type
    pub fn array(element: Spanned<TypeExpr>, size: Option<i64>) -> Self {
        TypeExpr::Array {
            element: Box::new(element),
            size,
        }
    }
}
