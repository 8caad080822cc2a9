//! AST definitions for the minic language

pub mod expr;
pub mod item;
pub mod span;
pub mod stmt;
pub mod types;

pub use expr::{BinOp, Expr, ExprKind, Literal, UnOp};
pub use item::{EnumDecl, FieldDecl, FuncDecl, Item, Module, Param, StructDecl, Using, VarDecl};
pub use span::{Span, Spanned};
pub use stmt::{ForInit, Stmt};
pub use types::TypeExpr;
