//! Analysis logic
//!
//! Traverses the AST, populating the symbol table and deriving a type for
//! every expression node. The traversal is strictly sequential and never
//! aborts; all failures land in the diagnostics sink.

mod decl;
mod expr;
mod init;
mod stmt;

use std::path::PathBuf;

use rustc_hash::FxHashSet;

use crate::ast::{Item, Module, Using};
use crate::config::TargetConfig;
use crate::lexer;
use crate::parser::Parser;
use crate::sema::table::SymbolTable;
use crate::sema::types::Type;
use crate::sema::{Analysis, Diagnostics};

/// The result of visiting one expression: its derived type together with its
/// value category. The two travel together because several operators need
/// both at once.
#[derive(Debug, Clone)]
pub struct ValueResult {
    pub ty: Type,
    pub lvalue: bool,
}

pub struct Analyzer {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
    /// Expected type of `return` values inside the current function body
    pub(super) return_type: Option<Type>,
    /// The file being analyzed, for resolving `using` paths
    base_path: Option<PathBuf>,
    /// Files already included, to stop inclusion cycles
    imported_files: FxHashSet<PathBuf>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(&TargetConfig::load_or_default()),
            diagnostics: Diagnostics::new(),
            return_type: None,
            base_path: None,
            imported_files: FxHashSet::default(),
        }
    }

    pub fn with_base_path(base_path: PathBuf) -> Self {
        let mut analyzer = Self::new();
        analyzer.base_path = Some(base_path);
        analyzer
    }

    pub fn finish(self) -> Analysis {
        Analysis {
            table: self.table,
            diagnostics: self.diagnostics,
        }
    }

    /// Analyze every item of a module in order
    pub fn analyze_module(&mut self, module: &mut Module) {
        for item in &mut module.items {
            self.analyze_item(item);
        }
    }

    fn analyze_item(&mut self, item: &mut Item) {
        match item {
            Item::Using(using) => self.analyze_using(using),
            Item::Struct(decl) => self.analyze_struct(decl),
            Item::Enum(decl) => self.analyze_enum(decl),
            Item::Var(decl) => self.analyze_var_decl(decl),
            Item::Func(decl) => self.analyze_function(decl),
        }
    }

    /// Resolve a `using` inclusion: load the file relative to the importing
    /// one, parse it, and analyze its declarations into the global scope.
    /// Failures are diagnosed and absorbed.
    fn analyze_using(&mut self, using: &Using) {
        let dir = self
            .base_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(PathBuf::from)
            .unwrap_or_default();
        let target = dir.join(&using.path.node);

        // Repeat or cyclic inclusions are simply skipped
        if !self.imported_files.insert(target.clone()) {
            return;
        }

        let source = match std::fs::read_to_string(&target) {
            Ok(source) => source,
            Err(err) => {
                self.diagnostics
                    .using_failed(using.path.span, using.path.node.as_str(), err.to_string());
                return;
            }
        };

        let tokens = match lexer::lex(&source) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.diagnostics
                    .using_failed(using.path.span, using.path.node.as_str(), err.message);
                return;
            }
        };

        let mut module = match Parser::parse(&tokens) {
            Ok(module) => module,
            Err(err) => {
                self.diagnostics.using_failed(
                    using.path.span,
                    using.path.node.as_str(),
                    err.format_with_source(&source),
                );
                return;
            }
        };

        // Nested inclusions resolve relative to the included file
        let saved = self.base_path.replace(target);
        self.analyze_module(&mut module);
        self.base_path = saved;
    }
}
