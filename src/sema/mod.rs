//! Semantic analysis
//!
//! This module is responsible for:
//! - Symbol declaration and resolution
//! - Deriving a type and value category for every expression
//! - Diagnosing type-level mistakes without ever aborting the traversal
//!
//! Errors are absorbed, not thrown: a bad subexpression becomes `Invalid`
//! and its context proceeds, so each root cause yields one diagnostic.

pub mod analyze;
pub mod table;
pub mod types;

use std::path::PathBuf;

use crate::ast::{Module, Span};
use analyze::Analyzer;
use table::SymbolTable;

/// A single diagnostic produced during analysis
#[derive(Debug, Clone)]
pub enum Diagnostic {
    /// A context requires a class of types or a specific type
    TypeExpected {
        context: String,
        expected: String,
        found: String,
        span: Span,
    },

    /// An operator requires a class of operand
    OperatorType {
        op: String,
        expected: String,
        found: String,
        span: Span,
    },

    /// The operand of an assigning or addressing operator must be addressable
    LvalueRequired { op: String, span: Span },

    /// Two expressions whose types must be compatible are not
    Mismatch {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    /// Wrong number of arguments, fields, or initializer elements
    Degree {
        context: String,
        thing: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// An argument does not fit its parameter
    ParameterMismatch {
        callee: Option<String>,
        index: usize,
        expected: String,
        found: String,
        span: Span,
    },

    /// The field name does not exist in the record
    UnknownMember {
        op: String,
        record: String,
        field: String,
        span: Span,
    },

    /// An aggregate initializer element does not fit its field
    InitFieldMismatch {
        record: String,
        field: String,
        expected: String,
        found: String,
        span: Span,
    },

    /// A name redeclared at a different type
    ConflictingDeclaration {
        symbol: String,
        found: String,
        span: Span,
    },

    /// A name redeclared at the same type
    Redeclaration { symbol: String, span: Span },

    /// A type or struct name appearing in value position
    IllegalSymbolAsValue { kind: String, span: Span },

    /// A value name appearing in type position
    IllegalSymbolAsType { kind: String, span: Span },

    /// Name not found in any scope
    UndefinedSymbol { name: String, span: Span },

    /// A `using` inclusion that could not be resolved
    UsingFailed {
        path: String,
        reason: String,
        span: Span,
    },

    /// A node shape the analyzer cannot dispatch; indicates a collaborator bug
    Unhandled { what: String, span: Span },
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::TypeExpected { span, .. }
            | Diagnostic::OperatorType { span, .. }
            | Diagnostic::LvalueRequired { span, .. }
            | Diagnostic::Mismatch { span, .. }
            | Diagnostic::Degree { span, .. }
            | Diagnostic::ParameterMismatch { span, .. }
            | Diagnostic::UnknownMember { span, .. }
            | Diagnostic::InitFieldMismatch { span, .. }
            | Diagnostic::ConflictingDeclaration { span, .. }
            | Diagnostic::Redeclaration { span, .. }
            | Diagnostic::IllegalSymbolAsValue { span, .. }
            | Diagnostic::IllegalSymbolAsType { span, .. }
            | Diagnostic::UndefinedSymbol { span, .. }
            | Diagnostic::UsingFailed { span, .. }
            | Diagnostic::Unhandled { span, .. } => *span,
        }
    }

    /// The human sentence, without location
    pub fn message(&self) -> String {
        match self {
            Diagnostic::TypeExpected {
                context,
                expected,
                found,
                ..
            } => format!("{} expected {}, found {}", context, expected, found),
            Diagnostic::OperatorType {
                op,
                expected,
                found,
                ..
            } => format!("{} requires {}, found {}", op, expected, found),
            Diagnostic::LvalueRequired { op, .. } => format!("{} requires lvalue", op),
            Diagnostic::Mismatch {
                op, left, right, ..
            } => format!("type mismatch between {} and {} for {}", left, right, op),
            Diagnostic::Degree {
                context,
                thing,
                expected,
                found,
                ..
            } => format!(
                "{} expected {} {}, {} given",
                context, expected, thing, found
            ),
            Diagnostic::ParameterMismatch {
                callee,
                index,
                expected,
                found,
                ..
            } => match callee {
                Some(name) => format!(
                    "type mismatch at parameter {} of {}: expected {}, found {}",
                    index, name, expected, found
                ),
                None => format!(
                    "type mismatch at parameter {}: expected {}, found {}",
                    index, expected, found
                ),
            },
            Diagnostic::UnknownMember {
                op, record, field, ..
            } => format!("{} expected field of {}, found {}", op, record, field),
            Diagnostic::InitFieldMismatch {
                record,
                field,
                expected,
                found,
                ..
            } => format!(
                "field {} of {} expected {}, found {}",
                field, record, expected, found
            ),
            Diagnostic::ConflictingDeclaration { symbol, found, .. } => {
                format!("{} redeclared as conflicting type {}", symbol, found)
            }
            Diagnostic::Redeclaration { symbol, .. } => format!("{} redeclared", symbol),
            Diagnostic::IllegalSymbolAsValue { kind, .. } => {
                format!("cannot use a {} as a value", kind)
            }
            Diagnostic::IllegalSymbolAsType { kind, .. } => {
                format!("cannot use a {} as a type", kind)
            }
            Diagnostic::UndefinedSymbol { name, .. } => format!("undefined symbol '{}'", name),
            Diagnostic::UsingFailed { path, reason, .. } => {
                format!("failed to include '{}': {}", path, reason)
            }
            Diagnostic::Unhandled { what, .. } => format!("unhandled {}", what),
        }
    }

    /// Render as `error(line:col): message` against the source text
    pub fn format_with_source(&self, source: &str) -> String {
        format!(
            "error({}): {}",
            self.span().format_position(source),
            self.message()
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.span();
        write!(f, "{} at {}..{}", self.message(), span.start, span.end)
    }
}

/// The diagnostics sink: collects diagnostics in emission order and owns the
/// error and warning counters.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.errors += 1;
        self.list.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.list.iter()
    }

    /// Render every diagnostic against the source, one line each
    pub fn render(&self, source: &str) -> String {
        self.list
            .iter()
            .map(|d| d.format_with_source(source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // === Typed reporting primitives ===

    pub fn type_expected(
        &mut self,
        span: Span,
        context: impl Into<String>,
        expected: impl Into<String>,
        found: String,
    ) {
        self.report(Diagnostic::TypeExpected {
            context: context.into(),
            expected: expected.into(),
            found,
            span,
        });
    }

    pub fn operator_type(
        &mut self,
        span: Span,
        op: impl Into<String>,
        expected: impl Into<String>,
        found: String,
    ) {
        self.report(Diagnostic::OperatorType {
            op: op.into(),
            expected: expected.into(),
            found,
            span,
        });
    }

    pub fn lvalue_required(&mut self, span: Span, op: impl Into<String>) {
        self.report(Diagnostic::LvalueRequired { op: op.into(), span });
    }

    pub fn mismatch(&mut self, span: Span, op: impl Into<String>, left: String, right: String) {
        self.report(Diagnostic::Mismatch {
            op: op.into(),
            left,
            right,
            span,
        });
    }

    pub fn degree(
        &mut self,
        span: Span,
        context: impl Into<String>,
        thing: impl Into<String>,
        expected: usize,
        found: usize,
    ) {
        self.report(Diagnostic::Degree {
            context: context.into(),
            thing: thing.into(),
            expected,
            found,
            span,
        });
    }

    pub fn parameter_mismatch(
        &mut self,
        span: Span,
        callee: Option<String>,
        index: usize,
        expected: String,
        found: String,
    ) {
        self.report(Diagnostic::ParameterMismatch {
            callee,
            index,
            expected,
            found,
            span,
        });
    }

    pub fn unknown_member(
        &mut self,
        span: Span,
        op: impl Into<String>,
        record: String,
        field: String,
    ) {
        self.report(Diagnostic::UnknownMember {
            op: op.into(),
            record,
            field,
            span,
        });
    }

    pub fn init_field_mismatch(
        &mut self,
        span: Span,
        record: String,
        field: String,
        expected: String,
        found: String,
    ) {
        self.report(Diagnostic::InitFieldMismatch {
            record,
            field,
            expected,
            found,
            span,
        });
    }

    pub fn conflicting_declaration(&mut self, span: Span, symbol: String, found: String) {
        self.report(Diagnostic::ConflictingDeclaration {
            symbol,
            found,
            span,
        });
    }

    pub fn redeclaration(&mut self, span: Span, symbol: String) {
        self.report(Diagnostic::Redeclaration { symbol, span });
    }

    pub fn illegal_symbol_as_value(&mut self, span: Span, kind: impl Into<String>) {
        self.report(Diagnostic::IllegalSymbolAsValue {
            kind: kind.into(),
            span,
        });
    }

    pub fn illegal_symbol_as_type(&mut self, span: Span, kind: impl Into<String>) {
        self.report(Diagnostic::IllegalSymbolAsType {
            kind: kind.into(),
            span,
        });
    }

    pub fn undefined_symbol(&mut self, span: Span, name: impl Into<String>) {
        self.report(Diagnostic::UndefinedSymbol {
            name: name.into(),
            span,
        });
    }

    pub fn using_failed(&mut self, span: Span, path: impl Into<String>, reason: String) {
        self.report(Diagnostic::UsingFailed {
            path: path.into(),
            reason,
            span,
        });
    }

    pub fn unhandled(&mut self, span: Span, what: impl Into<String>) {
        self.report(Diagnostic::Unhandled {
            what: what.into(),
            span,
        });
    }
}

/// The result of an analysis pass: the populated symbol table and the
/// accumulated diagnostics. The module itself carries the derived types.
pub struct Analysis {
    pub table: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn ok(&self) -> bool {
        self.diagnostics.error_count() == 0
    }
}

/// Analyze a module in place
pub fn analyze(module: &mut Module) -> Analysis {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_module(module);
    analyzer.finish()
}

/// Analyze a module, resolving `using` inclusions relative to `file_path`
pub fn analyze_with_path(module: &mut Module, file_path: PathBuf) -> Analysis {
    let mut analyzer = Analyzer::with_base_path(file_path);
    analyzer.analyze_module(module);
    analyzer.finish()
}
