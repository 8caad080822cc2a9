//! Test harness for analyzing minic programs
//!
//! Analysis never aborts, so the helpers hand back the annotated module and
//! the accumulated diagnostics together and assertions work on both.

use minic::ast::{Expr, Item, Module, Spanned, Stmt};
use minic::sema::{self, Analysis};
use minic::{Parser, lex};

/// Lex and parse, panicking on front-end errors (the tests feed valid syntax)
pub fn parse_source(source: &str) -> Module {
    let tokens = lex(source).expect("lex error");
    Parser::parse(&tokens).expect("parse error")
}

/// Run the full pipeline
pub fn analyze_source(source: &str) -> (Module, Analysis) {
    let mut module = parse_source(source);
    let analysis = sema::analyze(&mut module);
    (module, analysis)
}

/// Assert that a program analyzes without diagnostics
pub fn assert_analyzes(source: &str) -> (Module, Analysis) {
    let (module, analysis) = analyze_source(source);
    assert!(
        analysis.ok(),
        "expected clean analysis, got:\n{}",
        analysis.diagnostics.render(source)
    );
    (module, analysis)
}

/// Assert an exact number of diagnostics
pub fn assert_error_count(source: &str, expected: usize) -> (Module, Analysis) {
    let (module, analysis) = analyze_source(source);
    assert_eq!(
        analysis.diagnostics.error_count(),
        expected,
        "diagnostics:\n{}",
        analysis.diagnostics.render(source)
    );
    (module, analysis)
}

/// Assert that some diagnostic's rendering contains the needle
pub fn assert_error_contains(source: &str, needle: &str) {
    let (_, analysis) = analyze_source(source);
    assert!(
        analysis.diagnostics.error_count() > 0,
        "expected analysis to fail but it succeeded"
    );
    let rendered = analysis.diagnostics.render(source);
    assert!(
        rendered.contains(needle),
        "expected a diagnostic containing '{}' but got:\n{}",
        needle,
        rendered
    );
}

/// The statements of the named function's body
pub fn func_body<'a>(module: &'a Module, name: &str) -> &'a [Spanned<Stmt>] {
    for item in &module.items {
        if let Item::Func(f) = item {
            if f.name.node == name {
                if let Some(body) = &f.body {
                    if let Stmt::Block(stmts) = &body.node {
                        return stmts;
                    }
                }
            }
        }
    }
    panic!("function '{}' with body not found", name);
}

/// The expressions of a body's expression statements, in order
pub fn stmt_exprs<'a>(stmts: &'a [Spanned<Stmt>]) -> Vec<&'a Expr> {
    stmts
        .iter()
        .filter_map(|s| match &s.node {
            Stmt::Expr(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// The n'th expression statement of the named function
pub fn nth_expr<'a>(module: &'a Module, func: &str, n: usize) -> &'a Expr {
    let body = func_body(module, func);
    let exprs = stmt_exprs(body);
    exprs
        .get(n)
        .copied()
        .unwrap_or_else(|| panic!("function '{}' has no expression statement {}", func, n))
}

/// The derived type of an analyzed expression, rendered
pub fn rendered_type(expr: &Expr, analysis: &Analysis) -> String {
    expr.ty
        .as_ref()
        .expect("expression was not typed by analysis")
        .render(&analysis.table)
}
