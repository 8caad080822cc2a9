//! Whole-program analysis: statements, declarations, inclusion

use std::fs;
use std::path::PathBuf;

use minic::sema;
use minic::{Parser, lex};

use crate::common::*;

// ============================================================================
// Statements
// ============================================================================

#[test]
fn branches_and_loops() {
    assert_analyzes(
        r#"
        void f(int n) {
            if (n > 0)
                n--;
            else
                n++;

            while (n < 10)
                n++;

            do { n--; } while (n > 0);

            int i;
            for (i = 0; i < n; i++) {
                if (i == 3)
                    break;
            }
        }
    "#,
    );
}

#[test]
fn for_headers_may_be_empty() {
    assert_analyzes("void f(void) { for (;;) break; }");
}

#[test]
fn for_init_may_declare() {
    assert_analyzes("void f(int n) { for (int i = 0; i < n; i++) ; }");
}

#[test]
fn for_loop_variable_is_scoped() {
    // The loop variable does not leak into the enclosing block
    assert_error_contains(
        "void f(void) { for (int i = 0; i < 3; i++) ; i + 1; }",
        "undefined symbol 'i'",
    );
}

#[test]
fn condition_positions_require_conditions() {
    let source = r#"
        struct S { int a; };
        void f(void) {
            S s;
            if (s) ;
        }
    "#;
    assert_error_contains(source, "if expected condition");
}

#[test]
fn loop_conditions_require_conditions() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; while (s) ; }",
        "while loop expected condition",
    );
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; do ; while (s); }",
        "do loop expected condition",
    );
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; for (; s; ) ; }",
        "for loop expected condition",
    );
}

// ============================================================================
// Returns
// ============================================================================

#[test]
fn return_types_check_against_signature() {
    assert_analyzes("int f(void) { return 3; }");
    assert_analyzes("void g(void) { return; }");
    assert_analyzes("char *h(void) { return \"s\"; }");
}

#[test]
fn return_value_mismatch() {
    assert_error_contains(
        "struct S { int a; }; int f(void) { S s; return s; }",
        "return expected int, found S",
    );
}

#[test]
fn missing_return_value() {
    assert_error_contains(
        "int f(void) { return; }",
        "return statement expected int, found void",
    );
}

#[test]
fn return_type_context_is_per_function() {
    assert_analyzes(
        r#"
        int f(void) { return 1; }
        char *g(void) { return "x"; }
        void h(void) { return; }
    "#,
    );
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn struct_with_trailing_declarator() {
    assert_analyzes("struct Pair { int a; int b; } p = { 1, 2 };");
}

#[test]
fn prototypes_may_repeat() {
    assert_analyzes("int f(int x); int f(int x); int f(int x) { return x; }");
}

#[test]
fn variable_redeclaration() {
    assert_error_contains("int x; int x;", "int x redeclared");
}

#[test]
fn conflicting_redeclaration() {
    assert_error_contains("int x; bool x;", "int x redeclared as conflicting type bool");
}

#[test]
fn conflicting_prototype() {
    assert_error_contains(
        "int f(int x); bool f(int x);",
        "redeclared as conflicting type",
    );
}

#[test]
fn function_redefinition() {
    assert_error_contains("int f(void) { return 1; } int f(void) { return 2; }", "redeclared");
}

#[test]
fn shadowing_in_inner_scope_is_allowed() {
    assert_analyzes(
        r#"
        int x;
        void f(void) {
            bool x;
            x && true;
            {
                char x;
                x == 'c';
            }
        }
    "#,
    );
}

#[test]
fn duplicate_struct_field() {
    assert_error_contains("struct S { int a; int a; };", "int a redeclared");
}

#[test]
fn unknown_type_in_declaration() {
    assert_error_contains("void f(void) { Unknown + 1; }", "undefined symbol 'Unknown'");
}

#[test]
fn self_referential_struct_through_pointer() {
    assert_analyzes(
        r#"
        struct Node { int value; Node *next; };
        void f(void) {
            Node n;
            n.next->value = 1;
        }
    "#,
    );
}

// ============================================================================
// Inclusion
// ============================================================================

fn write_tree(files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "minic-test-{}-{}",
        std::process::id(),
        files[0].0
    ));
    fs::create_dir_all(&dir).expect("create test dir");
    for (name, content) in files {
        fs::write(dir.join(name), content).expect("write test file");
    }
    dir
}

fn analyze_file(dir: &std::path::Path, name: &str) -> (minic::Module, sema::Analysis) {
    let path = dir.join(name);
    let source = fs::read_to_string(&path).expect("read test file");
    let tokens = lex(&source).expect("lex error");
    let mut module = Parser::parse(&tokens).expect("parse error");
    let analysis = sema::analyze_with_path(&mut module, path);
    (module, analysis)
}

#[test]
fn using_brings_declarations_into_scope() {
    let dir = write_tree(&[
        ("lib.mc", "int twice(int x) { return x + x; }"),
        ("main.mc", "using \"lib.mc\";\nvoid f(void) { twice(2); }"),
    ]);
    let (_, analysis) = analyze_file(&dir, "main.mc");
    assert!(
        analysis.ok(),
        "expected clean analysis, got {} errors",
        analysis.diagnostics.error_count()
    );
}

#[test]
fn using_missing_file_is_diagnosed() {
    let dir = write_tree(&[("main.mc", "using \"nowhere.mc\";")]);
    let (_, analysis) = analyze_file(&dir, "main.mc");
    assert_eq!(analysis.diagnostics.error_count(), 1);
    let d = analysis.diagnostics.iter().next().expect("one diagnostic");
    assert!(d.message().contains("failed to include 'nowhere.mc'"));
}

#[test]
fn using_cycles_terminate() {
    let dir = write_tree(&[
        ("a.mc", "using \"b.mc\";\nint from_a;"),
        ("b.mc", "using \"a.mc\";\nint from_b;"),
    ]);
    // a includes b, b includes a; the second inclusion of each is skipped.
    // The root file is re-entered once through b, so its declarations repeat.
    let (_, analysis) = analyze_file(&dir, "a.mc");
    assert!(analysis
        .diagnostics
        .iter()
        .all(|d| matches!(d, sema::Diagnostic::Redeclaration { .. })));
}
