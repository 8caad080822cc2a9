//! Aggregate and scalar initializer analysis

use crate::common::*;

// ============================================================================
// Struct initializers
// ============================================================================

#[test]
fn struct_initializer_matches_fields() {
    assert_analyzes("struct S { int a; int b; } s = { 1, 2 };");
}

#[test]
fn struct_initializer_field_count_must_match() {
    assert_error_contains(
        "struct S { int a; int b; } s = { 1 };",
        "S expected 2 fields, 1 given",
    );
}

#[test]
fn struct_initializer_too_many_fields() {
    assert_error_contains(
        "struct S { int a; } s = { 1, 2, 3 };",
        "S expected 1 fields, 3 given",
    );
}

#[test]
fn struct_initializer_field_type_mismatch() {
    let source = "struct S { int a; bool b; } s = { true, 1 };";
    let (_, analysis) = assert_error_count(source, 2);
    let rendered = analysis.diagnostics.render(source);
    assert!(rendered.contains("field a of S expected int, found bool"));
    assert!(rendered.contains("field b of S expected bool, found int"));
}

#[test]
fn nested_struct_initializer() {
    assert_analyzes(
        r#"
        struct P { int x; int y; };
        struct R { P p; int n; } r = { { 1, 2 }, 3 };
    "#,
    );
}

// ============================================================================
// Array initializers
// ============================================================================

#[test]
fn array_initializer_within_size() {
    assert_analyzes("int a[3] = { 1, 2, 3 };");
    assert_analyzes("int b[3] = { 1 };");
}

#[test]
fn array_initializer_overflow_is_one_diagnostic() {
    // The arity complaint fires once; the elements still analyze
    assert_error_count("int a[3] = { 1, 2, 3, 4 };", 1);
    assert_error_contains(
        "int a[3] = { 1, 2, 3, 4 };",
        "array expected 3 elements, 4 given",
    );
}

#[test]
fn unsized_array_accepts_any_count() {
    assert_analyzes("int a[] = { 1, 2, 3 };");
    assert_analyzes("int b[] = { 1, 2, 3, 4, 5, 6, 7 };");
}

#[test]
fn array_initializer_reports_each_bad_element() {
    // One diagnostic per mismatched element, not just the first
    let source = "int a[4] = { 1, true, false, 'c' };";
    let (_, analysis) = assert_error_count(source, 3);
    let rendered = analysis.diagnostics.render(source);
    assert!(rendered.contains("array initialization expected int, found bool"));
    assert!(rendered.contains("array initialization expected int, found char"));
}

#[test]
fn array_of_structs_initializer() {
    assert_analyzes(
        r#"
        struct P { int x; int y; };
        P ps[2] = { { 1, 2 }, { 3, 4 } };
    "#,
    );
}

// ============================================================================
// Scalar initializers
// ============================================================================

#[test]
fn scalar_brace_initializer() {
    assert_analyzes("int x = { 5 };");
}

#[test]
fn scalar_initializer_wants_one_element() {
    assert_error_contains("int x = { 1, 2 };", "scalar expected 1 element, 2 given");
}

#[test]
fn scalar_initializer_type_mismatch() {
    assert_error_contains(
        "int x = { true };",
        "variable initialization expected int, found bool",
    );
}

#[test]
fn plain_initializer_type_mismatch() {
    assert_error_contains(
        "int x = true;",
        "variable initialization expected int, found bool",
    );
}

#[test]
fn string_initializes_char_pointer() {
    assert_analyzes(r#"char *s = "hello";"#);
}

// ============================================================================
// Local declarations
// ============================================================================

#[test]
fn local_initializers_analyze() {
    assert_analyzes(
        r#"
        struct S { int a; int b; };
        void f(void) {
            int x = 1;
            int a[2] = { 1, 2 };
            S s = { 3, 4 };
        }
    "#,
    );
}

#[test]
fn local_initializer_mismatch_is_absorbed() {
    // The bad declaration reports once; the uses after it stay quiet
    let source = r#"
        void f(void) {
            int x = true;
            x + 1;
            x < 2;
        }
    "#;
    assert_error_count(source, 1);
}
