//! Expression typing and value categories

use crate::common::*;

// ============================================================================
// Arithmetic and derivation
// ============================================================================

#[test]
fn addition_derives_left_type() {
    let (module, analysis) = assert_analyzes("void f(void) { int x; x + 3; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
}

#[test]
fn pointer_arithmetic_keeps_pointer() {
    let (module, analysis) = assert_analyzes("void f(void) { int *p; p + 1; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int *");
}

#[test]
fn comparison_yields_bool() {
    let (module, analysis) = assert_analyzes("void f(void) { int x; x < 3; x == 4; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "bool");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "bool");
}

#[test]
fn logical_yields_bool() {
    let (module, analysis) = assert_analyzes("void f(void) { true && false; !true; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "bool");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "bool");
}

#[test]
fn comma_takes_right_type() {
    let (module, analysis) = assert_analyzes(r#"void f(void) { (1, "x"); }"#);
    assert_eq!(
        rendered_type(nth_expr(&module, "f", 0), &analysis),
        "char *"
    );
}

// ============================================================================
// Address-of, dereference, and value categories
// ============================================================================

#[test]
fn address_of_variable() {
    let (module, analysis) = assert_analyzes("void f(void) { int x; &x; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int *");
}

#[test]
fn address_of_literal_still_derives_pointer() {
    // The diagnostic fires but the derived type is still pointer-to-int
    let (module, analysis) = assert_error_count("void f(void) { &3; }", 1);
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int *");
}

#[test]
fn deref_assignment_is_allowed() {
    // *p is an lvalue of the pointee type
    let (module, analysis) = assert_analyzes("void f(void) { int *p; *p = 5; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
}

#[test]
fn assignment_result_is_not_an_lvalue() {
    assert_error_contains("void f(void) { int x; (x = 1) = 2; }", "= requires lvalue");
}

#[test]
fn increment_requires_lvalue() {
    assert_analyzes("void f(void) { int x; x++; ++x; }");
    assert_error_contains("void f(void) { ++3; }", "++ requires lvalue");
}

#[test]
fn address_of_function_designator() {
    // Function names are addressable; the pointer is callable through
    let (module, analysis) = assert_analyzes("int f(int x); void g(void) { (&f)(3); }");
    assert_eq!(rendered_type(nth_expr(&module, "g", 0), &analysis), "int");
}

// ============================================================================
// Member access
// ============================================================================

#[test]
fn member_access_direct_and_through_pointer() {
    let source = r#"
        struct S { int a; };
        void f(void) {
            S s;
            s.a;
            (&s)->a;
        }
    "#;
    let (module, analysis) = assert_analyzes(source);
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "int");
}

#[test]
fn member_field_is_assignable() {
    assert_analyzes(
        r#"
        struct S { int a; };
        void f(void) {
            S s;
            s.a = 3;
            (&s)->a = 4;
        }
    "#,
    );
}

#[test]
fn member_access_chains() {
    let source = r#"
        struct P { int x; };
        struct Q { P p; };
        void f(void) {
            Q q;
            q.p.x = 1;
        }
    "#;
    assert_analyzes(source);
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn call_result_type_survives_arity_error() {
    let source = "int f(int a, int b); void g(void) { f(1); }";
    let (module, analysis) = assert_error_count(source, 1);
    assert_eq!(rendered_type(nth_expr(&module, "g", 0), &analysis), "int");
}

#[test]
fn variadic_accepts_exact_and_extra_arguments() {
    let source = r#"
        int printf(char *fmt, ...);
        void g(void) {
            printf("plain");
            printf("more", 1, 2, 3);
        }
    "#;
    assert_analyzes(source);
}

#[test]
fn variadic_still_requires_fixed_arguments() {
    assert_error_contains(
        "int printf(char *fmt, ...); void g(void) { printf(); }",
        "printf expected 1 parameter(s), 0 given",
    );
}

#[test]
fn pointer_integer_interconversion_at_arguments() {
    // A numeric parameter admits a pointer argument and vice versa
    assert_analyzes(r#"int f(int x); int g(char *p); void h(void) { f("x"); g(3); }"#);
}

// ============================================================================
// Ternary
// ============================================================================

#[test]
fn ternary_unifies_equal_arms() {
    let (module, analysis) = assert_analyzes("void f(bool c) { c ? 1 : 2; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
}

#[test]
fn ternary_mismatched_arms_absorb() {
    let source = r#"
        struct S { int a; };
        void f(bool c) {
            S s;
            c ? s : 1;
        }
    "#;
    let (module, analysis) = assert_error_count(source, 1);
    assert_eq!(
        rendered_type(nth_expr(&module, "f", 0), &analysis),
        "<invalid>"
    );
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn indexing_array_and_pointer() {
    let source = "void f(void) { int a[4]; int *p; a[0]; p[1]; }";
    let (module, analysis) = assert_analyzes(source);
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "int");
}

#[test]
fn indexed_element_is_assignable() {
    assert_analyzes("void f(void) { int a[4]; a[2] = 9; }");
}

// ============================================================================
// Casts, sizeof, literals
// ============================================================================

#[test]
fn cast_takes_target_type() {
    let (module, analysis) = assert_analyzes("void f(void) { (char)65; (int)'c'; (bool)1; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "char");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 2), &analysis), "bool");
}

#[test]
fn cast_to_derived_types() {
    // Pointer syntax round-trips through the renderer
    let (module, analysis) = assert_analyzes("void f(void) { (int*)0; (char**)0; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int *");
    assert_eq!(
        rendered_type(nth_expr(&module, "f", 1), &analysis),
        "char **"
    );
}

#[test]
fn cast_to_void_discards() {
    assert_analyzes("int f(int x); void g(void) { (void)f(1); }");
}

#[test]
fn sizeof_types_and_values() {
    let source = "void f(void) { int x; sizeof(int); sizeof x; sizeof(int*); }";
    let (module, analysis) = assert_analyzes(source);
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 2), &analysis), "int");
}

#[test]
fn literal_types() {
    let source = r#"void f(void) { 1; 'c'; true; "s"; }"#;
    let (module, analysis) = assert_analyzes(source);
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int");
    assert_eq!(rendered_type(nth_expr(&module, "f", 1), &analysis), "char");
    assert_eq!(rendered_type(nth_expr(&module, "f", 2), &analysis), "bool");
    assert_eq!(
        rendered_type(nth_expr(&module, "f", 3), &analysis),
        "char *"
    );
}

#[test]
fn string_literal_is_not_an_lvalue() {
    assert_error_contains(r#"void f(void) { &"abc"; }"#, "& requires lvalue");
}

// ============================================================================
// Compound literals
// ============================================================================

#[test]
fn compound_literal_initializes_scalar() {
    assert_analyzes("void f(void) { int x = (int){5}; }");
}

#[test]
fn compound_literal_is_addressable() {
    let (module, analysis) = assert_analyzes("void f(void) { &(int){5}; }");
    assert_eq!(rendered_type(nth_expr(&module, "f", 0), &analysis), "int *");
}

#[test]
fn compound_literal_struct() {
    assert_analyzes(
        r#"
        struct S { int a; int b; };
        void f(void) {
            (S){1, 2}.a;
        }
    "#,
    );
}

// ============================================================================
// Enum constants
// ============================================================================

#[test]
fn enum_constants_flow_through_numeric_contexts() {
    let source = r#"
        enum Color { RED, GREEN, BLUE };
        void f(void) {
            Color c;
            c = RED;
            RED < GREEN;
        }
    "#;
    assert_analyzes(source);
}

// ============================================================================
// Error absorption
// ============================================================================

#[test]
fn one_diagnostic_per_root_cause() {
    // The undefined name poisons the whole expression; no cascade follows
    assert_error_count("void f(void) { missing + 1 + 2 * 3; }", 1);
}

#[test]
fn poisoned_call_still_types_arguments() {
    // The callee is broken, the bad argument inside still gets its own report
    let source = "void f(void) { missing(1, &3); }";
    assert_error_count(source, 2);
}

#[test]
fn typed_even_when_invalid() {
    let (module, analysis) = assert_error_count("void f(void) { missing + 1; }", 1);
    assert_eq!(
        rendered_type(nth_expr(&module, "f", 0), &analysis),
        "<invalid>"
    );
}

#[test]
fn diagnostics_in_source_order() {
    let source = "void f(void) { &3; &4; }";
    let (_, analysis) = assert_error_count(source, 2);
    let spans: Vec<_> = analysis.diagnostics.iter().map(|d| d.span().start).collect();
    assert!(spans[0] < spans[1]);
}

#[test]
fn diagnostics_emitted_equals_errors_counted() {
    let source = "void f(void) { &3; missing; true + 1; }";
    let (_, analysis) = analyze_source(source);
    assert_eq!(
        analysis.diagnostics.iter().count(),
        analysis.diagnostics.error_count()
    );
    assert!(analysis.diagnostics.error_count() >= 3);
}
