//! Semantic diagnostic tests
//!
//! One section per diagnostic family: operand classes, value categories,
//! mismatches, arity, members, and symbol misuse.

use crate::common::*;

// ============================================================================
// Operand class requirements
// ============================================================================

#[test]
fn arithmetic_wants_numeric_operands() {
    assert_error_contains("void f(void) { true + 1; }", "+ requires numeric type, found bool");
}

#[test]
fn arithmetic_rejects_arrays() {
    assert_error_contains(
        "void f(void) { int a[3]; a * 2; }",
        "* requires numeric type, found int [3]",
    );
}

#[test]
fn compound_assignment_wants_numeric_operands() {
    assert_error_contains(
        "void f(void) { bool b; b += true; }",
        "+= requires numeric type, found bool",
    );
}

#[test]
fn ordering_wants_ordinal_operands() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; s < s; }",
        "< requires comparable type, found S",
    );
}

#[test]
fn equality_on_bools_is_fine() {
    assert_analyzes("void f(void) { true == false; }");
}

#[test]
fn logical_wants_conditions() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; s && true; }",
        "&& requires condition, found S",
    );
}

#[test]
fn not_wants_condition() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; !s; }",
        "! requires condition, found S",
    );
}

#[test]
fn deref_wants_pointer() {
    assert_error_contains("void f(void) { int x; *x; }", "* requires pointer, found int");
}

#[test]
fn index_wants_numeric_index() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { int a[3]; S s; a[s]; }",
        "[] requires numeric index, found S",
    );
}

#[test]
fn index_wants_array_or_pointer() {
    assert_error_contains(
        "void f(void) { int x; x[0]; }",
        "[] requires array or pointer, found int",
    );
}

#[test]
fn call_wants_function() {
    assert_error_contains("void f(void) { int x; x(); }", "() requires function, found int");
}

#[test]
fn ternary_wants_condition() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; s ? 1 : 2; }",
        "ternary ?: requires condition value, found S",
    );
}

#[test]
fn cast_wants_scalar() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; (int)s; }",
        "cast requires scalar type, found S",
    );
    assert_error_contains(
        "struct S { int a; }; void f(void) { (S)1; }",
        "cast requires scalar type, found S",
    );
}

// ============================================================================
// Value categories
// ============================================================================

#[test]
fn assignment_wants_lvalue_target() {
    assert_error_contains("void f(void) { 3 = 4; }", "= requires lvalue");
}

#[test]
fn compound_assignment_wants_lvalue_target() {
    assert_error_contains("void f(void) { 3 += 4; }", "+= requires lvalue");
}

#[test]
fn address_of_wants_lvalue() {
    assert_error_contains("void f(void) { &3; }", "& requires lvalue");
}

#[test]
fn decrement_wants_lvalue() {
    assert_error_contains("void f(void) { 3--; }", "-- requires lvalue");
}

#[test]
fn call_result_is_not_an_lvalue() {
    assert_error_contains(
        "int f(void); void g(void) { f() = 3; }",
        "= requires lvalue",
    );
}

#[test]
fn cast_preserves_operand_category() {
    // Casting an lvalue keeps it addressable; casting a literal does not
    assert_analyzes("void f(void) { int x; &(int)x; }");
    assert_error_contains("void f(void) { &(int)3; }", "& requires lvalue");
}

// ============================================================================
// Mismatches
// ============================================================================

#[test]
fn assignment_type_mismatch() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { int x; S s; x = s; }",
        "type mismatch between int and S for =",
    );
}

#[test]
fn comparison_type_mismatch() {
    assert_error_contains(
        "void f(void) { 'c' == 1; }",
        "type mismatch between char and int for ==",
    );
}

#[test]
fn ternary_arm_mismatch() {
    assert_error_contains(
        "struct S { int a; }; void f(bool c) { S s; c ? s : 1; }",
        "type mismatch between S and int for ternary ?:",
    );
}

// ============================================================================
// Arity
// ============================================================================

#[test]
fn call_with_too_few_arguments() {
    assert_error_contains(
        "int f(int a, int b); void g(void) { f(1); }",
        "f expected 2 parameter(s), 1 given",
    );
}

#[test]
fn call_with_too_many_arguments() {
    assert_error_contains(
        "int f(int a); void g(void) { f(1, 2); }",
        "f expected 1 parameter(s), 2 given",
    );
}

#[test]
fn arity_error_still_reports_inside_arguments() {
    let source = "int f(int a, int b); void g(void) { f(&3); }";
    let (_, analysis) = assert_error_count(source, 2);
    let rendered = analysis.diagnostics.render(source);
    assert!(rendered.contains("parameter(s)"));
    assert!(rendered.contains("& requires lvalue"));
}

// ============================================================================
// Parameter mismatches
// ============================================================================

#[test]
fn named_parameter_mismatch_is_indexed() {
    assert_error_contains(
        "int f(int a, char b); void g(void) { f(1, 2); }",
        "type mismatch at parameter 2 of f: expected char, found int",
    );
}

#[test]
fn anonymous_callee_parameter_mismatch() {
    assert_error_contains(
        "int f(char c); void g(void) { (&f)(1); }",
        "type mismatch at parameter 1: expected char, found int",
    );
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn member_access_on_non_record() {
    assert_error_contains(
        "void f(void) { int x; x.field; }",
        ". requires structure or union type, found int",
    );
}

#[test]
fn arrow_on_non_pointer() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; s->a; }",
        "-> requires structure or union pointer, found S",
    );
}

#[test]
fn dot_on_pointer() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; (&s).a; }",
        ". requires structure or union type, found S *",
    );
}

#[test]
fn unknown_member() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S s; s.b; }",
        ". expected field of S, found b",
    );
}

// ============================================================================
// Symbols
// ============================================================================

#[test]
fn struct_tag_as_value() {
    assert_error_contains(
        "struct S { int a; }; void f(void) { S + 1; }",
        "cannot use a struct as a value",
    );
}

#[test]
fn type_name_as_value_is_exactly_one_error() {
    assert_error_count("struct S { int a; }; void f(void) { S + 1; }", 1);
}

#[test]
fn variable_as_type() {
    // A local shadowing a struct tag makes the tag unusable as a type name
    assert_error_contains(
        "struct S { int a; }; void f(void) { int S; S x; }",
        "cannot use a variable as a type",
    );
}

#[test]
fn undefined_symbol_in_value_position() {
    assert_error_contains("void f(void) { nope; }", "undefined symbol 'nope'");
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn diagnostics_render_with_line_and_column() {
    let source = "void f(void) {\n    &3;\n}\n";
    let (_, analysis) = analyze_source(source);
    let rendered = analysis.diagnostics.render(source);
    assert_eq!(rendered, "error(2:6): & requires lvalue");
}

#[test]
fn diagnostics_carry_rendered_types() {
    assert_error_contains(
        "void f(void) { int *p; bool b; p = p && b; }",
        "type mismatch between int * and bool for =",
    );
}
