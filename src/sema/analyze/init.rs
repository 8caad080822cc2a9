//! Initializer analysis
//!
//! A recursive descent over brace-enclosed initializers, matching the
//! element shape against the expected type. Scalar leaves go through normal
//! value analysis. The node's type is set to the expected type up front,
//! even on error, so downstream consumers always see a type.

use crate::ast::{Expr, ExprKind};
use crate::sema::table::SymbolKind;
use crate::sema::types::Type;

use super::{Analyzer, ValueResult};

impl Analyzer {
    /// Analyze a brace initializer (or compound literal body) against the
    /// type it must produce
    pub(super) fn analyze_initializer(&mut self, node: &mut Expr, expected: &Type) -> ValueResult {
        node.ty = Some(expected.clone());
        let span = node.span;

        if expected.is_invalid() {
            // Nothing to check against; stay silent
            return ValueResult {
                ty: expected.clone(),
                lvalue: false,
            };
        }

        let record = match expected {
            Type::Basic(sym) if self.table.get(*sym).kind == SymbolKind::Struct => Some(*sym),
            _ => None,
        };

        if let ExprKind::Init(elems) = &mut node.kind {
            if let Some(record) = record {
                // Struct: pair elements with fields in declaration order
                let record_ident = self.table.get(record).ident.clone();
                let fields = self.table.get(record).children.clone();

                if fields.len() != elems.len() {
                    self.diagnostics.degree(
                        span,
                        record_ident.as_str(),
                        "fields",
                        fields.len(),
                        elems.len(),
                    );
                }

                for (elem, field_id) in elems.iter_mut().zip(fields.iter().copied()) {
                    let field_ty = self
                        .table
                        .get(field_id)
                        .ty
                        .clone()
                        .unwrap_or(Type::Invalid);
                    let value = self.analyze_element(elem, &field_ty);

                    if !value.ty.is_compatible(&field_ty, &self.table) {
                        let field_ident = self.table.get(field_id).ident.clone();
                        let expected_str = field_ty.render(&self.table);
                        let found = value.ty.render(&self.table);
                        self.diagnostics.init_field_mismatch(
                            elem.span,
                            record_ident.clone(),
                            field_ident,
                            expected_str,
                            found,
                        );
                    }
                }

                // Surplus elements still get typed, against nothing
                for elem in elems.iter_mut().skip(fields.len()) {
                    self.analyze_element(elem, &Type::Invalid);
                }
            } else if let Type::Array(element_ty, size) = expected {
                // Array: every element checks against the element type, one
                // diagnostic per bad element
                if *size != -1 && (*size as usize) < elems.len() {
                    self.diagnostics
                        .degree(span, "array", "elements", (*size).max(0) as usize, elems.len());
                }

                for elem in elems.iter_mut() {
                    let value = self.analyze_element(elem, element_ty);

                    if !value.ty.is_compatible(element_ty, &self.table) {
                        let expected_str = element_ty.render(&self.table);
                        let found = value.ty.render(&self.table);
                        self.diagnostics.type_expected(
                            elem.span,
                            "array initialization",
                            expected_str,
                            found,
                        );
                    }
                }
            } else {
                // Scalar: exactly one element
                if elems.len() != 1 {
                    self.diagnostics
                        .degree(span, "scalar", "element", 1, elems.len());
                }

                for (n, elem) in elems.iter_mut().enumerate() {
                    let value = self.analyze_element(elem, expected);

                    if n == 0 && !value.ty.is_compatible(expected, &self.table) {
                        let expected_str = expected.render(&self.table);
                        let found = value.ty.render(&self.table);
                        self.diagnostics.type_expected(
                            elem.span,
                            "variable initialization",
                            expected_str,
                            found,
                        );
                    }
                }
            }
        }

        // The initializer itself is not addressable; a compound literal
        // wrapper is what makes it so
        ValueResult {
            ty: expected.clone(),
            lvalue: false,
        }
    }

    /// One initializer element: nested braces recurse with the element's
    /// expected type, anything else is an ordinary value
    fn analyze_element(&mut self, elem: &mut Expr, expected: &Type) -> ValueResult {
        if matches!(elem.kind, ExprKind::Init(_)) {
            self.analyze_initializer(elem, expected)
        } else {
            self.analyze_value(elem)
        }
    }
}
