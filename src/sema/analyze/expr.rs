//! Expression analysis
//!
//! One post-order pass per expression: children first, then the node's own
//! type and value category. Each visit writes the node's derived type and
//! returns a `ValueResult` for the parent. Diagnosed subexpressions become
//! `Invalid`, which every classifier accepts, so analysis always proceeds.

use crate::ast::{BinOp, Expr, ExprKind, Literal, Span, Spanned, UnOp};
use crate::sema::table::{Builtin, SymbolId, SymbolKind};
use crate::sema::types::Type;

use super::{Analyzer, ValueResult};

impl Analyzer {
    /// Analyze an expression in value position
    pub(super) fn analyze_value(&mut self, node: &mut Expr) -> ValueResult {
        let span = node.span;
        let mut symbol = None;

        let result = match &mut node.kind {
            ExprKind::Binary { op, l, r } => {
                let op = *op;
                if op.is_numeric() || op.is_assignment() {
                    self.analyze_binary(span, op, l, r)
                } else if op.is_ordinal() || op.is_equality() {
                    self.analyze_comparison(span, op, l, r)
                } else if op.is_logical() {
                    self.analyze_logical(op, l, r)
                } else if op.is_comma() {
                    self.analyze_comma(l, r)
                } else {
                    self.diagnostics
                        .unhandled(span, format!("operator {}", op.symbol()));
                    ValueResult {
                        ty: Type::Invalid,
                        lvalue: true,
                    }
                }
            }

            ExprKind::Unary { op, operand } => self.analyze_unary(*op, operand),

            ExprKind::Ternary {
                cond,
                then_val,
                else_val,
            } => self.analyze_ternary(span, cond, then_val, else_val),

            ExprKind::Index { object, index } => self.analyze_index(object, index),

            ExprKind::Call { callee, args } => self.analyze_call(span, callee, args),

            ExprKind::Member {
                through,
                object,
                field,
            } => {
                let through = *through;
                let (result, field_symbol) = self.analyze_member(through, object, field);
                symbol = field_symbol;
                result
            }

            ExprKind::Cast { target, operand } => self.analyze_cast(target, operand),

            ExprKind::SizeofType(target) => {
                self.resolve_type(target);
                ValueResult {
                    ty: Type::Basic(self.table.builtin(Builtin::Int)),
                    lvalue: false,
                }
            }
            ExprKind::SizeofValue(operand) => {
                self.analyze_value(operand);
                ValueResult {
                    ty: Type::Basic(self.table.builtin(Builtin::Int)),
                    lvalue: false,
                }
            }

            ExprKind::Literal(lit) => self.analyze_literal(lit),

            ExprKind::Ident(name) => {
                let (result, id) = self.analyze_ident(span, name);
                symbol = id;
                result
            }

            ExprKind::CompoundLiteral { target, init } => {
                let ty = self.resolve_type(target);
                self.analyze_initializer(init, &ty);
                // Compound literals denote storage
                ValueResult { ty, lvalue: true }
            }

            ExprKind::Init(_) => {
                // Brace initializers are only meaningful against an expected
                // shape; the parser should not let one reach value position
                self.diagnostics.unhandled(span, "initializer in value position");
                ValueResult {
                    ty: Type::Invalid,
                    lvalue: true,
                }
            }
        };

        node.ty = Some(result.ty.clone());
        node.symbol = symbol;
        result
    }

    /// Numeric and assignment binary operators
    fn analyze_binary(&mut self, span: Span, op: BinOp, l: &mut Expr, r: &mut Expr) -> ValueResult {
        let lv = self.analyze_value(l);
        let rv = self.analyze_value(r);

        // Are the operands allowed for this operator?

        if op.is_numeric() && (!lv.ty.is_numeric(&self.table) || !rv.ty.is_numeric(&self.table)) {
            let (operand, ty) = if !lv.ty.is_numeric(&self.table) {
                (l.span, &lv.ty)
            } else {
                (r.span, &rv.ty)
            };
            let found = ty.render(&self.table);
            self.diagnostics
                .operator_type(operand, op.symbol(), "numeric type", found);
        }

        if op.is_assignment() {
            if !lv.ty.is_assignment(&self.table) || !rv.ty.is_assignment(&self.table) {
                let (operand, ty) = if !lv.ty.is_assignment(&self.table) {
                    (l.span, &lv.ty)
                } else {
                    (r.span, &rv.ty)
                };
                let found = ty.render(&self.table);
                self.diagnostics
                    .operator_type(operand, op.symbol(), "assignable type", found);
            }

            if !lv.lvalue {
                self.diagnostics.lvalue_required(l.span, op.symbol());
            }
        }

        // Work out the type of the result

        let ty = if lv.ty.is_compatible(&rv.ty, &self.table) {
            lv.ty.derive_from_two(&rv.ty, &self.table)
        } else {
            let left = lv.ty.render(&self.table);
            let right = rv.ty.render(&self.table);
            self.diagnostics.mismatch(span, op.symbol(), left, right);
            Type::Invalid
        };

        // Assignment expressions do not themselves yield lvalues
        ValueResult { ty, lvalue: false }
    }

    /// Ordering and equality operators
    fn analyze_comparison(
        &mut self,
        span: Span,
        op: BinOp,
        l: &mut Expr,
        r: &mut Expr,
    ) -> ValueResult {
        let lv = self.analyze_value(l);
        let rv = self.analyze_value(r);

        if op.is_ordinal() {
            if !lv.ty.is_ordinal(&self.table) || !rv.ty.is_ordinal(&self.table) {
                let (operand, ty) = if !lv.ty.is_ordinal(&self.table) {
                    (l.span, &lv.ty)
                } else {
                    (r.span, &rv.ty)
                };
                let found = ty.render(&self.table);
                self.diagnostics
                    .operator_type(operand, op.symbol(), "comparable type", found);
            }
        } else if !lv.ty.is_equality(&self.table) || !rv.ty.is_equality(&self.table) {
            let (operand, ty) = if !lv.ty.is_equality(&self.table) {
                (l.span, &lv.ty)
            } else {
                (r.span, &rv.ty)
            };
            let found = ty.render(&self.table);
            self.diagnostics
                .operator_type(operand, op.symbol(), "comparable type", found);
        }

        if !lv.ty.is_compatible(&rv.ty, &self.table) {
            let left = lv.ty.render(&self.table);
            let right = rv.ty.render(&self.table);
            self.diagnostics.mismatch(span, op.symbol(), left, right);
        }

        ValueResult {
            ty: Type::Basic(self.table.builtin(Builtin::Bool)),
            lvalue: false,
        }
    }

    /// Logical && and ||
    fn analyze_logical(&mut self, op: BinOp, l: &mut Expr, r: &mut Expr) -> ValueResult {
        let lv = self.analyze_value(l);
        let rv = self.analyze_value(r);

        if !lv.ty.is_condition(&self.table) || !rv.ty.is_condition(&self.table) {
            let (operand, ty) = if !lv.ty.is_condition(&self.table) {
                (l.span, &lv.ty)
            } else {
                (r.span, &rv.ty)
            };
            let found = ty.render(&self.table);
            self.diagnostics
                .operator_type(operand, op.symbol(), "condition", found);
        }

        ValueResult {
            ty: Type::Basic(self.table.builtin(Builtin::Bool)),
            lvalue: false,
        }
    }

    /// The comma operator: the left value is discarded, the right carries
    fn analyze_comma(&mut self, l: &mut Expr, r: &mut Expr) -> ValueResult {
        self.analyze_value(l);
        let rv = self.analyze_value(r);

        ValueResult {
            ty: rv.ty.derive_from(),
            lvalue: rv.lvalue,
        }
    }

    /// Member access. The field child is a bare name and is never analyzed
    /// as a value.
    fn analyze_member(
        &mut self,
        through: bool,
        object: &mut Expr,
        field: &Spanned<String>,
    ) -> (ValueResult, Option<SymbolId>) {
        let value = self.analyze_value(object);
        let op = if through { "->" } else { "." };

        // `->` wants a pointer to a record, `.` wants a record directly
        let shaped = if through {
            value.ty.is_invalid()
                || matches!(&value.ty, Type::Pointer(base) if base.is_record(&self.table))
        } else {
            value.ty.is_record(&self.table)
        };

        // `->` dereferences, so its result is addressable; `.` keeps the
        // category of the record it came from
        let lvalue = if through { true } else { value.lvalue };

        if !shaped {
            let expected = if through {
                "structure or union pointer"
            } else {
                "structure or union type"
            };
            let found = value.ty.render(&self.table);
            self.diagnostics
                .operator_type(object.span, op, expected, found);
            return (
                ValueResult {
                    ty: Type::Invalid,
                    lvalue,
                },
                None,
            );
        }

        let Some(record) = value.ty.record_symbol(&self.table) else {
            // Invalid object type: absorb without a second diagnostic
            return (
                ValueResult {
                    ty: Type::Invalid,
                    lvalue,
                },
                None,
            );
        };

        match self.table.child(record, &field.node) {
            Some(field_id) => {
                let ty = self
                    .table
                    .get(field_id)
                    .ty
                    .clone()
                    .unwrap_or(Type::Invalid);
                (ValueResult { ty, lvalue }, Some(field_id))
            }
            None => {
                let record_str = value.ty.render(&self.table);
                self.diagnostics
                    .unknown_member(field.span, op, record_str, field.node.clone());
                (
                    ValueResult {
                        ty: Type::Invalid,
                        lvalue,
                    },
                    None,
                )
            }
        }
    }

    /// Unary operators
    fn analyze_unary(&mut self, op: UnOp, operand: &mut Expr) -> ValueResult {
        let value = self.analyze_value(operand);

        let ty = if op.is_numeric() {
            if !value.ty.is_numeric(&self.table) {
                let found = value.ty.render(&self.table);
                self.diagnostics
                    .operator_type(operand.span, op.symbol(), "numeric type", found);
                Type::Invalid
            } else {
                if op.is_assignment() && !value.lvalue {
                    self.diagnostics.lvalue_required(operand.span, op.symbol());
                }
                value.ty.derive_from()
            }
        } else {
            match op {
                UnOp::Not => {
                    if !value.ty.is_condition(&self.table) {
                        let found = value.ty.render(&self.table);
                        self.diagnostics
                            .operator_type(operand.span, op.symbol(), "condition", found);
                    }
                    Type::Basic(self.table.builtin(Builtin::Bool))
                }

                UnOp::Deref => {
                    if value.ty.is_pointer() {
                        value.ty.derive_base()
                    } else {
                        let found = value.ty.render(&self.table);
                        self.diagnostics
                            .operator_type(operand.span, op.symbol(), "pointer", found);
                        Type::Invalid
                    }
                }

                UnOp::AddrOf => {
                    if !value.lvalue {
                        self.diagnostics.lvalue_required(operand.span, op.symbol());
                    }
                    value.ty.derive_pointer()
                }

                _ => {
                    self.diagnostics
                        .unhandled(operand.span, format!("unary operator {}", op.symbol()));
                    Type::Invalid
                }
            }
        };

        // Only a dereference produces an lvalue
        ValueResult {
            ty,
            lvalue: op == UnOp::Deref,
        }
    }

    /// The ternary conditional
    fn analyze_ternary(
        &mut self,
        span: Span,
        cond: &mut Expr,
        then_val: &mut Expr,
        else_val: &mut Expr,
    ) -> ValueResult {
        let cond_value = self.analyze_value(cond);
        let lv = self.analyze_value(then_val);
        let rv = self.analyze_value(else_val);

        if !cond_value.ty.is_condition(&self.table) {
            let found = cond_value.ty.render(&self.table);
            self.diagnostics
                .operator_type(cond.span, "ternary ?:", "condition value", found);
        }

        let ty = if lv.ty.is_compatible(&rv.ty, &self.table) {
            lv.ty.derive_unified(&rv.ty, &self.table)
        } else {
            let left = lv.ty.render(&self.table);
            let right = rv.ty.render(&self.table);
            self.diagnostics.mismatch(span, "ternary ?:", left, right);
            Type::Invalid
        };

        // An lvalue only if both arms are
        ValueResult {
            ty,
            lvalue: lv.lvalue && rv.lvalue,
        }
    }

    /// Array or pointer indexing
    fn analyze_index(&mut self, object: &mut Expr, index: &mut Expr) -> ValueResult {
        let obj_value = self.analyze_value(object);
        let idx_value = self.analyze_value(index);

        if !idx_value.ty.is_numeric(&self.table) {
            let found = idx_value.ty.render(&self.table);
            self.diagnostics
                .operator_type(index.span, "[]", "numeric index", found);
        }

        let ty = if obj_value.ty.is_array() || obj_value.ty.is_pointer() {
            obj_value.ty.derive_base()
        } else {
            let found = obj_value.ty.render(&self.table);
            self.diagnostics
                .operator_type(object.span, "[]", "array or pointer", found);
            Type::Invalid
        };

        // Addressability carries over from the indexed object
        ValueResult {
            ty,
            lvalue: obj_value.lvalue,
        }
    }

    /// A call expression
    fn analyze_call(&mut self, span: Span, callee: &mut Expr, args: &mut [Expr]) -> ValueResult {
        let callee_value = self.analyze_value(callee);

        let ty;
        if !callee_value.ty.is_callable() {
            let found = callee_value.ty.render(&self.table);
            self.diagnostics
                .operator_type(callee.span, "()", "function", found);
            ty = Type::Invalid;

            for arg in args.iter_mut() {
                self.analyze_value(arg);
            }
        } else if callee_value.ty.is_invalid() {
            ty = Type::Invalid;

            for arg in args.iter_mut() {
                self.analyze_value(arg);
            }
        } else {
            // Callable, so a result type exists regardless of how the
            // arguments turn out
            ty = callee_value.ty.derive_return();

            // Function pointers are called through transparently
            let fn_ty = match &callee_value.ty {
                Type::Pointer(base) => base.as_ref(),
                other => other,
            };
            let (param_tys, variadic) = match fn_ty {
                Type::Function {
                    params, variadic, ..
                } => (params.clone(), *variadic),
                // Pointer to Invalid: nothing to compare against
                _ => (Vec::new(), true),
            };

            let callee_name = callee.symbol.map(|id| self.table.get(id).ident.clone());

            let arity_bad = if variadic {
                param_tys.len() > args.len()
            } else {
                param_tys.len() != args.len()
            };

            if arity_bad {
                let context = callee_name.unwrap_or_else(|| "function".to_string());
                self.diagnostics
                    .degree(span, context, "parameter(s)", param_tys.len(), args.len());

                // The arguments still get typed so nested diagnostics surface
                for arg in args.iter_mut() {
                    self.analyze_value(arg);
                }
            } else {
                for (n, arg) in args.iter_mut().enumerate() {
                    let arg_value = self.analyze_value(arg);

                    // Arguments beyond the declared parameters belong to the
                    // variadic tail and are typed without comparison
                    if let Some(param_ty) = param_tys.get(n) {
                        if !arg_value.ty.is_compatible(param_ty, &self.table) {
                            let expected = param_ty.render(&self.table);
                            let found = arg_value.ty.render(&self.table);
                            self.diagnostics.parameter_mismatch(
                                arg.span,
                                callee_name.clone(),
                                n + 1,
                                expected,
                                found,
                            );
                        }
                    }
                }
            }
        }

        ValueResult { ty, lvalue: false }
    }

    /// An explicit cast. Only scalars convert (arithmetic types, bool, and
    /// pointers); casting to void discards the value.
    fn analyze_cast(
        &mut self,
        target: &Spanned<crate::ast::TypeExpr>,
        operand: &mut Expr,
    ) -> ValueResult {
        let ty = self.resolve_type(target);
        let value = self.analyze_value(operand);

        let scalar =
            |t: &Type, table: &_| t.is_numeric(table) || t.is_condition(table);

        if ty.is_void(&self.table) {
            // Discarding cast, any operand goes
        } else if !scalar(&ty, &self.table) {
            let found = ty.render(&self.table);
            self.diagnostics
                .operator_type(target.span, "cast", "scalar type", found);
        } else if !scalar(&value.ty, &self.table) {
            let found = value.ty.render(&self.table);
            self.diagnostics
                .operator_type(operand.span, "cast", "scalar type", found);
        }

        // The target's type, the operand's value category
        ValueResult {
            ty,
            lvalue: value.lvalue,
        }
    }

    /// Non-identifier literals
    fn analyze_literal(&mut self, lit: &Literal) -> ValueResult {
        let ty = match lit {
            Literal::Int(_) => Type::Basic(self.table.builtin(Builtin::Int)),
            Literal::Char(_) => Type::Basic(self.table.builtin(Builtin::Char)),
            Literal::Bool(_) => Type::Basic(self.table.builtin(Builtin::Bool)),
            // String literals are pointer-valued temporaries
            Literal::Str(_) => Type::pointer(Type::Basic(self.table.builtin(Builtin::Char))),
        };
        ValueResult { ty, lvalue: false }
    }

    /// An identifier in value position
    fn analyze_ident(&mut self, span: Span, name: &str) -> (ValueResult, Option<SymbolId>) {
        let Some(id) = self.table.lookup(name) else {
            self.diagnostics.undefined_symbol(span, name);
            return (
                ValueResult {
                    ty: Type::Invalid,
                    lvalue: true,
                },
                None,
            );
        };

        let sym = self.table.get(id);
        match sym.kind {
            SymbolKind::EnumConstant | SymbolKind::Id | SymbolKind::Param => {
                let ty = match &sym.ty {
                    Some(t) => t.clone(),
                    None => {
                        self.diagnostics
                            .unhandled(span, format!("symbol '{}' referenced without type", name));
                        Type::Invalid
                    }
                };
                (ValueResult { ty, lvalue: true }, Some(id))
            }
            kind => {
                self.diagnostics
                    .illegal_symbol_as_value(span, kind.describe());
                (
                    ValueResult {
                        ty: Type::Invalid,
                        lvalue: true,
                    },
                    Some(id),
                )
            }
        }
    }
}
