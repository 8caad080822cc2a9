//! Statement analysis
//!
//! The traversal glue: walks statements, checks conditions and return
//! values, and submits every value position to the expression analyzer.

use crate::ast::{ForInit, Spanned, Stmt};
use crate::sema::table::Builtin;
use crate::sema::types::Type;

use super::Analyzer;

impl Analyzer {
    pub(super) fn analyze_stmt(&mut self, stmt: &mut Spanned<Stmt>) {
        let span = stmt.span;

        match &mut stmt.node {
            Stmt::Block(stmts) => {
                self.table.enter_scope();
                for s in stmts.iter_mut() {
                    self.analyze_stmt(s);
                }
                self.table.exit_scope();
            }

            Stmt::Decl(decls) => {
                for decl in decls.iter_mut() {
                    self.analyze_var_decl(decl);
                }
            }

            Stmt::Expr(expr) => {
                self.analyze_value(expr);
            }

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_value = self.analyze_value(cond);
                if !cond_value.ty.is_condition(&self.table) {
                    let found = cond_value.ty.render(&self.table);
                    self.diagnostics
                        .type_expected(cond.span, "if", "condition", found);
                }

                self.analyze_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.analyze_stmt(else_branch);
                }
            }

            Stmt::While {
                cond,
                body,
                check_after,
            } => {
                let context = if *check_after { "do loop" } else { "while loop" };
                let cond_value = self.analyze_value(cond);
                if !cond_value.ty.is_condition(&self.table) {
                    let found = cond_value.ty.render(&self.table);
                    self.diagnostics
                        .type_expected(cond.span, context, "condition", found);
                }

                self.analyze_stmt(body);
            }

            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                // The headers may declare into the loop's own scope
                self.table.enter_scope();

                match init {
                    Some(ForInit::Decl(decls)) => {
                        for decl in decls.iter_mut() {
                            self.analyze_var_decl(decl);
                        }
                    }
                    Some(ForInit::Expr(expr)) => {
                        self.analyze_value(expr);
                    }
                    None => {}
                }

                if let Some(cond) = cond {
                    let cond_value = self.analyze_value(cond);
                    if !cond_value.ty.is_condition(&self.table) {
                        let found = cond_value.ty.render(&self.table);
                        self.diagnostics
                            .type_expected(cond.span, "for loop", "condition", found);
                    }
                }

                if let Some(step) = step {
                    self.analyze_value(step);
                }

                self.analyze_stmt(body);
                self.table.exit_scope();
            }

            Stmt::Return(value) => {
                let expected = self.return_type.clone().unwrap_or(Type::Invalid);

                if let Some(value) = value {
                    let result = self.analyze_value(value);
                    if !result.ty.is_compatible(&expected, &self.table) {
                        let expected_str = expected.render(&self.table);
                        let found = result.ty.render(&self.table);
                        self.diagnostics
                            .type_expected(value.span, "return", expected_str, found);
                    }
                } else if !expected.is_void(&self.table) {
                    let expected_str = expected.render(&self.table);
                    let void_str = Type::Basic(self.table.builtin(Builtin::Void)).render(&self.table);
                    self.diagnostics
                        .type_expected(span, "return statement", expected_str, void_str);
                }
            }

            // Being inside a breakable construct is the parser's concern
            Stmt::Break => {}

            Stmt::Empty => {}
        }
    }
}
