//! Diagnostic tests

mod sema_errors;
