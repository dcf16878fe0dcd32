//! Built-in mathematical function registry
//!
//! Single source of truth for the functions the parser accepts, with their
//! numeric evaluation and derivative formulas.

use crate::{Expr, ExprKind};
use std::sync::Arc;

pub(crate) mod definitions;
pub(crate) mod registry;

/// Names accepted by the parser, including aliases
pub fn is_function_name(name: &str) -> bool {
    registry::Registry::canonical_name(name).is_some()
}

// ===== Helper functions for building derivative expressions =====

/// Create a function call expression from Arc<Expr>
pub(crate) fn func_arc(name: &str, arg: Arc<Expr>) -> Expr {
    Expr::func_multi_from_arcs(name, vec![arg])
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), _) if *x == 0.0 => Expr::number(0.0),
        (_, ExprKind::Number(x)) if *x == 0.0 => Expr::number(0.0),
        (ExprKind::Number(x), _) if *x == 1.0 => b,
        (_, ExprKind::Number(x)) if *x == 1.0 => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    Expr::negate(e)
}

/// 1/e as a negative power
pub(crate) fn recip(e: Expr) -> Expr {
    Expr::powf(e, -1.0)
}
