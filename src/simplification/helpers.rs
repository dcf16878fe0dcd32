use crate::core::traits::EPSILON;
use crate::{Expr, ExprKind};
use std::sync::Arc;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Split a factor into base and exponent: `x^3` gives `(x, 3)`, `x` gives `(x, 1)`
pub(crate) fn base_and_exponent(factor: &Arc<Expr>) -> (Arc<Expr>, Expr) {
    match &factor.kind {
        ExprKind::Pow(base, exp) => (Arc::clone(base), (**exp).clone()),
        _ => (Arc::clone(factor), Expr::number(1.0)),
    }
}

/// Positive counterpart of a negative term: `-3*x` gives `3*x`, `-2` gives `2`
pub(crate) fn negated_term(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Number(n) if *n < 0.0 => Some(Expr::number(-n)),
        ExprKind::Product(factors) => {
            let coeff = factors.first()?.as_number()?;
            if coeff >= 0.0 {
                return None;
            }
            let mut rest: Vec<Arc<Expr>> = factors[1..].to_vec();
            rest.insert(0, Arc::new(Expr::number(-coeff)));
            Some(Expr::product_from_arcs(rest))
        }
        _ => None,
    }
}

/// Match `name(arg)^power` and return the argument
pub(crate) fn get_fn_pow_named<'a>(expr: &'a Expr, name: &str, power: f64) -> Option<&'a Arc<Expr>> {
    if let ExprKind::Pow(base, exp) = &expr.kind
        && exp.as_number().is_some_and(|n| approx_eq(n, power))
        && let ExprKind::FunctionCall { name: fname, args } = &base.kind
        && fname.as_ref() == name
        && args.len() == 1
    {
        return Some(&args[0]);
    }
    None
}

/// Check if the expression is the constant π
pub(crate) fn is_pi(expr: &Expr) -> bool {
    expr.as_symbol() == Some(crate::core::known_symbols::PI)
}
