//! Elementary antiderivatives
//!
//! Every entry is written for a bare argument `u`; the caller divides by
//! `du/dx` when `u` is linear in the variable.

use crate::core::traits::as_integer;
use crate::{Expr, ExprKind};
use std::sync::Arc;

fn call(name: &str, u: &Arc<Expr>) -> Expr {
    Expr::func_multi_from_arcs(name, vec![Arc::clone(u)])
}

fn arg(u: &Arc<Expr>) -> Expr {
    (**u).clone()
}

/// ∫ f(u) du for a single function call
pub(crate) fn function_antiderivative(name: &str, u: &Arc<Expr>) -> Option<Expr> {
    Some(match name {
        "sin" => Expr::negate(call("cos", u)),
        "cos" => call("sin", u),
        "tan" => Expr::negate(Expr::func("log", call("cos", u))),
        "cot" => Expr::func("log", call("sin", u)),
        "exp" => call("exp", u),
        "sinh" => call("cosh", u),
        "cosh" => call("sinh", u),
        "tanh" => Expr::func("log", call("cosh", u)),
        // u*log(u) - u
        "log" => Expr::sub_expr(Expr::mul_expr(arg(u), call("log", u)), arg(u)),
        // u*atan(u) - log(u^2 + 1)/2
        "atan" => Expr::sub_expr(
            Expr::mul_expr(arg(u), call("atan", u)),
            Expr::product(vec![
                Expr::number(0.5),
                Expr::func("log", Expr::sum(vec![Expr::powf(arg(u), 2.0), Expr::number(1.0)])),
            ]),
        ),
        // u*asin(u) + sqrt(1 - u^2)
        "asin" => Expr::add_expr(
            Expr::mul_expr(arg(u), call("asin", u)),
            Expr::func(
                "sqrt",
                Expr::sub_expr(Expr::number(1.0), Expr::powf(arg(u), 2.0)),
            ),
        ),
        _ => return None,
    })
}

/// ∫ f(u)^n du for the squared and reciprocal-squared trig forms
pub(crate) fn trig_power_antiderivative(name: &str, u: &Arc<Expr>, n: f64) -> Option<Expr> {
    let double = |f: &str| {
        Expr::func(f, Expr::product(vec![Expr::number(2.0), arg(u)]))
    };
    match (name, as_integer(n)?) {
        // u/2 - sin(2u)/4
        ("sin", 2) => Some(Expr::sum(vec![
            Expr::product(vec![Expr::number(0.5), arg(u)]),
            Expr::product(vec![Expr::number(-0.25), double("sin")]),
        ])),
        // u/2 + sin(2u)/4
        ("cos", 2) => Some(Expr::sum(vec![
            Expr::product(vec![Expr::number(0.5), arg(u)]),
            Expr::product(vec![Expr::number(0.25), double("sin")]),
        ])),
        ("cos", -2) | ("sec", 2) => Some(call("tan", u)),
        ("sin", -2) | ("csc", 2) => Some(Expr::negate(call("cot", u))),
        _ => None,
    }
}

/// ∫ dx/(x^2 + 1) = atan(x) and ∫ dx/sqrt(1 - x^2) = asin(x)
///
/// Matches the canonical (simplified) shape of the base exactly.
pub(crate) fn inverse_trig_antiderivative(base: &Expr, n: f64, var: &str) -> Option<Expr> {
    let ExprKind::Sum(terms) = &base.kind else {
        return None;
    };
    if terms.len() != 2 || !terms[1].is_one_num() {
        return None;
    }
    let x = Expr::symbol(var);
    let square = Expr::powf(x.clone(), 2.0);
    let (coeff, rest) = terms[0].split_coefficient();
    if rest != square {
        return None;
    }
    if coeff == 1.0 && n == -1.0 {
        Some(Expr::func("atan", x))
    } else if coeff == -1.0 && n == -0.5 {
        Some(Expr::func("asin", x))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Arc<Expr> {
        Arc::new(Expr::symbol("x"))
    }

    #[test]
    fn test_basic_entries() {
        assert_eq!(
            function_antiderivative("cos", &x()),
            Some(Expr::func("sin", Expr::symbol("x")))
        );
        assert_eq!(
            function_antiderivative("sin", &x()).map(|e| e.to_plain()),
            Some("-cos(x)".to_string())
        );
        assert!(function_antiderivative("sign", &x()).is_none());
    }

    #[test]
    fn test_sec_squared() {
        assert_eq!(
            trig_power_antiderivative("cos", &x(), -2.0),
            Some(Expr::func("tan", Expr::symbol("x")))
        );
    }

    #[test]
    fn test_inverse_trig_shapes() {
        let base = Expr::sum(vec![Expr::powf(Expr::symbol("x"), 2.0), Expr::number(1.0)]);
        assert_eq!(
            inverse_trig_antiderivative(&base, -1.0, "x"),
            Some(Expr::func("atan", Expr::symbol("x")))
        );
        let base = Expr::sum(vec![
            Expr::negate(Expr::powf(Expr::symbol("x"), 2.0)),
            Expr::number(1.0),
        ]);
        assert_eq!(
            inverse_trig_antiderivative(&base, -0.5, "x"),
            Some(Expr::func("asin", Expr::symbol("x")))
        );
    }
}
