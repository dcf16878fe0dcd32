use crate::core::traits::as_integer;
use crate::simplification::helpers::{get_fn_pow_named, is_pi, negated_term};
use crate::simplification::rules::{ExprKind, Rule};
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

const ODD_FUNCTIONS: &[&str] = &["sin", "tan", "cot", "csc", "asin", "atan", "sinh", "tanh"];
const EVEN_FUNCTIONS: &[&str] = &["cos", "sec", "cosh"];

/// Integer multiple of π: `pi` gives 1, `3*pi` gives 3
fn pi_multiple(expr: &Expr) -> Option<i64> {
    if is_pi(expr) {
        return Some(1);
    }
    if let AstKind::Product(factors) = &expr.kind
        && factors.len() == 2
        && is_pi(&factors[1])
    {
        return factors[0].as_number().and_then(as_integer);
    }
    None
}

rule!(
    TrigExactValuesRule,
    "trig_exact_values",
    85,
    Trigonometric,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        let AstKind::FunctionCall { name, args } = &expr.kind else {
            return None;
        };
        if args.len() != 1 {
            return None;
        }
        let k = pi_multiple(&args[0])?;
        match name.as_ref() {
            "sin" | "tan" => Some(Expr::number(0.0)),
            "cos" => Some(Expr::number(if k % 2 == 0 { 1.0 } else { -1.0 })),
            _ => None,
        }
    }
);

rule!(
    TrigSymmetryRule,
    "trig_symmetry",
    80,
    Trigonometric,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        // sin(-x) -> -sin(x), cos(-x) -> cos(x)
        let AstKind::FunctionCall { name, args } = &expr.kind else {
            return None;
        };
        if args.len() != 1 {
            return None;
        }
        let positive = negated_term(&args[0])?;
        let name = name.as_ref();
        if ODD_FUNCTIONS.contains(&name) {
            Some(Expr::negate(Expr::func(name, positive)))
        } else if EVEN_FUNCTIONS.contains(&name) {
            Some(Expr::func(name, positive))
        } else {
            None
        }
    }
);

rule!(
    PythagoreanIdentityRule,
    "pythagorean_identity",
    70,
    Trigonometric,
    &[ExprKind::Sum],
    |expr: &Expr, _context: &RuleContext| {
        // c*sin(u)^2 + c*cos(u)^2 -> c
        let AstKind::Sum(terms) = &expr.kind else {
            return None;
        };
        let parts: Vec<(f64, Expr)> = terms.iter().map(|t| t.split_coefficient()).collect();

        for (i, (c_sin, rest_sin)) in parts.iter().enumerate() {
            let Some(u) = get_fn_pow_named(rest_sin, "sin", 2.0) else {
                continue;
            };
            let partner = parts.iter().enumerate().position(|(j, (c_cos, rest_cos))| {
                j != i
                    && (c_cos - c_sin).abs() < crate::core::traits::EPSILON
                    && get_fn_pow_named(rest_cos, "cos", 2.0).is_some_and(|v| v == u)
            });
            if let Some(j) = partner {
                let mut remaining: Vec<Arc<Expr>> = terms
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i && *k != j)
                    .map(|(_, t)| Arc::clone(t))
                    .collect();
                remaining.push(Arc::new(Expr::number(*c_sin)));
                return Some(Expr::sum_from_arcs(remaining));
            }
        }
        None
    }
);

pub(crate) fn get_trigonometric_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(TrigExactValuesRule),
        Arc::new(TrigSymmetryRule),
        Arc::new(PythagoreanIdentityRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplification::rules::RuleContext;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_exact_values_at_pi() {
        let ctx = RuleContext::default();
        let pi = Expr::symbol("pi");
        assert_eq!(
            TrigExactValuesRule.apply(&Expr::func("sin", pi.clone()), &ctx),
            Some(Expr::number(0.0))
        );
        assert_eq!(
            TrigExactValuesRule.apply(&Expr::func("cos", pi.clone()), &ctx),
            Some(Expr::number(-1.0))
        );
        let two_pi = Expr::product(vec![Expr::number(2.0), pi]);
        assert_eq!(
            TrigExactValuesRule.apply(&Expr::func("cos", two_pi), &ctx),
            Some(Expr::number(1.0))
        );
    }

    #[test]
    fn test_symmetry() {
        let ctx = RuleContext::default();
        let sin_neg = Expr::func("sin", Expr::negate(x()));
        assert_eq!(
            TrigSymmetryRule.apply(&sin_neg, &ctx),
            Some(Expr::negate(Expr::func("sin", x())))
        );
        let cos_neg = Expr::func("cos", Expr::negate(x()));
        assert_eq!(
            TrigSymmetryRule.apply(&cos_neg, &ctx),
            Some(Expr::func("cos", x()))
        );
    }

    #[test]
    fn test_pythagorean_identity() {
        let ctx = RuleContext::default();
        let e = Expr::sum(vec![
            Expr::powf(Expr::func("sin", x()), 2.0),
            Expr::powf(Expr::func("cos", x()), 2.0),
        ]);
        assert_eq!(
            PythagoreanIdentityRule.apply(&e, &ctx),
            Some(Expr::number(1.0))
        );

        let mismatched = Expr::sum(vec![
            Expr::powf(Expr::func("sin", x()), 2.0),
            Expr::powf(Expr::func("cos", Expr::symbol("y")), 2.0),
        ]);
        assert_eq!(PythagoreanIdentityRule.apply(&mismatched, &ctx), None);
    }
}
