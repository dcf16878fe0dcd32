use crate::core::known_symbols::EULER;
use crate::simplification::rules::{ExprKind, Rule};
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

/// Single argument of a call to `name`
fn unary_arg<'a>(expr: &'a Expr, name: &str) -> Option<&'a Arc<Expr>> {
    match &expr.kind {
        AstKind::FunctionCall { name: n, args } if n.as_ref() == name && args.len() == 1 => {
            Some(&args[0])
        }
        _ => None,
    }
}

rule!(
    SqrtToPowerRule,
    "sqrt_to_power",
    60,
    Exponential,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        // sqrt(u) -> u^0.5 so roots combine with other powers
        let arg = unary_arg(expr, "sqrt")?;
        Some(Expr::pow_from_arcs(
            Arc::clone(arg),
            Arc::new(Expr::number(0.5)),
        ))
    }
);

rule!(
    EulerPowerRule,
    "euler_power",
    60,
    Exponential,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        // E^u -> exp(u)
        if let AstKind::Pow(base, exp) = &expr.kind
            && base.as_symbol() == Some(EULER)
        {
            return Some(Expr::func_multi_from_arcs("exp", vec![Arc::clone(exp)]));
        }
        None
    }
);

rule!(
    ExpLogRule,
    "exp_log",
    80,
    Exponential,
    &[ExprKind::Function],
    alters_domain,
    |expr: &Expr, _context: &RuleContext| {
        // exp(log(u)) -> u, only valid for u > 0
        let inner = unary_arg(expr, "exp")?;
        let u = unary_arg(inner, "log")?;
        Some(Expr::unwrap_arc(Arc::clone(u)))
    }
);

rule!(
    LogExpRule,
    "log_exp",
    80,
    Exponential,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        // log(exp(u)) -> u
        let inner = unary_arg(expr, "log")?;
        let u = unary_arg(inner, "exp")?;
        Some(Expr::unwrap_arc(Arc::clone(u)))
    }
);

rule!(
    LogEulerRule,
    "log_euler",
    80,
    Exponential,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        let arg = unary_arg(expr, "log")?;
        (arg.as_symbol() == Some(EULER)).then(|| Expr::number(1.0))
    }
);

rule!(
    ExpProductRule,
    "exp_product",
    55,
    Exponential,
    &[ExprKind::Product],
    |expr: &Expr, _context: &RuleContext| {
        // exp(a) * exp(b) -> exp(a + b)
        let AstKind::Product(factors) = &expr.kind else {
            return None;
        };
        let exponents: Vec<Arc<Expr>> = factors
            .iter()
            .filter_map(|f| unary_arg(f, "exp").cloned())
            .collect();
        if exponents.len() < 2 {
            return None;
        }
        let mut rest: Vec<Expr> = factors
            .iter()
            .filter(|f| unary_arg(f, "exp").is_none())
            .map(|f| (**f).clone())
            .collect();
        rest.push(Expr::func("exp", Expr::sum_from_arcs(exponents)));
        Some(Expr::product(rest))
    }
);

pub(crate) fn get_exponential_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(SqrtToPowerRule),
        Arc::new(EulerPowerRule),
        Arc::new(ExpLogRule),
        Arc::new(LogExpRule),
        Arc::new(LogEulerRule),
        Arc::new(ExpProductRule),
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
    fn test_log_exp_inverse() {
        let ctx = RuleContext::default();
        let e = Expr::func("log", Expr::func("exp", x()));
        assert_eq!(LogExpRule.apply(&e, &ctx), Some(x()));
        let e = Expr::func("exp", Expr::func("log", x()));
        assert_eq!(ExpLogRule.apply(&e, &ctx), Some(x()));
        assert!(ExpLogRule.alters_domain());
    }

    #[test]
    fn test_euler_power_becomes_exp() {
        let e = Expr::pow(Expr::symbol("E"), x());
        assert_eq!(
            EulerPowerRule.apply(&e, &RuleContext::default()),
            Some(Expr::func("exp", x()))
        );
    }

    #[test]
    fn test_sqrt_as_power() {
        let e = Expr::func("sqrt", x());
        assert_eq!(
            SqrtToPowerRule.apply(&e, &RuleContext::default()),
            Some(Expr::powf(x(), 0.5))
        );
    }

    #[test]
    fn test_exp_product_merges() {
        let e = Expr::product(vec![Expr::func("exp", x()), Expr::func("exp", Expr::number(2.0))]);
        let merged = ExpProductRule
            .apply(&e, &RuleContext::default())
            .expect("exponentials merge");
        assert_eq!(merged, Expr::func("exp", Expr::sum(vec![x(), Expr::number(2.0)])));
    }
}
