use crate::core::traits::{EPSILON, as_integer};
use crate::functions::registry::Registry;
use crate::simplification::rules::{ExprKind, Rule};
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

/// Keep only results that stay exact after folding
fn clean_value(n: f64) -> Option<f64> {
    if !n.is_finite() {
        return None;
    }
    let rounded = n.round();
    ((n - rounded).abs() < EPSILON).then_some(rounded)
}

rule!(
    NumericPowRule,
    "numeric_pow",
    95,
    Numeric,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Pow(base, exp) = &expr.kind
            && let (Some(b), Some(e)) = (base.as_number(), exp.as_number())
        {
            let result = b.powf(e);
            if !result.is_finite() {
                return None;
            }
            // Integer exponents are exact (2^-1 = 0.5); others only when clean (4^0.5 = 2)
            if as_integer(e).is_some() {
                return Some(Expr::number(result));
            }
            return clean_value(result).map(Expr::number);
        }
        None
    }
);

rule!(
    NumericDivRule,
    "numeric_div",
    95,
    Numeric,
    &[ExprKind::Div],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Div(u, v) = &expr.kind
            && let (Some(a), Some(b)) = (u.as_number(), v.as_number())
            && b != 0.0
        {
            return Some(Expr::number(a / b));
        }
        None
    }
);

rule!(
    NumericFunctionRule,
    "numeric_function",
    90,
    Numeric,
    &[ExprKind::Function],
    |expr: &Expr, _context: &RuleContext| {
        let AstKind::FunctionCall { name, args } = &expr.kind else {
            return None;
        };
        let values: Option<Vec<f64>> = args.iter().map(|a| a.as_number()).collect();
        let values = values?;
        let def = Registry::get(name)?;
        // sin(0) = 0, sqrt(9) = 3, log(1) = 0; sqrt(2) stays symbolic
        (def.eval)(&values).and_then(clean_value).map(Expr::number)
    }
);

rule!(
    DivByOneRule,
    "div_one",
    92,
    Numeric,
    &[ExprKind::Div],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Div(u, v) = &expr.kind
            && v.is_one_num()
        {
            return Some(Expr::unwrap_arc(Arc::clone(u)));
        }
        None
    }
);

rule!(
    ZeroDivRule,
    "zero_div",
    92,
    Numeric,
    &[ExprKind::Div],
    alters_domain,
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Div(u, v) = &expr.kind
            && u.is_zero_num()
            && !v.is_zero_num()
        {
            return Some(Expr::number(0.0));
        }
        None
    }
);

pub(crate) fn get_numeric_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NumericPowRule),
        Arc::new(NumericDivRule),
        Arc::new(NumericFunctionRule),
        Arc::new(DivByOneRule),
        Arc::new(ZeroDivRule),
    ]
}
