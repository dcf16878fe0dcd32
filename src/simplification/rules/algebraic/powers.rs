use crate::core::traits::as_integer;
use crate::simplification::helpers::base_and_exponent;
use crate::simplification::rules::ExprKind;
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

rule!(
    PowerZeroRule,
    "power_zero",
    80,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Pow(_u, v) = &expr.kind
            && v.is_zero_num()
        {
            return Some(Expr::number(1.0));
        }
        None
    }
);

rule!(
    PowerOneRule,
    "power_one",
    80,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Pow(u, v) = &expr.kind
            && v.is_one_num()
        {
            return Some(Expr::unwrap_arc(Arc::clone(u)));
        }
        None
    }
);

rule!(
    OneBaseRule,
    "one_base",
    80,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Pow(u, _v) = &expr.kind
            && u.is_one_num()
        {
            return Some(Expr::number(1.0));
        }
        None
    }
);

rule!(
    ZeroBaseRule,
    "zero_base",
    80,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        if let AstKind::Pow(u, v) = &expr.kind
            && u.is_zero_num()
            && v.as_number().is_some_and(|n| n > 0.0)
        {
            return Some(Expr::number(0.0));
        }
        None
    }
);

rule!(
    PowerPowerRule,
    "power_power",
    75,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        // (b^a)^n -> b^(a*n) for integer n; (x^2)^0.5 is |x|, not x
        if let AstKind::Pow(u, v) = &expr.kind
            && let AstKind::Pow(base, exp_inner) = &u.kind
            && v.as_number().and_then(as_integer).is_some()
        {
            let exponent = Expr::product_from_arcs(vec![Arc::clone(exp_inner), Arc::clone(v)]);
            return Some(Expr::pow_from_arcs(Arc::clone(base), Arc::new(exponent)));
        }
        None
    }
);

rule!(
    PowerOfProductRule,
    "power_of_product",
    74,
    Algebraic,
    &[ExprKind::Pow],
    |expr: &Expr, _context: &RuleContext| {
        // (a*b)^n -> a^n * b^n for integer n
        let AstKind::Pow(u, v) = &expr.kind else {
            return None;
        };
        let AstKind::Product(factors) = &u.kind else {
            return None;
        };
        let n = v.as_number().filter(|n| as_integer(*n).is_some())?;

        let distributed: Vec<Expr> = factors
            .iter()
            .map(|f| match f.as_number() {
                Some(c) => Expr::number(c.powf(n)),
                None => Expr::pow_from_arcs(Arc::clone(f), Arc::clone(v)),
            })
            .collect();
        Some(Expr::product(distributed))
    }
);

rule!(
    CombinePowersRule,
    "combine_powers",
    60,
    Algebraic,
    &[ExprKind::Product],
    |expr: &Expr, context: &RuleContext| {
        // x * x^2 -> x^3, x^a * x^b -> x^(a+b)
        let AstKind::Product(factors) = &expr.kind else {
            return None;
        };
        if factors.len() < 2 {
            return None;
        }

        let mut groups: Vec<(Arc<Expr>, Vec<Expr>)> = Vec::with_capacity(factors.len());
        for factor in factors {
            if factor.as_number().is_some() {
                groups.push((Arc::clone(factor), Vec::new()));
                continue;
            }
            let (base, exp) = base_and_exponent(factor);
            match groups.iter_mut().find(|(b, exps)| !exps.is_empty() && **b == *base) {
                Some((_, exps)) => exps.push(exp),
                None => groups.push((base, vec![exp])),
            }
        }

        if groups.len() == factors.len() {
            return None;
        }

        let mut combined: Vec<Expr> = Vec::with_capacity(groups.len());
        for (base, exps) in groups {
            if exps.is_empty() {
                combined.push(Expr::unwrap_arc(base));
                continue;
            }
            let exponent = Expr::sum(exps);
            if exponent.is_zero_num() {
                // x * x^-1 is undefined at x = 0
                if context.domain_safe {
                    return None;
                }
                continue;
            }
            if exponent.is_one_num() {
                combined.push(Expr::unwrap_arc(base));
            } else {
                combined.push(Expr::pow_from_arcs(base, Arc::new(exponent)));
            }
        }
        Some(Expr::product(combined))
    }
);
