use crate::simplification::rules::ExprKind;
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

rule!(
    DivToProductRule,
    "div_to_product",
    70,
    Algebraic,
    &[ExprKind::Div],
    |expr: &Expr, _context: &RuleContext| {
        // u / v -> u * v^-1 so quotients share the product rules;
        // the printer turns negative powers back into fractions
        if let AstKind::Div(u, v) = &expr.kind
            && !v.is_zero_num()
        {
            let reciprocal = Expr::pow_from_arcs(Arc::clone(v), Arc::new(Expr::number(-1.0)));
            return Some(Expr::product_from_arcs(vec![
                Arc::clone(u),
                Arc::new(reciprocal),
            ]));
        }
        None
    }
);
