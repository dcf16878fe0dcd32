use crate::core::expr::sum_term_cmp;
use crate::simplification::rules::ExprKind;
use crate::{Expr, ExprKind as AstKind};
use std::sync::Arc;

rule!(
    CanonicalSumOrderRule,
    "canonical_sum_order",
    10,
    Algebraic,
    &[ExprKind::Sum],
    |expr: &Expr, _context: &RuleContext| {
        // Highest degree first, constant last: 1 + x^2 + 2*x -> x^2 + 2*x + 1
        let AstKind::Sum(terms) = &expr.kind else {
            return None;
        };
        let mut sorted: Vec<Arc<Expr>> = terms.clone();
        sorted.sort_by(|a, b| sum_term_cmp(a, b));

        if sorted.iter().zip(terms).all(|(a, b)| Arc::ptr_eq(a, b)) {
            return None;
        }
        Some(Expr::new(AstKind::Sum(sorted)))
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplification::rules::{Rule, RuleContext};

    #[test]
    fn test_sum_sorted_by_degree() {
        let x = Expr::symbol("x");
        let e = Expr::sum(vec![
            Expr::number(1.0),
            Expr::product(vec![Expr::number(2.0), x.clone()]),
            Expr::powf(x, 2.0),
        ]);
        let sorted = CanonicalSumOrderRule
            .apply(&e, &RuleContext::default())
            .expect("terms reorder");
        assert_eq!(sorted.to_string(), "x^2 + 2*x + 1");
    }

    #[test]
    fn test_sorted_sum_is_stable() {
        let x = Expr::symbol("x");
        let e = Expr::sum(vec![Expr::powf(x.clone(), 2.0), x]);
        assert_eq!(CanonicalSumOrderRule.apply(&e, &RuleContext::default()), None);
    }
}
