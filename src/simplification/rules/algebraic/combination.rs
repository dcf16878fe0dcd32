use crate::core::traits::EPSILON;
use crate::simplification::rules::ExprKind;
use crate::{Expr, ExprKind as AstKind};
use rustc_hash::FxHashMap;
use std::sync::Arc;

rule!(
    CombineLikeTermsRule,
    "combine_like_terms",
    50,
    Algebraic,
    &[ExprKind::Sum],
    |expr: &Expr, _context: &RuleContext| {
        // 2*x + 3*x -> 5*x, x - x -> 0
        let AstKind::Sum(terms) = &expr.kind else {
            return None;
        };
        if terms.len() < 2 {
            return None;
        }

        // Groups keep first-appearance order so the result does not depend on hashing
        let mut index: FxHashMap<Expr, usize> = FxHashMap::default();
        let mut groups: Vec<(Expr, f64)> = Vec::with_capacity(terms.len());
        for term in terms {
            let (coeff, base) = term.split_coefficient();
            match index.get(&base) {
                Some(&i) => groups[i].1 += coeff,
                None => {
                    index.insert(base.clone(), groups.len());
                    groups.push((base, coeff));
                }
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let combined: Vec<Expr> = groups
            .into_iter()
            .filter(|(_, coeff)| coeff.abs() > EPSILON)
            .map(|(base, coeff)| Expr::product(vec![Expr::number(coeff), base]))
            .collect();
        Some(Expr::sum(combined))
    }
);

rule!(
    DistributeNumericRule,
    "distribute_numeric",
    45,
    Algebraic,
    &[ExprKind::Product],
    |expr: &Expr, _context: &RuleContext| {
        // c * (a + b) -> c*a + c*b, which also expands -(a - b)
        let AstKind::Product(factors) = &expr.kind else {
            return None;
        };
        if factors.len() != 2 {
            return None;
        }
        let coeff = factors[0].as_number()?;
        let AstKind::Sum(terms) = &factors[1].kind else {
            return None;
        };

        let distributed: Vec<Expr> = terms
            .iter()
            .map(|t| Expr::product_from_arcs(vec![Arc::new(Expr::number(coeff)), Arc::clone(t)]))
            .collect();
        Some(Expr::sum(distributed))
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplification::rules::{Rule, RuleContext};

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_combine_like_terms() {
        let e = Expr::sum(vec![
            Expr::product(vec![Expr::number(2.0), x()]),
            Expr::product(vec![Expr::number(3.0), x()]),
        ]);
        let combined = CombineLikeTermsRule
            .apply(&e, &RuleContext::default())
            .expect("terms combine");
        assert_eq!(combined.to_plain(), "5*x");
    }

    #[test]
    fn test_cancelling_terms_vanish() {
        let e = Expr::sub_expr(Expr::func("sin", x()), Expr::func("sin", x()));
        let combined = CombineLikeTermsRule
            .apply(&e, &RuleContext::default())
            .expect("terms cancel");
        assert!(combined.is_zero_num());
    }

    #[test]
    fn test_distinct_terms_untouched() {
        let e = Expr::sum(vec![x(), Expr::powf(x(), 2.0)]);
        assert_eq!(CombineLikeTermsRule.apply(&e, &RuleContext::default()), None);
    }

    #[test]
    fn test_distribute_negation() {
        let inner = Expr::sum(vec![x(), Expr::number(1.0)]);
        let e = Expr::negate(inner);
        let distributed = DistributeNumericRule
            .apply(&e, &RuleContext::default())
            .expect("coefficient distributes");
        assert_eq!(distributed.to_string(), "-x - 1");
    }
}
