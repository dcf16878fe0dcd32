//! Canonical ordering for expressions.
//!
//! `expr_cmp` orders product factors (numbers, then symbols, then compound
//! factors grouped by base). `sum_term_cmp` orders sum terms by descending
//! polynomial degree with the numeric constant last, giving `x^2 + 2*x + 1`.

use std::cmp::Ordering as CmpOrdering;

use super::{Expr, ExprKind};

/// Compare expressions for canonical ordering.
/// Order: Numbers < Symbols (by power) < Sum < `FunctionCall` < Pow < Div
pub fn expr_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Number, Pow, Product};

    // Returns: (Base, Exponent, Coefficient, IsAtomic)
    // Exponent None means 1
    fn extract_key(e: &Expr) -> (&Expr, Option<&Expr>, f64, bool) {
        match &e.kind {
            Pow(b, exp) => (b.as_ref(), Some(exp.as_ref()), 1.0, false),
            Product(factors) if factors.len() == 2 => {
                if let Number(n) = &factors[0].kind {
                    (&factors[1], None, *n, false)
                } else {
                    (e, None, 1.0, true)
                }
            }
            _ => (e, None, 1.0, true),
        }
    }

    fn cmp_exponent(exp: Option<&Expr>) -> Option<f64> {
        match exp {
            None => Some(1.0),
            Some(e) => e.as_number(),
        }
    }

    if let (Number(x), Number(y)) = (&a.kind, &b.kind) {
        return x.partial_cmp(y).unwrap_or(CmpOrdering::Equal);
    }
    if matches!(a.kind, Number(_)) {
        return CmpOrdering::Less;
    }
    if matches!(b.kind, Number(_)) {
        return CmpOrdering::Greater;
    }

    let (base_a, exp_a, coeff_a, atomic_a) = extract_key(a);
    let (base_b, exp_b, coeff_b, atomic_b) = extract_key(b);

    // Both atomic: strict type order (avoids comparing x against x forever)
    if atomic_a && atomic_b {
        return expr_cmp_type_strict(a, b);
    }

    let base_cmp = expr_cmp(base_a, base_b);
    if base_cmp != CmpOrdering::Equal {
        return base_cmp;
    }

    // x (1) vs x^2 (2) -> Less
    match (exp_a, exp_b) {
        (Some(e_a), Some(e_b)) => {
            let exp_cmp = expr_cmp(e_a, e_b);
            if exp_cmp != CmpOrdering::Equal {
                return exp_cmp;
            }
        }
        _ => {
            if let (Some(x), Some(y)) = (cmp_exponent(exp_a), cmp_exponent(exp_b)) {
                let exp_cmp = x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal);
                if exp_cmp != CmpOrdering::Equal {
                    return exp_cmp;
                }
            } else if exp_a.is_none() {
                return CmpOrdering::Less;
            } else {
                return CmpOrdering::Greater;
            }
        }
    }

    coeff_a.partial_cmp(&coeff_b).unwrap_or(CmpOrdering::Equal)
}

fn cmp_slices(x: &[std::sync::Arc<Expr>], y: &[std::sync::Arc<Expr>]) -> CmpOrdering {
    for (a, b) in x.iter().zip(y.iter()) {
        match expr_cmp(a, b) {
            CmpOrdering::Equal => {}
            other => return other,
        }
    }
    x.len().cmp(&y.len())
}

/// Fallback: strict type comparisons for atomic terms
/// Order: Number < Symbol < Sum < `FunctionCall` < Pow < Div < Product
pub fn expr_cmp_type_strict(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Div, FunctionCall, Number, Pow, Product, Sum, Symbol};
    match (&a.kind, &b.kind) {
        (Number(x), Number(y)) => x.partial_cmp(y).unwrap_or(CmpOrdering::Equal),
        (Number(_), _) => CmpOrdering::Less,
        (_, Number(_)) => CmpOrdering::Greater,

        (Symbol(x), Symbol(y)) => x.as_ref().cmp(y.as_ref()),
        (Symbol(_), _) => CmpOrdering::Less,
        (_, Symbol(_)) => CmpOrdering::Greater,

        (Sum(t1), Sum(t2)) => cmp_slices(t1, t2),
        (Sum(_), _) => CmpOrdering::Less,
        (_, Sum(_)) => CmpOrdering::Greater,

        (FunctionCall { name: n1, args: a1 }, FunctionCall { name: n2, args: a2 }) => {
            n1.cmp(n2).then_with(|| cmp_slices(a1, a2))
        }
        (FunctionCall { .. }, _) => CmpOrdering::Less,
        (_, FunctionCall { .. }) => CmpOrdering::Greater,

        (Pow(b1, e1), Pow(b2, e2)) => expr_cmp(b1, b2).then_with(|| expr_cmp(e1, e2)),
        (Pow(_, _), _) => CmpOrdering::Less,
        (_, Pow(_, _)) => CmpOrdering::Greater,

        (Div(l1, r1), Div(l2, r2)) => expr_cmp(l1, l2).then_with(|| expr_cmp(r1, r2)),
        (Div(_, _), _) => CmpOrdering::Less,
        (_, Div(_, _)) => CmpOrdering::Greater,

        (Product(f1), Product(f2)) => cmp_slices(f1, f2),
    }
}

/// Ordering of terms inside a sum: highest degree first, constants last
pub fn sum_term_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    let a_const = a.as_number().is_some();
    let b_const = b.as_number().is_some();
    if a_const != b_const {
        return a_const.cmp(&b_const);
    }

    let deg_a = a.polynomial_degree();
    let deg_b = b.polynomial_degree();
    deg_b
        .partial_cmp(&deg_a)
        .unwrap_or(CmpOrdering::Equal)
        .then_with(|| expr_cmp(strip_coefficient(a), strip_coefficient(b)))
        .then_with(|| expr_cmp(a, b))
}

fn strip_coefficient(e: &Expr) -> &Expr {
    match &e.kind {
        ExprKind::Product(factors) if factors.len() == 2 && factors[0].as_number().is_some() => {
            &factors[1]
        }
        _ => e,
    }
}
