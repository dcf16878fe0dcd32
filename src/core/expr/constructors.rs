//! Expression constructors.
//!
//! Sums and products flatten nested nodes and fold their numeric parts on
//! construction. Products are also sorted into canonical factor order; sum
//! ordering is left to the simplifier so parsed input keeps its term order.

use std::sync::Arc;

use super::{EPSILON, Expr, ExprKind, compute_expr_hash, expr_cmp, next_id};
use crate::core::traits;

impl Expr {
    /// Create a new expression with fresh ID
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        let hash = compute_expr_hash(&kind);
        Self {
            id: next_id(),
            hash,
            kind,
        }
    }

    /// Get the unique ID of the expression
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get the structural hash of the expression
    #[inline]
    #[must_use]
    pub const fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Borrow the node kind
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ExprKind {
        &self.kind
    }

    // -------------------------------------------------------------------------
    // Accessor methods
    // -------------------------------------------------------------------------

    /// Check if expression is a constant number and return its value
    #[inline]
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Name of the symbol if this node is one
    #[inline]
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Check if this expression is the number zero (with tolerance)
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(traits::is_zero)
    }

    /// Check if this expression is the number one (with tolerance)
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(traits::is_one)
    }

    /// Check if this expression is the number negative one (with tolerance)
    #[inline]
    pub fn is_neg_one_num(&self) -> bool {
        self.as_number().is_some_and(traits::is_neg_one)
    }

    // -------------------------------------------------------------------------
    // Basic constructors
    // -------------------------------------------------------------------------

    /// Create a number expression
    #[must_use]
    pub fn number(n: f64) -> Self {
        Self::new(ExprKind::Number(n))
    }

    /// Create a symbol expression
    pub fn symbol(s: impl AsRef<str>) -> Self {
        Self::new(ExprKind::Symbol(Arc::from(s.as_ref())))
    }

    /// Create a single-argument function call
    pub fn func(name: impl AsRef<str>, arg: Self) -> Self {
        Self::func_multi_from_arcs(name, vec![Arc::new(arg)])
    }

    /// Create a function call with several arguments
    pub fn func_multi(name: impl AsRef<str>, args: Vec<Self>) -> Self {
        Self::func_multi_from_arcs(name, args.into_iter().map(Arc::new).collect())
    }

    /// Create a function call from shared arguments
    pub fn func_multi_from_arcs(name: impl AsRef<str>, args: Vec<Arc<Self>>) -> Self {
        Self::new(ExprKind::FunctionCall {
            name: Arc::from(name.as_ref()),
            args,
        })
    }

    // -------------------------------------------------------------------------
    // N-ary Sum constructor
    // -------------------------------------------------------------------------

    /// Create a sum expression from terms.
    /// Flattens nested sums and folds numeric terms into one trailing constant.
    #[must_use]
    pub fn sum(terms: Vec<Self>) -> Self {
        Self::sum_from_arcs(terms.into_iter().map(Arc::new).collect())
    }

    /// Create sum from Arc terms
    #[must_use]
    pub fn sum_from_arcs(terms: Vec<Arc<Self>>) -> Self {
        let mut flat: Vec<Arc<Self>> = Vec::with_capacity(terms.len());
        let mut numeric_sum: f64 = 0.0;
        let mut saw_number = false;

        for t in terms {
            match &t.kind {
                ExprKind::Number(n) => {
                    numeric_sum += n;
                    saw_number = true;
                }
                ExprKind::Sum(inner) => {
                    for term in inner {
                        if let ExprKind::Number(n) = term.kind {
                            numeric_sum += n;
                            saw_number = true;
                        } else {
                            flat.push(Arc::clone(term));
                        }
                    }
                }
                _ => flat.push(t),
            }
        }

        // Non-finite constants must survive even when the rest is empty
        if saw_number && (numeric_sum.abs() > EPSILON || !numeric_sum.is_finite()) {
            flat.push(Arc::new(Self::number(numeric_sum)));
        }

        match flat.len() {
            0 => Self::number(0.0),
            1 => flat.pop().map_or_else(|| Self::number(0.0), Self::unwrap_arc),
            _ => Self::new(ExprKind::Sum(flat)),
        }
    }

    // -------------------------------------------------------------------------
    // N-ary Product constructor
    // -------------------------------------------------------------------------

    /// Create a product expression from factors.
    /// Flattens nested products, folds numbers into a leading coefficient and
    /// sorts the remaining factors into canonical order.
    #[must_use]
    pub fn product(factors: Vec<Self>) -> Self {
        Self::product_from_arcs(factors.into_iter().map(Arc::new).collect())
    }

    /// Create product from Arc factors
    #[must_use]
    pub fn product_from_arcs(factors: Vec<Arc<Self>>) -> Self {
        let mut flat: Vec<Arc<Self>> = Vec::with_capacity(factors.len());
        let mut numeric_prod: f64 = 1.0;

        for f in factors {
            match &f.kind {
                ExprKind::Number(n) => numeric_prod *= n,
                ExprKind::Product(inner) => {
                    for factor in inner {
                        if let ExprKind::Number(n) = factor.kind {
                            numeric_prod *= n;
                        } else {
                            flat.push(Arc::clone(factor));
                        }
                    }
                }
                _ => flat.push(f),
            }
        }

        if numeric_prod == 0.0 {
            return Self::number(0.0);
        }
        if flat.is_empty() {
            return Self::number(numeric_prod);
        }

        flat.sort_by(|a, b| expr_cmp(a, b));

        if (numeric_prod - 1.0).abs() > EPSILON {
            flat.insert(0, Arc::new(Self::number(numeric_prod)));
        }

        match flat.len() {
            1 => flat.pop().map_or_else(|| Self::number(1.0), Self::unwrap_arc),
            _ => Self::new(ExprKind::Product(flat)),
        }
    }

    // -------------------------------------------------------------------------
    // Binary helpers
    // -------------------------------------------------------------------------

    /// a + b
    #[must_use]
    pub fn add_expr(a: Self, b: Self) -> Self {
        Self::sum(vec![a, b])
    }

    /// a - b, stored as a + (-1)*b
    #[must_use]
    pub fn sub_expr(a: Self, b: Self) -> Self {
        Self::sum(vec![a, Self::negate(b)])
    }

    /// a * b
    #[must_use]
    pub fn mul_expr(a: Self, b: Self) -> Self {
        Self::product(vec![a, b])
    }

    /// -a
    #[must_use]
    pub fn negate(a: Self) -> Self {
        Self::product(vec![Self::number(-1.0), a])
    }

    /// a / b
    #[must_use]
    pub fn div_expr(a: Self, b: Self) -> Self {
        Self::new(ExprKind::Div(Arc::new(a), Arc::new(b)))
    }

    /// a / b from shared children
    #[must_use]
    pub fn div_from_arcs(a: Arc<Self>, b: Arc<Self>) -> Self {
        Self::new(ExprKind::Div(a, b))
    }

    /// base ^ exponent
    #[must_use]
    pub fn pow(base: Self, exponent: Self) -> Self {
        Self::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// base ^ exponent from shared children
    #[must_use]
    pub fn pow_from_arcs(base: Arc<Self>, exponent: Arc<Self>) -> Self {
        Self::new(ExprKind::Pow(base, exponent))
    }

    /// base ^ n for a numeric exponent
    #[must_use]
    pub fn powf(base: Self, n: f64) -> Self {
        Self::pow(base, Self::number(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_flattens_and_folds() {
        let x = Expr::symbol("x");
        let inner = Expr::sum(vec![x.clone(), Expr::number(1.0)]);
        let outer = Expr::sum(vec![inner, Expr::number(2.0), Expr::symbol("y")]);
        match &outer.kind {
            ExprKind::Sum(terms) => {
                assert_eq!(terms.len(), 3);
                assert_eq!(terms[2].as_number(), Some(3.0));
            }
            other => panic!("expected sum, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_cancels_numbers() {
        let e = Expr::sum(vec![Expr::number(2.0), Expr::number(-2.0)]);
        assert_eq!(e.as_number(), Some(0.0));
        let x = Expr::sum(vec![Expr::symbol("x"), Expr::number(0.0)]);
        assert_eq!(x, Expr::symbol("x"));
    }

    #[test]
    fn test_product_coefficient_first() {
        let e = Expr::product(vec![
            Expr::symbol("x"),
            Expr::number(3.0),
            Expr::number(2.0),
        ]);
        match &e.kind {
            ExprKind::Product(factors) => {
                assert_eq!(factors[0].as_number(), Some(6.0));
                assert_eq!(factors[1].as_symbol(), Some("x"));
            }
            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn test_product_zero_and_one() {
        let zero = Expr::product(vec![Expr::number(0.0), Expr::symbol("x")]);
        assert!(zero.is_zero_num());
        let one = Expr::product(vec![Expr::number(1.0), Expr::symbol("x")]);
        assert_eq!(one, Expr::symbol("x"));
    }

    #[test]
    fn test_product_order_is_canonical() {
        let x = Expr::symbol("x");
        let a = Expr::product(vec![Expr::func("sin", x.clone()), x.clone()]);
        let b = Expr::product(vec![x.clone(), Expr::func("sin", x)]);
        assert_eq!(a, b);
    }
}
