//! Integration by parts for polynomial times transcendental integrands
//!
//! `∫ u dv = u*v - ∫ v du`, with `u` chosen so the remaining integral is
//! simpler: the polynomial for `x^n * sin(x)`, the logarithm for `x^n * log(x)`.

use super::Integrator;
use crate::core::traits::as_integer;
use crate::simplification::simplify;
use crate::{CalcError, Expr, ExprKind};
use std::sync::Arc;

/// Functions that integrate to a function of the same family
const SELF_SIMILAR: &[&str] = &["sin", "cos", "exp", "sinh", "cosh"];

/// Check for `x` or `x^n` with a positive integer `n`
fn is_monomial(factor: &Expr, var: &str) -> bool {
    match &factor.kind {
        ExprKind::Symbol(name) => name.as_ref() == var,
        ExprKind::Pow(base, exp) => {
            base.as_symbol() == Some(var)
                && exp.as_number().and_then(as_integer).is_some_and(|n| n > 0)
        }
        _ => false,
    }
}

fn is_call_to(factor: &Expr, names: &[&str]) -> bool {
    matches!(&factor.kind, ExprKind::FunctionCall { name, args }
        if args.len() == 1 && names.contains(&name.as_ref()))
}

impl Integrator<'_> {
    /// Try integration by parts on a product of variable-dependent factors
    pub(super) fn by_parts(
        &mut self,
        factors: &[Arc<Expr>],
        depth: usize,
    ) -> Result<Option<Expr>, CalcError> {
        let (poly, other): (Vec<&Arc<Expr>>, Vec<&Arc<Expr>>) =
            factors.iter().partition(|f| is_monomial(f, self.var));
        if poly.is_empty() || other.len() != 1 {
            return Ok(None);
        }
        let poly = Expr::product(poly.into_iter().map(|f| (**f).clone()).collect());
        let other: &Expr = other[0];

        let (u, dv) = if is_call_to(other, SELF_SIMILAR) {
            (poly, other.clone())
        } else if is_call_to(other, &["log", "atan", "asin"]) {
            (other.clone(), poly)
        } else {
            return Ok(None);
        };

        let Some(v) = self.antiderivative(&dv, depth + 1)? else {
            return Ok(None);
        };
        let du = simplify(u.derive(self.var)?);
        let remaining = simplify(Expr::mul_expr(v.clone(), du));
        let Some(rest) = self.antiderivative(&remaining, depth + 1)? else {
            return Ok(None);
        };

        log::debug!("by parts: u = {}, dv = {}", u, dv);
        Ok(Some(Expr::sub_expr(Expr::mul_expr(u, v), rest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monomial_detection() {
        let x = Expr::symbol("x");
        assert!(is_monomial(&x, "x"));
        assert!(is_monomial(&Expr::powf(x.clone(), 3.0), "x"));
        assert!(!is_monomial(&Expr::powf(x.clone(), 0.5), "x"));
        assert!(!is_monomial(&Expr::func("sin", x), "x"));
    }
}
