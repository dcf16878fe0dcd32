//! Simplification framework - reduces expressions
pub(crate) mod engine;
pub(crate) mod helpers;
mod rules;

use crate::Expr;

pub use engine::Simplifier;

/// Simplify an expression with the default engine settings
///
/// Quotients come back as products with negative powers; the printers show
/// them as fractions again.
pub fn simplify(expr: Expr) -> Expr {
    Simplifier::new().simplify(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn simp(input: &str) -> String {
        simplify(parse(input).expect("valid input")).to_plain()
    }

    #[test]
    fn test_numeric_folding() {
        assert_eq!(simp("2 + 3*4"), "14");
        assert_eq!(simp("2^10"), "1024");
        assert_eq!(simp("sqrt(16)"), "4");
        assert_eq!(simp("cos(0) + sin(0)"), "1");
    }

    #[test]
    fn test_like_terms_and_powers() {
        assert_eq!(simp("x + x + x"), "3*x");
        assert_eq!(simp("x^2 * x^3"), "x**5");
        assert_eq!(simp("(x^2)^3"), "x**6");
        assert_eq!(simp("x - x"), "0");
    }

    #[test]
    fn test_polynomial_ordering() {
        assert_eq!(simp("1 + 2x + x^2"), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(simp("x/2"), "x/2");
        assert_eq!(simp("6x/3"), "2*x");
        assert_eq!(simp("sin(x)/x"), "sin(x)/x");
    }

    #[test]
    fn test_identities() {
        assert_eq!(simp("sin(x)^2 + cos(x)^2"), "1");
        assert_eq!(simp("log(exp(x))"), "x");
        assert_eq!(simp("sin(-x)"), "-sin(x)");
        assert_eq!(simp("e^x"), "exp(x)");
    }

    #[test]
    fn test_negation_distributes() {
        assert_eq!(simp("x - (x - 1)"), "1");
    }
}
