//! Float tolerance helpers shared by the expression core and the rule engine.
//!
//! These avoid precision surprises such as `1.0/3.0 * 3.0 != 1.0`.

/// Default tolerance for floating-point comparisons
pub(crate) const EPSILON: f64 = 1e-10;

/// Largest denominator tried when recognising a float as a fraction
const MAX_DENOMINATOR: i64 = 1000;

/// Check if a float is approximately zero (within tolerance)
#[inline]
pub(crate) fn is_zero(n: f64) -> bool {
    n.abs() < EPSILON
}

/// Check if a float is approximately one (within tolerance)
#[inline]
pub(crate) fn is_one(n: f64) -> bool {
    (n - 1.0).abs() < EPSILON
}

/// Check if a float is approximately negative one (within tolerance)
#[inline]
pub(crate) fn is_neg_one(n: f64) -> bool {
    (n + 1.0).abs() < EPSILON
}

/// Check if a float holds an integer value that fits an `i64` exactly
#[inline]
pub(crate) fn as_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
        Some(n as i64)
    } else {
        None
    }
}

/// Recognise `n` as `p/q` with a small denominator.
///
/// The first matching denominator is the smallest one, so the fraction is
/// already in lowest terms. Integers come back as `(n, 1)`.
pub(crate) fn as_fraction(n: f64) -> Option<(i64, i64)> {
    if !n.is_finite() || n.abs() > 1.0e12 {
        return None;
    }
    if let Some(i) = as_integer(n) {
        return Some((i, 1));
    }
    let tolerance = 1e-12 * n.abs().max(1.0);
    // q = 1 catches values a rounding error away from an integer
    for q in 1..=MAX_DENOMINATOR {
        #[allow(clippy::cast_precision_loss, reason = "q is at most 1000")]
        let scaled = n * q as f64;
        let p = scaled.round();
        #[allow(clippy::cast_precision_loss, reason = "q is at most 1000")]
        if (p / q as f64 - n).abs() < tolerance {
            #[allow(clippy::cast_possible_truncation, reason = "|p| < 1e15")]
            return Some((p as i64, q));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(1e-11));
        assert!(is_zero(-1e-11));
        assert!(!is_zero(0.1));
        assert!(!is_zero(-0.1));
    }

    #[test]
    fn test_is_one() {
        assert!(is_one(1.0));
        assert!(is_one(1.0 + 1e-11));
        assert!(!is_one(1.1));
    }

    #[test]
    fn test_is_neg_one() {
        assert!(is_neg_one(-1.0));
        assert!(!is_neg_one(1.0));
    }

    #[test]
    fn test_as_fraction() {
        assert_eq!(as_fraction(0.5), Some((1, 2)));
        assert_eq!(as_fraction(-0.25), Some((-1, 4)));
        assert_eq!(as_fraction(1.0 / 3.0), Some((1, 3)));
        assert_eq!(as_fraction(4.0), Some((4, 1)));
        assert_eq!(as_fraction(std::f64::consts::PI), None);
        assert_eq!(as_fraction(f64::NAN), None);
    }
}
