//! Reserved symbol names with a fixed numeric meaning.

/// Canonical name of π
pub(crate) const PI: &str = "pi";

/// Canonical name of Euler's number
pub(crate) const EULER: &str = "E";

/// Numeric value of a reserved constant, `None` for free symbols
#[inline]
pub(crate) fn constant_value(name: &str) -> Option<f64> {
    match name {
        PI => Some(std::f64::consts::PI),
        EULER => Some(std::f64::consts::E),
        _ => None,
    }
}

/// Check if a symbol name denotes a constant rather than a variable
#[inline]
pub(crate) fn is_constant(name: &str) -> bool {
    constant_value(name).is_some()
}
