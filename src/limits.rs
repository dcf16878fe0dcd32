//! Limits at a finite point
//!
//! Limits are taken from the right. Direct substitution is only used where
//! the expression is continuous at the point. Otherwise the limit is built
//! from the structure of the expression: limits of terms and factors,
//! one-sided values of `sign`, `f^g` through `exp(g*log(f))`, L'Hôpital's
//! rule on `0/0`, `∞/∞` and rewritten `0*∞`, and signed infinity for `c/0`.
//! A numeric estimate is the last resort and is reported as such.

use crate::core::known_symbols;
use crate::functions::registry::Registry;
use crate::simplification::simplify;
use crate::{CalcError, Expr, ExprKind};
use std::sync::Arc;

/// Upper bound on repeated L'Hôpital steps
const MAX_LHOPITAL_STEPS: usize = 8;

/// Upper bound on nested sub-limits
const MAX_DEPTH: usize = 6;

/// Tolerance for treating a value as zero
const ZERO_TOLERANCE: f64 = 1e-12;

/// Relative step to the right of the point for one-sided checks
const SIDE_OFFSET: f64 = 1e-9;

/// Offsets used by the numeric estimate, shrinking toward the point
const SAMPLE_OFFSETS: [f64; 6] = [1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7];

/// A limit together with how it was obtained
#[derive(Debug, Clone)]
pub struct LimitValue {
    pub value: Expr,
    /// Read off sampled values rather than derived
    pub estimated: bool,
}

impl LimitValue {
    fn exact(value: Expr) -> Self {
        Self {
            value,
            estimated: false,
        }
    }
}

/// Limit of `expr` as `var` approaches `point` from the right
///
/// # Errors
/// See [`evaluate_limit`].
pub fn limit(expr: &Expr, var: &str, point: f64) -> Result<Expr, CalcError> {
    evaluate_limit(expr, var, point).map(|limit| limit.value)
}

/// Limit of `expr` as `var` approaches `point` from the right, flagging estimates
///
/// # Errors
/// `CalcError::LimitUndetermined` when no strategy gives an answer;
/// evaluation errors such as unknown functions are propagated.
pub fn evaluate_limit(expr: &Expr, var: &str, point: f64) -> Result<LimitValue, CalcError> {
    let expr = simplify(expr.clone());
    if !expr.contains_var(var) {
        return Ok(LimitValue::exact(expr));
    }

    match continuous_value(&expr, var, point) {
        Ok(Some(_)) => {
            let substituted = simplify(expr.substitute(var, &Expr::number(point)));
            log::debug!("limit by substitution: {}", substituted);
            return Ok(LimitValue::exact(substituted));
        }
        Ok(None) => {}
        // Free parameters block numeric checks; substitute symbolically
        Err(CalcError::UnboundSymbol { .. }) => {
            return Ok(LimitValue::exact(simplify(
                expr.substitute(var, &Expr::number(point)),
            )));
        }
        Err(e) => return Err(e),
    }

    if let Some(value) = value_at(&expr, var, point, 0)? {
        return Ok(LimitValue::exact(value_expr(value)));
    }

    if let Some(value) = numeric_limit(&expr, var, point)? {
        log::debug!("limit of {} estimated numerically", expr);
        return Ok(LimitValue {
            value: value_expr(value),
            estimated: true,
        });
    }

    Err(CalcError::LimitUndetermined {
        expr: expr.to_plain(),
        point,
    })
}

/// Snap values a rounding error away from an integer
fn clean(value: f64) -> f64 {
    let rounded = value.round();
    if value.is_finite() && (value - rounded).abs() < 1e-9 {
        // no `-0` in results
        if rounded == 0.0 { 0.0 } else { rounded }
    } else {
        value
    }
}

fn value_expr(value: f64) -> Expr {
    let value = clean(value);
    if (value - std::f64::consts::E).abs() < 1e-9 {
        Expr::symbol(known_symbols::EULER)
    } else {
        Expr::number(value)
    }
}

/// A point just to the right of `point`
fn side_point(point: f64) -> f64 {
    point + SIDE_OFFSET * (1.0 + point.abs())
}

/// Value at the point, when `expr` is continuous there
fn continuous_value(expr: &Expr, var: &str, point: f64) -> Result<Option<f64>, CalcError> {
    if !defined_throughout(expr, var, point)? {
        return Ok(None);
    }
    let value = expr.eval_f64(var, point)?;
    let nearby = expr.eval_f64(var, side_point(point))?;
    Ok(((nearby - value).abs() <= 1e-4 * (1.0 + value.abs())).then_some(value))
}

/// Every subexpression is finite at the point and no `sign` sits on its jump
fn defined_throughout(expr: &Expr, var: &str, point: f64) -> Result<bool, CalcError> {
    if !expr.eval_f64(var, point)?.is_finite() {
        return Ok(false);
    }
    let children: &[Arc<Expr>] = match &expr.kind {
        ExprKind::FunctionCall { name, args } => {
            if name.as_ref() == "sign" {
                for arg in args {
                    if arg.eval_f64(var, point)?.abs() < ZERO_TOLERANCE {
                        return Ok(false);
                    }
                }
            }
            args
        }
        ExprKind::Sum(items) | ExprKind::Product(items) => items,
        ExprKind::Div(u, v) | ExprKind::Pow(u, v) => {
            return Ok(defined_throughout(u, var, point)? && defined_throughout(v, var, point)?);
        }
        ExprKind::Number(_) | ExprKind::Symbol(_) => return Ok(true),
    };
    for child in children {
        if !defined_throughout(child, var, point)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Right-sided limit as a float, `None` when it cannot be derived
fn value_at(expr: &Expr, var: &str, point: f64, depth: usize) -> Result<Option<f64>, CalcError> {
    if !expr.contains_var(var) {
        let value = expr.eval_f64(var, point)?;
        return Ok((!value.is_nan()).then_some(value));
    }
    if let Some(value) = continuous_value(expr, var, point)? {
        return Ok(Some(value));
    }
    if depth >= MAX_DEPTH {
        return Ok(None);
    }
    let depth = depth + 1;

    let structural = match &expr.kind {
        ExprKind::Pow(base, exp) if exp.contains_var(var) => {
            // f^g = exp(g*log(f)) covers 1^∞, 0^0 and ∞^0
            let exponent = simplify(Expr::mul_expr(
                (**exp).clone(),
                Expr::func("log", (**base).clone()),
            ));
            value_at(&exponent, var, point, depth)?.map(f64::exp)
        }
        ExprKind::Pow(base, exp) => match exp.as_number() {
            Some(n) if n > 0.0 => value_at(base, var, point, depth)?.map(|b| b.powf(n)),
            _ => None,
        },
        ExprKind::FunctionCall { name, args } if args.len() == 1 => {
            function_limit(name, &args[0], var, point, depth)?
        }
        ExprKind::Sum(terms) => sum_limit(terms, var, point, depth)?,
        ExprKind::Product(factors) => return product_limit(expr, factors, var, point, depth),
        _ => None,
    };
    if let Some(value) = structural.filter(|v| !v.is_nan()) {
        return Ok(Some(value));
    }

    match as_quotient(expr) {
        Some((num, den)) => quotient_limit(num, den, var, point, depth),
        None => Ok(None),
    }
}

fn function_limit(
    name: &str,
    arg: &Expr,
    var: &str,
    point: f64,
    depth: usize,
) -> Result<Option<f64>, CalcError> {
    let Some(inner) = value_at(arg, var, point, depth)? else {
        return Ok(None);
    };
    // sign takes the value of the side the argument approaches from
    if name == "sign" && inner.abs() < ZERO_TOLERANCE {
        let side = arg.eval_f64(var, side_point(point))?;
        return Ok(signed(side, 1.0));
    }
    let def = Registry::get(name).ok_or_else(|| CalcError::UnknownFunction {
        name: name.to_string(),
    })?;
    Ok((def.eval)(&[inner]).filter(|v| !v.is_nan()))
}

/// `magnitude` carrying the sign of `side`; `None` when `side` has none
fn signed(side: f64, magnitude: f64) -> Option<f64> {
    if side > 0.0 {
        Some(magnitude)
    } else if side < 0.0 {
        Some(-magnitude)
    } else {
        None
    }
}

fn sum_limit(
    terms: &[Arc<Expr>],
    var: &str,
    point: f64,
    depth: usize,
) -> Result<Option<f64>, CalcError> {
    let mut total = 0.0;
    let (mut up, mut down) = (false, false);
    for term in terms {
        let Some(value) = value_at(term, var, point, depth)? else {
            return Ok(None);
        };
        up |= value == f64::INFINITY;
        down |= value == f64::NEG_INFINITY;
        total += value;
    }
    // ∞ - ∞ is left to the estimate
    Ok((!(up && down)).then_some(total))
}

/// Factor-wise limit, with `0*∞` turned into a quotient
fn product_limit(
    expr: &Expr,
    factors: &[Arc<Expr>],
    var: &str,
    point: f64,
    depth: usize,
) -> Result<Option<f64>, CalcError> {
    let mut values = Vec::with_capacity(factors.len());
    for factor in factors {
        match value_at(factor, var, point, depth)? {
            Some(value) => values.push(value),
            None => break,
        }
    }

    let split = if values.len() == factors.len() {
        let vanishing = values.iter().any(|v| v.abs() < ZERO_TOLERANCE);
        let unbounded = values.iter().any(|v| v.is_infinite());
        if !(vanishing && unbounded) {
            return Ok(Some(values.iter().product()));
        }
        // u*v with u -> 0 becomes v / u^-1
        as_quotient(expr).or_else(|| {
            let (zeros, rest): (Vec<_>, Vec<_>) = factors
                .iter()
                .zip(&values)
                .partition(|(_, v)| v.abs() < ZERO_TOLERANCE);
            let num = rest.into_iter().map(|(f, _)| Arc::clone(f)).collect();
            let den = zeros
                .into_iter()
                .map(|(f, _)| Expr::powf((**f).clone(), -1.0))
                .collect();
            Some((Expr::product_from_arcs(num), Expr::product(den)))
        })
    } else {
        as_quotient(expr)
    };

    match split {
        Some((num, den)) => quotient_limit(num, den, var, point, depth),
        None => Ok(None),
    }
}

/// Split a simplified expression into numerator and denominator
///
/// Factors raised to a negative number go below the line.
fn as_quotient(expr: &Expr) -> Option<(Expr, Expr)> {
    let inverted = |factor: &Arc<Expr>| match &factor.kind {
        ExprKind::Pow(base, exp) => exp
            .as_number()
            .filter(|n| *n < 0.0)
            .map(|n| Expr::powf((**base).clone(), -n)),
        _ => None,
    };

    match &expr.kind {
        ExprKind::Div(u, v) => Some(((**u).clone(), (**v).clone())),
        ExprKind::Pow(..) => {
            let den = inverted(&Arc::new(expr.clone()))?;
            Some((Expr::number(1.0), den))
        }
        ExprKind::Product(factors) => {
            let mut num = Vec::new();
            let mut den = Vec::new();
            for factor in factors {
                match inverted(factor) {
                    Some(d) => den.push(d),
                    None => num.push(Arc::clone(factor)),
                }
            }
            if den.is_empty() {
                return None;
            }
            Some((Expr::product_from_arcs(num), Expr::product(den)))
        }
        _ => None,
    }
}

/// Resolve `f/g`: L'Hôpital on `0/0` and `∞/∞`, signed infinity on `c/0`
fn quotient_limit(
    mut num: Expr,
    mut den: Expr,
    var: &str,
    point: f64,
    depth: usize,
) -> Result<Option<f64>, CalcError> {
    for step in 0..MAX_LHOPITAL_STEPS {
        let (Some(n), Some(d)) = (
            value_at(&num, var, point, depth)?,
            value_at(&den, var, point, depth)?,
        ) else {
            return Ok(None);
        };

        let both_zero = n.abs() < ZERO_TOLERANCE && d.abs() < ZERO_TOLERANCE;
        let both_infinite = n.is_infinite() && d.is_infinite();
        if !(both_zero || both_infinite) {
            if d.abs() >= ZERO_TOLERANCE {
                return Ok(Some(n / d).filter(|v| !v.is_nan()));
            }
            let side = side_point(point);
            let ratio = num.eval_f64(var, side)? / den.eval_f64(var, side)?;
            return Ok(signed(ratio, f64::INFINITY));
        }

        let ratio = simplify(Expr::div_expr(
            simplify(num.derive(var)?),
            simplify(den.derive(var)?),
        ));
        log::debug!("L'Hôpital step {}: {}", step + 1, ratio);
        match as_quotient(&ratio) {
            Some((n, d)) => (num, den) = (n, d),
            None => return value_at(&ratio, var, point, depth),
        }
    }
    Ok(None)
}

/// Right-sided numeric estimate
///
/// Accepts the last sample when consecutive samples agree, snapping values
/// that shrink geometrically to zero and near-integers to the integer, and
/// signed infinity when samples keep growing past a large bound.
fn numeric_limit(expr: &Expr, var: &str, point: f64) -> Result<Option<f64>, CalcError> {
    let samples = SAMPLE_OFFSETS
        .iter()
        .map(|h| expr.eval_f64(var, point + h))
        .collect::<Result<Vec<f64>, _>>()?;

    if samples.iter().any(|v| v.is_nan()) {
        return Ok(None);
    }

    let tail = &samples[samples.len() - 3..];
    let last = tail[2];
    let first_gap = (tail[0] - tail[1]).abs();
    let last_gap = (tail[1] - last).abs();
    let settled = last_gap <= first_gap && first_gap <= 1e-3 * (1.0 + last.abs());
    if settled {
        let vanishing =
            last.abs() < 1e-3 && tail.windows(2).all(|w| w[1].abs() < 0.5 * w[0].abs());
        if vanishing {
            return Ok(Some(0.0));
        }
        let rounded = last.round();
        return Ok(Some(if (last - rounded).abs() < 1e-6 {
            rounded
        } else {
            last
        }));
    }

    let diverging = tail.windows(2).all(|w| w[1].abs() > w[0].abs() * 2.0)
        && last.abs() > 1e6
        && tail.iter().all(|v| v.signum() == last.signum());
    if diverging {
        return Ok(Some(last.signum() * f64::INFINITY));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn limit_of(input: &str, point: f64) -> String {
        limit(&parse(input).expect("valid input"), "x", point)
            .expect("limit exists")
            .to_plain()
    }

    fn evaluated(input: &str, point: f64) -> LimitValue {
        evaluate_limit(&parse(input).expect("valid input"), "x", point).expect("limit exists")
    }

    #[test]
    fn test_direct_substitution() {
        assert_eq!(limit_of("x^2 + 1", 2.0), "5");
        assert_eq!(limit_of("cos(x)", 0.0), "1");
        assert!(!evaluated("x^2 + 1", 2.0).estimated);
    }

    #[test]
    fn test_removable_singularities() {
        assert_eq!(limit_of("sin(x)/x", 0.0), "1");
        assert_eq!(limit_of("(x^2 - 1)/(x - 1)", 1.0), "2");
        assert_eq!(limit_of("(1 - cos(x))/x^2", 0.0), "1/2");
    }

    #[test]
    fn test_pole_is_signed_infinity() {
        assert_eq!(limit_of("1/x", 0.0), "oo");
        assert_eq!(limit_of("-1/x", 0.0), "-oo");
    }

    #[test]
    fn test_jump_takes_right_value() {
        assert_eq!(limit_of("sign(x)", 0.0), "1");
        assert_eq!(limit_of("-sign(x)", 0.0), "-1");
        assert_eq!(limit_of("abs(x)/x", 0.0), "1");
        assert_eq!(limit_of("sign(x - 1)", 1.0), "1");
    }

    #[test]
    fn test_indeterminate_powers() {
        assert_eq!(limit_of("(1 + x)^(1/x)", 0.0), "E");
        assert_eq!(limit_of("x^x", 0.0), "1");
    }

    #[test]
    fn test_essential_singularity() {
        assert_eq!(limit_of("exp(-1/x)", 0.0), "0");
        assert_eq!(limit_of("exp(1/x)", 0.0), "oo");
    }

    #[test]
    fn test_zero_times_infinity() {
        for input in ["x*log(x)", "sin(x)*log(x)", "x^2*log(x)"] {
            let found = evaluated(input, 0.0);
            assert_eq!(found.value.to_plain(), "0", "{}", input);
            assert!(!found.estimated, "{}", input);
        }
    }

    #[test]
    fn test_numeric_estimate_is_flagged() {
        let found = evaluated("1/x - 1/sin(x)", 0.0);
        assert_eq!(found.value.to_plain(), "0");
        assert!(found.estimated);
    }

    #[test]
    fn test_constant_expression() {
        assert_eq!(limit_of("3", 7.0), "3");
    }

    #[test]
    fn test_oscillation_is_undetermined() {
        let err = limit(&parse("sin(1/x)").expect("valid input"), "x", 0.0).unwrap_err();
        assert!(matches!(err, CalcError::LimitUndetermined { .. }));
    }
}
