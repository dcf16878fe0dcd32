//! Display implementations for expressions.
//!
//! Three output formats share one formatter:
//!
//! ## Standard Display (`to_string()` / `{}`)
//! - `x^2 + 2*x + 1`
//! - `sin(x)/x`
//!
//! ## Unicode Format (`to_unicode()`)
//! Typeset-like display used in explanation steps:
//! - `x² + 2·x + 1`
//! - `√x`, `π`, `|x|`
//!
//! ## Plain Format (`to_plain()`)
//! Single-line form with `**` powers, used for final results:
//! - `x**2/2`
//! - `5*x`
//!
//! Products with negative powers are printed as fractions (`x^-1` shows as
//! `1/x`), and rational coefficients are split across numerator and
//! denominator (`0.5*x^2` shows as `x^2/2`). `E^x` always shows as `exp(x)`.

use crate::core::known_symbols as ks;
use crate::core::traits::{EPSILON, as_fraction, as_integer};
use crate::{Expr, ExprKind};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormatMode {
    Standard,
    Unicode,
    Plain,
}

impl FormatMode {
    fn mul(self) -> &'static str {
        match self {
            FormatMode::Standard | FormatMode::Plain => "*",
            FormatMode::Unicode => "\u{b7}",
        }
    }

    fn minus(self) -> &'static str {
        match self {
            FormatMode::Standard | FormatMode::Plain => "-",
            FormatMode::Unicode => "\u{2212}",
        }
    }

    fn pow(self) -> &'static str {
        match self {
            FormatMode::Standard | FormatMode::Unicode => "^",
            FormatMode::Plain => "**",
        }
    }
}

/// Wrapper that renders an expression in a given mode
struct Render<'a> {
    expr: &'a Expr,
    mode: FormatMode,
}

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_expr(f, self.expr, self.mode)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_expr(f, self, FormatMode::Standard)
    }
}

impl Expr {
    /// Typeset-like rendering with Unicode superscripts and symbols
    pub fn to_unicode(&self) -> String {
        Render {
            expr: self,
            mode: FormatMode::Unicode,
        }
        .to_string()
    }

    /// Plain single-line rendering with `*` and `**`
    pub fn to_plain(&self) -> String {
        Render {
            expr: self,
            mode: FormatMode::Plain,
        }
        .to_string()
    }
}

// =============================================================================
// NUMBERS AND SYMBOLS
// =============================================================================

fn format_number(n: f64, mode: FormatMode) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        let sign = if n < 0.0 { mode.minus() } else { "" };
        let inf = match mode {
            FormatMode::Standard => "inf",
            FormatMode::Plain => "oo",
            FormatMode::Unicode => "\u{221e}",
        };
        return format!("{sign}{inf}");
    }
    let sign = if n < 0.0 { mode.minus() } else { "" };
    match as_fraction(n.abs()) {
        Some((p, 1)) => format!("{sign}{p}"),
        Some((p, q)) => format!("{sign}{p}/{q}"),
        None => format!("{sign}{}", n.abs()),
    }
}

fn format_symbol(name: &str, mode: FormatMode) -> &str {
    match (name, mode) {
        (ks::PI, FormatMode::Unicode) => "\u{3c0}",
        (ks::EULER, FormatMode::Standard | FormatMode::Unicode) => "e",
        _ => name,
    }
}

fn superscript(text: &str) -> Option<String> {
    text.chars()
        .map(|c| match c {
            '0' => Some('\u{2070}'),
            '1' => Some('\u{b9}'),
            '2' => Some('\u{b2}'),
            '3' => Some('\u{b3}'),
            '4' => Some('\u{2074}'),
            '5' => Some('\u{2075}'),
            '6' => Some('\u{2076}'),
            '7' => Some('\u{2077}'),
            '8' => Some('\u{2078}'),
            '9' => Some('\u{2079}'),
            '-' => Some('\u{207b}'),
            _ => None,
        })
        .collect()
}

// =============================================================================
// PARENTHESIS CONTEXTS
// =============================================================================

/// Check if the expression renders as something that is not a simple fraction
fn is_fractional_number(n: f64) -> bool {
    as_integer(n).is_none()
}

fn needs_parens_as_base(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Sum(_) | ExprKind::Product(_) | ExprKind::Div(_, _) | ExprKind::Pow(_, _) => {
            true
        }
        ExprKind::Number(n) => *n < 0.0 || is_fractional_number(*n),
        _ => false,
    }
}

fn needs_parens_as_factor(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Sum(_) | ExprKind::Div(_, _) => true,
        ExprKind::Number(n) => *n < 0.0,
        _ => false,
    }
}

fn write_wrapped(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    mode: FormatMode,
    wrap: bool,
) -> fmt::Result {
    if wrap {
        write!(f, "(")?;
        format_expr(f, expr, mode)?;
        write!(f, ")")
    } else {
        format_expr(f, expr, mode)
    }
}

// =============================================================================
// NODE FORMATTERS
// =============================================================================

fn format_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, mode: FormatMode) -> fmt::Result {
    match &expr.kind {
        ExprKind::Number(n) => write!(f, "{}", format_number(*n, mode)),
        ExprKind::Symbol(name) => write!(f, "{}", format_symbol(name, mode)),
        ExprKind::FunctionCall { name, args } => format_function(f, name, args, mode),
        ExprKind::Sum(terms) => format_sum(f, terms, mode),
        ExprKind::Product(factors) => format_product(f, factors, mode),
        ExprKind::Div(u, v) => format_div(f, u, v, mode),
        ExprKind::Pow(u, v) => format_pow(f, u, v, mode),
    }
}

fn format_function(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    args: &[Arc<Expr>],
    mode: FormatMode,
) -> fmt::Result {
    if mode == FormatMode::Unicode && args.len() == 1 {
        match name {
            "abs" => return write!(f, "|{}|", Render { expr: &args[0], mode }),
            "sqrt" => return format_root(f, &args[0], mode),
            _ => {}
        }
    }

    let shown = match (name, mode) {
        ("abs", FormatMode::Plain) => "Abs",
        _ => name,
    };
    write!(f, "{shown}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        format_expr(f, arg, mode)?;
    }
    write!(f, ")")
}

fn format_root(f: &mut fmt::Formatter<'_>, base: &Expr, mode: FormatMode) -> fmt::Result {
    match mode {
        FormatMode::Unicode => {
            let atomic = matches!(base.kind, ExprKind::Symbol(_))
                || base.as_number().is_some_and(|n| n >= 0.0);
            write!(f, "\u{221a}")?;
            write_wrapped(f, base, mode, !atomic)
        }
        FormatMode::Standard | FormatMode::Plain => {
            write!(f, "sqrt(")?;
            format_expr(f, base, mode)?;
            write!(f, ")")
        }
    }
}

/// Return the positive counterpart of a term that prints with a leading minus
fn extract_negative(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Number(n) if *n < 0.0 => Some(Expr::number(-*n)),
        ExprKind::Product(factors) => {
            let coeff = factors.first()?.as_number()?;
            if coeff >= 0.0 {
                return None;
            }
            let mut new_factors: Vec<Arc<Expr>> = Vec::with_capacity(factors.len());
            new_factors.push(Arc::new(Expr::number(-coeff)));
            new_factors.extend_from_slice(&factors[1..]);
            Some(Expr::product_from_arcs(new_factors))
        }
        _ => None,
    }
}

fn format_sum(f: &mut fmt::Formatter<'_>, terms: &[Arc<Expr>], mode: FormatMode) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }

    // A negated leading term gives way to the first positive one: `1 - x`
    let mut ordered: Vec<&Arc<Expr>> = terms.iter().collect();
    if extract_negative(&terms[0]).is_some()
        && let Some(j) = terms.iter().position(|t| extract_negative(t).is_none())
    {
        let positive = ordered.remove(j);
        ordered.insert(0, positive);
    }

    let minus = mode.minus();
    for (i, term) in ordered.into_iter().enumerate() {
        let negative = extract_negative(term);
        match (i, &negative) {
            (0, Some(_)) => write!(f, "{minus}")?,
            (0, None) => {}
            (_, Some(_)) => write!(f, " {minus} ")?,
            (_, None) => write!(f, " + ")?,
        }
        let shown = negative.as_ref().unwrap_or(term);
        write_wrapped(f, shown, mode, matches!(shown.kind, ExprKind::Sum(_)))?;
    }
    Ok(())
}

/// Split a negative-exponent factor into its denominator form
fn as_denominator(factor: &Expr) -> Option<Expr> {
    if let ExprKind::Pow(base, exp) = &factor.kind
        && let Some(n) = exp.as_number()
        && n < 0.0
    {
        if (n + 1.0).abs() < EPSILON {
            return Some(Expr::unwrap_arc(Arc::clone(base)));
        }
        return Some(Expr::pow_from_arcs(
            Arc::clone(base),
            Arc::new(Expr::number(-n)),
        ));
    }
    None
}

fn join_factors(
    f: &mut fmt::Formatter<'_>,
    coefficient: Option<String>,
    factors: &[Expr],
    mode: FormatMode,
) -> fmt::Result {
    let mut first = true;
    if let Some(c) = coefficient {
        write!(f, "{c}")?;
        first = false;
    }
    for factor in factors {
        if !first {
            write!(f, "{}", mode.mul())?;
        }
        write_wrapped(f, factor, mode, needs_parens_as_factor(factor))?;
        first = false;
    }
    if first {
        write!(f, "1")?;
    }
    Ok(())
}

fn format_product(
    f: &mut fmt::Formatter<'_>,
    factors: &[Arc<Expr>],
    mode: FormatMode,
) -> fmt::Result {
    if factors.is_empty() {
        return write!(f, "1");
    }

    let (coeff, rest) = match factors[0].as_number() {
        Some(c) => (c, &factors[1..]),
        None => (1.0, factors),
    };

    let mut numerator: Vec<Expr> = Vec::with_capacity(rest.len());
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in rest {
        match as_denominator(factor) {
            Some(d) => denominator.push(d),
            None => numerator.push((**factor).clone()),
        }
    }

    if coeff < 0.0 {
        write!(f, "{}", mode.minus())?;
    }

    // Coefficient as p/q: p joins the numerator, q the denominator
    let magnitude = coeff.abs();
    let (num_coeff, den_coeff) = match as_fraction(magnitude) {
        Some((p, q)) => {
            let p_text = (p != 1).then(|| p.to_string());
            let q_text = (q != 1).then(|| q.to_string());
            (p_text, q_text)
        }
        None => (Some(format_number(magnitude, mode)), None),
    };

    join_factors(f, num_coeff, &numerator, mode)?;

    let den_count = denominator.len() + usize::from(den_coeff.is_some());
    if den_count == 0 {
        return Ok(());
    }
    write!(f, "/")?;
    if den_count > 1 {
        write!(f, "(")?;
        join_factors(f, den_coeff, &denominator, mode)?;
        write!(f, ")")
    } else if let Some(q) = den_coeff {
        write!(f, "{q}")
    } else {
        let only = &denominator[0];
        write_wrapped(
            f,
            only,
            mode,
            matches!(only.kind, ExprKind::Sum(_) | ExprKind::Product(_) | ExprKind::Div(..)),
        )
    }
}

fn format_div(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    write_wrapped(f, u, mode, matches!(u.kind, ExprKind::Sum(_) | ExprKind::Div(..)))?;
    write!(f, "/")?;
    let denom_simple = match &v.kind {
        ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } | ExprKind::Pow(_, _) => true,
        ExprKind::Number(n) => *n >= 0.0 && !is_fractional_number(*n),
        _ => false,
    };
    write_wrapped(f, v, mode, !denom_simple)
}

fn format_pow(f: &mut fmt::Formatter<'_>, u: &Expr, v: &Expr, mode: FormatMode) -> fmt::Result {
    if let ExprKind::Symbol(s) = &u.kind
        && s.as_ref() == ks::EULER
    {
        write!(f, "exp(")?;
        format_expr(f, v, mode)?;
        return write!(f, ")");
    }

    if let Some(n) = v.as_number() {
        if (n - 0.5).abs() < EPSILON {
            return format_root(f, u, mode);
        }
        if n < 0.0 {
            // Standalone negative power reads as a fraction
            write!(f, "1/")?;
            let positive = if (n + 1.0).abs() < EPSILON {
                u.clone()
            } else {
                Expr::pow(u.clone(), Expr::number(-n))
            };
            let wrap = matches!(
                positive.kind,
                ExprKind::Sum(_) | ExprKind::Product(_) | ExprKind::Div(..)
            );
            return write_wrapped(f, &positive, mode, wrap);
        }
    }

    write_wrapped(f, u, mode, needs_parens_as_base(u))?;

    if mode == FormatMode::Unicode
        && let Some(n) = v.as_number().and_then(as_integer)
        && let Some(sup) = superscript(&n.to_string())
    {
        return write!(f, "{sup}");
    }

    write!(f, "{}", mode.pow())?;
    let exponent_simple = match &v.kind {
        ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => true,
        ExprKind::Number(n) => *n >= 0.0 && !is_fractional_number(*n),
        _ => false,
    };
    write_wrapped(f, v, mode, !exponent_simple)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_standard_polynomial() {
        let e = Expr::sum(vec![
            Expr::powf(x(), 2.0),
            Expr::product(vec![Expr::number(2.0), x()]),
            Expr::number(1.0),
        ]);
        assert_eq!(e.to_string(), "x^2 + 2*x + 1");
        assert_eq!(e.to_plain(), "x**2 + 2*x + 1");
        assert_eq!(e.to_unicode(), "x\u{b2} + 2\u{b7}x + 1");
    }

    #[test]
    fn test_rational_coefficient_as_fraction() {
        let e = Expr::product(vec![Expr::number(0.5), Expr::powf(x(), 2.0)]);
        assert_eq!(e.to_plain(), "x**2/2");
        let third = Expr::product(vec![Expr::number(2.0 / 3.0), x()]);
        assert_eq!(third.to_plain(), "2*x/3");
    }

    #[test]
    fn test_negative_power_in_product() {
        let e = Expr::product(vec![Expr::func("sin", x()), Expr::powf(x(), -1.0)]);
        assert_eq!(e.to_plain(), "sin(x)/x");
        let two = Expr::product(vec![Expr::number(3.0), Expr::powf(x(), -2.0)]);
        assert_eq!(two.to_plain(), "3/x**2");
    }

    #[test]
    fn test_subtraction() {
        let e = Expr::sub_expr(x(), Expr::func("cos", x()));
        assert_eq!(e.to_string(), "x - cos(x)");
        let lead = Expr::negate(Expr::func("cos", x()));
        assert_eq!(lead.to_plain(), "-cos(x)");
        assert_eq!(lead.to_unicode(), "\u{2212}cos(x)");
    }

    #[test]
    fn test_positive_term_leads() {
        let e = Expr::sum(vec![Expr::negate(x()), Expr::number(1.0)]);
        assert_eq!(e.to_plain(), "1 - x");
        let log = Expr::negate(Expr::func("log", e));
        assert_eq!(log.to_plain(), "-log(1 - x)");
        let all_negative = Expr::sum(vec![Expr::negate(x()), Expr::number(-1.0)]);
        assert_eq!(all_negative.to_plain(), "-x - 1");
    }

    #[test]
    fn test_special_forms() {
        assert_eq!(Expr::powf(x(), 0.5).to_plain(), "sqrt(x)");
        assert_eq!(Expr::powf(x(), 0.5).to_unicode(), "\u{221a}x");
        assert_eq!(
            Expr::pow(Expr::symbol("E"), x()).to_plain(),
            "exp(x)"
        );
        assert_eq!(Expr::symbol("pi").to_unicode(), "\u{3c0}");
        assert_eq!(Expr::func("abs", x()).to_plain(), "Abs(x)");
        assert_eq!(Expr::number(f64::INFINITY).to_plain(), "oo");
        assert_eq!(Expr::number(-0.5).to_plain(), "-1/2");
    }

    #[test]
    fn test_power_of_sum_parenthesized() {
        let e = Expr::powf(Expr::sum(vec![x(), Expr::number(1.0)]), 3.0);
        assert_eq!(e.to_plain(), "(x + 1)**3");
        let frac = Expr::powf(x(), 1.0 / 3.0);
        assert_eq!(frac.to_plain(), "x**(1/3)");
    }

    #[test]
    fn test_raw_division() {
        let e = Expr::div_expr(Expr::func("sin", x()), x());
        assert_eq!(e.to_string(), "sin(x)/x");
        let sum_over = Expr::div_expr(Expr::sum(vec![x(), Expr::number(1.0)]), Expr::number(2.0));
        assert_eq!(sum_over.to_string(), "(x + 1)/2");
    }
}
