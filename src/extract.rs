//! Pull the expression source (and limit point) out of recognized text
//!
//! Each problem type has one fixed rule; see [`extract`].

use crate::{CalcError, ProblemType};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static INTEGRAL_MARKER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)int|∫"));

fn invalid_pattern(e: &regex::Error) -> CalcError {
    CalcError::UnsupportedOperation(format!("invalid pattern: {}", e))
}

/// Markers that name the free variable: `d/dx`, `dx` and `x->`
struct VariableMarkers {
    derivative: Regex,
    differential: Regex,
    limit_point: Regex,
}

impl VariableMarkers {
    fn new(var: &str) -> Result<Self, CalcError> {
        let var = regex::escape(var);
        let build = |pattern: String| Regex::new(&pattern).map_err(|e| invalid_pattern(&e));
        Ok(Self {
            derivative: build(format!("(?i)d/d{}", var))?,
            differential: build(format!("(?i)d{}", var))?,
            limit_point: build(format!(r"(?i)(?:limit|lim).*?{}->([0-9+-]+)", var))?,
        })
    }
}

/// Where a limit is taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitPoint {
    /// Read from an `x-><number>` marker
    Parsed(f64),
    /// No marker in the text; the limit is taken at zero
    Defaulted,
}

impl LimitPoint {
    pub fn value(self) -> f64 {
        match self {
            LimitPoint::Parsed(v) => v,
            LimitPoint::Defaulted => 0.0,
        }
    }
}

impl fmt::Display for LimitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug formatting keeps the trailing ".0" of whole numbers
            LimitPoint::Parsed(v) => write!(f, "{:?}", v),
            LimitPoint::Defaulted => f.write_str("0"),
        }
    }
}

/// The part of the text a problem type operates on
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Text handed to the parser
    pub source: String,
    /// Set for limit problems only
    pub limit_point: Option<LimitPoint>,
}

/// Apply the extraction rule for `problem` to `text`
///
/// With `var = "x"`:
/// - derivative: everything after the last `d/dx`, or the whole text
/// - integral: between the last `int`/`∫` and the first `dx` after it
/// - limit: everything after the last `" of "`; the point comes from an
///   `x-><number>` marker following `lim`/`limit`
/// - expression: the whole text
///
/// Marker matching is case-insensitive except for `" of "`.
///
/// # Errors
/// `CalcError::InvalidLimitPoint` when the captured point is not a number
/// (for example `x->+-`).
pub fn extract(problem: ProblemType, text: &str, var: &str) -> Result<Extraction, CalcError> {
    let markers = VariableMarkers::new(var)?;
    let last_segment = |re: &Regex, s: &str| -> String {
        re.split(s).last().unwrap_or(s).to_string()
    };

    let extraction = match problem {
        ProblemType::Derivative => Extraction {
            source: last_segment(&markers.derivative, text),
            limit_point: None,
        },
        ProblemType::Integral => {
            let integral_marker = INTEGRAL_MARKER.as_ref().map_err(invalid_pattern)?;
            let after_marker = last_segment(integral_marker, text);
            let integrand = markers
                .differential
                .split(&after_marker)
                .next()
                .unwrap_or_default()
                .to_string();
            Extraction {
                source: integrand,
                limit_point: None,
            }
        }
        ProblemType::Limit => {
            let point = match markers.limit_point.captures(text) {
                Some(caps) => {
                    let raw = caps.get(1).map_or("", |m| m.as_str());
                    let value = raw.parse::<f64>().map_err(|_| CalcError::InvalidLimitPoint {
                        value: raw.to_string(),
                    })?;
                    LimitPoint::Parsed(value)
                }
                None => LimitPoint::Defaulted,
            };
            Extraction {
                source: text.rsplit(" of ").next().unwrap_or(text).to_string(),
                limit_point: Some(point),
            }
        }
        ProblemType::Expression => Extraction {
            source: text.to_string(),
            limit_point: None,
        },
    };

    log::debug!("{} source: {:?}", problem, extraction.source);
    Ok(extraction)
}
