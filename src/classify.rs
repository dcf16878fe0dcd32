//! Problem type detection from keywords in the recognized text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of calculus problem a piece of text asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Derivative,
    Integral,
    Limit,
    Expression,
}

impl ProblemType {
    pub const ALL: [ProblemType; 4] = [
        ProblemType::Derivative,
        ProblemType::Integral,
        ProblemType::Limit,
        ProblemType::Expression,
    ];

    /// Lowercase name, as shown in the step trace
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemType::Derivative => "derivative",
            ProblemType::Integral => "integral",
            ProblemType::Limit => "limit",
            ProblemType::Expression => "expression",
        }
    }

    /// Fixed plot file name for this problem type
    pub fn plot_file_name(self) -> String {
        format!("{}.png", self.as_str())
    }

    /// Legend label of the second plotted curve
    pub fn result_label(self) -> &'static str {
        match self {
            ProblemType::Derivative => "f'(x)",
            ProblemType::Integral => "\u{222b}f(x)dx",
            ProblemType::Limit | ProblemType::Expression => "f(x)",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemType::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown problem type '{}', expected one of: derivative, integral, limit, expression",
                    s
                )
            })
    }
}

/// Detect the problem type from keywords
///
/// The checks run in a fixed order and the first hit wins, so text holding
/// both `int` and `lim` is an integral. Anything without a keyword is a plain
/// expression.
pub fn classify(text: &str) -> ProblemType {
    let lower = text.to_lowercase();
    if lower.contains("int") || text.contains('\u{222b}') {
        ProblemType::Integral
    } else if lower.contains("limit") || lower.contains("lim") {
        ProblemType::Limit
    } else if ["d/d", "derivative", "diff"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        ProblemType::Derivative
    } else {
        ProblemType::Expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(classify("d/dx x^2"), ProblemType::Derivative);
        assert_eq!(classify("derivative of x"), ProblemType::Derivative);
        assert_eq!(classify("diff sin(x)"), ProblemType::Derivative);
        assert_eq!(classify("int x dx"), ProblemType::Integral);
        assert_eq!(classify("\u{222b} x dx"), ProblemType::Integral);
        assert_eq!(classify("limit as x->0 of sin(x)/x"), ProblemType::Limit);
        assert_eq!(classify("2*x + 3*x"), ProblemType::Expression);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("INT x DX"), ProblemType::Integral);
        assert_eq!(classify("Lim x->1 of x"), ProblemType::Limit);
        assert_eq!(classify("D/DX x"), ProblemType::Derivative);
    }

    #[test]
    fn test_integral_wins_over_limit() {
        assert_eq!(classify("lim int x dx"), ProblemType::Integral);
        assert_eq!(classify("limit of int"), ProblemType::Integral);
    }

    #[test]
    fn test_limit_wins_over_derivative() {
        assert_eq!(classify("lim d/dx x"), ProblemType::Limit);
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for p in ProblemType::ALL {
            assert_eq!(p.to_string().parse::<ProblemType>(), Ok(p));
        }
        assert!("integration".parse::<ProblemType>().is_err());
    }

    #[test]
    fn test_plot_names_and_labels() {
        assert_eq!(ProblemType::Derivative.plot_file_name(), "derivative.png");
        assert_eq!(ProblemType::Expression.plot_file_name(), "expression.png");
        assert_eq!(ProblemType::Integral.result_label(), "\u{222b}f(x)dx");
        assert_eq!(ProblemType::Limit.result_label(), "f(x)");
    }
}
