use std::fmt;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors raised while parsing text or running a symbolic operation
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    // Input validation errors
    EmptyFormula,
    InvalidSyntax {
        msg: String,
        span: Option<Span>,
    },

    // Parsing errors
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },
    InvalidToken {
        token: String,
        span: Option<Span>,
    },
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    UnexpectedEndOfInput,
    UnbalancedParentheses {
        span: Option<Span>,
    },
    AmbiguousSequence {
        sequence: String,
        suggestion: String,
        span: Option<Span>,
    },

    // Semantic errors
    UnsupportedOperation(String),
    UnboundSymbol {
        name: String,
    },
    UnknownFunction {
        name: String,
    },
    NoAntiderivative {
        integrand: String,
    },
    LimitUndetermined {
        expr: String,
        point: f64,
    },
    InvalidLimitPoint {
        value: String,
    },

    // Safety limits
    MaxDepthExceeded,
    MaxNodesExceeded,
}

impl CalcError {
    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        CalcError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    /// True for errors raised before any symbolic work started
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CalcError::EmptyFormula
                | CalcError::InvalidSyntax { .. }
                | CalcError::InvalidNumber { .. }
                | CalcError::InvalidToken { .. }
                | CalcError::UnexpectedToken { .. }
                | CalcError::UnexpectedEndOfInput
                | CalcError::UnbalancedParentheses { .. }
                | CalcError::AmbiguousSequence { .. }
                | CalcError::MaxDepthExceeded
                | CalcError::MaxNodesExceeded
        )
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::EmptyFormula => write!(f, "Formula cannot be empty"),
            CalcError::InvalidSyntax { msg, span } => {
                write!(f, "Invalid syntax: {}{}", msg, span_suffix(span))
            }
            CalcError::InvalidNumber { value, span } => {
                write!(
                    f,
                    "Invalid number format: '{}'{}",
                    value,
                    span_suffix(span)
                )
            }
            CalcError::InvalidToken { token, span } => {
                write!(f, "Invalid token: '{}'{}", token, span_suffix(span))
            }
            CalcError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Expected '{}', but got '{}'{}",
                    expected,
                    got,
                    span_suffix(span)
                )
            }
            CalcError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            CalcError::UnbalancedParentheses { span } => {
                write!(f, "Unmatched closing parenthesis{}", span_suffix(span))
            }
            CalcError::AmbiguousSequence {
                sequence,
                suggestion,
                span,
            } => {
                write!(
                    f,
                    "Ambiguous identifier sequence '{}': {}.{} \
                     Consider using explicit multiplication (e.g., 'x*y').",
                    sequence,
                    suggestion,
                    span_suffix(span)
                )
            }
            CalcError::UnsupportedOperation(msg) => {
                write!(f, "Unsupported operation: {}", msg)
            }
            CalcError::UnboundSymbol { name } => {
                write!(f, "Symbol '{}' has no numeric value", name)
            }
            CalcError::UnknownFunction { name } => write!(f, "Unknown function '{}'", name),
            CalcError::NoAntiderivative { integrand } => {
                write!(f, "No closed-form antiderivative found for {}", integrand)
            }
            CalcError::LimitUndetermined { expr, point } => {
                write!(f, "Could not determine the limit of {} at {}", expr, point)
            }
            CalcError::InvalidLimitPoint { value } => {
                write!(f, "could not convert string to float: '{}'", value)
            }
            CalcError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            CalcError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count limit")
            }
        }
    }
}

impl std::error::Error for CalcError {}

/// Failure of the text recognition backend
#[derive(Debug)]
pub enum OcrError {
    /// The recognizer executable could not be started
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The recognizer ran but reported failure
    Failed { status: String, stderr: String },
    /// Writing the image or reading the text failed
    Io(std::io::Error),
}

impl fmt::Display for OcrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrError::Spawn { program, source } => {
                write!(f, "could not start '{}': {}", program, source)
            }
            OcrError::Failed { status, stderr } => {
                write!(f, "recognizer exited with {}: {}", status, stderr.trim())
            }
            OcrError::Io(e) => write!(f, "recognizer I/O failed: {}", e),
        }
    }
}

impl std::error::Error for OcrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OcrError::Spawn { source, .. } => Some(source),
            OcrError::Io(e) => Some(e),
            OcrError::Failed { .. } => None,
        }
    }
}

impl From<std::io::Error> for OcrError {
    fn from(e: std::io::Error) -> Self {
        OcrError::Io(e)
    }
}

/// Failure while sampling or rendering a comparison plot
#[derive(Debug)]
pub enum PlotError {
    /// The output directory could not be created
    Io(std::io::Error),
    /// An expression could not be evaluated numerically
    Evaluation(CalcError),
    /// The drawing backend failed
    Render(String),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotError::Io(e) => write!(f, "could not prepare plot directory: {}", e),
            PlotError::Evaluation(e) => write!(f, "{}", e),
            PlotError::Render(msg) => write!(f, "plot rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<std::io::Error> for PlotError {
    fn from(e: std::io::Error) -> Self {
        PlotError::Io(e)
    }
}

impl From<CalcError> for PlotError {
    fn from(e: CalcError) -> Self {
        PlotError::Evaluation(e)
    }
}

/// Failure while loading the configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// The two kinds of failure a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Nothing usable was read from the image
    Input,
    /// Extraction, parsing, solving or plotting failed
    Solve,
}

/// Error returned by the solving pipeline
///
/// Root causes are collapsed into a message so callers only branch on the
/// category, never on the underlying error type.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// OCR produced no text after cleaning
    NoText,
    /// The text recognition backend failed
    Recognition(String),
    /// Extraction, parsing or symbolic evaluation failed
    Solve(String),
    /// The comparison plot could not be produced
    Plot(String),
}

impl SolveError {
    pub fn category(&self) -> FailureCategory {
        match self {
            SolveError::NoText | SolveError::Recognition(_) => FailureCategory::Input,
            SolveError::Solve(_) | SolveError::Plot(_) => FailureCategory::Solve,
        }
    }

    /// The underlying message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            SolveError::NoText => "OCR could not read any text from the image.",
            SolveError::Recognition(msg) | SolveError::Solve(msg) | SolveError::Plot(msg) => msg,
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NoText => write!(f, "{}", self.message()),
            SolveError::Recognition(msg) => write!(f, "OCR failed: {}", msg),
            SolveError::Solve(msg) => write!(f, "Could not parse expression: {}", msg),
            SolveError::Plot(msg) => write!(f, "Could not plot expression: {}", msg),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<CalcError> for SolveError {
    fn from(e: CalcError) -> Self {
        SolveError::Solve(e.to_string())
    }
}

impl From<PlotError> for SolveError {
    fn from(e: PlotError) -> Self {
        match e {
            // Unbound symbols surface as a solve failure, not a rendering one
            PlotError::Evaluation(inner) => SolveError::Solve(inner.to_string()),
            other => SolveError::Plot(other.to_string()),
        }
    }
}

impl From<OcrError> for SolveError {
    fn from(e: OcrError) -> Self {
        SolveError::Recognition(e.to_string())
    }
}
