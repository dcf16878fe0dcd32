//! Calculus Problem Solver
//!
//! Turns the text of a photographed calculus problem into a worked answer.
//!
//! # Features
//! - OCR text cleanup and problem classification (derivative, integral, limit, expression)
//! - Expression parsing with implicit multiplication (`2x`, `3(x+1)`)
//! - Symbolic differentiation, integration and limits
//! - Extensible rule-based simplification framework
//! - Step-by-step explanation traces and comparison plots
//!
//! # Usage Examples
//!
//! ## Solving recognized text
//! ```no_run
//! use snapcalc::{Solver, SolverConfig};
//!
//! let solver = Solver::new(SolverConfig::default());
//! let result = solver.solve_text("d/dx x^2").unwrap();
//! assert_eq!(result.steps.last().unwrap(), "Result: 2*x");
//! ```
//!
//! ## Working with expressions
//! ```
//! use snapcalc::{parse, simplify};
//!
//! let expr = parse("x^3 + sin(x)").unwrap();
//! let derivative = simplify(expr.derive("x").unwrap());
//! assert_eq!(derivative.to_plain(), "3*x**2 + cos(x)");
//! ```

mod classify;
pub mod config;
mod core;
mod differentiation;
mod error;
mod extract;
pub mod functions;
mod integration;
mod limits;
pub mod ocr;
mod parser;
mod plot;
mod simplification;
mod solver;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use classify::{ProblemType, classify};
pub use config::{Config, LogLevel, LoggingConfig, OcrConfig, SolverConfig};
pub use crate::core::{Expr, ExprKind};
pub use error::{
    CalcError, ConfigError, FailureCategory, OcrError, PlotError, SolveError, Span,
};
pub use extract::{Extraction, LimitPoint, extract};
pub use integration::integrate;
pub use limits::{LimitValue, evaluate_limit, limit};
pub use ocr::{ImageSolution, TesseractCli, TextRecognizer, clean_ocr_text, solve_image};
pub use parser::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, parse};
pub use plot::{PlotConfig, Plotter};
pub use simplification::{Simplifier, simplify};
pub use solver::{PlotNaming, SolveResult, Solver};
