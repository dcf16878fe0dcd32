//! Problem solving pipeline: extraction, parsing, the symbolic operation,
//! the step trace and the comparison plot.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::extract::{LimitPoint, extract};
use crate::integration::integrate;
use crate::limits::evaluate_limit;
use crate::parser::parse;
use crate::plot::Plotter;
use crate::simplification::Simplifier;
use crate::{Expr, ProblemType, classify};
use serde::Serialize;
use std::path::PathBuf;

/// How plot files are named inside the output directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlotNaming {
    /// `<type>.png`; concurrent solves of one type overwrite each other
    #[default]
    PerType,
    /// `<type>-<tag>.png` with a caller-supplied unique tag
    Tagged(String),
}

impl PlotNaming {
    pub fn file_name(&self, problem: ProblemType) -> String {
        match self {
            PlotNaming::PerType => problem.plot_file_name(),
            PlotNaming::Tagged(tag) => format!("{}-{}.png", problem, tag),
        }
    }
}

/// Answer to one problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub problem: ProblemType,
    /// Explanation trace in the order the work was done
    pub steps: Vec<String>,
    pub plot_path: PathBuf,
    /// Non-fatal observations, such as a defaulted limit point
    pub warnings: Vec<String>,
}

/// The expression plotted against the input, and the value reported as result
struct Outcome {
    result: Expr,
    plotted: Expr,
}

/// Solves classified problem text
///
/// Holds no state between calls besides configuration; the only side effect
/// is the plot file.
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
    plotter: Plotter,
    naming: PlotNaming,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        let plotter = Plotter::new(config.output_dir.clone(), config.plot.clone());
        let naming = config
            .plot_tag
            .clone()
            .map_or(PlotNaming::PerType, PlotNaming::Tagged);
        Self {
            config,
            plotter,
            naming,
        }
    }

    pub fn with_naming(mut self, naming: PlotNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Classify `text`, then solve it
    pub fn solve_text(&self, text: &str) -> Result<SolveResult, SolveError> {
        self.solve(classify(text), text)
    }

    /// Solve `text` as a problem of the given type
    ///
    /// # Errors
    /// Extraction, parse and evaluation failures all become
    /// [`SolveError::Solve`]; a rendering failure becomes [`SolveError::Plot`].
    pub fn solve(&self, problem: ProblemType, text: &str) -> Result<SolveResult, SolveError> {
        log::info!("solving {} problem: {}", problem, text);
        let var = self.config.variable.as_str();
        let mut steps = vec![format!("Detected problem type: {}", problem)];
        let mut warnings = Vec::new();

        let extraction = extract(problem, text, var)?;
        let expr = parse(&extraction.source)?;

        let outcome = match problem {
            ProblemType::Derivative => {
                steps.push(format!("Expression: {}", expr.to_unicode()));
                let derivative = self.simplify(expr.derive(var)?);
                steps.push(format!("Derivative: {}", derivative.to_unicode()));
                Outcome {
                    plotted: derivative.clone(),
                    result: derivative,
                }
            }
            ProblemType::Integral => {
                steps.push(format!("Integrand: {}", expr.to_unicode()));
                let antiderivative = integrate(&expr, var)?;
                steps.push(format!("Integral: {} + C", antiderivative.to_unicode()));
                Outcome {
                    plotted: antiderivative.clone(),
                    result: antiderivative,
                }
            }
            ProblemType::Limit => {
                let point = extraction.limit_point.unwrap_or(LimitPoint::Defaulted);
                if point == LimitPoint::Defaulted {
                    let message = format!("no limit point found, using {}->0", var);
                    log::warn!("{}", message);
                    warnings.push(message);
                }
                steps.push(format!("Expression: {}", expr.to_unicode()));
                let found = evaluate_limit(&expr, var, point.value())?;
                if found.estimated {
                    let message = format!("limit value {} is a numeric estimate", found.value);
                    log::warn!("{}", message);
                    warnings.push(message);
                }
                let value = found.value;
                steps.push(format!("Limit as {}-> {}: {}", var, point, value.to_unicode()));
                // A limit is a number, so the input is plotted against itself
                Outcome {
                    result: value,
                    plotted: expr.clone(),
                }
            }
            ProblemType::Expression => {
                steps.push(format!("Expression: {}", expr.to_unicode()));
                let simplified = self.simplify(expr.clone());
                steps.push(format!("Simplified: {}", simplified.to_unicode()));
                Outcome {
                    plotted: simplified.clone(),
                    result: simplified,
                }
            }
        };

        let plot_path = self.plotter.plot(
            &expr,
            &outcome.plotted,
            var,
            &self.naming.file_name(problem),
            problem.result_label(),
        )?;
        steps.push(format!("Result: {}", outcome.result.to_plain()));

        for step in &steps {
            log::debug!("step: {}", step);
        }
        Ok(SolveResult {
            problem,
            steps,
            plot_path,
            warnings,
        })
    }

    fn simplify(&self, expr: Expr) -> Expr {
        Simplifier::new()
            .with_max_iterations(self.config.max_iterations)
            .with_timeout(self.config.simplify_timeout())
            .with_domain_safe(self.config.domain_safe)
            .simplify(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlotConfig;

    fn quick_solver(dir: &std::path::Path) -> Solver {
        Solver::new(SolverConfig {
            output_dir: dir.to_path_buf(),
            plot: PlotConfig {
                samples: 40,
                width: 160,
                height: 120,
                ..PlotConfig::default()
            },
            ..SolverConfig::default()
        })
    }

    #[test]
    fn test_plot_naming() {
        assert_eq!(
            PlotNaming::PerType.file_name(ProblemType::Limit),
            "limit.png"
        );
        assert_eq!(
            PlotNaming::Tagged("42".into()).file_name(ProblemType::Integral),
            "integral-42.png"
        );
    }

    #[test]
    fn test_tag_from_config() {
        let solver = Solver::new(SolverConfig {
            plot_tag: Some("abc".into()),
            ..SolverConfig::default()
        });
        assert_eq!(solver.naming, PlotNaming::Tagged("abc".into()));
    }

    #[test]
    fn test_step_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = quick_solver(dir.path())
            .solve(ProblemType::Expression, "2*x + 3*x")
            .expect("solves");
        assert_eq!(
            result.steps,
            vec![
                "Detected problem type: expression",
                "Expression: 2\u{b7}x + 3\u{b7}x",
                "Simplified: 5\u{b7}x",
                "Result: 5*x",
            ]
        );
    }

    #[test]
    fn test_defaulted_limit_point_warns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = quick_solver(dir.path())
            .solve(ProblemType::Limit, "limit of x + 1")
            .expect("solves");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.steps.contains(&"Limit as x-> 0: 1".to_string()));
    }
}
