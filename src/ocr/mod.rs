//! Text recognition boundary
//!
//! Recognition itself is delegated to an external engine behind
//! [`TextRecognizer`]; this module cleans what comes back and feeds it to the
//! solver.

mod clean;

pub use clean::clean_ocr_text;

use crate::config::OcrConfig;
use crate::error::{OcrError, SolveError};
use crate::solver::{SolveResult, Solver};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Image bytes in, best-effort raw text out
pub trait TextRecognizer {
    /// Recognize the text in an encoded image (PNG, JPEG, ...)
    ///
    /// The text may be empty or garbled.
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// Runs the `tesseract` executable, piping the image through stdin
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: Option<String>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            language: None,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            program: config.tesseract.clone(),
            language: config.language.clone(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(["stdin", "stdout"]);
        if let Some(lang) = &self.language {
            command.args(["-l", lang.as_str()]);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let mut child = self.command().spawn().map_err(|source| OcrError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        // Tesseract reads the whole image before writing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image)?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        log::debug!("tesseract returned {} bytes of text", text.len());
        Ok(text)
    }
}

/// Outcome of solving an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSolution {
    /// Recognized text after cleaning
    pub text: String,
    #[serde(flatten)]
    pub result: SolveResult,
}

/// Recognize, clean, classify and solve
///
/// Text that is empty after cleaning is rejected with [`SolveError::NoText`]
/// before classification.
pub fn solve_image(
    image: &[u8],
    recognizer: &dyn TextRecognizer,
    solver: &Solver,
) -> Result<ImageSolution, SolveError> {
    let raw = recognizer.recognize(image)?;
    let text = clean_ocr_text(&raw);
    if text.is_empty() {
        log::warn!("no text recognized in {} byte image", image.len());
        return Err(SolveError::NoText);
    }
    log::info!("recognized text: {}", text);
    let result = solver.solve_text(&text)?;
    Ok(ImageSolution { text, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureCategory, PlotConfig, ProblemType, SolverConfig};

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    impl TextRecognizer for Broken {
        fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            Err(OcrError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "cannot read image".to_string(),
            })
        }
    }

    fn solver(dir: &std::path::Path) -> Solver {
        Solver::new(SolverConfig {
            output_dir: dir.to_path_buf(),
            plot: PlotConfig {
                samples: 50,
                width: 200,
                height: 150,
                ..PlotConfig::default()
            },
            ..SolverConfig::default()
        })
    }

    #[test]
    fn test_empty_text_is_input_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = solve_image(b"png", &FixedText(" \n !? "), &solver(dir.path())).unwrap_err();
        assert_eq!(err, SolveError::NoText);
        assert_eq!(err.category(), FailureCategory::Input);
    }

    #[test]
    fn test_recognizer_failure_is_input_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = solve_image(b"png", &Broken, &solver(dir.path())).unwrap_err();
        assert!(matches!(err, SolveError::Recognition(_)));
        assert_eq!(err.category(), FailureCategory::Input);
    }

    #[test]
    fn test_recognized_text_is_cleaned_and_solved() {
        let dir = tempfile::tempdir().expect("temp dir");
        let solution = solve_image(b"png", &FixedText("d/dx\nx^2\n"), &solver(dir.path()))
            .expect("solves");
        assert_eq!(solution.text, "d/dx x^2");
        assert_eq!(solution.result.problem, ProblemType::Derivative);
        assert_eq!(
            solution.result.steps.last().map(String::as_str),
            Some("Result: 2*x")
        );
    }

    #[test]
    fn test_missing_executable() {
        let err = TesseractCli::new("/nonexistent/tesseract-binary")
            .recognize(b"png")
            .unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));
    }

    #[test]
    fn test_command_arguments() {
        let command = TesseractCli::default().with_language("eng").command();
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["stdin", "stdout", "-l", "eng"]);
    }
}
