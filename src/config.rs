//! Configuration for the solver, the OCR backend and logging
//!
//! Sources, highest priority first:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`SNAPCALC_*`)
//! 3. A TOML file (`--config`, `SNAPCALC_CONFIG` or `./snapcalc.toml`)
//! 4. Built-in defaults

use crate::error::ConfigError;
use crate::plot::PlotConfig;
use crate::simplification::engine::DEFAULT_MAX_ITERATIONS;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "snapcalc.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub ocr: OcrConfig,
    pub logging: LoggingConfig,
}

/// Solver and plot output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Directory that receives the comparison plots
    pub output_dir: PathBuf,
    /// Name of the free variable
    pub variable: String,
    /// Appended to plot file names (`<type>-<tag>.png`) when set
    pub plot_tag: Option<String>,
    /// Simplifier pass limit
    pub max_iterations: usize,
    /// Wall-clock budget per simplification, in milliseconds
    pub simplify_timeout_ms: Option<u64>,
    /// Keep `x/x` and `exp(log(x))` instead of cancelling them
    pub domain_safe: bool,
    pub plot: PlotConfig,
}

/// Text recognition backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract executable name or path
    pub tesseract: PathBuf,
    /// Tesseract language code (`eng`, `deu`, ...)
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static").join("plots"),
            variable: "x".to_string(),
            plot_tag: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            simplify_timeout_ms: None,
            domain_safe: false,
            plot: PlotConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn simplify_timeout(&self) -> Option<Duration> {
        self.simplify_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract: PathBuf::from("tesseract"),
            language: None,
        }
    }
}

impl Config {
    /// Load from the first config file found, then apply the environment
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match Self::locate(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::debug!("no configuration file found, using defaults");
                Config::default()
            }
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var("SNAPCALC_CONFIG") {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `SNAPCALC_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SNAPCALC_OUTPUT_DIR") {
            self.solver.output_dir = PathBuf::from(dir);
        }
        if let Some(font) = lookup("SNAPCALC_FONT") {
            self.solver.plot.font = Some(PathBuf::from(font));
        }
        if let Some(program) = lookup("SNAPCALC_TESSERACT") {
            self.ocr.tesseract = PathBuf::from(program);
        }
        if let Some(lang) = lookup("SNAPCALC_LANG") {
            self.ocr.language = Some(lang);
        }
        if let Some(level) = lookup("SNAPCALC_LOG_LEVEL") {
            match LogLevel::from_str(&level, true) {
                Ok(level) => self.logging.level = level,
                Err(_) => log::warn!("ignoring invalid SNAPCALC_LOG_LEVEL '{}'", level),
            }
        }
    }
}
