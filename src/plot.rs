//! Comparison plots of the input expression and the result
//!
//! Both expressions are sampled on an evenly spaced grid and drawn onto a PNG
//! with the plotters bitmap backend. Non-finite samples split a curve into
//! separate segments instead of being connected across.

use crate::error::PlotError;
use crate::{CalcError, Expr};
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Fonts tried when no font is configured
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Sampling grid and image settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Number of evenly spaced sample points
    pub samples: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// TrueType font for labels and legend
    pub font: Option<PathBuf>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            samples: 400,
            x_min: -5.0,
            x_max: 5.0,
            width: 640,
            height: 480,
            font: None,
        }
    }
}

/// Configured font path and the file registered for it
type FontState = Option<(Option<PathBuf>, Option<PathBuf>)>;

static LOADED_FONT: Mutex<FontState> = Mutex::new(None);

/// Register a font with plotters and return the file that was used
///
/// The configured font is tried first, then the well-known system fonts.
/// Registration is process-wide: asking again with the same configured path
/// reuses the earlier outcome, a different path registers again.
fn load_font(configured: Option<&Path>) -> Option<PathBuf> {
    let mut state = LOADED_FONT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some((key, loaded)) = state.as_ref()
        && key.as_deref() == configured
    {
        return loaded.clone();
    }

    let candidates = configured
        .into_iter()
        .map(Path::to_path_buf)
        .chain(FALLBACK_FONTS.iter().map(PathBuf::from));
    let mut loaded = None;
    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // plotters keeps registered font data for the life of the process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
            log::debug!("registered plot font {}", path.display());
            loaded = Some(path);
            break;
        }
        log::debug!("{} is not a usable font", path.display());
    }
    if loaded.is_none() {
        log::warn!("no usable font found; plots are drawn without labels or legend");
    } else if let Some(path) = configured
        && loaded.as_deref() != Some(path)
    {
        log::warn!("font {} could not be loaded, using a system font", path.display());
    }

    *state = Some((configured.map(Path::to_path_buf), loaded.clone()));
    loaded
}

/// Renders comparison plots into an output directory
#[derive(Debug, Clone)]
pub struct Plotter {
    output_dir: PathBuf,
    config: PlotConfig,
}

impl Plotter {
    pub fn new(output_dir: impl Into<PathBuf>, config: PlotConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Evaluate `expr` at every grid point
    ///
    /// Domain violations come back as non-finite values; unbound symbols fail.
    pub fn sample(&self, expr: &Expr, var: &str) -> Result<Vec<(f64, f64)>, CalcError> {
        let n = self.config.samples.max(2);
        let step = (self.config.x_max - self.config.x_min) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let x = self.config.x_min + step * i as f64;
                Ok((x, expr.eval_f64(var, x)?))
            })
            .collect()
    }

    /// Plot `expr` (legend `f(x)`) against `result` (legend `result_label`)
    ///
    /// Overwrites `<output_dir>/<output_name>` and returns its path.
    pub fn plot(
        &self,
        expr: &Expr,
        result: &Expr,
        var: &str,
        output_name: &str,
        result_label: &str,
    ) -> Result<PathBuf, PlotError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(output_name);

        let original = self.sample(expr, var)?;
        let computed = self.sample(result, var)?;
        self.draw(&path, &original, &computed, result_label)?;
        log::debug!("wrote plot {}", path.display());
        Ok(path)
    }

    fn draw(
        &self,
        path: &Path,
        original: &[(f64, f64)],
        computed: &[(f64, f64)],
        result_label: &str,
    ) -> Result<(), PlotError> {
        let (y_min, y_max) = y_range(original.iter().chain(computed).map(|&(_, y)| y));
        let with_text = load_font(self.config.font.as_deref()).is_some();

        let render = |e: &dyn std::fmt::Display| PlotError::Render(e.to_string());

        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| render(&e))?;

        let label_area = if with_text { 40 } else { 0 };
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(label_area)
            .y_label_area_size(label_area)
            .build_cartesian_2d(self.config.x_min..self.config.x_max, y_min..y_max)
            .map_err(|e| render(&e))?;

        if with_text {
            chart.configure_mesh().draw().map_err(|e| render(&e))?;
        } else {
            let grid = BLACK.mix(0.15);
            let xs = (0..=10).map(|i| {
                self.config.x_min + (self.config.x_max - self.config.x_min) * f64::from(i) / 10.0
            });
            let ys = (0..=8).map(|i| y_min + (y_max - y_min) * f64::from(i) / 8.0);
            chart
                .draw_series(
                    xs.map(|x| PathElement::new(vec![(x, y_min), (x, y_max)], grid))
                        .chain(ys.map(|y| {
                            PathElement::new(vec![(self.config.x_min, y), (self.config.x_max, y)], grid)
                        })),
                )
                .map_err(|e| render(&e))?;
        }

        for (points, label, color) in [
            (original, "f(x)", BLUE),
            (computed, result_label, RED),
        ] {
            let style = color.stroke_width(2);
            let series = chart
                .draw_series(
                    finite_segments(points)
                        .into_iter()
                        .map(|segment| PathElement::new(segment, style)),
                )
                .map_err(|e| render(&e))?;
            if with_text {
                series
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }

        if with_text {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| render(&e))?;
        }

        root.present().map_err(|e| render(&e))?;
        Ok(())
    }
}

/// Vertical range covering all finite samples, padded by 5%
fn y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    if (hi - lo).abs() < 1e-12 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Split a sampled curve at non-finite values
fn finite_segments(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    points
        .split(|(_, y)| !y.is_finite())
        .filter(|run| !run.is_empty())
        .map(<[(f64, f64)]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_sampling_grid() {
        let plotter = Plotter::new("unused", PlotConfig::default());
        let points = plotter
            .sample(&parse("x^2").expect("valid input"), "x")
            .expect("evaluable");
        assert_eq!(points.len(), 400);
        assert_eq!(points[0], (-5.0, 25.0));
        assert!((points[399].0 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_symbol_fails_sampling() {
        let plotter = Plotter::new("unused", PlotConfig::default());
        assert!(plotter.sample(&parse("a*x").expect("valid input"), "x").is_err());
    }

    #[test]
    fn test_segments_skip_gaps() {
        let points = [
            (0.0, 1.0),
            (1.0, f64::NAN),
            (2.0, 3.0),
            (3.0, 4.0),
            (4.0, f64::INFINITY),
        ];
        let segments = finite_segments(&points);
        assert_eq!(segments, vec![vec![(0.0, 1.0)], vec![(2.0, 3.0), (3.0, 4.0)]]);
    }

    #[test]
    fn test_y_range() {
        assert_eq!(y_range([f64::NAN].into_iter()), (-1.0, 1.0));
        assert_eq!(y_range([2.0, 2.0].into_iter()), (1.0, 3.0));
        let (lo, hi) = y_range([0.0, 10.0, f64::INFINITY].into_iter());
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_font_follows_configuration() {
        let dir = tempfile::tempdir().expect("temp dir");
        let broken = dir.path().join("broken.ttf");
        std::fs::write(&broken, b"not a font").expect("write font");
        let fallback = load_font(Some(&broken));
        assert_ne!(fallback.as_deref(), Some(broken.as_path()));

        // Only checkable where a system font exists
        if let Some(system) = fallback {
            let copy = dir.path().join("copy.ttf");
            std::fs::copy(&system, &copy).expect("copy font");
            assert_eq!(load_font(Some(&copy)), Some(copy.clone()));
            assert_eq!(load_font(Some(&copy)), Some(copy));
        }
    }

    #[test]
    fn test_plot_writes_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("nested").join("plots");
        let plotter = Plotter::new(&out, PlotConfig::default());
        let expr = parse("1/x").expect("valid input");
        let result = parse("log(x)").expect("valid input");
        let path = plotter
            .plot(&expr, &result, "x", "integral.png", "\u{222b}f(x)dx")
            .expect("plot renders");
        assert_eq!(path, out.join("integral.png"));
        let bytes = std::fs::read(&path).expect("file written");
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
