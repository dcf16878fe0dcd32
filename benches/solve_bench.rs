//! Solver Benchmarks
//!
//! Parsing, the symbolic operations, and a full text solve including the
//! plot file.

use criterion::{Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use snapcalc::{
    PlotConfig, ProblemType, Solver, SolverConfig, classify, clean_ocr_text, integrate, limit,
    parse, simplify,
};

// =============================================================================
// Inputs
// =============================================================================

const FORMULAS: &[(&str, &str)] = &[
    ("poly", "x^3 + 2x^2 + x"),
    ("trig", "sin(x)*cos(x)"),
    ("complex", "x^2*sin(x)*exp(x)"),
    ("nested", "sin(cos(tan(x)))"),
];

/// Polynomial with `n` terms: 1*x + 2*x^2 + ...
fn long_polynomial(n: usize) -> String {
    let mut s = String::with_capacity(n * 10);
    for i in 1..=n {
        if i > 1 {
            s.push_str(" + ");
        }
        let _ = write!(s, "{}*x^{}", i, i % 9 + 1);
    }
    s
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, formula) in FORMULAS {
        group.bench_function(*name, |b| b.iter(|| parse(black_box(formula))));
    }
    let long = long_polynomial(100);
    group.bench_function("poly_100_terms", |b| b.iter(|| parse(black_box(&long))));
    group.finish();
}

fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");

    for (name, formula) in FORMULAS {
        let Ok(expr) = parse(formula) else { continue };
        group.bench_function(format!("derive_{}", name), |b| {
            b.iter(|| expr.derive("x").map(simplify))
        });
    }

    let long = parse(&long_polynomial(50)).ok();
    if let Some(expr) = long {
        group.bench_function("simplify_poly_50_terms", |b| {
            b.iter(|| simplify(black_box(expr.clone())))
        });
    }

    for (name, formula) in [("power", "3x^4 - 2x + 7"), ("parts", "x^2*sin(x)")] {
        let Ok(expr) = parse(formula) else { continue };
        group.bench_function(format!("integrate_{}", name), |b| {
            b.iter(|| integrate(black_box(&expr), "x"))
        });
    }

    if let Ok(expr) = parse("(1 - cos(x))/x^2") {
        group.bench_function("limit_lhopital", |b| {
            b.iter(|| limit(black_box(&expr), "x", 0.0))
        });
    }
    group.finish();
}

fn bench_text_front(c: &mut Criterion) {
    let raw = "lim x->0 Of\nsin(x)/x  \u{2014} checked";
    c.bench_function("clean_and_classify", |b| {
        b.iter(|| classify(&clean_ocr_text(black_box(raw))))
    });
}

fn bench_full_solve(c: &mut Criterion) {
    let Ok(dir) = tempfile::tempdir() else { return };
    let solver = Solver::new(SolverConfig {
        output_dir: dir.path().to_path_buf(),
        plot: PlotConfig {
            width: 320,
            height: 240,
            ..PlotConfig::default()
        },
        ..SolverConfig::default()
    });

    let mut group = c.benchmark_group("solve");
    group.sample_size(20);
    for (problem, text) in [
        (ProblemType::Derivative, "d/dx x^2*sin(x)"),
        (ProblemType::Integral, "int x*exp(x) dx"),
        (ProblemType::Limit, "limit as x->0 of sin(x)/x"),
        (ProblemType::Expression, "2*x + 3*x"),
    ] {
        group.bench_function(problem.as_str(), |b| {
            b.iter(|| solver.solve(problem, black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_operations,
    bench_text_front,
    bench_full_solve
);
criterion_main!(benches);
