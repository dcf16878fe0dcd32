//! Property-based tests
//!
//! Uses quickcheck for:
//! - OCR cleanup invariants
//! - Classifier totality and keyword priority
//! - Parser robustness (fuzz testing)
//! - Derivatives and antiderivatives of random polynomials

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{ProblemType, classify, clean_ocr_text, extract, integrate, parse, simplify};

// ============================================================
// GENERATORS
// ============================================================

/// Polynomial with small integer coefficients, lowest degree first
#[derive(Clone, Debug)]
struct Polynomial(Vec<i8>);

impl Arbitrary for Polynomial {
    fn arbitrary(g: &mut Gen) -> Self {
        let degree = usize::arbitrary(g) % 6;
        Polynomial((0..=degree).map(|_| i8::arbitrary(g) % 10).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().filter(|c| !c.is_empty()).map(Polynomial))
    }
}

impl Polynomial {
    fn source(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(k, c)| format!("({})*x^{}", c, k))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn eval(&self, x: f64) -> f64 {
        self.0
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + f64::from(c))
    }
}

/// Evaluation point in [-2, 2]
fn point(raw: u8) -> f64 {
    f64::from(raw) / 255.0 * 4.0 - 2.0
}

/// Random formula built from the parser's grammar
fn random_formula(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 4 {
            0 => format!("{}", u8::arbitrary(g) % 20),
            1 => "x".to_string(),
            2 => "pi".to_string(),
            _ => "2.5".to_string(),
        };
    }
    match u8::arbitrary(g) % 6 {
        0..=2 => {
            let ops = ["+", "-", "*", "/", "^"];
            let op = ops[usize::arbitrary(g) % ops.len()];
            format!(
                "({} {} {})",
                random_formula(g, depth - 1),
                op,
                random_formula(g, depth - 1)
            )
        }
        3 | 4 => {
            let fns = ["sin", "cos", "exp", "ln", "sqrt", "abs", "atan"];
            let f = fns[usize::arbitrary(g) % fns.len()];
            format!("{}({})", f, random_formula(g, depth - 1))
        }
        _ => format!("-{}", random_formula(g, depth - 1)),
    }
}

// ============================================================
// OCR CLEANUP
// ============================================================

#[test]
fn test_clean_is_idempotent() {
    fn prop(raw: String) -> bool {
        let once = clean_ocr_text(&raw);
        clean_ocr_text(&once) == once
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn test_clean_output_stays_in_alphabet() {
    fn prop(raw: String) -> bool {
        let cleaned = clean_ocr_text(&raw);
        let in_alphabet = cleaned
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " +-*/^()=.,".contains(c));
        in_alphabet
            && !cleaned.contains("  ")
            && !cleaned.starts_with(' ')
            && !cleaned.ends_with(' ')
            && !cleaned.contains(['O', 'l'])
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(String) -> bool);
}

// ============================================================
// CLASSIFIER
// ============================================================

#[test]
fn test_classify_is_idempotent() {
    fn prop(text: String) -> bool {
        classify(&text) == classify(&text)
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn test_int_always_wins() {
    fn prop(prefix: String, suffix: String) -> bool {
        classify(&format!("{} INT {}", prefix, suffix)) == ProblemType::Integral
            && classify(&format!("lim {} int {}", prefix, suffix)) == ProblemType::Integral
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(String, String) -> bool);
}

#[test]
fn test_no_keyword_is_expression() {
    fn prop(text: String) -> TestResult {
        let lower = text.to_lowercase();
        let keywords = ["int", "\u{222b}", "lim", "d/d", "derivative", "diff"];
        // Lowercasing can change length, so check both spellings
        if keywords
            .iter()
            .any(|k| lower.contains(k) || text.contains(k))
            || text.chars().any(|c| !c.is_ascii())
        {
            return TestResult::discard();
        }
        TestResult::from_bool(classify(&text) == ProblemType::Expression)
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(5000)
        .quickcheck(prop as fn(String) -> TestResult);
}

// ============================================================
// PARSER AND EXTRACTION FUZZING
// ============================================================

#[test]
fn test_parser_never_panics() {
    fn prop(input: String) -> bool {
        // Either a tree or an error, never a panic
        let _ = parse(&input);
        true
    }
    QuickCheck::new()
        .tests(2000)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn test_extraction_never_panics() {
    fn prop(input: String) -> bool {
        for problem in ProblemType::ALL {
            let _ = extract(problem, &input, "x");
        }
        true
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn test_generated_formulas_parse() {
    let mut g = Gen::new(8);
    for _ in 0..300 {
        let depth = usize::arbitrary(&mut g) % 4;
        let formula = random_formula(&mut g, depth);
        let expr = match parse(&formula) {
            Ok(expr) => expr,
            Err(e) => panic!("generated formula {:?} rejected: {}", formula, e),
        };
        // Evaluation may produce NaN or infinities but must not fail
        assert!(expr.eval_f64("x", 0.5).is_ok(), "{}", formula);
        let _ = simplify(expr);
    }
}

// ============================================================
// CALCULUS ON RANDOM POLYNOMIALS
// ============================================================

#[test]
fn test_polynomial_derivative_matches_finite_difference() {
    fn prop(p: Polynomial, raw_x: u8) -> TestResult {
        let Ok(expr) = parse(&p.source()) else {
            return TestResult::failed();
        };
        let Ok(derivative) = expr.derive("x") else {
            return TestResult::failed();
        };
        let x = point(raw_x);
        let h = 1e-4;
        let expected = (p.eval(x + h) - p.eval(x - h)) / (2.0 * h);
        match simplify(derivative).eval_f64("x", x) {
            Ok(actual) => {
                TestResult::from_bool((actual - expected).abs() < 1e-4 * (1.0 + expected.abs()))
            }
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Polynomial, u8) -> TestResult);
}

#[test]
fn test_polynomial_integral_differentiates_back() {
    fn prop(p: Polynomial, raw_x: u8) -> TestResult {
        let Ok(expr) = parse(&p.source()) else {
            return TestResult::failed();
        };
        let Ok(antiderivative) = integrate(&expr, "x") else {
            return TestResult::failed();
        };
        let Ok(back) = antiderivative.derive("x") else {
            return TestResult::failed();
        };
        let x = point(raw_x);
        let expected = p.eval(x);
        match simplify(back).eval_f64("x", x) {
            Ok(actual) => {
                TestResult::from_bool((actual - expected).abs() < 1e-6 * (1.0 + expected.abs()))
            }
            Err(_) => TestResult::failed(),
        }
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Polynomial, u8) -> TestResult);
}
