//! Cleanup of raw recognizer output
//!
//! The substitutions target common OCR confusions. `O -> 0` and `l -> 1` are
//! lossy: a variable really named `l` or `O` does not survive.

/// Punctuation kept besides ASCII letters, digits and spaces
const KEPT_PUNCTUATION: &[char] = &['+', '-', '*', '/', '^', '(', ')', '=', '.', ','];

/// Character confusions rewritten before filtering
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\n", " "),
    // UTF-8 em dash decoded as Windows-1252
    ("\u{e2}\u{20ac}\u{201d}", "-"),
    ("\u{2014}", "-"),
    ("O", "0"),
    ("l", "1"),
];

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || KEPT_PUNCTUATION.contains(&c)
}

/// Normalize recognizer output into single-line calculus text
///
/// Line breaks become spaces, known confusions are rewritten, characters
/// outside the calculus alphabet are dropped and whitespace runs collapse to
/// one space. The result is trimmed; applying the function twice changes
/// nothing.
pub fn clean_ocr_text(raw: &str) -> String {
    let substituted = SUBSTITUTIONS
        .iter()
        .fold(raw.to_string(), |text, (from, to)| text.replace(from, to));
    let kept: String = substituted.chars().filter(|&c| is_kept(c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_ocr_text(""), "");
        assert_eq!(clean_ocr_text(" \n\t "), "");
    }

    #[test]
    fn test_line_breaks_and_whitespace() {
        assert_eq!(clean_ocr_text("d/dx\nx^2 "), "d/dx x^2");
        assert_eq!(clean_ocr_text("2*x   +\n\n3*x"), "2*x + 3*x");
    }

    #[test]
    fn test_confusions() {
        assert_eq!(clean_ocr_text("xO"), "x0");
        assert_eq!(clean_ocr_text("lim"), "1im");
        assert_eq!(clean_ocr_text("x \u{2014} 1"), "x - 1");
        assert_eq!(clean_ocr_text("x \u{e2}\u{20ac}\u{201d} 1"), "x - 1");
    }

    #[test]
    fn test_foreign_characters_dropped() {
        assert_eq!(clean_ocr_text("\u{222b} x dx"), "x dx");
        assert_eq!(clean_ocr_text("x->0"), "x-0");
        assert_eq!(clean_ocr_text("sin(x)!?"), "sin(x)");
    }
}
