//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::parser::tokens::{Lexeme, Operator, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Function name followed by ( is a call, never a product
        (Token::Function(_), _) => false,

        // Number * Identifier: 2x
        // Number * Function: 4 sin(x)
        // Number * (: 2(x)
        // Identifier * Identifier: a x
        // Identifier * Function: x sin(x)
        // Identifier * (: x(x + 1)
        // ) * Identifier / Function / (
        (
            Token::Number(_) | Token::Identifier(_) | Token::RightParen,
            Token::Identifier(_) | Token::Function(_) | Token::LeftParen,
        ) => true,

        // Identifier * Number: x2
        // ) * Number: )2
        (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// Rules:
/// - Number * Identifier: `2 x` → `2 * x`
/// - Identifier * Identifier: `a x` → `a * x`
/// - Identifier * Function: `x sin(x)` → `x * sin(x)`
/// - ) * Identifier/Number/(: `(a) x` → `(a) * x`
/// - Identifier/Number * (: `x (y)` → `x * (y)`
///
/// Two adjacent numbers are left alone so that `2 3` fails to parse.
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Lexeme>) -> Vec<Lexeme> {
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0].token, &w[1].token));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let inserted = it
            .peek()
            .filter(|next| should_insert_mul(&current.token, &next.token))
            .map(|next| Lexeme::new(Token::Operator(Operator::Mul), next.span));

        result.push(current);
        if let Some(mul) = inserted {
            result.push(mul);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    fn lexemes(tokens: Vec<Token>) -> Vec<Lexeme> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Lexeme::new(t, Span::at(i)))
            .collect()
    }

    #[test]
    fn test_number_identifier() {
        let tokens = lexemes(vec![Token::Number(2.0), Token::Identifier("x".into())]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1].token, Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_identifier_identifier() {
        let tokens = lexemes(vec![
            Token::Identifier("a".into()),
            Token::Identifier("x".into()),
        ]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1].token, Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_paren_identifier() {
        let tokens = lexemes(vec![Token::RightParen, Token::Identifier("x".into())]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_function_no_multiplication() {
        let tokens = lexemes(vec![Token::Function("sin"), Token::LeftParen]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_number_function() {
        let tokens = lexemes(vec![Token::Number(4.0), Token::Function("sin")]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1].token, Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_adjacent_numbers_untouched() {
        let tokens = lexemes(vec![Token::Number(2.0), Token::Number(3.0)]);
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 2);
    }
}
