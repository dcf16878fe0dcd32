//! Lexer: turns input text into spanned tokens
//!
//! Letters are read as whole words. A word is a function name, a reserved
//! constant, or a single-letter variable; anything else is rejected instead
//! of being split into guessed factors.

use super::tokens::{Lexeme, Operator, Token};
use crate::core::known_symbols as ks;
use crate::functions::registry::Registry;
use crate::{CalcError, Span};

/// Append missing closing parentheses; reject a `)` with no opener
pub(crate) fn balance_parentheses(input: &str) -> Result<String, CalcError> {
    let mut open: usize = 0;
    for (pos, c) in input.char_indices() {
        match c {
            '(' => open += 1,
            ')' => {
                if open == 0 {
                    return Err(CalcError::UnbalancedParentheses {
                        span: Some(Span::at(pos)),
                    });
                }
                open -= 1;
            }
            _ => {}
        }
    }

    if open == 0 {
        return Ok(input.to_string());
    }
    log::debug!("closing {} unbalanced parenthesis(es) in {:?}", open, input);
    let mut balanced = String::with_capacity(input.len() + open);
    balanced.push_str(input);
    balanced.extend(std::iter::repeat_n(')', open));
    Ok(balanced)
}

fn classify_word(word: &str, span: Span) -> Result<Token, CalcError> {
    if let Some(name) = Registry::canonical_name(word) {
        return Ok(Token::Function(name));
    }
    match word {
        ks::PI => return Ok(Token::Identifier(ks::PI.to_string())),
        "e" | ks::EULER => return Ok(Token::Identifier(ks::EULER.to_string())),
        _ => {}
    }
    if word.chars().count() == 1 {
        return Ok(Token::Identifier(word.to_string()));
    }

    let prefix_fn = (2..word.len())
        .rev()
        .find(|&end| Registry::canonical_name(&word[..end]).is_some());
    let suggestion = match prefix_fn {
        Some(end) => format!(
            "function names must be followed by parentheses, as in '{}({})'",
            &word[..end],
            &word[end..]
        ),
        None => {
            let spelled: Vec<String> = word.chars().map(String::from).collect();
            format!(
                "only single-letter variables are supported, did you mean '{}'",
                spelled.join("*")
            )
        }
    };
    Err(CalcError::AmbiguousSequence {
        sequence: word.to_string(),
        suggestion,
        span: Some(span),
    })
}

/// Tokenize the input
pub(crate) fn lex(input: &str) -> Result<Vec<Lexeme>, CalcError> {
    let mut tokens = Vec::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut end = start;
            while let Some(&(pos, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    end = pos + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &input[start..end];
            let span = Span::new(start, end);
            let value = text.parse::<f64>().map_err(|_| CalcError::InvalidNumber {
                value: text.to_string(),
                span: Some(span),
            })?;
            tokens.push(Lexeme::new(Token::Number(value), span));
            continue;
        }

        if c.is_ascii_alphabetic() {
            let mut end = start;
            while let Some(&(pos, l)) = chars.peek() {
                if l.is_ascii_alphabetic() {
                    end = pos + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            let span = Span::new(start, end);
            let token = classify_word(&input[start..end], span)?;
            tokens.push(Lexeme::new(token, span));
            continue;
        }

        chars.next();
        let span = Span::at(start);
        let token = match c {
            '+' => Token::Operator(Operator::Add),
            '-' => Token::Operator(Operator::Sub),
            '*' => {
                if let Some(&(_, '*')) = chars.peek() {
                    chars.next();
                    tokens.push(Lexeme::new(
                        Token::Operator(Operator::Pow),
                        Span::new(start, start + 2),
                    ));
                    continue;
                }
                Token::Operator(Operator::Mul)
            }
            '/' => Token::Operator(Operator::Div),
            '^' => Token::Operator(Operator::Pow),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            other => {
                return Err(CalcError::invalid_token_at(
                    other.to_string(),
                    Span::new(start, start + other.len_utf8()),
                ));
            }
        };
        tokens.push(Lexeme::new(token, span));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn test_balance_appends_closers() {
        assert_eq!(balance_parentheses("sin(x").unwrap(), "sin(x)");
        assert_eq!(balance_parentheses("((x)").unwrap(), "((x))");
        assert!(balance_parentheses("x)").is_err());
    }

    #[test]
    fn test_lex_power_forms() {
        assert_eq!(kinds("x^2"), kinds("x**2"));
        assert_eq!(
            kinds("x**2"),
            vec![
                Token::Identifier("x".into()),
                Token::Operator(Operator::Pow),
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_lex_functions_and_constants() {
        assert_eq!(
            kinds("ln(pi)"),
            vec![
                Token::Function("log"),
                Token::LeftParen,
                Token::Identifier("pi".into()),
                Token::RightParen,
            ]
        );
        assert_eq!(kinds("e"), vec![Token::Identifier("E".into())]);
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(kinds("3.25"), vec![Token::Number(3.25)]);
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert!(matches!(
            lex("1.2.3"),
            Err(CalcError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unknown_word_is_ambiguous() {
        match lex("xy") {
            Err(CalcError::AmbiguousSequence { suggestion, .. }) => {
                assert!(suggestion.contains("x*y"));
            }
            other => panic!("expected ambiguity error, got {:?}", other),
        }
        match lex("sinx") {
            Err(CalcError::AmbiguousSequence { suggestion, .. }) => {
                assert!(suggestion.contains("sin(x)"));
            }
            other => panic!("expected ambiguity error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_character() {
        match lex("x = 2") {
            Err(CalcError::InvalidToken { token, span }) => {
                assert_eq!(token, "=");
                assert_eq!(span, Some(Span::at(2)));
            }
            other => panic!("expected invalid token, got {:?}", other),
        }
    }
}
