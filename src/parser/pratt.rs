use crate::functions::registry::Registry;
use crate::parser::tokens::{Lexeme, Operator, Token};
use crate::{CalcError, Expr, Span};

/// Binding power of unary signs: lower than Pow (30), higher than Mul (20),
/// so `-x^2` parses as `-(x^2)`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an expression tree using Pratt parsing
pub(crate) fn parse_expression(tokens: &[Lexeme], max_depth: usize) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let expr = parser.parse_expr(0)?;

    // Every token must be consumed: "2 3" is not an expression
    if let Some(extra) = parser.current() {
        return Err(CalcError::UnexpectedToken {
            expected: "operator or end of input".to_string(),
            got: extra.token.to_user_string(),
            span: Some(extra.span),
        });
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Lexeme],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Lexeme> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn end_span(&self) -> Option<Span> {
        self.tokens.last().map(|l| Span::at(l.span.end))
    }

    fn expect_right_paren(&mut self) -> Result<(), CalcError> {
        match self.current() {
            Some(Lexeme {
                token: Token::RightParen,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            Some(other) => Err(CalcError::UnexpectedToken {
                expected: ")".to_string(),
                got: other.token.to_user_string(),
                span: Some(other.span),
            }),
            None => Err(CalcError::UnexpectedToken {
                expected: ")".to_string(),
                got: "end of input".to_string(),
                span: self.end_span(),
            }),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, CalcError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(CalcError::MaxDepthExceeded);
        }

        let mut left = self.parse_prefix()?;

        while let Some(lexeme) = self.current() {
            let precedence = match &lexeme.token {
                Token::Operator(op) => op.precedence(),
                _ => break,
            };

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        self.depth -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, CalcError> {
        let mut args = Vec::new();

        loop {
            args.push(self.parse_expr(0)?);

            match self.current() {
                Some(Lexeme {
                    token: Token::Comma,
                    ..
                }) => self.advance(),
                _ => break,
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, CalcError> {
        let lexeme = self.current().ok_or(CalcError::UnexpectedEndOfInput)?;

        match &lexeme.token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name))
            }

            Token::Function(name) => {
                self.advance();

                // Function must be followed by (
                match self.current() {
                    Some(Lexeme {
                        token: Token::LeftParen,
                        ..
                    }) => self.advance(),
                    Some(other) => {
                        return Err(CalcError::UnexpectedToken {
                            expected: "(".to_string(),
                            got: other.token.to_user_string(),
                            span: Some(other.span),
                        });
                    }
                    None => {
                        return Err(CalcError::UnexpectedToken {
                            expected: "(".to_string(),
                            got: "end of input".to_string(),
                            span: self.end_span(),
                        });
                    }
                }

                let args = self.parse_arguments()?;
                self.expect_right_paren()?;

                if let Some(def) = Registry::get(name)
                    && !def.validate_arity(args.len())
                {
                    return Err(CalcError::invalid_syntax_at(
                        format!("{} expects {:?} argument(s), got {}", name, def.arity, args.len()),
                        lexeme.span,
                    ));
                }

                Ok(Expr::func_multi(name, args))
            }

            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(Expr::negate(expr))
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            other => Err(CalcError::invalid_token_at(
                other.to_user_string(),
                lexeme.span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: u8) -> Result<Expr, CalcError> {
        let lexeme = self.current().ok_or(CalcError::UnexpectedEndOfInput)?;

        let Token::Operator(op) = lexeme.token else {
            return Err(CalcError::invalid_token_at(
                lexeme.token.to_user_string(),
                lexeme.span,
            ));
        };
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if op == Operator::Pow {
            precedence
        } else {
            precedence + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add_expr(left, right),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::mul_expr(left, right),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow(left, right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprKind;

    fn lexemes(tokens: Vec<Token>) -> Vec<Lexeme> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Lexeme::new(t, Span::at(i)))
            .collect()
    }

    fn parse(tokens: Vec<Token>) -> Result<Expr, CalcError> {
        parse_expression(&lexemes(tokens), 100)
    }

    #[test]
    fn test_parse_number() {
        let ast = parse(vec![Token::Number(314.0 / 100.0)]).unwrap();
        assert_eq!(ast, Expr::number(314.0 / 100.0));
    }

    #[test]
    fn test_parse_addition() {
        let ast = parse(vec![
            Token::Identifier("x".into()),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
        ])
        .unwrap();
        assert!(matches!(ast.kind, ExprKind::Sum(_)));
    }

    #[test]
    fn test_parse_power() {
        let ast = parse(vec![
            Token::Identifier("x".into()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ])
        .unwrap();
        assert!(matches!(ast.kind, ExprKind::Pow(_, _)));
    }

    #[test]
    fn test_precedence() {
        // x + 2 * y should be x + (2 * y)
        let ast = parse(vec![
            Token::Identifier("x".into()),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
            Token::Operator(Operator::Mul),
            Token::Identifier("y".into()),
        ])
        .unwrap();

        match &ast.kind {
            ExprKind::Sum(terms) => {
                assert!(matches!(terms[0].kind, ExprKind::Symbol(_)));
                assert!(matches!(terms[1].kind, ExprKind::Product(_)));
            }
            other => panic!("Expected Sum at top level, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_binds_looser_than_pow() {
        let ast = parse(vec![
            Token::Operator(Operator::Sub),
            Token::Identifier("x".into()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ])
        .unwrap();
        assert_eq!(ast.to_string(), "-x^2");
    }

    #[test]
    fn test_prefix_star_is_invalid() {
        let result = parse(vec![
            Token::Identifier("x".into()),
            Token::Operator(Operator::Add),
            Token::Operator(Operator::Mul),
            Token::Number(3.0),
        ]);
        assert!(matches!(result, Err(CalcError::InvalidToken { .. })));
    }

    #[test]
    fn test_empty_parentheses() {
        let result = parse(vec![Token::LeftParen, Token::RightParen]);
        assert!(result.is_err(), "Empty parentheses should fail to parse");
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let result = parse(vec![Token::Number(2.0), Token::Number(3.0)]);
        assert!(matches!(result, Err(CalcError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_function_arity_checked() {
        let result = parse(vec![
            Token::Function("sin"),
            Token::LeftParen,
            Token::Identifier("x".into()),
            Token::Comma,
            Token::Identifier("y".into()),
            Token::RightParen,
        ]);
        assert!(matches!(result, Err(CalcError::InvalidSyntax { .. })));
    }
}
