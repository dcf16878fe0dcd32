//! Parser module - converts text to expression trees
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::{CalcError, Expr};

/// Maximum nesting depth accepted from user input
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Maximum number of nodes accepted from user input
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Parse a formula string into an expression tree
///
/// Accepts `^` and `**` for powers, implicit multiplication (`2x`, `3(x+1)`,
/// `x sin(x)`), the functions of the built-in registry (`ln` is an alias of
/// `log`), and the constants `pi` and `e`/`E`. Missing closing parentheses at
/// the end of the input are added.
///
/// # Example
/// ```
/// use snapcalc::parse;
///
/// let expr = parse("2x^2 + sin(x)").unwrap();
/// assert_eq!(expr.to_string(), "2*x^2 + sin(x)");
/// ```
///
/// # Errors
/// Returns `CalcError` if:
/// - The input is empty
/// - The input contains invalid syntax or characters
/// - A closing parenthesis has no opener
/// - A multi-letter word is neither a function nor a constant
/// - The expression exceeds the depth or size limits
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    // Pipeline: validate -> balance -> lex -> implicit_mul -> parse -> limits

    if input.trim().is_empty() {
        return Err(CalcError::EmptyFormula);
    }

    let balanced = lexer::balance_parentheses(input)?;

    let tokens = lexer::lex(&balanced)?;

    let tokens_with_mul = implicit_mul::insert_implicit_multiplication(tokens);

    let expr = pratt::parse_expression(&tokens_with_mul, DEFAULT_MAX_DEPTH)?;

    if expr.max_depth() > DEFAULT_MAX_DEPTH {
        return Err(CalcError::MaxDepthExceeded);
    }
    if expr.node_count() > DEFAULT_MAX_NODES {
        return Err(CalcError::MaxNodesExceeded);
    }

    log::trace!("parsed {:?} as {}", input, expr);
    Ok(expr)
}
