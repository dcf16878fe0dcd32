//! Token types produced by the lexer

use crate::Span;

/// Binary and unary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Binding power for infix use; unary signs sit between Mul and Pow
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    /// Single-letter variable or a reserved constant (`pi`, `E`)
    Identifier(String),
    /// Canonical name of a registry function
    Function(&'static str),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Render the token the way a user typed it
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Identifier(name) => name.clone(),
            Token::Function(name) => (*name).to_string(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// A token together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Lexeme {
    pub token: Token,
    pub span: Span,
}

impl Lexeme {
    pub(crate) fn new(token: Token, span: Span) -> Self {
        Lexeme { token, span }
    }
}
