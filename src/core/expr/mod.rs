//! Expression tree for the symbolic engine.
//!
//! This module defines:
//! - `Expr` - The central tree node type
//! - `ExprKind` - The variants of expression nodes (Number, Symbol, Function, etc.)
//!
//! # Architecture
//!
//! ## N-ary Sum/Product
//! Instead of binary `Add(left, right)`, sums and products are stored flat:
//! `a + b + c` is `Sum([a, b, c])`. Flattening and numeric folding happen in
//! the constructors, so rule code never sees nested sums of sums.
//!
//! ## Structural Hashing
//! Each `Expr` has a pre-computed `hash` field for O(1) equality rejection.
//! Two expressions with different hashes are definitely not equal.
//!
//! # Usage
//!
//! ```
//! use snapcalc::Expr;
//!
//! let x = Expr::symbol("x");
//! let expr = Expr::sum(vec![Expr::pow(x.clone(), Expr::number(2.0)), Expr::func("sin", x)]);
//! assert_eq!(expr.to_string(), "x^2 + sin(x)");
//! ```

mod analysis;
mod constructors;
mod evaluate;
mod hash;
mod ordering;

use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use hash::compute_expr_hash;
pub use ordering::{expr_cmp, sum_term_cmp};

pub(crate) use crate::core::traits::EPSILON;

static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A symbolic mathematical expression.
///
/// Expressions are immutable; every transformation builds a new tree and
/// shares unchanged children through `Arc`.
#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID for caching (not used in equality comparisons)
    pub(crate) id: u64,
    /// Structural hash for O(1) equality rejection
    pub(crate) hash: u64,
    /// The kind of expression (structure)
    pub(crate) kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;
    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Structural equality based on KIND only (with hash fast-reject)
impl PartialEq for Expr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// The kind (structure) of an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 2)
    Number(f64),

    /// Variable or reserved constant (`x`, `pi`, `E`)
    Symbol(Arc<str>),

    /// Built-in function call
    FunctionCall {
        /// Canonical function name from the registry
        name: Arc<str>,
        /// The function arguments
        args: Vec<Arc<Expr>>,
    },

    /// N-ary sum: a + b + c + ...
    /// Subtraction is represented as: a - b = Sum([a, Product([-1, b])])
    Sum(Vec<Arc<Expr>>),

    /// N-ary product: a * b * c * ...
    /// Stored flat with factors in canonical order, number first.
    Product(Vec<Arc<Expr>>),

    /// Division (binary - not associative)
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation: base^exponent
    Pow(Arc<Expr>, Arc<Expr>),
}

impl ExprKind {
    /// Short lowercase name of the node kind, used in traces
    pub fn label(&self) -> &'static str {
        match self {
            ExprKind::Number(_) => "number",
            ExprKind::Symbol(_) => "symbol",
            ExprKind::FunctionCall { .. } => "function",
            ExprKind::Sum(_) => "sum",
            ExprKind::Product(_) => "product",
            ExprKind::Div(..) => "div",
            ExprKind::Pow(..) => "pow",
        }
    }
}

impl Expr {
    /// Take ownership of an `Arc`-held expression, cloning only if shared
    #[inline]
    pub(crate) fn unwrap_arc(arc: Arc<Expr>) -> Expr {
        Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone())
    }
}
