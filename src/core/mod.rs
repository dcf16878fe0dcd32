//! Core types for symbolic mathematics
//!
//! This module contains the fundamental types:
//! - `Expr` / `ExprKind` - Expression tree
//! - Reserved constants (`pi`, `E`) and float tolerance helpers
//! - Display formatting (to_string, to_unicode, to_plain)

mod display; // Display implementations for Expr
pub(crate) mod expr;
pub(crate) mod known_symbols;
pub(crate) mod traits;

// Public re-exports (for external API)
pub use expr::{Expr, ExprKind};
