//! Structural hashing for expressions.
//!
//! Children already carry their hash, so hashing a node is O(children).
//! Sum and Product combine child hashes commutatively: equal multisets of
//! terms hash the same regardless of order.

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

use super::ExprKind;

const TAG_NUMBER: u8 = 1;
const TAG_SYMBOL: u8 = 2;
const TAG_FUNCTION: u8 = 3;
const TAG_SUM: u8 = 4;
const TAG_PRODUCT: u8 = 5;
const TAG_DIV: u8 = 6;
const TAG_POW: u8 = 7;

/// Hash a float so that `0.0` and `-0.0` agree, matching `PartialEq`
fn hash_f64(n: f64, hasher: &mut FxHasher) {
    let normalized = if n == 0.0 { 0.0 } else { n };
    normalized.to_bits().hash(hasher);
}

/// Compute the structural hash of an expression kind
pub fn compute_expr_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    match kind {
        ExprKind::Number(n) => {
            TAG_NUMBER.hash(&mut hasher);
            hash_f64(*n, &mut hasher);
        }
        ExprKind::Symbol(name) => {
            TAG_SYMBOL.hash(&mut hasher);
            name.hash(&mut hasher);
        }
        ExprKind::FunctionCall { name, args } => {
            TAG_FUNCTION.hash(&mut hasher);
            name.hash(&mut hasher);
            for arg in args {
                arg.hash.hash(&mut hasher);
            }
        }
        ExprKind::Sum(terms) => {
            TAG_SUM.hash(&mut hasher);
            let combined = terms
                .iter()
                .fold(0u64, |acc, t| acc.wrapping_add(t.hash));
            combined.hash(&mut hasher);
            terms.len().hash(&mut hasher);
        }
        ExprKind::Product(factors) => {
            TAG_PRODUCT.hash(&mut hasher);
            let combined = factors
                .iter()
                .fold(0u64, |acc, f| acc.wrapping_add(f.hash.rotate_left(17)));
            combined.hash(&mut hasher);
            factors.len().hash(&mut hasher);
        }
        ExprKind::Div(u, v) => {
            TAG_DIV.hash(&mut hasher);
            u.hash.hash(&mut hasher);
            v.hash.hash(&mut hasher);
        }
        ExprKind::Pow(u, v) => {
            TAG_POW.hash(&mut hasher);
            u.hash.hash(&mut hasher);
            v.hash.hash(&mut hasher);
        }
    }
    hasher.finish()
}
