use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, OnceLock};

/// Definition of a built-in function: its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "log")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation function
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation function
    /// Arguments: (args of the function call, derivatives of the arguments)
    /// Returns the total derivative dA/dx = sum( (dA/d_arg_i) * (d_arg_i/dx) )
    pub derivative: fn(&[Arc<Expr>], &[Expr]) -> Expr,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    crate::functions::definitions::all_definitions()
        .into_iter()
        .map(|def| (def.name, def))
        .collect()
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by canonical name
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Map a name as typed by a user to its canonical registry name
    pub(crate) fn canonical_name(name: &str) -> Option<&'static str> {
        let canonical = match name {
            "ln" => "log",
            other => other,
        };
        Self::get(canonical).map(|def| def.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(Registry::get("sin").is_some());
        assert!(Registry::get("ln").is_none());
        assert_eq!(Registry::canonical_name("ln"), Some("log"));
        assert_eq!(Registry::canonical_name("besselj"), None);
        assert!(crate::functions::is_function_name("ln"));
        assert!(!crate::functions::is_function_name("x"));
    }

    #[test]
    fn test_arity() {
        let log = Registry::get("log").unwrap();
        assert!(log.validate_arity(1));
        assert!(log.validate_arity(2));
        assert!(!log.validate_arity(3));
    }
}
