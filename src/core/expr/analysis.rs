//! Structural queries and substitution.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{Expr, ExprKind};
use crate::core::known_symbols;

impl Expr {
    /// Check if the expression mentions the given variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(name) => name.as_ref() == var,
            ExprKind::FunctionCall { args, .. } | ExprKind::Sum(args) | ExprKind::Product(args) => {
                args.iter().any(|a| a.contains_var(var))
            }
            ExprKind::Div(u, v) | ExprKind::Pow(u, v) => u.contains_var(var) || v.contains_var(var),
        }
    }

    /// Collect the free (non-constant) symbol names in sorted order
    pub fn free_symbols(&self) -> BTreeSet<String> {
        fn walk(e: &Expr, out: &mut BTreeSet<String>) {
            match &e.kind {
                ExprKind::Number(_) => {}
                ExprKind::Symbol(name) => {
                    if !known_symbols::is_constant(name) {
                        out.insert(name.to_string());
                    }
                }
                ExprKind::FunctionCall { args, .. }
                | ExprKind::Sum(args)
                | ExprKind::Product(args) => {
                    for a in args {
                        walk(a, out);
                    }
                }
                ExprKind::Div(u, v) | ExprKind::Pow(u, v) => {
                    walk(u, out);
                    walk(v, out);
                }
            }
        }
        let mut out = BTreeSet::new();
        walk(self, &mut out);
        out
    }

    /// Count all nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 0,
            ExprKind::FunctionCall { args, .. } | ExprKind::Sum(args) | ExprKind::Product(args) => {
                args.iter().map(|a| a.node_count()).sum()
            }
            ExprKind::Div(u, v) | ExprKind::Pow(u, v) => u.node_count() + v.node_count(),
        }
    }

    /// Depth of the tree (a leaf has depth 1)
    pub fn max_depth(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 0,
            ExprKind::FunctionCall { args, .. } | ExprKind::Sum(args) | ExprKind::Product(args) => {
                args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Div(u, v) | ExprKind::Pow(u, v) => u.max_depth().max(v.max_depth()),
        }
    }

    /// Replace every occurrence of `var` with `value`
    #[must_use]
    pub fn substitute(&self, var: &str, value: &Expr) -> Expr {
        if !self.contains_var(var) {
            return self.clone();
        }
        let sub = |a: &Arc<Expr>| Arc::new(a.substitute(var, value));
        match &self.kind {
            ExprKind::Symbol(_) => value.clone(),
            ExprKind::FunctionCall { name, args } => {
                Expr::func_multi_from_arcs(name, args.iter().map(sub).collect())
            }
            ExprKind::Sum(terms) => Expr::sum_from_arcs(terms.iter().map(sub).collect()),
            ExprKind::Product(factors) => {
                Expr::product_from_arcs(factors.iter().map(sub).collect())
            }
            ExprKind::Div(u, v) => Expr::div_from_arcs(sub(u), sub(v)),
            ExprKind::Pow(u, v) => Expr::pow_from_arcs(sub(u), sub(v)),
            ExprKind::Number(_) => self.clone(),
        }
    }

    /// Replace every subtree structurally equal to `target`
    #[must_use]
    pub fn replace(&self, target: &Expr, replacement: &Expr) -> Expr {
        if self == target {
            return replacement.clone();
        }
        let rep = |a: &Arc<Expr>| Arc::new(a.replace(target, replacement));
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => self.clone(),
            ExprKind::FunctionCall { name, args } => {
                Expr::func_multi_from_arcs(name, args.iter().map(rep).collect())
            }
            ExprKind::Sum(terms) => Expr::sum_from_arcs(terms.iter().map(rep).collect()),
            ExprKind::Product(factors) => {
                Expr::product_from_arcs(factors.iter().map(rep).collect())
            }
            ExprKind::Div(u, v) => Expr::div_from_arcs(rep(u), rep(v)),
            ExprKind::Pow(u, v) => Expr::pow_from_arcs(rep(u), rep(v)),
        }
    }

    /// Total degree in free symbols, counting non-polynomial parts as 0
    pub fn polynomial_degree(&self) -> f64 {
        match &self.kind {
            ExprKind::Symbol(name) if !known_symbols::is_constant(name) => 1.0,
            ExprKind::Pow(base, exp) => match (&base.kind, exp.as_number()) {
                (ExprKind::Symbol(name), Some(n)) if !known_symbols::is_constant(name) => n,
                (ExprKind::Sum(_), Some(n)) => base.polynomial_degree() * n,
                _ => 0.0,
            },
            ExprKind::Product(factors) => factors.iter().map(|f| f.polynomial_degree()).sum(),
            ExprKind::Sum(terms) => terms
                .iter()
                .map(|t| t.polynomial_degree())
                .fold(0.0, f64::max),
            _ => 0.0,
        }
    }

    /// Split off a leading numeric coefficient: `3*x*y` gives `(3, x*y)`
    pub fn split_coefficient(&self) -> (f64, Expr) {
        match &self.kind {
            ExprKind::Number(n) => (*n, Expr::number(1.0)),
            ExprKind::Product(factors) => match factors.first().and_then(|f| f.as_number()) {
                Some(c) => (c, Expr::product_from_arcs(factors[1..].to_vec())),
                None => (1.0, self.clone()),
            },
            _ => (1.0, self.clone()),
        }
    }

    /// Check if the term should print with a leading minus sign
    pub fn is_negative_term(&self) -> bool {
        match &self.kind {
            ExprKind::Number(n) => *n < 0.0,
            ExprKind::Product(factors) => factors
                .first()
                .and_then(|f| f.as_number())
                .is_some_and(|c| c < 0.0),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_var() {
        let e = Expr::func("sin", Expr::powf(Expr::symbol("x"), 2.0));
        assert!(e.contains_var("x"));
        assert!(!e.contains_var("y"));
    }

    #[test]
    fn test_free_symbols_skip_constants() {
        let e = Expr::product(vec![Expr::symbol("pi"), Expr::symbol("x"), Expr::symbol("a")]);
        let names: Vec<String> = e.free_symbols().into_iter().collect();
        assert_eq!(names, vec!["a".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_substitute() {
        let x = Expr::symbol("x");
        let e = Expr::sum(vec![Expr::powf(x.clone(), 2.0), x]);
        let at_two = e.substitute("x", &Expr::number(2.0));
        assert!(!at_two.contains_var("x"));
    }

    #[test]
    fn test_replace_subtree() {
        let x = Expr::symbol("x");
        let inner = Expr::powf(x.clone(), 2.0);
        let e = Expr::func("cos", inner.clone());
        let u = Expr::symbol("u");
        assert_eq!(e.replace(&inner, &u), Expr::func("cos", u));
    }

    #[test]
    fn test_degree() {
        let x = Expr::symbol("x");
        let term = Expr::product(vec![Expr::number(3.0), Expr::powf(x.clone(), 2.0)]);
        assert_eq!(term.polynomial_degree(), 2.0);
        assert_eq!(Expr::func("sin", x).polynomial_degree(), 0.0);
    }

    #[test]
    fn test_split_coefficient() {
        let x = Expr::symbol("x");
        let term = Expr::product(vec![Expr::number(-2.0), x.clone()]);
        let (c, rest) = term.split_coefficient();
        assert_eq!(c, -2.0);
        assert_eq!(rest, x);
        assert!(term.is_negative_term());
    }
}
