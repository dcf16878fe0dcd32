//! Core simplification engine with rule-based architecture
//!
//! Implements bottom-up tree traversal, rule application with memoization,
//! cycle detection, and configurable limits (iterations, depth, timeout).

use super::rules::{ExprKind, RuleContext, RuleRegistry};
use crate::{Expr, ExprKind as AstKind};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Default cache capacity per rule before clearing (10K entries)
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default number of full passes before giving up
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default recursion depth of the bottom-up traversal
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Global rule registry singleton - built once, reused across all simplifications
fn global_registry() -> &'static RuleRegistry {
    static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = RuleRegistry::new();
        registry.load_all_rules();
        registry.order_by_priority();
        log::debug!("loaded {} simplification rules", registry.rules.len());
        registry
    })
}

/// Rule-based simplifier
///
/// Applies the rule registry bottom-up until the expression stops changing.
///
/// ```
/// use snapcalc::{Simplifier, parse};
///
/// let expr = parse("2*x + 3*x").unwrap();
/// let simplified = Simplifier::new().simplify(expr);
/// assert_eq!(simplified.to_plain(), "5*x");
/// ```
pub struct Simplifier {
    /// Per-rule caches - cleared when exceeding capacity to bound memory
    rule_caches: FxHashMap<&'static str, FxHashMap<u64, Option<Arc<Expr>>>>,
    cache_capacity: usize,
    max_iterations: usize,
    max_depth: usize,
    timeout: Option<Duration>, // Wall-clock timeout to prevent hangs
    context: RuleContext,
    domain_safe: bool,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self {
            rule_caches: FxHashMap::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: None,
            context: RuleContext::default(),
            domain_safe: false,
        }
    }

    /// Set the cache capacity per rule (default: 10K entries)
    /// Cache is cleared when this limit is exceeded.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip rules that can change where the expression is defined
    pub fn with_domain_safe(mut self, domain_safe: bool) -> Self {
        self.domain_safe = domain_safe;
        self
    }

    /// Main simplification entry point
    pub fn simplify(&mut self, expr: Expr) -> Expr {
        self.context.domain_safe = self.domain_safe;

        let mut current = Arc::new(expr);
        let mut iterations = 0;
        // Structural hashes of every intermediate form, for cycle detection
        let mut seen_hashes: FxHashSet<u64> = FxHashSet::default();
        let start_time = Instant::now();

        loop {
            if let Some(timeout) = self.timeout
                && start_time.elapsed() > timeout
            {
                log::warn!("simplification timed out after {:?}", timeout);
                break;
            }

            if iterations >= self.max_iterations {
                log::warn!(
                    "simplification exceeded maximum iterations ({})",
                    self.max_iterations
                );
                break;
            }

            let original = Arc::clone(&current);
            current = self.apply_rules_bottom_up(current, 0);

            log::trace!("iteration {}: {} -> {}", iterations, original, current);

            if *current == *original {
                break;
            }

            let fingerprint = current.structural_hash();
            if !seen_hashes.insert(fingerprint) {
                log::debug!("simplification cycle detected at {}", current);
                break;
            }

            iterations += 1;
        }

        Expr::unwrap_arc(current)
    }

    /// Apply rules bottom-up through the expression tree
    fn apply_rules_bottom_up(&mut self, expr: Arc<Expr>, depth: usize) -> Arc<Expr> {
        if depth > self.max_depth {
            return expr;
        }

        match &expr.kind {
            AstKind::Sum(terms) => {
                let simplified_terms = self.simplify_children(terms, depth);
                match simplified_terms {
                    None => self.apply_rules_to_node(expr, depth),
                    Some(terms) => {
                        let new_expr = Arc::new(Expr::sum_from_arcs(terms));
                        self.apply_rules_to_node(new_expr, depth)
                    }
                }
            }

            AstKind::Product(factors) => {
                let simplified_factors = self.simplify_children(factors, depth);
                match simplified_factors {
                    None => self.apply_rules_to_node(expr, depth),
                    Some(factors) => {
                        let new_expr = Arc::new(Expr::product_from_arcs(factors));
                        self.apply_rules_to_node(new_expr, depth)
                    }
                }
            }

            AstKind::Div(u, v) => {
                let u_simplified = self.apply_rules_bottom_up(Arc::clone(u), depth + 1);
                let v_simplified = self.apply_rules_bottom_up(Arc::clone(v), depth + 1);

                if Arc::ptr_eq(&u_simplified, u) && Arc::ptr_eq(&v_simplified, v) {
                    self.apply_rules_to_node(expr, depth)
                } else {
                    let new_expr = Arc::new(Expr::div_from_arcs(u_simplified, v_simplified));
                    self.apply_rules_to_node(new_expr, depth)
                }
            }

            AstKind::Pow(u, v) => {
                let u_simplified = self.apply_rules_bottom_up(Arc::clone(u), depth + 1);
                let v_simplified = self.apply_rules_bottom_up(Arc::clone(v), depth + 1);

                if Arc::ptr_eq(&u_simplified, u) && Arc::ptr_eq(&v_simplified, v) {
                    self.apply_rules_to_node(expr, depth)
                } else {
                    let new_expr = Arc::new(Expr::pow_from_arcs(u_simplified, v_simplified));
                    self.apply_rules_to_node(new_expr, depth)
                }
            }

            AstKind::FunctionCall { name, args } => {
                match self.simplify_children(args, depth) {
                    None => self.apply_rules_to_node(expr, depth),
                    Some(args) => {
                        let new_expr = Arc::new(Expr::func_multi_from_arcs(name, args));
                        self.apply_rules_to_node(new_expr, depth)
                    }
                }
            }

            AstKind::Number(_) | AstKind::Symbol(_) => self.apply_rules_to_node(expr, depth),
        }
    }

    /// Simplify every child; `None` when all children came back unchanged
    fn simplify_children(&mut self, children: &[Arc<Expr>], depth: usize) -> Option<Vec<Arc<Expr>>> {
        let simplified: Vec<Arc<Expr>> = children
            .iter()
            .map(|c| self.apply_rules_bottom_up(Arc::clone(c), depth + 1))
            .collect();

        let changed = simplified
            .iter()
            .zip(children.iter())
            .any(|(new, old)| !Arc::ptr_eq(new, old));

        changed.then_some(simplified)
    }

    /// Apply all applicable rules to a single node in priority order
    fn apply_rules_to_node(&mut self, mut current: Arc<Expr>, depth: usize) -> Arc<Expr> {
        self.context.set_depth(depth);

        let kind = ExprKind::of(current.as_ref());
        let applicable_rules = global_registry().get_rules_for_kind(kind);

        for rule in applicable_rules {
            if self.context.domain_safe && rule.alters_domain() {
                continue;
            }

            let rule_name = rule.name();
            let cache_key = current.id();

            if let Some(cache) = self.rule_caches.get(rule_name)
                && let Some(cached_result) = cache.get(&cache_key)
            {
                if let Some(new_expr) = cached_result {
                    current = Arc::clone(new_expr);
                }
                continue;
            }

            let original_id = current.id();
            let outcome = rule.apply(&current, &self.context).map(Arc::new);

            let cache = self.rule_caches.entry(rule_name).or_default();
            if cache.len() >= self.cache_capacity {
                cache.clear();
            }
            cache.insert(original_id, outcome.clone());

            if let Some(new_expr) = outcome {
                log::trace!("{} : {} => {}", rule_name, current, new_expr);
                current = new_expr;
            }
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn simplified(input: &str) -> String {
        Simplifier::new()
            .simplify(parse(input).expect("valid input"))
            .to_plain()
    }

    #[test]
    fn test_fixpoint_reached() {
        assert_eq!(simplified("2*x + 3*x"), "5*x");
        assert_eq!(simplified("x*x*x"), "x**3");
        assert_eq!(simplified("x^1 + 0"), "x");
    }

    #[test]
    fn test_iteration_limit_returns_partial_result() {
        let expr = parse("2*x + 3*x").expect("valid input");
        let mut simplifier = Simplifier::new().with_max_iterations(0);
        let result = simplifier.simplify(expr.clone());
        assert_eq!(result, expr);
    }

    #[test]
    fn test_domain_safe_keeps_cancellation() {
        let expr = parse("x/x").expect("valid input");
        let mut simplifier = Simplifier::new().with_domain_safe(true);
        let result = simplifier.simplify(expr);
        assert!(result.contains_var("x"));
        assert_eq!(simplified("x/x"), "1");
    }

    #[test]
    fn test_simplifier_is_reusable() {
        let mut simplifier = Simplifier::new().with_cache_capacity(4);
        let a = simplifier.simplify(parse("x + x").expect("valid input"));
        let b = simplifier.simplify(parse("x + x").expect("valid input"));
        assert_eq!(a, b);
        assert_eq!(a.to_plain(), "2*x");
    }
}
