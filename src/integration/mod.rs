//! Symbolic antiderivatives
//!
//! The integrator works on simplified input and tries, in order: constants
//! and linearity, the elementary table on linear arguments, the power rule,
//! reverse chain rule (u-substitution), expansion of polynomial products and
//! integration by parts. The search is bounded by a recursion depth and an
//! attempt budget, so an integrand without a closed form fails instead of
//! hanging.

mod parts;
mod table;

use crate::core::traits::as_integer;
use crate::simplification::simplify;
use crate::{CalcError, Expr, ExprKind};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::sync::Arc;

/// Nesting limit for substitution and by-parts recursion
const MAX_DEPTH: usize = 8;

/// Total number of sub-integrals one call may try
const MAX_ATTEMPTS: usize = 4_000;

/// Substitution candidates tried per integrand
const MAX_CANDIDATES: usize = 12;

/// Largest exponent expanded by the binomial fallback
const MAX_EXPANDED_POWER: i64 = 8;

/// Term cap for product expansion
const MAX_EXPANDED_TERMS: usize = 256;

/// Integrate `expr` with respect to `var`
///
/// Returns one antiderivative without a constant of integration.
///
/// # Errors
/// `CalcError::NoAntiderivative` when no strategy applies; unknown functions
/// met while differentiating substitution candidates are propagated.
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, CalcError> {
    let normalized = simplify(expr.clone());
    let mut integrator = Integrator::new(var);
    match integrator.antiderivative(&normalized, 0)? {
        Some(result) => {
            log::debug!(
                "integrated {} in {} attempts",
                normalized,
                integrator.attempts
            );
            Ok(simplify(result))
        }
        None => Err(CalcError::NoAntiderivative {
            integrand: expr.to_plain(),
        }),
    }
}

/// Search state for one integration
pub(crate) struct Integrator<'a> {
    var: &'a str,
    attempts: usize,
}

/// `r / a`, skipping the division when `a` is one
fn over(r: Expr, a: Expr) -> Expr {
    if a.is_one_num() {
        r
    } else {
        Expr::mul_expr(r, Expr::powf(a, -1.0))
    }
}

impl<'a> Integrator<'a> {
    fn new(var: &'a str) -> Self {
        Self { var, attempts: 0 }
    }

    fn var_expr(&self) -> Expr {
        Expr::symbol(self.var)
    }

    /// Antiderivative of `e`, or `None` when every strategy fails
    pub(crate) fn antiderivative(
        &mut self,
        e: &Expr,
        depth: usize,
    ) -> Result<Option<Expr>, CalcError> {
        self.attempts += 1;
        if depth > MAX_DEPTH || self.attempts > MAX_ATTEMPTS {
            return Ok(None);
        }
        if !e.contains_var(self.var) {
            return Ok(Some(Expr::mul_expr(e.clone(), self.var_expr())));
        }

        match &e.kind {
            ExprKind::Symbol(_) => Ok(Some(Expr::product(vec![
                Expr::number(0.5),
                Expr::powf(self.var_expr(), 2.0),
            ]))),
            ExprKind::Sum(terms) => {
                let mut parts = Vec::with_capacity(terms.len());
                for term in terms {
                    match self.antiderivative(term, depth)? {
                        Some(p) => parts.push(p),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Expr::sum(parts)))
            }
            ExprKind::Product(factors) => self.product(e, factors, depth),
            ExprKind::Div(u, v) => {
                let as_product = Expr::mul_expr((**u).clone(), Expr::powf((**v).clone(), -1.0));
                self.antiderivative(&simplify(as_product), depth + 1)
            }
            ExprKind::Pow(base, exp) => self.power(e, base, exp, depth),
            ExprKind::FunctionCall { name, args } => self.function(e, name, args, depth),
            ExprKind::Number(_) => Ok(None),
        }
    }

    /// Constant slope of an expression linear in the variable
    fn linear_slope(&self, e: &Expr) -> Result<Option<Expr>, CalcError> {
        if !e.contains_var(self.var) {
            return Ok(None);
        }
        let slope = simplify(e.derive(self.var)?);
        Ok((!slope.contains_var(self.var) && !slope.is_zero_num()).then_some(slope))
    }

    fn product(
        &mut self,
        e: &Expr,
        factors: &[Arc<Expr>],
        depth: usize,
    ) -> Result<Option<Expr>, CalcError> {
        let (varying, constant): (Vec<Arc<Expr>>, Vec<Arc<Expr>>) = factors
            .iter()
            .cloned()
            .partition(|f| f.contains_var(self.var));

        if !constant.is_empty() {
            let inner = Expr::product_from_arcs(varying);
            return Ok(self.antiderivative(&inner, depth)?.map(|r| {
                let mut all = constant;
                all.push(Arc::new(r));
                Expr::product_from_arcs(all)
            }));
        }

        if let Some(r) = self.substitution(e, depth)? {
            return Ok(Some(r));
        }

        let expanded = expand(e);
        if expanded != *e {
            let expanded = simplify(expanded);
            if expanded != *e {
                log::trace!("expanded {} to {}", e, expanded);
                if let Some(r) = self.antiderivative(&expanded, depth + 1)? {
                    return Ok(Some(r));
                }
            }
        }

        self.by_parts(&varying, depth)
    }

    fn power(
        &mut self,
        e: &Expr,
        base: &Arc<Expr>,
        exp: &Arc<Expr>,
        depth: usize,
    ) -> Result<Option<Expr>, CalcError> {
        if !exp.contains_var(self.var) {
            if let Some(a) = self.linear_slope(base)? {
                if exp.is_neg_one_num() {
                    return Ok(Some(over(Expr::func("log", (**base).clone()), a)));
                }
                // (ax + b)^(n+1) / (a*(n+1))
                let raised = simplify(Expr::add_expr((**exp).clone(), Expr::number(1.0)));
                let result = over(
                    Expr::pow((**base).clone(), raised.clone()),
                    Expr::mul_expr(a, raised),
                );
                return Ok(Some(result));
            }

            if let Some(n) = exp.as_number() {
                if let ExprKind::FunctionCall { name, args } = &base.kind
                    && args.len() == 1
                    && let Some(a) = self.linear_slope(&args[0])?
                    && let Some(r) = table::trig_power_antiderivative(name, &args[0], n)
                {
                    return Ok(Some(over(r, a)));
                }
                if let Some(r) = table::inverse_trig_antiderivative(base, n, self.var) {
                    return Ok(Some(r));
                }
                if matches!(base.kind, ExprKind::Sum(_))
                    && as_integer(n).is_some_and(|k| (2..=MAX_EXPANDED_POWER).contains(&k))
                {
                    let expanded = simplify(expand(e));
                    if expanded != *e
                        && let Some(r) = self.antiderivative(&expanded, depth + 1)?
                    {
                        return Ok(Some(r));
                    }
                }
            }
        } else if !base.contains_var(self.var)
            && let Some(k) = self.linear_slope(exp)?
        {
            // a^(kx) / (k*ln a)
            let ln_base = if base.as_symbol() == Some("E") {
                Expr::number(1.0)
            } else {
                Expr::func("log", (**base).clone())
            };
            return Ok(Some(over(e.clone(), Expr::mul_expr(k, ln_base))));
        }

        self.substitution(e, depth)
    }

    fn function(
        &mut self,
        e: &Expr,
        name: &str,
        args: &[Arc<Expr>],
        depth: usize,
    ) -> Result<Option<Expr>, CalcError> {
        match args {
            [u] => {
                if let Some(a) = self.linear_slope(u)?
                    && let Some(r) = table::function_antiderivative(name, u)
                {
                    return Ok(Some(over(r, a)));
                }
            }
            // log(u, b) = log(u) / log(b)
            [u, b] if name == "log" && !b.contains_var(self.var) => {
                let natural = Expr::func("log", (**u).clone());
                return Ok(self
                    .antiderivative(&natural, depth + 1)?
                    .map(|r| over(r, Expr::func("log", (**b).clone()))));
            }
            _ => {}
        }
        self.substitution(e, depth)
    }

    /// Reverse chain rule: find `g` with `e = f(g) * g'`
    fn substitution(&mut self, e: &Expr, depth: usize) -> Result<Option<Expr>, CalcError> {
        if depth >= MAX_DEPTH {
            return Ok(None);
        }

        let mut candidates = Vec::new();
        collect_candidates(e, self.var, &mut candidates);
        let mut seen = FxHashSet::default();
        candidates.retain(|g| g != e && seen.insert(g.clone()));
        candidates.sort_by_key(|g| Reverse(g.node_count()));
        candidates.truncate(MAX_CANDIDATES);

        let placeholder_name = format!("_u{depth}");
        let placeholder = Expr::symbol(&placeholder_name);

        for g in candidates {
            let dg = simplify(g.derive(self.var)?);
            if dg.is_zero_num() {
                continue;
            }
            let ratio = simplify(Expr::mul_expr(e.clone(), Expr::powf(dg, -1.0)));
            let replaced = simplify(ratio.replace(&g, &placeholder));
            if replaced.contains_var(self.var) {
                continue;
            }

            let mut inner = Integrator {
                var: &placeholder_name,
                attempts: self.attempts,
            };
            let outcome = inner.antiderivative(&replaced, depth + 1)?;
            self.attempts = inner.attempts;
            if let Some(r) = outcome {
                log::debug!("substituted {} = {} in {}", placeholder_name, g, e);
                return Ok(Some(r.substitute(&placeholder_name, &g)));
            }
        }
        Ok(None)
    }
}

/// Non-trivial subexpressions of `e` that depend on `var`
fn collect_candidates(e: &Expr, var: &str, out: &mut Vec<Expr>) {
    if !e.contains_var(var) || e.as_symbol().is_some() {
        return;
    }
    out.push(e.clone());
    match &e.kind {
        ExprKind::FunctionCall { args: children, .. }
        | ExprKind::Sum(children)
        | ExprKind::Product(children) => {
            for c in children {
                collect_candidates(c, var, out);
            }
        }
        ExprKind::Div(u, v) | ExprKind::Pow(u, v) => {
            collect_candidates(u, var, out);
            collect_candidates(v, var, out);
        }
        ExprKind::Number(_) | ExprKind::Symbol(_) => {}
    }
}

fn sum_terms(e: &Expr) -> Vec<Arc<Expr>> {
    match &e.kind {
        ExprKind::Sum(terms) => terms.clone(),
        _ => vec![Arc::new(e.clone())],
    }
}

/// Multiply out the sums in a list of factors
fn distribute(factor_terms: Vec<Vec<Arc<Expr>>>) -> Option<Expr> {
    let mut acc: Vec<Arc<Expr>> = vec![Arc::new(Expr::number(1.0))];
    for terms in factor_terms {
        if acc.len() * terms.len() > MAX_EXPANDED_TERMS {
            return None;
        }
        acc = acc
            .iter()
            .flat_map(|a| {
                terms
                    .iter()
                    .map(move |t| Arc::new(Expr::product_from_arcs(vec![Arc::clone(a), Arc::clone(t)])))
            })
            .collect();
    }
    Some(Expr::sum_from_arcs(acc))
}

/// Expand products of sums and small integer powers of sums
fn expand(e: &Expr) -> Expr {
    let expanded = match &e.kind {
        ExprKind::Product(factors) => {
            distribute(factors.iter().map(|f| sum_terms(&expand(f))).collect())
        }
        ExprKind::Pow(base, exp) if matches!(base.kind, ExprKind::Sum(_)) => exp
            .as_number()
            .and_then(as_integer)
            .filter(|n| (2..=MAX_EXPANDED_POWER).contains(n))
            .and_then(|n| distribute((0..n).map(|_| sum_terms(base)).collect())),
        _ => None,
    };
    expanded.unwrap_or_else(|| e.clone())
}
