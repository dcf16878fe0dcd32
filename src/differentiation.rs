// Differentiation engine - applies calculus rules
//
// Inline 0/1 checks keep intermediate trees small; the simplifier tidies the
// rest afterwards.

use crate::functions::registry::Registry;
use crate::{CalcError, Expr, ExprKind};
use std::sync::Arc;

impl Expr {
    /// Differentiate this expression with respect to a variable
    ///
    /// The result is not simplified.
    ///
    /// # Errors
    /// Returns `CalcError::UnknownFunction` for calls missing from the registry.
    pub fn derive(&self, var: &str) -> Result<Expr, CalcError> {
        Ok(match &self.kind {
            ExprKind::Number(_) => Expr::number(0.0),

            ExprKind::Symbol(name) => {
                if name.as_ref() == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            // Chain rule through the registry
            ExprKind::FunctionCall { name, args } => {
                if !self.contains_var(var) {
                    return Ok(Expr::number(0.0));
                }
                let def = Registry::get(name).ok_or_else(|| CalcError::UnknownFunction {
                    name: name.to_string(),
                })?;
                let arg_primes = args
                    .iter()
                    .map(|a| a.derive(var))
                    .collect::<Result<Vec<Expr>, _>>()?;
                (def.derivative)(args, &arg_primes)
            }

            // Sum rule: (a + b + c + ...)' = a' + b' + c' + ...
            ExprKind::Sum(terms) => {
                let derivatives = terms
                    .iter()
                    .map(|t| t.derive(var))
                    .filter(|d| !matches!(d, Ok(e) if e.is_zero_num()))
                    .collect::<Result<Vec<Expr>, _>>()?;
                Expr::sum(derivatives)
            }

            // N-ary Product rule: (a * b * c)' = a' * b * c + a * b' * c + a * b * c'
            ExprKind::Product(factors) => {
                let mut result_terms: Vec<Arc<Expr>> = Vec::new();

                for (i, factor) in factors.iter().enumerate() {
                    let factor_prime = factor.derive(var)?;
                    if factor_prime.is_zero_num() {
                        continue;
                    }

                    let mut all_factors: Vec<Arc<Expr>> = factors
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, f)| Arc::clone(f))
                        .collect();
                    if !factor_prime.is_one_num() {
                        all_factors.push(Arc::new(factor_prime));
                    }
                    result_terms.push(Arc::new(Expr::product_from_arcs(all_factors)));
                }

                Expr::sum_from_arcs(result_terms)
            }

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            ExprKind::Div(u, v) => {
                let u_prime = u.derive(var)?;
                let v_prime = v.derive(var)?;

                if v_prime.is_zero_num() {
                    // Constant denominator: u' / v
                    if u_prime.is_zero_num() {
                        return Ok(Expr::number(0.0));
                    }
                    return Ok(Expr::div_from_arcs(Arc::new(u_prime), Arc::clone(v)));
                }

                let term1 = Expr::product_from_arcs(vec![Arc::new(u_prime), Arc::clone(v)]);
                let term2 = Expr::product_from_arcs(vec![Arc::clone(u), Arc::new(v_prime)]);
                let numerator = Expr::sub_expr(term1, term2);
                let denominator = Expr::pow_from_arcs(Arc::clone(v), Arc::new(Expr::number(2.0)));
                Expr::div_expr(numerator, denominator)
            }

            ExprKind::Pow(u, v) => {
                if !v.contains_var(var) {
                    // Constant exponent: (u^n)' = n * u^(n-1) * u'
                    let u_prime = u.derive(var)?;
                    if u_prime.is_zero_num() {
                        return Ok(Expr::number(0.0));
                    }

                    let n = Expr::unwrap_arc(Arc::clone(v));
                    let n_minus_1 = match n.as_number() {
                        Some(0.0) => return Ok(Expr::number(0.0)),
                        Some(n_val) => Expr::number(n_val - 1.0),
                        None => Expr::sub_expr(n.clone(), Expr::number(1.0)),
                    };
                    let u_pow = Expr::pow_from_arcs(Arc::clone(u), Arc::new(n_minus_1));

                    let mut factors = vec![n, u_pow];
                    if !u_prime.is_one_num() {
                        factors.push(u_prime);
                    }
                    Expr::product(factors)
                } else if !u.contains_var(var) {
                    // Constant base: (a^v)' = a^v * ln(a) * v'
                    let v_prime = v.derive(var)?;
                    let ln_a = match u.as_symbol() {
                        Some(crate::core::known_symbols::EULER) => Expr::number(1.0),
                        _ => Expr::func("log", Expr::unwrap_arc(Arc::clone(u))),
                    };
                    Expr::product(vec![self.clone(), ln_a, v_prime])
                } else {
                    // Variable base and exponent - logarithmic differentiation
                    // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                    let u_prime = u.derive(var)?;
                    let v_prime = v.derive(var)?;
                    let ln_u = Expr::func("log", Expr::unwrap_arc(Arc::clone(u)));
                    let term1 = Expr::mul_expr(v_prime, ln_u);
                    let term2 = Expr::product(vec![
                        Expr::unwrap_arc(Arc::clone(v)),
                        u_prime,
                        Expr::powf(Expr::unwrap_arc(Arc::clone(u)), -1.0),
                    ]);
                    Expr::mul_expr(self.clone(), Expr::add_expr(term1, term2))
                }
            }
        })
    }
}
