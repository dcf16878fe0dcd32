//! Numeric evaluation with at most one bound variable.
//!
//! Domain violations (`log(-1)`, `1/0`) produce NaN or infinities rather than
//! errors; only structural problems such as unbound symbols fail.

use super::{Expr, ExprKind};
use crate::core::known_symbols;
use crate::functions::registry::Registry;
use crate::CalcError;

impl Expr {
    /// Evaluate with `var` bound to `value`
    ///
    /// # Errors
    /// Returns `CalcError::UnboundSymbol` for any other free symbol and
    /// `CalcError::UnknownFunction` for calls missing from the registry.
    pub fn eval_f64(&self, var: &str, value: f64) -> Result<f64, CalcError> {
        self.eval_with(Some((var, value)))
    }

    /// Evaluate an expression that has no free symbols
    ///
    /// # Errors
    /// Same as [`Expr::eval_f64`].
    pub fn eval_constant(&self) -> Result<f64, CalcError> {
        self.eval_with(None)
    }

    fn eval_with(&self, binding: Option<(&str, f64)>) -> Result<f64, CalcError> {
        match &self.kind {
            ExprKind::Number(n) => Ok(*n),
            ExprKind::Symbol(name) => match binding {
                Some((var, value)) if name.as_ref() == var => Ok(value),
                _ => known_symbols::constant_value(name).ok_or_else(|| {
                    CalcError::UnboundSymbol {
                        name: name.to_string(),
                    }
                }),
            },
            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get(name).ok_or_else(|| CalcError::UnknownFunction {
                    name: name.to_string(),
                })?;
                if !def.validate_arity(args.len()) {
                    return Err(CalcError::UnsupportedOperation(format!(
                        "{} takes {:?} arguments, got {}",
                        name,
                        def.arity,
                        args.len()
                    )));
                }
                let values = args
                    .iter()
                    .map(|a| a.eval_with(binding))
                    .collect::<Result<Vec<f64>, _>>()?;
                Ok((def.eval)(&values).unwrap_or(f64::NAN))
            }
            ExprKind::Sum(terms) => terms
                .iter()
                .try_fold(0.0, |acc, t| Ok(acc + t.eval_with(binding)?)),
            ExprKind::Product(factors) => factors
                .iter()
                .try_fold(1.0, |acc, f| Ok(acc * f.eval_with(binding)?)),
            ExprKind::Div(u, v) => Ok(u.eval_with(binding)? / v.eval_with(binding)?),
            ExprKind::Pow(u, v) => {
                let base = u.eval_with(binding)?;
                let exp = v.eval_with(binding)?;
                Ok(base.powf(exp))
            }
        }
    }
}
