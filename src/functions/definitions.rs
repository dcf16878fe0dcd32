//! Function definitions for the registry
//!
//! Evaluation and symbolic differentiation rules for every supported function.
//! Derivative formulas are the standard calculus ones.

use super::registry::FunctionDefinition;
use super::{func_arc, mul_opt, neg, recip};
use crate::Expr;
use std::sync::Arc;

/// 1 - u^2, shared by the inverse sine and cosine rules
fn one_minus_square(u: Arc<Expr>) -> Expr {
    Expr::sub_expr(
        Expr::number(1.0),
        Expr::pow_from_arcs(u, Arc::new(Expr::number(2.0))),
    )
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(func_arc("cos", u), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(neg(func_arc("sin", u)), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Some(args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = u' / cos^2(u)
                let u = Arc::clone(&args[0]);
                mul_opt(
                    Expr::powf(func_arc("cos", u), -2.0),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx cot(u) = -u' / sin^2(u)
                let u = Arc::clone(&args[0]);
                mul_opt(
                    neg(Expr::powf(func_arc("sin", u), -2.0)),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx sec(u) = sec(u)tan(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(
                    Expr::mul_expr(func_arc("sec", Arc::clone(&u)), func_arc("tan", u)),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx csc(u) = -csc(u)cot(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(
                    neg(Expr::mul_expr(
                        func_arc("csc", Arc::clone(&u)),
                        func_arc("cot", u),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        // Inverse Trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| Some(args[0].asin()),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                let u = Arc::clone(&args[0]);
                mul_opt(
                    Expr::powf(one_minus_square(u), -0.5),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| Some(args[0].acos()),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                let u = Arc::clone(&args[0]);
                mul_opt(
                    neg(Expr::powf(one_minus_square(u), -0.5)),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                let u = Arc::clone(&args[0]);
                let denom = Expr::add_expr(
                    Expr::pow_from_arcs(u, Arc::new(Expr::number(2.0))),
                    Expr::number(1.0),
                );
                mul_opt(recip(denom), arg_primes[0].clone())
            },
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
            derivative: |args, arg_primes| {
                // d/dx sinh(u) = cosh(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(func_arc("cosh", u), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
            derivative: |args, arg_primes| {
                // d/dx cosh(u) = sinh(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(func_arc("sinh", u), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = (1 - tanh^2(u)) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(
                    Expr::sub_expr(
                        Expr::number(1.0),
                        Expr::powf(func_arc("tanh", u), 2.0),
                    ),
                    arg_primes[0].clone(),
                )
            },
        },
        // Exponential / Logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Some(args[0].exp()),
            derivative: |args, arg_primes| {
                // d/dx exp(u) = exp(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(func_arc("exp", u), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |args| match args {
                [x] => Some(x.ln()),
                [x, base] => Some(x.ln() / base.ln()),
                _ => None,
            },
            derivative: |args, arg_primes| {
                // d/dx log(u) = u'/u, d/dx log(u, b) = u'/(u*log(b)) for constant b
                let u = Expr::unwrap_arc(Arc::clone(&args[0]));
                let inv = match args.get(1) {
                    Some(base) => recip(Expr::mul_expr(u, func_arc("log", Arc::clone(base)))),
                    None => recip(u),
                };
                mul_opt(inv, arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| Some(args[0].sqrt()),
            derivative: |args, arg_primes| {
                // d/dx sqrt(u) = u' / (2*sqrt(u))
                let u = Expr::unwrap_arc(Arc::clone(&args[0]));
                mul_opt(
                    Expr::mul_expr(Expr::number(0.5), Expr::powf(u, -0.5)),
                    arg_primes[0].clone(),
                )
            },
        },
        // Piecewise
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: |args, arg_primes| {
                // d/dx |u| = sign(u) * u'
                let u = Arc::clone(&args[0]);
                mul_opt(func_arc("sign", u), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            eval: |args| {
                let x = args[0];
                Some(if x == 0.0 { 0.0 } else { x.signum() })
            },
            derivative: |_, _| Expr::number(0.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::super::registry::Registry;
    use super::*;

    #[test]
    fn test_names_unique() {
        let defs = all_definitions();
        let mut names: Vec<&str> = defs.iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn test_eval_log_base() {
        let log = Registry::get("log").unwrap();
        let v = (log.eval)(&[8.0, 2.0]).unwrap();
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sign_at_zero() {
        let sign = Registry::get("sign").unwrap();
        assert_eq!((sign.eval)(&[0.0]), Some(0.0));
        assert_eq!((sign.eval)(&[-3.0]), Some(-1.0));
    }
}
