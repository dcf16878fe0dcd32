use crate::{Expr, ExprKind as AstKind};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Expression kind for fast rule filtering
/// Rules declare which expression kinds they can apply to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum ExprKind {
    Number,
    Symbol,
    Sum,
    Product,
    Div,
    Pow,
    Function, // Any function call
}

impl ExprKind {
    pub(crate) const ALL: [ExprKind; 7] = [
        ExprKind::Number,
        ExprKind::Symbol,
        ExprKind::Sum,
        ExprKind::Product,
        ExprKind::Div,
        ExprKind::Pow,
        ExprKind::Function,
    ];

    /// Get the kind of an expression (cheap O(1) operation)
    #[inline]
    pub(crate) fn of(expr: &Expr) -> Self {
        match &expr.kind {
            AstKind::Number(_) => ExprKind::Number,
            AstKind::Symbol(_) => ExprKind::Symbol,
            AstKind::Sum(_) => ExprKind::Sum,
            AstKind::Product(_) => ExprKind::Product,
            AstKind::Div(_, _) => ExprKind::Div,
            AstKind::Pow(_, _) => ExprKind::Pow,
            AstKind::FunctionCall { .. } => ExprKind::Function,
        }
    }
}

/// Core trait for all simplification rules
pub(crate) trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn category(&self) -> RuleCategory;

    /// Rules that may change where an expression is defined (`x/x -> 1`)
    fn alters_domain(&self) -> bool {
        false
    }

    /// Which expression kinds this rule can apply to.
    /// Rules will ONLY be checked against expressions matching these kinds.
    fn applies_to(&self) -> &'static [ExprKind];

    fn apply(&self, expr: &Expr, context: &RuleContext) -> Option<Expr>;
}

/// Categories of simplification rules
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum RuleCategory {
    Numeric,   // Constant folding, identities
    Algebraic, // General algebraic rules
    Trigonometric,
    Exponential,
}

/// Context passed to rules during application
#[derive(Clone, Debug, Default)]
pub(crate) struct RuleContext {
    pub depth: usize,
    pub domain_safe: bool,
}

impl RuleContext {
    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }
}

/// Declare a unit struct implementing `Rule`
///
/// `rule!(Name, "name", priority, Category, &[kinds], |expr: &Expr, ctx: &RuleContext| { ... })`
/// Add `alters_domain` after the kinds for rules that may widen the domain.
macro_rules! rule {
    ($name:ident, $id:expr, $priority:expr, $category:ident, $kinds:expr, alters_domain,
     |$expr:ident : &Expr, $ctx:ident : &RuleContext| $body:block) => {
        rule!(@define $name, $id, $priority, $category, $kinds, true, $expr, $ctx, $body);
    };
    ($name:ident, $id:expr, $priority:expr, $category:ident, $kinds:expr,
     |$expr:ident : &Expr, $ctx:ident : &RuleContext| $body:block) => {
        rule!(@define $name, $id, $priority, $category, $kinds, false, $expr, $ctx, $body);
    };
    (@define $name:ident, $id:expr, $priority:expr, $category:ident, $kinds:expr, $alters:expr,
     $expr:ident, $ctx:ident, $body:block) => {
        pub(crate) struct $name;

        impl $crate::simplification::rules::Rule for $name {
            fn name(&self) -> &'static str {
                $id
            }

            fn priority(&self) -> i32 {
                $priority
            }

            fn category(&self) -> $crate::simplification::rules::RuleCategory {
                $crate::simplification::rules::RuleCategory::$category
            }

            fn alters_domain(&self) -> bool {
                $alters
            }

            fn applies_to(&self) -> &'static [$crate::simplification::rules::ExprKind] {
                $kinds
            }

            fn apply(
                &self,
                $expr: &$crate::Expr,
                $ctx: &$crate::simplification::rules::RuleContext,
            ) -> Option<$crate::Expr> $body
        }
    };
}

/// Numeric simplification rules
pub(crate) mod numeric;

/// Algebraic simplification rules
pub(crate) mod algebraic;

/// Trigonometric simplification rules
pub(crate) mod trigonometric;

/// Exponential and logarithmic simplification rules
pub(crate) mod exponential;

/// Rule Registry for loading and kind-indexed lookup
pub(crate) struct RuleRegistry {
    pub(crate) rules: Vec<Arc<dyn Rule>>,
    /// Rules indexed by expression kind for fast lookup
    rules_by_kind: FxHashMap<ExprKind, Vec<Arc<dyn Rule>>>,
}

impl RuleRegistry {
    pub(crate) fn new() -> Self {
        Self {
            rules: Vec::new(),
            rules_by_kind: FxHashMap::default(),
        }
    }

    pub(crate) fn load_all_rules(&mut self) {
        self.rules.extend(numeric::get_numeric_rules());
        self.rules.extend(algebraic::get_algebraic_rules());
        self.rules.extend(trigonometric::get_trigonometric_rules());
        self.rules.extend(exponential::get_exponential_rules());

        // Sort by category, then by priority (higher first)
        self.rules.sort_by_key(|r| {
            (
                match r.category() {
                    RuleCategory::Numeric => 0,
                    RuleCategory::Algebraic => 1,
                    RuleCategory::Trigonometric => 2,
                    RuleCategory::Exponential => 3,
                },
                -r.priority(),
            )
        });
    }

    /// Order rules by priority and build the kind index
    pub(crate) fn order_by_priority(&mut self) {
        // Stable sort: category order from load_all_rules breaks ties
        self.rules.sort_by_key(|r| std::cmp::Reverse(r.priority()));
        self.build_kind_index();
    }

    fn build_kind_index(&mut self) {
        self.rules_by_kind.clear();
        for kind in ExprKind::ALL {
            self.rules_by_kind.insert(kind, Vec::new());
        }

        for rule in &self.rules {
            for &kind in rule.applies_to() {
                if let Some(rules) = self.rules_by_kind.get_mut(&kind) {
                    rules.push(Arc::clone(rule));
                }
            }
        }
    }

    /// Get only rules that apply to a specific expression kind
    #[inline]
    pub(crate) fn get_rules_for_kind(&self, kind: ExprKind) -> &[Arc<dyn Rule>] {
        self.rules_by_kind
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
