use crate::simplification::rules::Rule;
use std::sync::Arc;

pub(crate) mod canonicalization;
pub(crate) mod combination;
pub(crate) mod fractions;
pub(crate) mod powers;

/// Get all algebraic rules in priority order
pub(crate) fn get_algebraic_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        // Power rules
        Arc::new(powers::PowerZeroRule),
        Arc::new(powers::PowerOneRule),
        Arc::new(powers::OneBaseRule),
        Arc::new(powers::ZeroBaseRule),
        Arc::new(powers::PowerPowerRule),
        Arc::new(powers::PowerOfProductRule),
        Arc::new(powers::CombinePowersRule),
        // Fraction rules
        Arc::new(fractions::DivToProductRule),
        // Combination rules
        Arc::new(combination::CombineLikeTermsRule),
        Arc::new(combination::DistributeNumericRule),
        // Canonicalization rules
        Arc::new(canonicalization::CanonicalSumOrderRule),
    ]
}
