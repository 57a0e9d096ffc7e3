//! GUI code.

pub mod no_findobj_handles;
pub mod no_gcf_gca;

use matlint_core::RuleDefinition;

/// GUI rules in catalog order.
#[must_use]
pub fn definitions() -> Vec<RuleDefinition> {
    vec![no_gcf_gca::definition(), no_findobj_handles::definition()]
}
