//! Statements and expressions.

pub mod no_clear_all;
pub mod no_eval;
pub mod no_global;
pub mod switch_otherwise;

use matlint_core::RuleDefinition;

/// Statement rules in catalog order.
#[must_use]
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        no_global::definition(),
        no_eval::definition(),
        switch_otherwise::definition(),
        no_clear_all::definition(),
    ]
}
