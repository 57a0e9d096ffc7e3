//! Error handling.

pub mod catch_identifier;
pub mod error_identifier;
pub mod no_empty_catch;

use matlint_core::{Category, RuleDefinition, Severity};

/// Rule code for try-for-control-flow.
pub const TRY_FOR_CONTROL_FLOW: &str = "E004";

/// Error handling rules in catalog order.
#[must_use]
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        no_empty_catch::definition(),
        error_identifier::definition(),
        catch_identifier::definition(),
        RuleDefinition::new(
            TRY_FOR_CONTROL_FLOW,
            "try-for-control-flow",
            Severity::Should,
            Category::ErrorHandling,
        )
        .description("try/catch should handle errors, not implement ordinary control flow")
        .advisory(),
    ]
}
