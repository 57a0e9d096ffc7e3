//! Rule against trailing whitespace.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, RuleDefinition, Severity,
    SourceUnit,
};

use crate::scan::lines;

/// Rule code for trailing-whitespace.
pub const CODE: &str = "L003";

/// Rule name for trailing-whitespace.
pub const NAME: &str = "trailing-whitespace";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Layout)
        .description("Lines should not end with whitespace")
        .applies_to(Applicability::Any)
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(lines(unit)
        .filter_map(|(n, line)| {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() == line.len() {
                return None;
            }
            let start = trimmed.chars().count() + 1;
            let end = line.chars().count() + 1;
            Some(ctx.finding_span(n, start, end, "trailing whitespace"))
        })
        .collect())
}
