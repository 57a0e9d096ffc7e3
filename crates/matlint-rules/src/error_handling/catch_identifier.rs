//! Rule requiring `catch` to capture the exception object.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for catch-identifier.
pub const CODE: &str = "E003";

/// Rule name for catch-identifier.
pub const NAME: &str = "catch-identifier";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::ErrorHandling)
        .description("catch should name the exception object (catch err)")
        .applies_to(Applicability::Kinds(&[NodeKind::Catch]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::Catch)
        .filter(|c| c.name.is_none())
        .map(|c| {
            ctx.finding_span(
                c.span.start_line,
                c.span.start_column,
                c.span.start_column + "catch".len(),
                "catch does not capture the exception",
            )
            .with_help("write 'catch err' and use err.identifier / err.message")
        })
        .collect())
}
