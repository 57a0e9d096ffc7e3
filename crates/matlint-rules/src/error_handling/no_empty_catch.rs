//! Rule forbidding empty `catch` blocks.
//!
//! An empty catch silently discards every error raised in the `try` body.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for no-empty-catch.
pub const CODE: &str = "E001";

/// Rule name for no-empty-catch.
pub const NAME: &str = "no-empty-catch";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Must, Category::ErrorHandling)
        .description("catch blocks must not be empty")
        .applies_to(Applicability::Kinds(&[NodeKind::Catch]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::Catch)
        .filter(|c| c.children.is_empty())
        .map(|c| {
            ctx.finding(c.span.start_line, c.span.start_column, "empty catch block")
                .with_help("handle the error, rethrow it, or report it with warning()")
        })
        .collect())
}
