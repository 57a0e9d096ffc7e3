//! Rule requiring an `otherwise` arm in every `switch`.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for switch-otherwise.
pub const CODE: &str = "S003";

/// Rule name for switch-otherwise.
pub const NAME: &str = "switch-otherwise";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Statements)
        .description("switch statements should include an otherwise arm")
        .applies_to(Applicability::Kinds(&[NodeKind::Switch]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::Switch)
        .filter(|s| !s.children.iter().any(|c| c.kind == NodeKind::Otherwise))
        .map(|s| {
            ctx.finding(s.span.start_line, s.span.start_column, "switch has no otherwise arm")
                .with_help("add an otherwise arm that handles or reports unexpected values")
        })
        .collect())
}
