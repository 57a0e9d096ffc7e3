//! Rule forbidding global variables.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for no-global.
pub const CODE: &str = "S001";

/// Rule name for no-global.
pub const NAME: &str = "no-global";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Must, Category::Statements)
        .description("Global variables must not be used")
        .applies_to(Applicability::Kinds(&[NodeKind::Global]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::Global)
        .map(|node| {
            let names: Vec<&str> = node.params.iter().map(|p| p.text.as_str()).collect();
            ctx.finding(
                node.span.start_line,
                node.span.start_column,
                format!("global declaration of {}", names.join(", ")),
            )
            .with_help("pass the values as arguments or keep them in an object")
        })
        .collect())
}
