//! Rule against `i` and `j` as loop variables, which shadow the imaginary unit.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for loop-variable-imaginary.
pub const CODE: &str = "N003";

/// Rule name for loop-variable-imaginary.
pub const NAME: &str = "loop-variable-imaginary";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Naming)
        .description("The imaginary units i and j should not be used as loop variables")
        .applies_to(Applicability::Kinds(&[NodeKind::For]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::For)
        .filter_map(|n| n.name.as_ref())
        .filter(|var| matches!(var.text.as_str(), "i" | "j"))
        .map(|var| {
            ctx.finding_at(
                var,
                format!("loop variable '{}' shadows the imaginary unit", var.text),
            )
            .with_help("use a descriptive index such as 'iFile' or 'k'")
        })
        .collect())
}
