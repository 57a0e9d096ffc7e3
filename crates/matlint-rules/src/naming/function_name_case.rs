//! Rule requiring function names to start with a lowercase letter.
//!
//! Class constructors share the class name and are exempt, as are property
//! accessors (`get.Name`, `set.Name`).

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use super::to_lower_camel;

/// Rule code for function-name-case.
pub const CODE: &str = "N001";

/// Rule name for function-name-case.
pub const NAME: &str = "function-name-case";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Must, Category::Naming)
        .description("Function names must start with a lowercase letter")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let class_names: Vec<&str> = unit
        .nodes_of(NodeKind::ClassDef)
        .filter_map(|c| c.name.as_ref())
        .map(|n| n.text.as_str())
        .collect();

    let mut findings = Vec::new();
    for func in unit.nodes_of(NodeKind::Function) {
        let name = func
            .name
            .as_ref()
            .ok_or_else(|| CheckFault::unexpected_shape(func, "a named function"))?;
        if name.text.contains('.') || class_names.contains(&name.text.as_str()) {
            continue;
        }
        if name.text.starts_with(|c: char| c.is_ascii_uppercase()) {
            findings.push(
                ctx.finding_at(
                    name,
                    format!(
                        "function name '{}' must start with a lowercase letter",
                        name.text
                    ),
                )
                .with_help(format!("rename to '{}'", to_lower_camel(&name.text))),
            );
        }
    }
    Ok(findings)
}
