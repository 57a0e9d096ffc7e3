//! Rule requiring class names to start with an uppercase letter.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for class-name-case.
pub const CODE: &str = "N005";

/// Rule name for class-name-case.
pub const NAME: &str = "class-name-case";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Naming)
        .description("Class names should be UpperCamelCase")
        .applies_to(Applicability::Kinds(&[NodeKind::ClassDef]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let mut findings = Vec::new();
    for class in unit.nodes_of(NodeKind::ClassDef) {
        let name = class
            .name
            .as_ref()
            .ok_or_else(|| CheckFault::unexpected_shape(class, "a named classdef"))?;
        if !name.text.starts_with(|c: char| c.is_ascii_uppercase()) {
            findings.push(ctx.finding_at(
                name,
                format!("class name '{}' should start with an uppercase letter", name.text),
            ));
        }
    }
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::run;

    #[test]
    fn test_detects_lowercase_class() {
        let findings = run(&definition(), "classdef sensor < handle\nend\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.column, 10);
    }

    #[test]
    fn test_allows_upper_camel() {
        assert!(run(&definition(), "classdef (Sealed) Sensor\nend\n").is_empty());
    }
}
