//! Rule against negated boolean names such as `isNotFound`.

use std::collections::HashSet;

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use crate::scan::assignment_targets;

/// Rule code for negated-boolean-name.
pub const CODE: &str = "N006";

/// Rule name for negated-boolean-name.
pub const NAME: &str = "negated-boolean-name";

const PREFIXES: &[&str] = &["is", "has", "can", "should", "was"];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::May, Category::Naming)
        .description("Boolean variable names should not be negated")
        .applies_to(Applicability::Kinds(&[NodeKind::Statement]))
        .check(check)
}

/// Splits `isNotFound` into (`is`, `Found`).
fn negated_parts(name: &str) -> Option<(&str, &str)> {
    PREFIXES.iter().find_map(|prefix| {
        let rest = name.strip_prefix(prefix)?.strip_prefix("Not")?;
        rest.starts_with(|c: char| c.is_ascii_uppercase())
            .then_some((*prefix, rest))
    })
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let mut seen = HashSet::new();
    let mut findings = Vec::new();
    for node in unit.nodes_of(NodeKind::Statement) {
        for target in assignment_targets(unit, node) {
            let Some((prefix, rest)) = negated_parts(&target.text) else {
                continue;
            };
            if seen.insert(target.text.clone()) {
                findings.push(
                    ctx.finding_at(
                        &target,
                        format!("boolean name '{}' is negated", target.text),
                    )
                    .with_help(format!("prefer '{prefix}{rest}' and invert the logic")),
                );
            }
        }
    }
    Ok(findings)
}
