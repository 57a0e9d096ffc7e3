//! Rule requiring lowerCamelCase variable names.
//!
//! Constants written in `ALL_CAPS` are accepted. Each name is reported at
//! its first assignment in each function. Class property declarations and
//! argument validation blocks are not variables and are skipped.

use std::collections::HashSet;

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use super::{is_constant_case, is_lower_camel, to_lower_camel};
use crate::scan::{assignment_targets, nodes_with_scope};

/// Rule code for variable-name-case.
pub const CODE: &str = "N002";

/// Rule name for variable-name-case.
pub const NAME: &str = "variable-name-case";

const DECLARATION_BLOCKS: &[NodeKind] = &[
    NodeKind::Properties,
    NodeKind::Events,
    NodeKind::Enumeration,
    NodeKind::Arguments,
];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Naming)
        .description("Variable names should be lowerCamelCase; constants may be ALL_CAPS")
        .applies_to(Applicability::Kinds(&[NodeKind::Statement]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let mut seen = HashSet::new();
    let mut findings = Vec::new();

    for (scope, parent, node) in nodes_with_scope(unit) {
        if DECLARATION_BLOCKS.contains(&parent) {
            continue;
        }
        for target in assignment_targets(unit, node) {
            if !seen.insert((scope, target.text.clone())) {
                continue;
            }
            if is_lower_camel(&target.text) || is_constant_case(&target.text) {
                continue;
            }
            findings.push(
                ctx.finding_at(
                    &target,
                    format!("variable name '{}' should be lowerCamelCase", target.text),
                )
                .with_help(format!("rename to '{}'", to_lower_camel(&target.text))),
            );
        }
    }
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::{lines_of, run};

    #[test]
    fn test_detects_bad_names_once() {
        let src = "Total = 0;\nTotal = Total + 1;\nrow_count = 2;\n";
        let findings = run(&definition(), src);
        assert_eq!(lines_of(&findings), vec![1, 3]);
        assert_eq!(
            findings[1].message,
            "variable name 'row_count' should be lowerCamelCase"
        );
    }

    #[test]
    fn test_allows_camel_and_constants() {
        assert!(run(&definition(), "rowCount = 1;\nMAX_ITER = 10;\nx = 2;\n").is_empty());
    }

    #[test]
    fn test_checks_multiple_outputs() {
        let findings = run(&definition(), "[Rows, cols] = size(m);\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.column, 2);
    }

    #[test]
    fn test_reports_each_function_separately() {
        let src = "function main()\nBad_Name = 1;\nBad_Name = 2;\nend\n\nfunction helper()\nBad_Name = 3;\nend\n";
        let findings = run(&definition(), src);
        assert_eq!(lines_of(&findings), vec![2, 7]);
    }

    #[test]
    fn test_skips_argument_defaults() {
        let src = "function y = scale(x, Factor)\narguments\n    x double\n    Factor double = 2\nend\ny = Factor * x;\nend\n";
        assert!(run(&definition(), src).is_empty());
    }

    #[test]
    fn test_skips_property_declarations() {
        let src = "classdef Sensor\n  properties\n    SampleRate = 10\n  end\nend\n";
        assert!(run(&definition(), src).is_empty());
    }
}
