//! Rule against several statements on one line.

use std::collections::BTreeMap;

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Node, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for one-statement-per-line.
pub const CODE: &str = "L006";

/// Rule name for one-statement-per-line.
pub const NAME: &str = "one-statement-per-line";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Layout)
        .description("Each line should hold at most one statement")
        .applies_to(Applicability::Any)
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let mut by_line: BTreeMap<usize, Vec<&Node>> = BTreeMap::new();
    for node in unit.root().walk().filter(|n| n.kind != NodeKind::Script) {
        by_line.entry(node.span.start_line).or_default().push(node);
    }

    Ok(by_line
        .into_iter()
        .filter_map(|(line, mut nodes)| {
            if nodes.len() < 2 {
                return None;
            }
            nodes.sort_by_key(|n| n.span.start_column);
            let second = nodes[1];
            Some(ctx.finding(
                line,
                second.span.start_column,
                format!("{} statements on one line", nodes.len()),
            ))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::run;

    #[test]
    fn test_detects_multiple_statements() {
        let findings = run(&definition(), "x = 1; y = 2;\nz = 3;\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.column, 8);
        assert_eq!(findings[0].message, "2 statements on one line");
    }

    #[test]
    fn test_detects_single_line_block() {
        let findings = run(&definition(), "if x, y = 1; end\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_allows_trailing_comment() {
        assert!(run(&definition(), "x = 1; % set x\ny = [1, 2; 3, 4];\n").is_empty());
    }
}
