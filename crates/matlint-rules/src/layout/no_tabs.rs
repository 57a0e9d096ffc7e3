//! Rule forbidding tab characters.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, RuleDefinition, Severity,
    SourceUnit,
};

use crate::scan::lines;

/// Rule code for no-tabs.
pub const CODE: &str = "L002";

/// Rule name for no-tabs.
pub const NAME: &str = "no-tabs";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Must, Category::Layout)
        .description("Indentation must use spaces, not tab characters")
        .applies_to(Applicability::Any)
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(lines(unit)
        .filter_map(|(n, line)| {
            let column = line.chars().position(|c| c == '\t')? + 1;
            Some(
                ctx.finding_span(n, column, column + 1, "tab character")
                    .with_help("configure the editor to insert spaces"),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::run;

    #[test]
    fn test_reports_first_tab_per_line() {
        let findings = run(&definition(), "if x\n\ty = 1;\t\nend\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.line, 2);
        assert_eq!(findings[0].location.column, 1);
    }

    #[test]
    fn test_allows_spaces() {
        assert!(run(&definition(), "if x\n    y = 1;\nend\n").is_empty());
    }
}
