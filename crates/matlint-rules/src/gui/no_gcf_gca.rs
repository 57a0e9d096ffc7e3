//! Rule against relying on the current figure or axes inside functions.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Ident, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use crate::scan::{in_function, references};

/// Rule code for no-gcf-gca.
pub const CODE: &str = "G001";

/// Rule name for no-gcf-gca.
pub const NAME: &str = "no-gcf-gca";

const CURRENT_OBJECT_FUNCTIONS: &[&str] = &["gcf", "gca", "gco"];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Gui)
        .description("Functions should use explicit graphics handles instead of gcf/gca/gco")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(references(unit, CURRENT_OBJECT_FUNCTIONS)
        .into_iter()
        .filter(|t| in_function(unit, t.line))
        .map(|t| {
            ctx.finding_at(
                &Ident::from_token(t),
                format!("'{}' depends on whichever graphics object is current", t.text),
            )
            .with_help("pass the figure or axes handle explicitly")
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::{lines_of, run};

    #[test]
    fn test_detects_current_object_calls() {
        let src = "function plotData(x)\n  plot(gca, x);\n  set(gcf, 'Name', 'Data');\nend\n";
        assert_eq!(lines_of(&run(&definition(), src)), vec![2, 3]);
    }

    #[test]
    fn test_allows_explicit_handles_and_scripts() {
        assert!(run(&definition(), "function f(ax)\n  plot(ax, 1);\nend\n").is_empty());
        assert!(run(&definition(), "plot(gca, 1);\n").is_empty());
    }
}
