//! Rule against searching the graphics tree for handles inside functions.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Ident, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use crate::scan::{in_function, references};

/// Rule code for no-findobj-handles.
pub const CODE: &str = "G002";

/// Rule name for no-findobj-handles.
pub const NAME: &str = "no-findobj-handles";

const SEARCH_FUNCTIONS: &[&str] = &["findobj", "findall"];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::May, Category::Gui)
        .description("Functions may keep handles instead of searching with findobj/findall")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(references(unit, SEARCH_FUNCTIONS)
        .into_iter()
        .filter(|t| in_function(unit, t.line))
        .map(|t| {
            ctx.finding_at(
                &Ident::from_token(t),
                format!("'{}' searches the graphics tree for a handle", t.text),
            )
        })
        .collect())
}
