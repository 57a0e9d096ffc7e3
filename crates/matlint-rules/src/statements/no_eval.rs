//! Rule against building code from strings at runtime.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Ident, RuleDefinition, Severity,
    SourceUnit,
};

use crate::scan::references;

/// Rule code for no-eval.
pub const CODE: &str = "S002";

/// Rule name for no-eval.
pub const NAME: &str = "no-eval";

const EVAL_FUNCTIONS: &[&str] = &["eval", "evalin", "evalc", "assignin"];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Statements)
        .description("eval and related functions should be avoided")
        .applies_to(Applicability::Any)
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(references(unit, EVAL_FUNCTIONS)
        .into_iter()
        .map(|token| {
            ctx.finding_at(
                &Ident::from_token(token),
                format!("call to '{}'", token.text),
            )
            .with_help("use dynamic field names, function handles or direct calls")
        })
        .collect())
}
