//! Rule limiting line length.
//!
//! # Configuration
//!
//! ```toml
//! [rules.L001]
//! max_line_length = 100
//! ```

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, RuleDefinition, Severity,
    SourceUnit,
};

use crate::scan::lines;

/// Rule code for line-length.
pub const CODE: &str = "L001";

/// Rule name for line-length.
pub const NAME: &str = "line-length";

/// Default maximum line length in characters.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Layout)
        .description("Lines should not exceed the maximum length (80 by default)")
        .applies_to(Applicability::Any)
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let max = ctx.int_option("max_line_length", DEFAULT_MAX_LINE_LENGTH);
    Ok(lines(unit)
        .filter_map(|(n, line)| {
            let len = line.chars().count();
            (len > max).then(|| {
                ctx.finding_span(
                    n,
                    max + 1,
                    len + 1,
                    format!("line is {len} characters long (maximum {max})"),
                )
            })
        })
        .collect())
}
