//! Rule limiting function length.
//!
//! # Configuration
//!
//! ```toml
//! [rules.L005]
//! max_function_lines = 60
//! ```

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

/// Rule code for function-length.
pub const CODE: &str = "L005";

/// Rule name for function-length.
pub const NAME: &str = "function-length";

/// Default maximum lines per function, header and `end` included.
pub const DEFAULT_MAX_FUNCTION_LINES: usize = 100;

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::May, Category::Layout)
        .description("Functions may be split when longer than the maximum (100 lines by default)")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let max = ctx.int_option("max_function_lines", DEFAULT_MAX_FUNCTION_LINES);
    let mut findings = Vec::new();
    for func in unit.nodes_of(NodeKind::Function) {
        let length = func.span.line_count();
        if length <= max {
            continue;
        }
        let name = func
            .name
            .as_ref()
            .ok_or_else(|| CheckFault::unexpected_shape(func, "a named function"))?;
        findings.push(ctx.finding_at(
            name,
            format!("function '{}' is {length} lines long (maximum {max})", name.text),
        ));
    }
    Ok(findings)
}
