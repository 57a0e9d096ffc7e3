//! Rule requiring a header (H1) comment directly after each function line.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit, TokenKind,
};

/// Rule code for function-header-comment.
pub const CODE: &str = "L004";

/// Rule name for function-header-comment.
pub const NAME: &str = "function-header-comment";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Layout)
        .description("Functions should start with a header comment describing them")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let mut findings = Vec::new();
    for func in unit.nodes_of(NodeKind::Function) {
        // Abstract signatures have no body to document.
        if func.span.line_count() == 1 && func.children.is_empty() {
            continue;
        }
        let tokens = unit.tokens();
        let header_end = func.tokens.end.min(tokens.len());
        let header_line = header_end
            .checked_sub(1)
            .map_or(func.span.start_line, |last| tokens[last].line);
        // A comment trailing the function line is not an H1 line.
        let documented = tokens[header_end..]
            .iter()
            .find(|t| t.line > header_line && t.kind != TokenKind::Newline)
            .is_some_and(|t| t.kind == TokenKind::Comment);
        if documented {
            continue;
        }
        let name = func
            .name
            .as_ref()
            .ok_or_else(|| CheckFault::unexpected_shape(func, "a named function"))?;
        findings.push(
            ctx.finding_at(name, format!("function '{}' has no header comment", name.text))
                .with_help("add a '% NAME Summary' line directly below the function line"),
        );
    }
    Ok(findings)
}
