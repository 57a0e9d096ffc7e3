//! Rule against wiping global state inside functions.
//!
//! `clear all`, `clear classes`, a bare `clear` and `close all` inside a
//! function discard state the caller owns.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, NodeKind, RuleDefinition,
    Severity, SourceUnit, Token, TokenKind,
};

use crate::scan::{code_tokens, in_function};

/// Rule code for no-clear-all.
pub const CODE: &str = "S004";

/// Rule name for no-clear-all.
pub const NAME: &str = "no-clear-all";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Statements)
        .description("clear all, bare clear and close all should not be used inside functions")
        .applies_to(Applicability::Kinds(&[NodeKind::Function]))
        .check(check)
}

/// Argument text with string quotes removed: `'all'` and `all` both give `all`.
fn argument(token: &Token) -> &str {
    match token.kind {
        TokenKind::String => token.text.trim_matches(|c| c == '\'' || c == '"'),
        _ => token.text.as_str(),
    }
}

/// Describes the offending command, if the statement is one.
fn offending(code: &[&Token]) -> Option<String> {
    let command = code.first()?;
    let args: Vec<&str> = code[1..]
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::String))
        .map(|t| argument(t))
        .collect();

    if command.is_ident("clear") {
        match args.as_slice() {
            [] => Some("clear".to_string()),
            ["all" | "classes" | "functions", ..] => Some(format!("clear {}", args[0])),
            _ => None,
        }
    } else if command.is_ident("close") && args.first() == Some(&"all") {
        Some("close all".to_string())
    } else {
        None
    }
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    Ok(unit
        .nodes_of(NodeKind::Statement)
        .filter(|node| in_function(unit, node.span.start_line))
        .filter_map(|node| {
            let what = offending(&code_tokens(unit, node))?;
            Some(ctx.finding(
                node.span.start_line,
                node.span.start_column,
                format!("'{what}' inside a function"),
            ))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testing::{lines_of, run};

    #[test]
    fn test_detects_clearing_in_functions() {
        let src = "function f()\nclear all\nclear('classes');\nclose all\nclear\nend\n";
        let findings = run(&definition(), src);
        assert_eq!(lines_of(&findings), vec![2, 3, 4, 5]);
        assert_eq!(findings[1].message, "'clear classes' inside a function");
    }

    #[test]
    fn test_allows_targeted_clear() {
        let src = "function f()\nclear tmp\nclose(fig)\nend\n";
        assert!(run(&definition(), src).is_empty());
    }

    #[test]
    fn test_ignores_scripts() {
        assert!(run(&definition(), "clear all\nclose all\n").is_empty());
    }
}
