//! Rule requiring message identifiers on `error` calls.
//!
//! `error('File not found')` cannot be caught selectively;
//! `error('io:notFound', 'File not found')` can.

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Ident, RuleDefinition, Severity,
    SourceUnit, Token, TokenKind,
};

/// Rule code for error-identifier.
pub const CODE: &str = "E002";

/// Rule name for error-identifier.
pub const NAME: &str = "error-identifier";

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::ErrorHandling)
        .description("error() calls should pass a message identifier")
        .applies_to(Applicability::Any)
        .check(check)
}

/// `component:mnemonic` with one or more colon-separated parts.
fn is_message_id(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    parts.len() >= 2
        && parts.iter().all(|p| {
            p.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

fn literal_body(token: &Token) -> &str {
    let text = token.text.as_str();
    text.get(1..text.len().saturating_sub(1)).unwrap_or("")
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let code: Vec<&Token> = unit.tokens().iter().filter(|t| !t.is_trivia()).collect();
    let mut findings = Vec::new();

    for (i, token) in code.iter().enumerate() {
        if !token.is_ident("error") || (i > 0 && code[i - 1].is_symbol(".")) {
            continue;
        }
        if !code.get(i + 1).is_some_and(|t| t.is_symbol("(")) {
            continue;
        }
        let Some(first_arg) = code.get(i + 2).filter(|t| t.kind == TokenKind::String) else {
            continue;
        };
        let single_argument = code.get(i + 3).is_some_and(|t| t.is_symbol(")"));
        if single_argument || !is_message_id(literal_body(first_arg)) {
            findings.push(
                ctx.finding_at(&Ident::from_token(token), "error() without a message identifier")
                    .with_help("use error('component:mnemonic', message, ...)"),
            );
        }
    }
    Ok(findings)
}
