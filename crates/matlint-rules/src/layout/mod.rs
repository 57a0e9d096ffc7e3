//! Layout, whitespace and comments.

pub mod function_header_comment;
pub mod function_length;
pub mod line_length;
pub mod no_tabs;
pub mod one_statement_per_line;
pub mod trailing_whitespace;

use matlint_core::{Category, RuleDefinition, Severity};

/// Rule code for comments-restate-code.
pub const COMMENTS_RESTATE_CODE: &str = "L007";

/// Layout rules in catalog order.
#[must_use]
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        line_length::definition(),
        no_tabs::definition(),
        trailing_whitespace::definition(),
        function_header_comment::definition(),
        function_length::definition(),
        one_statement_per_line::definition(),
        RuleDefinition::new(
            COMMENTS_RESTATE_CODE,
            "comments-restate-code",
            Severity::May,
            Category::Layout,
        )
        .description("Comments should explain intent rather than restate the code")
        .advisory(),
    ]
}
