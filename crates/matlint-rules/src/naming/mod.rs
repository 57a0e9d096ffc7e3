//! Naming conventions.

pub mod class_name_case;
pub mod function_name_case;
pub mod loop_variable_imaginary;
pub mod negated_boolean_name;
pub mod shadowed_builtin;
pub mod variable_name_case;

use matlint_core::{Category, RuleDefinition, Severity};

/// Rule code for descriptive-names.
pub const DESCRIPTIVE_NAMES: &str = "N007";

/// Naming rules in catalog order.
#[must_use]
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        function_name_case::definition(),
        variable_name_case::definition(),
        loop_variable_imaginary::definition(),
        shadowed_builtin::definition(),
        class_name_case::definition(),
        negated_boolean_name::definition(),
        RuleDefinition::new(
            DESCRIPTIVE_NAMES,
            "descriptive-names",
            Severity::Should,
            Category::Naming,
        )
        .description("Names should reflect their meaning; short names only in small scopes")
        .advisory(),
    ]
}

/// `lowerCamelCase`: leading lowercase letter, letters and digits only.
pub(crate) fn is_lower_camel(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `ALL_CAPS` constant naming.
pub(crate) fn is_constant_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Suggests a lowerCamel spelling: `Load_Data` becomes `loadData`.
pub(crate) fn to_lower_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if out.is_empty() {
            out.push(c.to_ascii_lowercase());
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
