//! Rule against variables that shadow common MATLAB functions.
//!
//! Extra names can be listed under `builtins` in the rule's configuration.

use std::collections::HashSet;

use matlint_core::{
    Applicability, Category, CheckContext, CheckFault, Finding, Ident, NodeKind, RuleDefinition,
    Severity, SourceUnit,
};

use crate::scan::assignment_targets;

/// Rule code for shadowed-builtin.
pub const CODE: &str = "N004";

/// Rule name for shadowed-builtin.
pub const NAME: &str = "shadowed-builtin";

/// Functions and constants most often shadowed by accident.
pub const BUILTINS: &[&str] = &[
    "abs", "alpha", "angle", "ans", "beta", "cell", "char", "class", "disp", "eps", "error",
    "find", "gamma", "i", "image", "Inf", "inf", "input", "j", "length", "line", "max", "mean",
    "min", "mode", "NaN", "nan", "ones", "path", "pi", "size", "sort", "sum", "table", "type",
    "version", "zeros",
];

/// Returns the rule definition.
#[must_use]
pub fn definition() -> RuleDefinition {
    RuleDefinition::new(CODE, NAME, Severity::Should, Category::Naming)
        .description("Variables should not shadow built-in functions or constants")
        .applies_to(Applicability::Kinds(&[NodeKind::Statement, NodeKind::For]))
        .check(check)
}

fn check(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
    let extra = ctx.options.get_str_array("builtins");
    let is_builtin =
        |name: &str| BUILTINS.iter().any(|b| *b == name) || extra.iter().any(|e| e == name);

    let loop_vars = unit
        .nodes_of(NodeKind::For)
        .filter_map(|n| n.name.clone());
    let assigned = unit
        .nodes_of(NodeKind::Statement)
        .flat_map(|n| assignment_targets(unit, n));
    let mut names: Vec<Ident> = loop_vars.chain(assigned).collect();
    names.sort_by_key(|n| (n.line, n.column));

    let mut seen = HashSet::new();
    Ok(names
        .into_iter()
        .filter(|n| is_builtin(&n.text) && seen.insert(n.text.clone()))
        .map(|n| {
            ctx.finding_at(
                &n,
                format!("'{}' shadows a built-in function or constant", n.text),
            )
        })
        .collect())
}
