//! Token and tree queries shared by rule checks.

use matlint_core::{Ident, Node, NodeKind, SourceUnit, Token, TokenKind};

/// Non-trivia tokens of a node's header or statement.
pub(crate) fn code_tokens<'u>(unit: &'u SourceUnit, node: &Node) -> Vec<&'u Token> {
    unit.node_tokens(node)
        .iter()
        .filter(|t| !t.is_trivia())
        .collect()
}

/// Every statement-like node paired with its workspace and parent kind.
///
/// Workspace 0 is the script; every function opens a new one.
pub(crate) fn nodes_with_scope(unit: &SourceUnit) -> Vec<(usize, NodeKind, &Node)> {
    fn visit<'n>(
        parent: &'n Node,
        scope: usize,
        next: &mut usize,
        out: &mut Vec<(usize, NodeKind, &'n Node)>,
    ) {
        for child in &parent.children {
            out.push((scope, parent.kind, child));
            let inner = if child.kind == NodeKind::Function {
                *next += 1;
                *next
            } else {
                scope
            };
            visit(child, inner, next, out);
        }
    }

    let mut out = Vec::new();
    visit(unit.root(), 0, &mut 0, &mut out);
    out
}

/// Variables assigned by a plain statement: `x = ...` or `[a, ~, b] = ...`.
///
/// Indexed, field and cell assignments are not declarations and are skipped.
pub(crate) fn assignment_targets(unit: &SourceUnit, node: &Node) -> Vec<Ident> {
    if node.kind != NodeKind::Statement {
        return Vec::new();
    }
    let code = code_tokens(unit, node);
    let Some(first) = code.first() else {
        return Vec::new();
    };

    if first.kind == TokenKind::Identifier {
        return if code.get(1).is_some_and(|t| t.is_symbol("=")) {
            vec![Ident::from_token(first)]
        } else {
            Vec::new()
        };
    }

    if !first.is_symbol("[") {
        return Vec::new();
    }
    let Some(close) = code.iter().position(|t| t.is_symbol("]")) else {
        return Vec::new();
    };
    if !code.get(close + 1).is_some_and(|t| t.is_symbol("=")) {
        return Vec::new();
    }

    let inner = &code[1..close];
    inner
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            t.kind == TokenKind::Identifier
                && !(*i > 0 && inner[i - 1].is_symbol("."))
                && !inner
                    .get(i + 1)
                    .is_some_and(|n| n.is_symbol(".") || n.is_symbol("(") || n.is_symbol("{"))
        })
        .map(|(_, t)| Ident::from_token(t))
        .collect()
}

/// Identifier tokens naming one of `names` that are used, not assigned.
///
/// Field accesses (`obj.eval`) and assignments (`gca = 3`) are excluded.
pub(crate) fn references<'u>(unit: &'u SourceUnit, names: &[&str]) -> Vec<&'u Token> {
    let code: Vec<&Token> = unit.tokens().iter().filter(|t| !t.is_trivia()).collect();
    code.iter()
        .enumerate()
        .filter(|(i, t)| {
            t.kind == TokenKind::Identifier
                && names.iter().any(|n| *n == t.text)
                && !(*i > 0 && code[i - 1].is_symbol("."))
                && !code.get(i + 1).is_some_and(|n| n.is_symbol("="))
        })
        .map(|(_, t)| *t)
        .collect()
}

/// Returns true if `line` lies inside any function definition.
pub(crate) fn in_function(unit: &SourceUnit, line: usize) -> bool {
    unit.nodes_of(NodeKind::Function)
        .any(|f| f.span.start_line <= line && line <= f.span.end_line)
}

/// Physical lines with any trailing carriage return removed.
pub(crate) fn lines(unit: &SourceUnit) -> impl Iterator<Item = (usize, &str)> {
    unit.numbered_lines()
        .map(|(n, line)| (n, line.strip_suffix('\r').unwrap_or(line)))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use matlint_core::{CheckContext, Finding, RuleConfig, RuleDefinition, SourceUnit, SyntaxProvider};
    use matlint_syntax::MatlabProvider;

    pub(crate) fn unit(source: &str) -> SourceUnit {
        MatlabProvider::new()
            .parse(source, Path::new("sample.m"))
            .expect("test source parses")
    }

    pub(crate) fn run(rule: &RuleDefinition, source: &str) -> Vec<Finding> {
        run_with(rule, source, &RuleConfig::default())
    }

    pub(crate) fn run_with(rule: &RuleDefinition, source: &str, options: &RuleConfig) -> Vec<Finding> {
        let unit = unit(source);
        if !rule.is_runnable_on(&unit) {
            return Vec::new();
        }
        let check = rule.check.expect("rule has a check");
        let ctx = CheckContext::new(rule, unit.path(), options);
        check(&unit, &ctx).expect("check succeeds")
    }

    pub(crate) fn lines_of(findings: &[Finding]) -> Vec<usize> {
        findings.iter().map(|f| f.location.line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::unit;
    use super::*;

    fn targets(source: &str) -> Vec<String> {
        let unit = unit(source);
        unit.nodes_of(NodeKind::Statement)
            .flat_map(|n| assignment_targets(&unit, n))
            .map(|i| i.text)
            .collect()
    }

    #[test]
    fn plain_and_multi_assignments() {
        assert_eq!(targets("total = 0;\n"), vec!["total"]);
        assert_eq!(
            targets("[rows, ~, cols] = size(m);\n"),
            vec!["rows", "cols"]
        );
    }

    #[test]
    fn indexed_and_field_assignments_are_skipped() {
        assert!(targets("x(3) = 1;\ns.Field = 2;\nc{1} = 3;\n").is_empty());
        assert_eq!(targets("[s.a, b] = deal(1, 2);\n"), vec!["b"]);
    }

    #[test]
    fn comparisons_are_not_assignments() {
        assert!(targets("disp(x == 1);\n").is_empty());
    }

    #[test]
    fn references_skip_fields_and_assignments() {
        let unit = unit("eval(cmd);\nobj.eval(1);\neval = 2;\ny = evalin('base', 'x');\n");
        let found: Vec<usize> = references(&unit, &["eval", "evalin"])
            .iter()
            .map(|t| t.line)
            .collect();
        assert_eq!(found, vec![1, 4]);
    }

    #[test]
    fn in_function_uses_spans() {
        let unit = unit("x = 1;\nfunction f()\n  y = 2;\nend\n");
        assert!(!in_function(&unit, 1));
        assert!(in_function(&unit, 3));
    }
}
