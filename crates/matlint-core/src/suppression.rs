//! Inline suppression directives.
//!
//! Suppressions use MATLAB's own single-line convention, written as a
//! trailing comment on the offending line:
//!
//! ```text
//! Total = 0; %#ok<N002>
//! x = eval(expr); %#ok<S002,N002>
//! y = z;  %#ok
//! ```
//!
//! A directive covers exactly the line it sits on. `%#ok` without a list (or
//! `%#ok<all>`) covers every rule on that line. The file-wide form
//! `%#ok<*ID>` is recognised only so it can be rejected.

use std::collections::HashSet;
use std::path::Path;

use crate::source::{SourceUnit, TokenKind};
use crate::types::{Finding, FindingKind, Location, Severity};

const MARKER: &str = "%#ok";

/// What a suppression silences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuppressionTarget {
    /// A single rule id.
    Rule(String),
    /// Every rule.
    All,
}

impl SuppressionTarget {
    /// Id used when reporting on this target.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Rule(id) => id,
            Self::All => "all",
        }
    }
}

/// How far a suppression reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuppressionScope {
    /// The line holding the directive.
    Line,
    /// The whole unit; always rejected.
    File,
}

/// One suppression extracted from a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    /// Rule (or all rules) to silence.
    pub target: SuppressionTarget,
    /// Requested reach.
    pub scope: SuppressionScope,
    /// Line of the directive (1-indexed).
    pub line: usize,
    /// Column of the directive (1-indexed).
    pub column: usize,
}

/// Scans comment tokens for `%#ok` directives.
#[must_use]
pub fn extract_suppressions(unit: &SourceUnit) -> Vec<Suppression> {
    unit.tokens()
        .iter()
        .filter(|t| t.kind == TokenKind::Comment)
        .flat_map(|t| parse_directive(&t.text, t.line, t.column))
        .collect()
}

/// Parses one comment into zero or more suppressions.
fn parse_directive(comment: &str, line: usize, column: usize) -> Vec<Suppression> {
    let Some(rest) = comment.strip_prefix(MARKER) else {
        return Vec::new();
    };

    let make = |target, scope| Suppression {
        target,
        scope,
        line,
        column,
    };

    let Some(list) = rest.strip_prefix('<') else {
        // Bare `%#ok`, optionally followed by free text.
        return if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            vec![make(SuppressionTarget::All, SuppressionScope::Line)]
        } else {
            Vec::new()
        };
    };

    let list = list.find('>').map_or(list, |end| &list[..end]);
    let items: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        return vec![make(SuppressionTarget::All, SuppressionScope::Line)];
    }

    items
        .into_iter()
        .map(|item| {
            let (scope, id) = match item.strip_prefix('*') {
                Some(id) => (SuppressionScope::File, id.trim()),
                None => (SuppressionScope::Line, item),
            };
            let target = if id.is_empty() || id.eq_ignore_ascii_case("all") {
                SuppressionTarget::All
            } else {
                SuppressionTarget::Rule(id.to_string())
            };
            make(target, scope)
        })
        .collect()
}

/// Reports misuse of suppressions as informational findings.
///
/// - file-wide directives yield [`FindingKind::WideSuppressionRejected`];
/// - ids for which `is_known` is false yield
///   [`FindingKind::UnknownSuppressionTarget`].
#[must_use]
pub fn suppression_defects(
    suppressions: &[Suppression],
    is_known: impl Fn(&str) -> bool,
    path: &Path,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for s in suppressions {
        let location = Location::new(path, s.line, s.column);
        match (&s.scope, &s.target) {
            (SuppressionScope::File, target) => {
                findings.push(
                    Finding::engine(
                        FindingKind::WideSuppressionRejected,
                        target.label(),
                        Severity::Info,
                        location,
                        format!(
                            "file-wide suppression of '{}' is not allowed and was ignored",
                            target.label()
                        ),
                    )
                    .with_help(format!(
                        "suppress individual lines with %#ok<{}>",
                        target.label()
                    )),
                );
            }
            (SuppressionScope::Line, SuppressionTarget::Rule(id)) if !is_known(id) => {
                findings.push(Finding::engine(
                    FindingKind::UnknownSuppressionTarget,
                    id.as_str(),
                    Severity::Info,
                    location,
                    format!("suppression names unknown rule '{id}'"),
                ));
            }
            _ => {}
        }
    }

    findings
}

/// Removes rule findings covered by a line suppression.
///
/// Engine-generated findings always survive, as do findings covered only by
/// rejected file-wide directives.
#[must_use]
pub fn filter(findings: Vec<Finding>, suppressions: &[Suppression]) -> Vec<Finding> {
    let active: HashSet<(usize, &SuppressionTarget)> = suppressions
        .iter()
        .filter(|s| s.scope == SuppressionScope::Line)
        .map(|s| (s.line, &s.target))
        .collect();

    if active.is_empty() {
        return findings;
    }

    findings
        .into_iter()
        .filter(|f| !is_suppressed(f, &active))
        .collect()
}

fn is_suppressed(finding: &Finding, active: &HashSet<(usize, &SuppressionTarget)>) -> bool {
    if finding.kind.is_engine_generated() {
        return false;
    }
    let line = finding.location.line;
    active.contains(&(line, &SuppressionTarget::All))
        || active.contains(&(line, &SuppressionTarget::Rule(finding.rule_id.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::rule::{Category, CheckContext, CheckFault, RuleDefinition};
    use crate::source::{Node, NodeKind, Span, Token};

    fn noop(_: &SourceUnit, _: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        Ok(Vec::new())
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::from_rules([
            RuleDefinition::new("N001", "a", Severity::Must, Category::Naming).check(noop),
            RuleDefinition::new("L003", "b", Severity::Should, Category::Layout).check(noop),
        ])
        .expect("valid rules")
    }

    fn finding(rule: &str, line: usize) -> Finding {
        Finding::new(rule, Severity::Must, Location::new("a.m", line, 1), "msg")
    }

    fn line_suppression(target: SuppressionTarget, line: usize) -> Suppression {
        Suppression {
            target,
            scope: SuppressionScope::Line,
            line,
            column: 20,
        }
    }

    #[test]
    fn parses_single_id() {
        let s = parse_directive("%#ok<N001>", 12, 9);
        assert_eq!(
            s,
            vec![line_suppression(SuppressionTarget::Rule("N001".into()), 12)
                .with_column(9)]
        );
    }

    #[test]
    fn parses_id_list_and_all() {
        let s = parse_directive("%#ok<N001, L003,all>", 3, 1);
        let targets: Vec<&str> = s.iter().map(|s| s.target.label()).collect();
        assert_eq!(targets, vec!["N001", "L003", "all"]);
        assert!(s.iter().all(|s| s.scope == SuppressionScope::Line));
    }

    #[test]
    fn bare_marker_means_all() {
        assert_eq!(parse_directive("%#ok", 1, 1)[0].target, SuppressionTarget::All);
        assert_eq!(
            parse_directive("%#ok intentional", 1, 1)[0].target,
            SuppressionTarget::All
        );
        assert!(parse_directive("%#okay", 1, 1).is_empty());
        assert!(parse_directive("% #ok<N001>", 1, 1).is_empty());
    }

    #[test]
    fn star_form_is_file_scoped() {
        let s = parse_directive("%#ok<*N001>", 2, 5);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].scope, SuppressionScope::File);
        assert_eq!(s[0].target, SuppressionTarget::Rule("N001".into()));
    }

    #[test]
    fn extracts_from_comment_tokens_only() {
        let tokens = vec![
            Token::new(TokenKind::String, "'%#ok<N001>'", 1, 5),
            Token::new(TokenKind::Comment, "%#ok<N001>", 2, 10),
        ];
        let root = Node::new(NodeKind::Script, Span::default(), 0..0);
        let unit = SourceUnit::new("a.m", "x = '%#ok<N001>';\ny = 1; %#ok<N001>\n", tokens, root);
        let s = extract_suppressions(&unit);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].line, 2);
    }

    #[test]
    fn suppression_covers_exact_line_only() {
        let findings = vec![finding("N001", 12)];

        let same_line = [line_suppression(SuppressionTarget::Rule("N001".into()), 12)];
        assert!(filter(findings.clone(), &same_line).is_empty());

        let next_line = [line_suppression(SuppressionTarget::Rule("N001".into()), 13)];
        assert_eq!(filter(findings, &next_line).len(), 1);
    }

    #[test]
    fn suppression_matches_rule_id() {
        let findings = vec![finding("N001", 4), finding("L003", 4)];
        let s = [line_suppression(SuppressionTarget::Rule("L003".into()), 4)];
        let kept = filter(findings, &s);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rule_id, "N001");
    }

    #[test]
    fn all_suppresses_every_rule_on_line() {
        let findings = vec![finding("N001", 4), finding("L003", 4), finding("L003", 5)];
        let kept = filter(findings, &[line_suppression(SuppressionTarget::All, 4)]);
        assert_eq!(kept, vec![finding("L003", 5)]);
    }

    #[test]
    fn file_scope_suppresses_nothing() {
        let findings = vec![finding("N001", 4)];
        let s = [Suppression {
            target: SuppressionTarget::Rule("N001".into()),
            scope: SuppressionScope::File,
            line: 1,
            column: 1,
        }];
        assert_eq!(filter(findings, &s).len(), 1);
    }

    #[test]
    fn engine_findings_are_never_suppressed() {
        let fault = Finding::engine(
            FindingKind::EngineFault,
            "N001",
            Severity::Must,
            Location::new("a.m", 1, 1),
            "boom",
        );
        let kept = filter(vec![fault], &[line_suppression(SuppressionTarget::All, 1)]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn wide_and_unknown_suppressions_are_reported() {
        let suppressions = [
            Suppression {
                target: SuppressionTarget::Rule("N001".into()),
                scope: SuppressionScope::File,
                line: 1,
                column: 1,
            },
            line_suppression(SuppressionTarget::Rule("NASGU".into()), 7),
            line_suppression(SuppressionTarget::Rule("L003".into()), 8),
            line_suppression(SuppressionTarget::All, 9),
        ];
        let registry = registry();
        let defects =
            suppression_defects(&suppressions, |id| registry.contains(id), Path::new("a.m"));
        assert_eq!(defects.len(), 2);
        assert_eq!(defects[0].kind, FindingKind::WideSuppressionRejected);
        assert_eq!(defects[0].severity, Severity::Info);
        assert_eq!(defects[1].kind, FindingKind::UnknownSuppressionTarget);
        assert_eq!(defects[1].rule_id, "NASGU");
        assert_eq!(defects[1].location.line, 7);
    }

    impl Suppression {
        fn with_column(mut self, column: usize) -> Self {
            self.column = column;
            self
        }
    }
}
