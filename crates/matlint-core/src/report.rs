//! Aggregation of per-unit findings into a report.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::types::{Finding, Severity};

/// Findings surviving suppression for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFindings {
    /// Unit path.
    pub path: PathBuf,
    /// Findings after suppression filtering.
    pub findings: Vec<Finding>,
    /// False if the analysis was cancelled before every rule ran.
    pub completed: bool,
}

impl UnitFindings {
    /// Creates a completed unit result.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, findings: Vec<Finding>) -> Self {
        Self {
            path: path.into(),
            findings,
            completed: true,
        }
    }

    /// Marks the unit as incomplete.
    #[must_use]
    pub fn incomplete(mut self) -> Self {
        self.completed = false;
        self
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No unsuppressed MUST findings.
    Pass,
    /// At least one unsuppressed MUST finding.
    Fail,
    /// The run was cancelled before completing.
    Indeterminate,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Finding counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// MUST findings.
    pub must: usize,
    /// SHOULD findings.
    pub should: usize,
    /// MAY findings.
    pub may: usize,
    /// Informational findings.
    pub info: usize,
}

impl Summary {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Must => self.must += 1,
            Severity::Should => self.should += 1,
            Severity::May => self.may += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Terminal artifact of a run. A pure value; printing is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Surviving findings in presentation order.
    pub findings: Vec<Finding>,
    /// Counts per severity.
    pub summary: Summary,
    /// Pass/fail outcome.
    pub verdict: Verdict,
    /// Number of units aggregated.
    pub units_checked: usize,
}

impl Report {
    /// Returns true if any finding is at or above `severity`.
    #[must_use]
    pub fn has_findings_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// One-line summary.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} must, {} should, {} may, {} info in {} file(s)",
            self.verdict,
            self.summary.must,
            self.summary.should,
            self.summary.may,
            self.summary.info,
            self.units_checked
        )
    }

    /// Renders all findings followed by the summary line.
    #[must_use]
    pub fn format_text(&self) -> String {
        let mut output = String::new();
        for finding in &self.findings {
            output.push_str(&finding.format());
            output.push('\n');
        }
        output.push_str(&self.summary_line());
        output.push('\n');
        output
    }
}

/// Merges unit results into a report.
///
/// Deduplicates on `(rule_id, location, message)`, sorts by path, line,
/// column and rule id, counts severities, and derives the verdict.
#[must_use]
pub fn aggregate(units: Vec<UnitFindings>) -> Report {
    let units_checked = units.len();
    let completed = units.iter().all(|u| u.completed);

    let mut findings: Vec<Finding> = units.into_iter().flat_map(|u| u.findings).collect();
    findings.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.message.cmp(&b.message))
            .then_with(|| a.location.end_column.cmp(&b.location.end_column))
            .then_with(|| b.severity.cmp(&a.severity))
    });

    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert((f.rule_id.clone(), f.location.clone(), f.message.clone())));

    let mut summary = Summary::default();
    for f in &findings {
        summary.add(f.severity);
    }

    let verdict = if !completed {
        Verdict::Indeterminate
    } else if summary.must > 0 {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    Report {
        findings,
        summary,
        verdict,
        units_checked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FindingKind, Location};

    fn finding(file: &str, line: usize, column: usize, rule: &str, severity: Severity) -> Finding {
        Finding::new(rule, severity, Location::new(file, line, column), format!("{rule} hit"))
    }

    #[test]
    fn sorts_by_path_line_column_rule() {
        let units = vec![
            UnitFindings::new(
                "b.m",
                vec![finding("b.m", 1, 1, "N001", Severity::Should)],
            ),
            UnitFindings::new(
                "a.m",
                vec![
                    finding("a.m", 3, 1, "L001", Severity::Should),
                    finding("a.m", 2, 5, "S001", Severity::Should),
                    finding("a.m", 2, 5, "L003", Severity::Should),
                    finding("a.m", 2, 1, "N002", Severity::Should),
                ],
            ),
        ];
        let report = aggregate(units);
        let order: Vec<(String, usize, &str)> = report
            .findings
            .iter()
            .map(|f| {
                (
                    f.location.file.display().to_string(),
                    f.location.line,
                    f.rule_id.as_str(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.m".to_string(), 2, "N002"),
                ("a.m".to_string(), 2, "L003"),
                ("a.m".to_string(), 2, "S001"),
                ("a.m".to_string(), 3, "L001"),
                ("b.m".to_string(), 1, "N001"),
            ]
        );
    }

    #[test]
    fn deduplicates_identical_findings() {
        let f = finding("a.m", 2, 1, "N001", Severity::Must);
        let report = aggregate(vec![UnitFindings::new("a.m", vec![f.clone(), f.clone(), f])]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.summary.must, 1);
    }

    #[test]
    fn same_location_different_message_is_kept() {
        let a = finding("a.m", 2, 1, "N002", Severity::Should);
        let mut b = a.clone();
        b.message = "another name".into();
        let report = aggregate(vec![UnitFindings::new("a.m", vec![a, b])]);
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn verdict_fails_only_on_must() {
        let advisory = aggregate(vec![UnitFindings::new(
            "a.m",
            vec![
                finding("a.m", 1, 1, "L001", Severity::Should),
                finding("a.m", 2, 1, "L005", Severity::May),
                Finding::engine(
                    FindingKind::UnknownSuppressionTarget,
                    "X1",
                    Severity::Info,
                    Location::new("a.m", 3, 1),
                    "unknown",
                ),
            ],
        )]);
        assert_eq!(advisory.verdict, Verdict::Pass);

        let mut findings = advisory.findings.clone();
        findings.push(finding("a.m", 9, 1, "N001", Severity::Must));
        let failing = aggregate(vec![UnitFindings::new("a.m", findings)]);
        assert_eq!(failing.verdict, Verdict::Fail);
        assert_eq!(
            failing.summary,
            Summary {
                must: 1,
                should: 1,
                may: 1,
                info: 1
            }
        );
    }

    #[test]
    fn incomplete_unit_is_indeterminate() {
        let report = aggregate(vec![
            UnitFindings::new("a.m", vec![finding("a.m", 1, 1, "N001", Severity::Must)]),
            UnitFindings::new("b.m", Vec::new()).incomplete(),
        ]);
        assert_eq!(report.verdict, Verdict::Indeterminate);
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn empty_batch_passes() {
        let report = aggregate(Vec::new());
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.units_checked, 0);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let findings = vec![
            finding("a.m", 5, 1, "L001", Severity::Should),
            finding("a.m", 1, 2, "N001", Severity::Must),
            finding("a.m", 1, 2, "L002", Severity::Must),
        ];
        let mut reversed = findings.clone();
        reversed.reverse();

        let first = aggregate(vec![UnitFindings::new("a.m", findings)]);
        let second = aggregate(vec![UnitFindings::new("a.m", reversed)]);
        assert_eq!(first, second);
        assert_eq!(first.format_text(), second.format_text());
    }

    #[test]
    fn text_rendering_snapshot() {
        let report = aggregate(vec![UnitFindings::new(
            "toolbox/LoadData.m",
            vec![
                finding("toolbox/LoadData.m", 1, 10, "N001", Severity::Must)
                    .with_help("rename the function"),
                finding("toolbox/LoadData.m", 4, 81, "L001", Severity::Should),
            ],
        )]);
        insta::assert_snapshot!(report.format_text(), @r"
        N001 at toolbox/LoadData.m:1:10
          MUST: N001 hit
          = help: rename the function

        L001 at toolbox/LoadData.m:4:81
          SHOULD: L001 hit

        fail: 1 must, 1 should, 0 may, 0 info in 1 file(s)
        ");
    }
}
