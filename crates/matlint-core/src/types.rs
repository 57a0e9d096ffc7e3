//! Core types for lint findings.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for findings.
///
/// The three normative levels mirror the MUST/SHOULD/MAY wording of the
/// style guide. `Info` is reserved for engine-generated notices and is never
/// a valid rule severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational notice, never affects the verdict.
    Info,
    /// Optional recommendation.
    May,
    /// Recommendation that should be addressed.
    Should,
    /// Mandatory requirement; an unsuppressed finding fails the run.
    Must,
}

impl Severity {
    /// Returns true if this level may be assigned to a rule.
    #[must_use]
    pub fn is_rule_level(self) -> bool {
        matches!(self, Self::Must | Self::Should | Self::May)
    }

    /// Parses a severity from user input (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "must" => Some(Self::Must),
            "should" => Some(Self::Should),
            "may" => Some(Self::May),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::May => write!(f, "MAY"),
            Self::Should => write!(f, "SHOULD"),
            Self::Must => write!(f, "MUST"),
        }
    }
}

/// What produced a finding.
///
/// Everything except [`FindingKind::Rule`] is generated by the engine itself
/// and cannot be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A style rule matched.
    Rule,
    /// A rule check failed unexpectedly (error, panic, timeout, bad location).
    EngineFault,
    /// The provider could not parse the unit.
    UnparseableSource,
    /// A file-wide suppression was declared and ignored.
    WideSuppressionRejected,
    /// A suppression names a rule id that is not registered.
    UnknownSuppressionTarget,
}

impl FindingKind {
    /// Returns true for findings generated by the engine rather than a rule.
    #[must_use]
    pub fn is_engine_generated(self) -> bool {
        self != Self::Rule
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Rule => "rule",
            Self::EngineFault => "engine-fault",
            Self::UnparseableSource => "unparseable-source",
            Self::WideSuppressionRejected => "wide-suppression-rejected",
            Self::UnknownSuppressionTarget => "unknown-suppression-target",
        };
        f.write_str(s)
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Unit path (or synthetic id for in-memory buffers).
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// First column (1-indexed).
    pub column: usize,
    /// Column one past the end of the span; equal to `column` for a point.
    pub end_column: usize,
}

impl Location {
    /// Creates a point location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            end_column: column,
        }
    }

    /// Sets the end column of the span.
    #[must_use]
    pub fn with_end(mut self, end_column: usize) -> Self {
        self.end_column = end_column.max(self.column);
        self
    }

    /// Number of columns covered by this location.
    #[must_use]
    pub fn width(&self) -> usize {
        self.end_column - self.column
    }
}

/// A finding produced while analysing one unit.
///
/// Findings are immutable snapshots: the severity is copied from the rule at
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the rule that produced (or, for faults, caused) this finding.
    pub rule_id: String,
    /// Severity at the time the finding was created.
    pub severity: Severity,
    /// Origin of the finding.
    pub kind: FindingKind,
    /// Where the finding applies.
    pub location: Location,
    /// Instance-specific message.
    pub message: String,
    /// Optional hint for fixing the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Finding {
    /// Creates a new rule finding.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            kind: FindingKind::Rule,
            location,
            message: message.into(),
            help: None,
        }
    }

    /// Creates an engine-generated finding of the given kind.
    #[must_use]
    pub fn engine(
        kind: FindingKind,
        rule_id: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            ..Self::new(rule_id, severity, location, message)
        }
    }

    /// Adds a help text to this finding.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}:{}\n",
            self.rule_id,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if self.kind.is_engine_generated() {
            let _ = writeln!(output, "  = kind: {}", self.kind);
        }
        if let Some(help) = &self.help {
            let _ = writeln!(output, "  = help: {help}");
        }
        output
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

/// A finding rendered as a miette diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {message}")]
pub struct FindingDiagnostic {
    rule_id: String,
    message: String,
    #[help]
    help: Option<String>,
    #[label("{severity}")]
    span: SourceSpan,
    severity: Severity,
}

impl FindingDiagnostic {
    /// Builds a diagnostic for `finding`, pointing at `offset` in the unit text.
    #[must_use]
    pub fn new(finding: &Finding, offset: usize) -> Self {
        Self {
            rule_id: finding.rule_id.clone(),
            message: finding.message.clone(),
            help: finding.help.clone(),
            span: SourceSpan::from((offset, finding.location.width().max(1))),
            severity: finding.severity,
        }
    }
}

/// Calculates the byte offset of a 1-indexed line and column in `text`.
///
/// Columns count characters, not bytes.
///
/// Returns the end of the text when the position is out of bounds.
#[must_use]
pub fn offset_for(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in text.split('\n').enumerate() {
        if i + 1 == line {
            let within = line_content
                .char_indices()
                .nth(column.saturating_sub(1))
                .map_or(line_content.len(), |(i, _)| i);
            return offset + within;
        }
        offset += line_content.len() + 1;
    }

    text.len()
}
