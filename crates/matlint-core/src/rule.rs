//! Rule definitions.
//!
//! Rules are plain data: a [`RuleDefinition`] holds metadata, an
//! applicability predicate, and a pure check function. Adding a rule means
//! adding a record to the catalog, not a new type.
//!
//! # Example
//!
//! ```ignore
//! use matlint_core::{Applicability, Category, CheckContext, CheckFault, Finding, NodeKind,
//!     RuleDefinition, Severity, SourceUnit};
//!
//! fn check(unit: &SourceUnit, ctx: &CheckContext) -> Result<Vec<Finding>, CheckFault> {
//!     Ok(unit
//!         .nodes_of(NodeKind::Global)
//!         .map(|n| ctx.finding(n.span.start_line, n.span.start_column, "global declared"))
//!         .collect())
//! }
//!
//! let rule = RuleDefinition::new("S001", "no-global", Severity::Must, Category::Statements)
//!     .description("Global variables must not be used")
//!     .applies_to(Applicability::Kinds(&[NodeKind::Global]))
//!     .check(check);
//! ```

use crate::config::RuleConfig;
use crate::source::{Ident, Node, NodeKind, SourceUnit};
use crate::types::{Finding, Location, Severity};
use serde::Serialize;
use std::path::Path;

/// Pure check function: inspects a unit and reports findings.
///
/// Must not mutate shared state; the engine may call it from any thread and
/// in any order relative to other rules.
pub type CheckFn = fn(&SourceUnit, &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault>;

/// Section of the style guide a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Naming conventions.
    Naming,
    /// Layout, whitespace and comments.
    Layout,
    /// Statements and expressions.
    Statements,
    /// Error handling.
    ErrorHandling,
    /// GUI code.
    Gui,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Naming => "naming",
            Self::Layout => "layout",
            Self::Statements => "statements",
            Self::ErrorHandling => "error-handling",
            Self::Gui => "gui",
        };
        f.write_str(s)
    }
}

/// Which syntax nodes a rule can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    /// Any unit (line-oriented rules).
    Any,
    /// Only units containing at least one node of these kinds.
    Kinds(&'static [NodeKind]),
}

impl Applicability {
    /// Returns true if a node of `kind` can be matched.
    #[must_use]
    pub fn matches(self, kind: NodeKind) -> bool {
        match self {
            Self::Any => true,
            Self::Kinds(kinds) => kinds.contains(&kind),
        }
    }

    /// Returns true if the rule should run against `unit`.
    #[must_use]
    pub fn matches_unit(self, unit: &SourceUnit) -> bool {
        match self {
            Self::Any => true,
            Self::Kinds(_) => unit.kinds().any(|k| self.matches(k)),
        }
    }
}

/// Unexpected failure inside a rule check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CheckFault {
    /// Description of the failure.
    pub message: String,
}

impl CheckFault {
    /// Creates a new fault.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Fault for a node whose shape the check did not expect.
    #[must_use]
    pub fn unexpected_shape(node: &Node, expected: &str) -> Self {
        Self::new(format!(
            "unexpected {} node at line {}: expected {expected}",
            node.kind, node.span.start_line
        ))
    }
}

/// Immutable description of one style rule.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    /// Stable unique id (e.g. `N001`).
    pub id: &'static str,
    /// Kebab-case name (e.g. `function-name-case`).
    pub name: &'static str,
    /// Severity assigned to findings.
    pub severity: Severity,
    /// Style guide section.
    pub category: Category,
    /// Human-readable rule text.
    pub description: &'static str,
    /// Node kinds the rule can match.
    pub applies_to: Applicability,
    /// Check function; `None` only for advisory rules.
    pub check: Option<CheckFn>,
    /// Judgement rule that is documented but never executed.
    pub advisory: bool,
}

impl RuleDefinition {
    /// Starts a definition with no check.
    #[must_use]
    pub fn new(id: &'static str, name: &'static str, severity: Severity, category: Category) -> Self {
        Self {
            id,
            name,
            severity,
            category,
            description: "",
            applies_to: Applicability::Any,
            check: None,
            advisory: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the applicability predicate.
    #[must_use]
    pub fn applies_to(mut self, applies_to: Applicability) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Sets the check function.
    #[must_use]
    pub fn check(mut self, check: CheckFn) -> Self {
        self.check = Some(check);
        self
    }

    /// Marks the rule as advisory-only.
    #[must_use]
    pub fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }

    /// Returns a copy with a different severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns true if the engine should run this rule against `unit`.
    #[must_use]
    pub fn is_runnable_on(&self, unit: &SourceUnit) -> bool {
        !self.advisory && self.check.is_some() && self.applies_to.matches_unit(unit)
    }
}

/// Read-only context handed to a check.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// The rule being run.
    pub rule: &'a RuleDefinition,
    /// Path of the unit under analysis.
    pub path: &'a Path,
    /// Per-rule options from configuration.
    pub options: &'a RuleConfig,
}

impl<'a> CheckContext<'a> {
    /// Creates a new context.
    #[must_use]
    pub fn new(rule: &'a RuleDefinition, path: &'a Path, options: &'a RuleConfig) -> Self {
        Self {
            rule,
            path,
            options,
        }
    }

    /// Builds a finding for the current rule at a point.
    #[must_use]
    pub fn finding(&self, line: usize, column: usize, message: impl Into<String>) -> Finding {
        Finding::new(
            self.rule.id,
            self.rule.severity,
            Location::new(self.path, line, column.max(1)),
            message,
        )
    }

    /// Builds a finding for the current rule spanning `column..end_column`.
    #[must_use]
    pub fn finding_span(
        &self,
        line: usize,
        column: usize,
        end_column: usize,
        message: impl Into<String>,
    ) -> Finding {
        let mut finding = self.finding(line, column, message);
        finding.location = finding.location.with_end(end_column);
        finding
    }

    /// Builds a finding covering an identifier.
    #[must_use]
    pub fn finding_at(&self, ident: &Ident, message: impl Into<String>) -> Finding {
        self.finding_span(ident.line, ident.column, ident.end_column(), message)
    }

    /// Integer option with a default.
    #[must_use]
    pub fn int_option(&self, key: &str, default: usize) -> usize {
        usize::try_from(self.options.get_int(key, i64::try_from(default).unwrap_or(i64::MAX)))
            .unwrap_or(default)
    }
}
