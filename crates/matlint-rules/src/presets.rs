//! Rule presets for common configurations.

use matlint_core::{RuleDefinition, Severity};

use crate::catalog::standard_rules;

/// Preset configurations for matlint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// MUST and SHOULD rules.
    #[default]
    Recommended,
    /// Every rule, MAY included.
    Strict,
    /// MUST rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Minimal, Self::Recommended, Self::Strict];

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleDefinition> {
        standard_rules()
            .into_iter()
            .filter(|r| self.includes(r))
            .collect()
    }

    /// Returns true if `rule` belongs to this preset.
    #[must_use]
    pub fn includes(self, rule: &RuleDefinition) -> bool {
        match self {
            Self::Minimal => rule.severity == Severity::Must,
            Self::Recommended => rule.severity >= Severity::Should,
            Self::Strict => true,
        }
    }

    /// Preset name as written in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Recommended => "recommended",
            Self::Strict => "strict",
        }
    }

    /// Parses a preset name (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
