//! The rule registry.
//!
//! Built once at startup, then shared read-only (typically behind an `Arc`)
//! by every analysis. Nothing can be added or removed once the engine holds it.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::rule::RuleDefinition;

/// Errors raised while building or querying the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A rule with the same id is already registered.
    #[error("duplicate rule id '{id}'")]
    DuplicateRule {
        /// The offending id.
        id: String,
    },

    /// The definition is malformed.
    #[error("invalid rule '{id}': {reason}")]
    InvalidRule {
        /// The offending id.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No rule with this id exists.
    #[error("unknown rule id '{id}'")]
    UnknownRule {
        /// The requested id.
        id: String,
    },
}

/// Ordered catalog of rule definitions.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<&'static str, RuleDefinition>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from definitions, failing on the first bad one.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] raised by [`RuleRegistry::register`].
    pub fn from_rules(rules: impl IntoIterator<Item = RuleDefinition>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Adds a rule.
    ///
    /// On error the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateRule`] if the id is already present.
    /// - [`RegistryError::InvalidRule`] if the id is empty or contains
    ///   whitespace, the severity is not MUST/SHOULD/MAY, or a non-advisory
    ///   rule has no check.
    pub fn register(&mut self, rule: RuleDefinition) -> Result<(), RegistryError> {
        validate(&rule)?;
        if self.rules.contains_key(rule.id) {
            return Err(RegistryError::DuplicateRule {
                id: rule.id.to_string(),
            });
        }
        debug!("Registered rule {} ({})", rule.id, rule.name);
        self.rules.insert(rule.id, rule);
        Ok(())
    }

    /// All rules in registration order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &RuleDefinition> {
        self.rules.values()
    }

    /// Looks up a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRule`] if no rule has this id.
    pub fn by_id(&self, id: &str) -> Result<&RuleDefinition, RegistryError> {
        self.rules.get(id).ok_or_else(|| RegistryError::UnknownRule {
            id: id.to_string(),
        })
    }

    /// Returns true if a rule with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate(rule: &RuleDefinition) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidRule {
        id: rule.id.to_string(),
        reason: reason.to_string(),
    };

    if rule.id.is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if rule.id.chars().any(|c| c.is_whitespace() || c == ',' || c == '<' || c == '>') {
        return Err(invalid("id must not contain whitespace, ',' or angle brackets"));
    }
    if rule.id.eq_ignore_ascii_case("all") {
        return Err(invalid("'all' is reserved for suppressions"));
    }
    if !rule.severity.is_rule_level() {
        return Err(invalid("severity must be MUST, SHOULD or MAY"));
    }
    if rule.check.is_none() && !rule.advisory {
        return Err(invalid("non-advisory rule has no check"));
    }
    Ok(())
}
