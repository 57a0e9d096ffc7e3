//! The standard rule catalog and registry construction.

use matlint_core::{Config, RegistryError, RuleDefinition, RuleRegistry};
use tracing::{debug, warn};

use crate::{error_handling, gui, layout, naming, statements, Preset};

/// Every built-in rule in catalog order.
#[must_use]
pub fn standard_rules() -> Vec<RuleDefinition> {
    let mut rules = naming::definitions();
    rules.extend(layout::definitions());
    rules.extend(statements::definitions());
    rules.extend(error_handling::definitions());
    rules.extend(gui::definitions());
    rules
}

/// Builds the registry for a run.
///
/// Starts from `preset`, then applies `[rules.<ID>]` settings from `config`:
/// `enabled = true/false` adds or removes a rule and `severity` overrides its
/// level. When `only` is given it replaces the preset: exactly those rules
/// run, minus any the config disables.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownRule`] if `only` names a rule that does
/// not exist, or [`RegistryError::InvalidRule`] if an override produces an
/// invalid definition.
pub fn build_registry(
    config: &Config,
    preset: Preset,
    only: Option<&[String]>,
) -> Result<RuleRegistry, RegistryError> {
    let catalog = standard_rules();

    for id in config.rules.keys() {
        if !catalog.iter().any(|r| r.id == id.as_str()) {
            warn!(rule = %id, "Configuration names an unknown rule");
        }
    }
    if let Some(only) = only {
        if let Some(unknown) = only.iter().find(|id| !catalog.iter().any(|r| r.id == id.as_str())) {
            return Err(RegistryError::UnknownRule { id: unknown.clone() });
        }
    }

    let selected = catalog.into_iter().filter(|rule| {
        let configured = config.rule_config(rule.id).and_then(|c| c.enabled);
        match only {
            Some(ids) => ids.iter().any(|id| id == rule.id) && configured != Some(false),
            None => configured.unwrap_or_else(|| preset.includes(rule)),
        }
    });

    let rules = selected.map(|rule| match config.rule_severity(rule.id) {
        Some(severity) if severity != rule.severity => {
            debug!(rule = rule.id, %severity, "Severity overridden");
            rule.with_severity(severity)
        }
        _ => rule,
    });

    RuleRegistry::from_rules(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matlint_core::Severity;

    #[test]
    fn test_catalog_ids_are_unique_and_valid() {
        let registry = RuleRegistry::from_rules(standard_rules()).expect("catalog is valid");
        assert_eq!(registry.len(), 24);
    }

    #[test]
    fn test_catalog_order() {
        let ids: Vec<&str> = standard_rules().iter().map(|r| r.id).collect();
        assert_eq!(&ids[..3], &["N001", "N002", "N003"]);
        assert_eq!(ids.last(), Some(&"G002"));
    }

    #[test]
    fn test_advisory_rules_have_no_check() {
        let advisory: Vec<&str> = standard_rules()
            .iter()
            .filter(|r| r.advisory)
            .map(|r| r.id)
            .collect();
        assert_eq!(advisory, vec!["N007", "L007", "E004"]);
        assert!(standard_rules()
            .iter()
            .filter(|r| !r.advisory)
            .all(|r| r.check.is_some()));
    }

    #[test]
    fn test_config_disables_and_enables() {
        let config = Config::parse(
            r#"
[rules.N001]
enabled = false

[rules.G002]
enabled = true
"#,
        )
        .expect("valid config");
        let registry = build_registry(&config, Preset::Recommended, None).expect("registry");
        assert!(!registry.contains("N001"));
        assert!(registry.contains("G002"));
        assert!(registry.contains("S001"));
    }

    #[test]
    fn test_severity_override() {
        let config = Config::parse("[rules.L001]\nseverity = \"must\"\n").expect("valid config");
        let registry = build_registry(&config, Preset::Recommended, None).expect("registry");
        assert_eq!(
            registry.by_id("L001").map(|r| r.severity).ok(),
            Some(Severity::Must)
        );
    }

    #[test]
    fn test_only_filter() {
        let only = vec!["S001".to_string(), "L002".to_string()];
        let registry =
            build_registry(&Config::default(), Preset::Strict, Some(&only)).expect("registry");
        let ids: Vec<&str> = registry.all().map(|r| r.id).collect();
        assert_eq!(ids, vec!["L002", "S001"]);
    }

    #[test]
    fn test_only_overrides_preset_but_not_config() {
        let only = vec!["G002".to_string(), "N001".to_string()];
        let config = Config::parse("[rules.N001]\nenabled = false\n").expect("valid config");
        let registry = build_registry(&config, Preset::Minimal, Some(&only)).expect("registry");
        let ids: Vec<&str> = registry.all().map(|r| r.id).collect();
        assert_eq!(ids, vec!["G002"]);
    }

    #[test]
    fn test_only_rejects_unknown_ids() {
        let only = vec!["X999".to_string()];
        let err = build_registry(&Config::default(), Preset::Strict, Some(&only))
            .expect_err("unknown rule");
        assert!(matches!(err, RegistryError::UnknownRule { .. }));
    }
}
