//! Configuration types for matlint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::Severity;

/// Top-level configuration for matlint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (`"minimal"`, `"recommended"`, `"strict"`).
    #[serde(default)]
    pub preset: Option<String>,

    /// Lowest severity that fails the run (default: `"must"`).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// File discovery configuration.
    #[serde(default)]
    pub files: FilesConfig,

    /// Per-rule configurations, keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Gets the options for a rule.
    #[must_use]
    pub fn rule_config(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_id)
    }
}

/// Engine-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-rule timeout in milliseconds; unset means no bound.
    #[serde(default)]
    pub rule_timeout_ms: Option<u64>,

    /// Run the rules of one unit on the thread pool.
    #[serde(default)]
    pub parallel_rules: bool,
}

impl EngineConfig {
    /// Rule timeout as a duration.
    #[must_use]
    pub fn rule_timeout(&self) -> Option<Duration> {
        self.rule_timeout_ms.map(Duration::from_millis)
    }
}

/// File discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// File extensions to analyze, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            extensions: default_extensions(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_excludes() -> Vec<String> {
    vec!["**/slprj/**".to_string(), "**/codegen/**".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["m".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.files.respect_gitignore);
        assert_eq!(config.files.extensions, vec!["m"]);
        assert!(config.rules.is_empty());
        assert!(config.engine.rule_timeout().is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "should"

[engine]
rule_timeout_ms = 250
parallel_rules = true

[files]
root = "./toolbox"
exclude = ["**/private/**"]

[rules.L001]
severity = "may"
max_line_length = 100

[rules.S002]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.fail_on, Some(Severity::Should));
        assert_eq!(config.engine.rule_timeout(), Some(Duration::from_millis(250)));
        assert!(config.engine.parallel_rules);
        assert_eq!(config.files.root, PathBuf::from("./toolbox"));
        assert_eq!(config.files.extensions, vec!["m"]);

        assert_eq!(config.rule_config("L001").and_then(|c| c.enabled), None);
        assert_eq!(config.rule_config("S002").and_then(|c| c.enabled), Some(false));
        assert_eq!(config.rule_severity("L001"), Some(Severity::May));

        let rule_config = config.rule_config("L001").expect("L001 configured");
        assert_eq!(rule_config.get_int("max_line_length", 80), 100);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Config::parse("preset = [").expect_err("invalid toml");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let toml = "[rules.N001]\nseverity = \"fatal\"\n";
        assert!(Config::parse(toml).is_err());
    }
}
