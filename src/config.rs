//! Configuration for rule instances
//!
//! Reads configuration from:
//! - `.treelintrc.yaml` / `.treelintrc.json` (project-level)
//! - `~/.treelintrc.yaml` (user-level)
//!
//! A [`LintConfig`] is the raw deserialized mapping from rule identifier
//! to per-rule overrides. It is resolved against a registry's descriptors
//! into read-only [`RuleConfig`] values at linter start-up; unknown
//! identifiers become batched [`ConfigDiagnostic`]s rather than failures.

use crate::descriptor::RuleDescriptor;
use crate::violation::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A non-fatal problem found while resolving configuration. Reported once
/// as a batch at start-up; valid rules still run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    /// Rule identifier the problem concerns
    pub rule_id: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule_id, self.message)
    }
}

/// Per-rule override supplied by a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverride {
    /// Explicit enable/disable. Absent means "enabled unless opt-in".
    pub enabled: Option<bool>,

    /// Severity override. Absent means the descriptor default.
    pub severity: Option<Severity>,

    /// Glob patterns of source names this rule skips
    pub excluded: Vec<String>,

    /// Rule-specific parameters; the rule's own concern, not the core's
    #[serde(flatten)]
    pub params: HashMap<String, serde_yaml::Value>,
}

/// Raw configuration: a mapping from rule identifier to overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Per-rule overrides keyed by rule identifier
    pub rules: HashMap<String, RuleOverride>,
}

impl LintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::Invalid(format!(
                "Unknown config file format: {}",
                ext
            ))),
        }
    }

    /// Load configuration from default locations, falling back to the
    /// empty configuration when none exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".treelintrc.yaml",
            ".treelintrc.yml",
            ".treelintrc.json",
            "treelint.yaml",
            "treelint.yml",
            "treelint.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Get the override for a rule, if any
    pub fn override_for(&self, rule_id: &str) -> Option<&RuleOverride> {
        self.rules.get(rule_id)
    }

    /// Report configuration keys that do not match any registered rule.
    /// `known` decides whether an identifier exists.
    pub fn unknown_ids<F: Fn(&str) -> bool>(&self, known: F) -> Vec<ConfigDiagnostic> {
        let mut diags: Vec<ConfigDiagnostic> = self
            .rules
            .keys()
            .filter(|id| !known(id))
            .map(|id| ConfigDiagnostic {
                rule_id: id.clone(),
                message: "unknown rule identifier in configuration".to_string(),
            })
            .collect();
        diags.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
        diags
    }
}

/// Resolved, read-only configuration for one rule instance
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Effective severity: override if present, else descriptor default
    pub severity: Severity,

    /// Whether the instance runs at all
    pub enabled: bool,

    /// Compiled exclusion patterns
    excluded: GlobSet,

    /// Rule-specific parameters
    pub params: HashMap<String, serde_yaml::Value>,
}

impl RuleConfig {
    /// Resolve the effective configuration for a descriptor. Invalid glob
    /// patterns are skipped and reported through `diagnostics`.
    pub fn resolve(
        descriptor: &RuleDescriptor,
        rule_override: Option<&RuleOverride>,
        diagnostics: &mut Vec<ConfigDiagnostic>,
    ) -> Self {
        let severity = rule_override
            .and_then(|o| o.severity)
            .unwrap_or(descriptor.default_severity);

        let enabled = rule_override
            .and_then(|o| o.enabled)
            .unwrap_or(!descriptor.opt_in);

        let mut builder = GlobSetBuilder::new();
        if let Some(o) = rule_override {
            for pattern in &o.excluded {
                match Glob::new(pattern) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(e) => diagnostics.push(ConfigDiagnostic {
                        rule_id: descriptor.id.clone(),
                        message: format!("invalid exclusion pattern `{}`: {}", pattern, e),
                    }),
                }
            }
        }
        let excluded = builder.build().unwrap_or_else(|_| GlobSet::empty());

        let params = rule_override.map(|o| o.params.clone()).unwrap_or_default();

        Self {
            severity,
            enabled,
            excluded,
            params,
        }
    }

    /// Default configuration for a descriptor (no overrides)
    pub fn defaults(descriptor: &RuleDescriptor) -> Self {
        let mut diags = Vec::new();
        Self::resolve(descriptor, None, &mut diags)
    }

    /// Check whether the rule skips a source unit
    pub fn is_excluded(&self, source_name: &str) -> bool {
        self.excluded.is_match(source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RuleDescriptor;
    use std::io::Write;

    fn descriptor() -> RuleDescriptor {
        RuleDescriptor::new("force_cast", "Force Cast", "desc").with_severity(Severity::Error)
    }

    fn opt_in_descriptor() -> RuleDescriptor {
        RuleDescriptor::new("explicit_init", "Explicit Init", "desc").opt_in()
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = LintConfig::new();
        assert!(config.rules.is_empty());
        assert!(config.override_for("force_cast").is_none());
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
rules:
  force_cast:
    severity: warning
  fallthrough:
    enabled: false
    excluded:
      - "generated/**"
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(
            config.override_for("force_cast").unwrap().severity,
            Some(Severity::Warning)
        );
        assert_eq!(
            config.override_for("fallthrough").unwrap().enabled,
            Some(false)
        );
    }

    #[test]
    fn test_rule_specific_params_flatten() {
        let yaml = r#"
rules:
  line_length:
    severity: error
    max_length: 120
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        let o = config.override_for("line_length").unwrap();
        assert_eq!(o.severity, Some(Severity::Error));
        assert_eq!(
            o.params.get("max_length"),
            Some(&serde_yaml::Value::from(120))
        );
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "rules:\n  force_cast:\n    enabled: false").unwrap();

        let config = LintConfig::load(&path).unwrap();
        assert_eq!(config.override_for("force_cast").unwrap().enabled, Some(false));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"rules": {"force_cast": {"severity": "warning"}}}"#).unwrap();

        let config = LintConfig::load(&path).unwrap();
        assert_eq!(
            config.override_for("force_cast").unwrap().severity,
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_load_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rules = {}").unwrap();
        assert!(matches!(
            LintConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_ids_batched() {
        let yaml = r#"
rules:
  force_cast: {}
  no_such_rule: {}
  another_missing: {}
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        let diags = config.unknown_ids(|id| id == "force_cast");
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].rule_id, "another_missing");
        assert_eq!(diags[1].rule_id, "no_such_rule");
    }

    #[test]
    fn test_resolve_defaults() {
        let mut diags = Vec::new();
        let config = RuleConfig::resolve(&descriptor(), None, &mut diags);
        assert!(config.enabled);
        assert_eq!(config.severity, Severity::Error);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_resolve_opt_in_disabled_by_default() {
        let config = RuleConfig::defaults(&opt_in_descriptor());
        assert!(!config.enabled);
    }

    #[test]
    fn test_resolve_opt_in_explicit_enable() {
        let mut diags = Vec::new();
        let o = RuleOverride {
            enabled: Some(true),
            ..RuleOverride::default()
        };
        let config = RuleConfig::resolve(&opt_in_descriptor(), Some(&o), &mut diags);
        assert!(config.enabled);
    }

    #[test]
    fn test_resolve_severity_override() {
        let mut diags = Vec::new();
        let o = RuleOverride {
            severity: Some(Severity::Warning),
            ..RuleOverride::default()
        };
        let config = RuleConfig::resolve(&descriptor(), Some(&o), &mut diags);
        assert_eq!(config.severity, Severity::Warning);
    }

    #[test]
    fn test_exclusion_patterns() {
        let mut diags = Vec::new();
        let o = RuleOverride {
            excluded: vec!["generated/**".to_string(), "*.g.demo".to_string()],
            ..RuleOverride::default()
        };
        let config = RuleConfig::resolve(&descriptor(), Some(&o), &mut diags);
        assert!(diags.is_empty());
        assert!(config.is_excluded("generated/model.demo"));
        assert!(config.is_excluded("api.g.demo"));
        assert!(!config.is_excluded("src/main.demo"));
    }

    #[test]
    fn test_invalid_exclusion_pattern_reported() {
        let mut diags = Vec::new();
        let o = RuleOverride {
            excluded: vec!["[".to_string()],
            ..RuleOverride::default()
        };
        let config = RuleConfig::resolve(&descriptor(), Some(&o), &mut diags);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule_id, "force_cast");
        assert!(!config.is_excluded("anything"));
    }
}
