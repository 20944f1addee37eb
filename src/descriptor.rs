//! Rule descriptors: static metadata plus the example corpus
//!
//! A descriptor is created once at process start, one per rule
//! implementation, and never changes afterwards. Its triggering and
//! non-triggering examples double as documentation and as the rule's
//! acceptance test (see the `harness` module).

use crate::violation::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Constructs that are legal but not idiomatic
    Idiomatic,
    /// Formatting and naming consistency
    #[default]
    Style,
    /// Rules that improve runtime performance
    Performance,
    /// Suspicious or redundant code
    Lint,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Idiomatic => write!(f, "idiomatic"),
            RuleCategory::Style => write!(f, "style"),
            RuleCategory::Performance => write!(f, "performance"),
            RuleCategory::Lint => write!(f, "lint"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idiomatic" => Ok(RuleCategory::Idiomatic),
            "style" => Ok(RuleCategory::Style),
            "performance" | "perf" => Ok(RuleCategory::Performance),
            "lint" | "lint-only" => Ok(RuleCategory::Lint),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Static metadata for one rule implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Unique identifier, stable across versions. Used as the
    /// configuration key and for de-duplication.
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Detailed description
    pub description: String,

    /// Rule category
    #[serde(default)]
    pub category: RuleCategory,

    /// Default severity, used unless configuration overrides it
    #[serde(default)]
    pub default_severity: Severity,

    /// Opt-in rules are excluded from default-enabled sets and must be
    /// explicitly enabled by configuration.
    #[serde(default)]
    pub opt_in: bool,

    /// Snippets the rule must accept without any violation
    #[serde(default)]
    pub non_triggering_examples: Vec<String>,

    /// Snippets that embed `↓` markers at every expected violation offset
    #[serde(default)]
    pub triggering_examples: Vec<String>,
}

impl RuleDescriptor {
    /// Create a descriptor with minimal required fields
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: RuleCategory::default(),
            default_severity: Severity::default(),
            opt_in: false,
            non_triggering_examples: Vec::new(),
            triggering_examples: Vec::new(),
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the default severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    /// Mark the rule as opt-in
    pub fn opt_in(mut self) -> Self {
        self.opt_in = true;
        self
    }

    /// Set the non-triggering examples
    pub fn with_non_triggering(mut self, examples: &[&str]) -> Self {
        self.non_triggering_examples = examples.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the triggering examples (marker-annotated)
    pub fn with_triggering(mut self, examples: &[&str]) -> Self {
        self.triggering_examples = examples.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let desc = RuleDescriptor::new("test-rule", "Test Rule", "A rule for tests");

        assert_eq!(desc.id, "test-rule");
        assert_eq!(desc.category, RuleCategory::Style);
        assert_eq!(desc.default_severity, Severity::Warning);
        assert!(!desc.opt_in);
        assert!(desc.non_triggering_examples.is_empty());
        assert!(desc.triggering_examples.is_empty());
    }

    #[test]
    fn test_descriptor_builder() {
        let desc = RuleDescriptor::new("force-thing", "Force Thing", "No forcing")
            .with_category(RuleCategory::Idiomatic)
            .with_severity(Severity::Error)
            .opt_in()
            .with_non_triggering(&["ok()\n"])
            .with_triggering(&["↓bad()\n"]);

        assert_eq!(desc.category, RuleCategory::Idiomatic);
        assert_eq!(desc.default_severity, Severity::Error);
        assert!(desc.opt_in);
        assert_eq!(desc.non_triggering_examples, vec!["ok()\n"]);
        assert_eq!(desc.triggering_examples, vec!["↓bad()\n"]);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("idiomatic".parse::<RuleCategory>(), Ok(RuleCategory::Idiomatic));
        assert_eq!("perf".parse::<RuleCategory>(), Ok(RuleCategory::Performance));
        assert_eq!("lint-only".parse::<RuleCategory>(), Ok(RuleCategory::Lint));
        assert!("unknown".parse::<RuleCategory>().is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(RuleCategory::Idiomatic.to_string(), "idiomatic");
        assert_eq!(RuleCategory::Lint.to_string(), "lint");
    }
}
