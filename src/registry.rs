//! Rule registry and per-tree dispatch
//!
//! The registry owns every known rule. Identifier uniqueness is enforced
//! at registration, since identifiers are configuration keys. Resolving a
//! registry against a [`LintConfig`] yields the enabled instances for a
//! run plus the batch of configuration diagnostics; the configured set
//! then lints trees one traversal at a time.

use crate::config::{ConfigDiagnostic, LintConfig, RuleConfig};
use crate::descriptor::RuleDescriptor;
use crate::syntax::SyntaxTree;
use crate::violation::Violation;
use crate::visitor::{drive, Rule, RuleError, VisitorSlot};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Fatal registry construction error
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate rule identifier `{0}`")]
    DuplicateId(String),
}

/// A rule execution fault, surfaced distinct from style violations. The
/// offending rule contributes zero violations for the tree it faulted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFault {
    /// Rule that faulted
    pub rule_id: String,
    /// The underlying error
    pub error: RuleError,
}

impl std::fmt::Display for RuleFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule `{}` failed: {}", self.rule_id, self.error)
    }
}

/// Result of linting one tree
#[derive(Debug, Default)]
pub struct TreeReport {
    /// Violations ordered by (offset, rule id), duplicates collapsed
    pub violations: Vec<Violation>,
    /// Per-rule execution faults
    pub faults: Vec<RuleFault>,
}

/// Holds all known rules, keyed by identifier
#[derive(Default)]
pub struct Registry {
    rules: Vec<Arc<dyn Rule>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the bundled rules
    pub fn with_builtin_rules() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in crate::rules::builtin_rules() {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Register a rule. Duplicate identifiers are fatal.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), RegistryError> {
        let id = rule.descriptor().id.clone();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.index.insert(id, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.index.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.iter().map(|r| r.descriptor())
    }

    /// Resolve the enabled instances for a run. Unknown configuration
    /// keys and invalid exclusion patterns become diagnostics; they never
    /// prevent valid rules from running.
    pub fn configured(&self, config: &LintConfig) -> ConfiguredRules {
        let mut diagnostics = config.unknown_ids(|id| self.contains(id));

        let mut instances = Vec::new();
        for rule in &self.rules {
            let descriptor = rule.descriptor();
            let resolved = RuleConfig::resolve(
                descriptor,
                config.override_for(&descriptor.id),
                &mut diagnostics,
            );
            if resolved.enabled {
                instances.push(RuleInstance {
                    rule: Arc::clone(rule),
                    config: resolved,
                });
            }
        }

        log::debug!(
            "configured {} of {} rules ({} config diagnostics)",
            instances.len(),
            self.rules.len(),
            diagnostics.len()
        );

        ConfiguredRules {
            instances,
            diagnostics,
        }
    }
}

/// A shared rule plus its resolved configuration
pub struct RuleInstance {
    rule: Arc<dyn Rule>,
    config: RuleConfig,
}

impl RuleInstance {
    pub fn descriptor(&self) -> &RuleDescriptor {
        self.rule.descriptor()
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }
}

/// The enabled rule instances for a run, ready to lint trees
pub struct ConfiguredRules {
    instances: Vec<RuleInstance>,
    /// Start-up configuration diagnostics, reported once per run
    pub diagnostics: Vec<ConfigDiagnostic>,
}

impl ConfiguredRules {
    pub fn instances(&self) -> &[RuleInstance] {
        &self.instances
    }

    /// Lint one tree: fresh visitors, one traversal, then merge every
    /// rule's violations into a single ordered sequence. `source_name`
    /// drives per-rule exclusion patterns.
    pub fn lint_tree(&self, tree: &SyntaxTree, source_name: &str) -> TreeReport {
        let active: Vec<&RuleInstance> = self
            .instances
            .iter()
            .filter(|i| !i.config.is_excluded(source_name))
            .collect();

        let mut slots: Vec<VisitorSlot> = active
            .iter()
            .map(|instance| {
                VisitorSlot::new(
                    &instance.descriptor().id,
                    instance.rule.visitor(instance.config.severity),
                )
            })
            .collect();

        drive(tree, &mut slots);

        let mut report = TreeReport::default();
        for mut slot in slots {
            let violations = slot.visitor.take_violations();
            match slot.fault {
                Some(error) => report.faults.push(RuleFault {
                    rule_id: slot.rule_id,
                    error,
                }),
                // A faulted rule contributes nothing for this tree
                None => report.violations.extend(violations),
            }
        }

        report.violations.sort();
        report
            .violations
            .dedup_by(|a, b| a.is_duplicate_of(b));
        report
    }
}
