//! Treelint - Pluggable rule engine for syntax-tree linting
//!
//! A rule engine that runs independent style checks over positioned
//! syntax trees. Rules declare the node kinds they care about; the engine
//! dispatches every enabled rule in a single post-order traversal per
//! tree and merges the results into one deterministic, ordered violation
//! sequence.
//!
//! # Architecture
//!
//! ```text
//! Linter -> ConfiguredRules -> Visitor (per rule, per tree) -> Violations
//!              ^                     ^
//!         Registry + LintConfig   SourceParser -> SyntaxTree
//! ```
//!
//! The registry owns every known rule. Resolving it against a
//! [`LintConfig`] applies enablement, severity overrides, and per-rule
//! source exclusions; the configured set lints each tree with fresh
//! visitors so trees can be processed in parallel.
//!
//! # Writing a rule
//!
//! A rule is a descriptor plus a visitor. The descriptor's triggering
//! examples carry `↓` markers at every expected violation position and
//! double as the rule's acceptance test:
//!
//! ```text
//! RuleDescriptor::new("force_cast", "Force Cast", "...")
//!     .with_severity(Severity::Error)
//!     .with_non_triggering(&["NSNumber() as? Int\n"])
//!     .with_triggering(&["NSNumber() ↓as! Int\n"])
//! ```
//!
//! `harness::verify_rule` checks a rule against its own corpus.

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod harness;
pub mod lang;
pub mod registry;
pub mod rules;
pub mod syntax;
pub mod violation;
pub mod visitor;

// Re-export main types
pub use config::{ConfigDiagnostic, ConfigError, LintConfig, RuleConfig, RuleOverride};
pub use descriptor::{RuleCategory, RuleDescriptor};
pub use engine::{LintRun, Linter, Source, SourceError, SourceReport};
pub use harness::{strip_markers, verify_rule, CorpusFailure, MARKER};
pub use lang::{DemoParser, ParseError, SourceParser};
pub use registry::{ConfiguredRules, Registry, RegistryError, RuleFault, RuleInstance, TreeReport};
pub use syntax::{Span, SyntaxKind, SyntaxNode, SyntaxTree};
pub use violation::{Location, Severity, Violation};
pub use visitor::{Collector, Rule, RuleError, Visitor};
