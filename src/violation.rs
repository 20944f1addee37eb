//! Violation types for rule evaluation results

use crate::syntax::SyntaxTree;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Severity level for violations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - potential issue
    #[default]
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Resolved source location (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single reported instance of a rule's condition being met.
///
/// Created by a visitor during traversal, never mutated afterwards. The
/// position is a byte offset into the source; line/column resolution is
/// deferred until a reporter asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule ID that produced this violation
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Byte offset of the anchor token, after leading trivia
    pub offset: usize,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(rule_id: &str, severity: Severity, offset: usize, message: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            offset,
            message: message.to_string(),
        }
    }

    /// Resolve the offset to a line/column location.
    pub fn location(&self, tree: &SyntaxTree) -> Location {
        tree.location(self.offset)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Two violations from the same rule at the same offset are duplicates.
    pub fn is_duplicate_of(&self, other: &Violation) -> bool {
        self.offset == other.offset && self.rule_id == other.rule_id
    }
}

impl PartialOrd for Violation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Violation {
    /// Total order by offset, ties broken by rule identifier for
    /// deterministic aggregation.
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then_with(|| self.rule_id.cmp(&other.rule_id))
    }
}
