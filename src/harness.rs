//! Example-driven self-test harness
//!
//! Every descriptor carries its own corpus: non-triggering examples that
//! must produce zero violations and triggering examples whose `↓` markers
//! pin the exact expected violation offsets. A rule is correct precisely
//! when it passes its own corpus; rule test modules call [`verify_rule`]
//! so documentation and regression tests cannot drift apart.

use crate::config::RuleConfig;
use crate::lang::{ParseError, SourceParser};
use crate::visitor::{drive, Rule, RuleError, VisitorSlot};
use thiserror::Error;

/// Zero-width marker placed immediately before the expected anchor token
/// in triggering examples.
pub const MARKER: char = '↓';

/// One way an example corpus check can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusFailure {
    /// A non-triggering example produced violations: the rule is unsound
    /// on code it claims is acceptable.
    #[error(
        "non-triggering example produced violations at {actual:?}:\n{example}"
    )]
    UnexpectedViolations { example: String, actual: Vec<usize> },

    /// A triggering example's violations did not match its markers in
    /// count, position, or order.
    #[error(
        "triggering example mismatch: expected offsets {expected:?}, got {actual:?}:\n{example}"
    )]
    PositionMismatch {
        example: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// An example did not parse
    #[error("example failed to parse: {error}\n{example}")]
    Parse { example: String, error: ParseError },

    /// The rule faulted while visiting an example
    #[error("rule faulted on example: {error}\n{example}")]
    Fault { example: String, error: RuleError },
}

/// Remove every marker from an example, recording the byte offset each
/// marker occupied in the stripped text.
pub fn strip_markers(example: &str) -> (String, Vec<usize>) {
    let mut clean = String::with_capacity(example.len());
    let mut offsets = Vec::new();
    for ch in example.chars() {
        if ch == MARKER {
            offsets.push(clean.len());
        } else {
            clean.push(ch);
        }
    }
    (clean, offsets)
}

enum RunError {
    Parse(ParseError),
    Fault(RuleError),
}

/// Run one rule's visitor over a tree parsed from `source`, at the given
/// configuration, and return its violation offsets in emission order.
fn run_example(
    rule: &dyn Rule,
    parser: &dyn SourceParser,
    source: &str,
    config: &RuleConfig,
) -> Result<Vec<usize>, RunError> {
    let tree = parser.parse(source).map_err(RunError::Parse)?;
    let mut slot = VisitorSlot::new(&rule.descriptor().id, rule.visitor(config.severity));
    drive(&tree, std::slice::from_mut(&mut slot));

    if let Some(error) = slot.fault {
        return Err(RunError::Fault(error));
    }
    Ok(slot
        .visitor
        .take_violations()
        .iter()
        .map(|v| v.offset)
        .collect())
}

/// Check a rule against its own declared corpus at default configuration.
///
/// Non-triggering examples must yield no violations; triggering examples
/// must yield violations at exactly the marker offsets, same count, same
/// order. All failures are collected rather than stopping at the first.
pub fn verify_rule(
    rule: &dyn Rule,
    parser: &dyn SourceParser,
) -> Result<(), Vec<CorpusFailure>> {
    let descriptor = rule.descriptor();
    let config = RuleConfig::defaults(descriptor);
    let mut failures = Vec::new();

    for example in &descriptor.non_triggering_examples {
        match run_example(rule, parser, example, &config) {
            Ok(actual) if actual.is_empty() => {}
            Ok(actual) => failures.push(CorpusFailure::UnexpectedViolations {
                example: example.clone(),
                actual,
            }),
            Err(error) => failures.push(failure_from(example, error)),
        }
    }

    for example in &descriptor.triggering_examples {
        let (clean, expected) = strip_markers(example);
        match run_example(rule, parser, &clean, &config) {
            Ok(actual) if actual == expected => {}
            Ok(actual) => failures.push(CorpusFailure::PositionMismatch {
                example: example.clone(),
                expected,
                actual,
            }),
            Err(error) => failures.push(failure_from(example, error)),
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

fn failure_from(example: &str, error: RunError) -> CorpusFailure {
    match error {
        RunError::Parse(error) => CorpusFailure::Parse {
            example: example.to_string(),
            error,
        },
        RunError::Fault(error) => CorpusFailure::Fault {
            example: example.to_string(),
            error,
        },
    }
}
