//! Visitor contract and the single-pass traversal driver
//!
//! Every rule supplies a fresh [`Visitor`] per tree. A visitor carries
//! exactly one piece of state, its accumulated violations, and is invoked
//! post-order: a node only after all of its children. Visitors never
//! mutate the tree and never observe one another, so all enabled rules
//! share a single traversal pass.

use crate::descriptor::RuleDescriptor;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use std::collections::HashMap;
use thiserror::Error;

/// Error raised by a visitor while processing a node. Faults are isolated
/// per rule per tree and never abort the traversal for other rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("malformed {kind} node at offset {offset}")]
    MalformedNode { kind: SyntaxKind, offset: usize },

    #[error("{0}")]
    Other(String),
}

impl RuleError {
    pub fn other(message: impl Into<String>) -> Self {
        RuleError::Other(message.into())
    }
}

/// A single-pass violation collector bound to one rule instance.
pub trait Visitor: Send {
    /// Node kinds this visitor wants to see. The driver routes only
    /// matching nodes; a visitor must still tolerate any node of a
    /// declared kind, since correctness may not depend on routing.
    fn kinds(&self) -> &'static [SyntaxKind];

    /// Visit one node. Called after all the node's children have been
    /// visited. Must not mutate anything except the visitor's own
    /// violation list.
    fn visit(&mut self, node: &SyntaxNode, tree: &SyntaxTree) -> Result<(), RuleError>;

    /// Drain the accumulated violations, in emission order.
    fn take_violations(&mut self) -> Vec<Violation>;
}

/// An independently defined check over a syntax tree.
pub trait Rule: Send + Sync {
    /// Static metadata, including the example corpus
    fn descriptor(&self) -> &RuleDescriptor;

    /// Build a fresh visitor for one tree traversal. `severity` is the
    /// effective severity the instance's violations carry.
    fn visitor(&self, severity: Severity) -> Box<dyn Visitor>;
}

/// Shared violation accumulator for visitor implementations: remembers the
/// rule identity and effective severity so call sites only supply an
/// anchor offset and a message.
#[derive(Debug)]
pub struct Collector {
    rule_id: String,
    severity: Severity,
    violations: Vec<Violation>,
}

impl Collector {
    pub fn new(descriptor: &RuleDescriptor, severity: Severity) -> Self {
        Self {
            rule_id: descriptor.id.clone(),
            severity,
            violations: Vec::new(),
        }
    }

    /// Record a violation anchored at `offset`.
    pub fn report(&mut self, offset: usize, message: &str) {
        self.violations
            .push(Violation::new(&self.rule_id, self.severity, offset, message));
    }

    pub fn take(&mut self) -> Vec<Violation> {
        std::mem::take(&mut self.violations)
    }
}

/// One visitor participating in a traversal, with its fault state.
pub(crate) struct VisitorSlot {
    pub rule_id: String,
    pub visitor: Box<dyn Visitor>,
    pub fault: Option<RuleError>,
}

impl VisitorSlot {
    pub fn new(rule_id: &str, visitor: Box<dyn Visitor>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            visitor,
            fault: None,
        }
    }
}

/// Drive one post-order traversal, routing each node to the visitors that
/// registered for its kind. A visitor that faults is skipped for the rest
/// of the tree; every other visitor is unaffected.
pub(crate) fn drive(tree: &SyntaxTree, slots: &mut [VisitorSlot]) {
    let mut by_kind: HashMap<SyntaxKind, Vec<usize>> = HashMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        for &kind in slot.visitor.kinds() {
            by_kind.entry(kind).or_default().push(idx);
        }
    }

    tree.for_each_post_order(|node| {
        let Some(interested) = by_kind.get(&node.kind()) else {
            return;
        };
        for &idx in interested {
            let slot = &mut slots[idx];
            if slot.fault.is_some() {
                continue;
            }
            if let Err(e) = slot.visitor.visit(node, tree) {
                log::warn!(
                    "rule `{}` faulted at offset {}: {}",
                    slot.rule_id,
                    node.offset(),
                    e
                );
                slot.fault = Some(e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    struct CountingVisitor {
        collector: Collector,
        kinds: &'static [SyntaxKind],
        fail_on: Option<SyntaxKind>,
    }

    impl CountingVisitor {
        fn new(id: &str, kinds: &'static [SyntaxKind]) -> Self {
            let desc = RuleDescriptor::new(id, id, "test");
            Self {
                collector: Collector::new(&desc, Severity::Warning),
                kinds,
                fail_on: None,
            }
        }
    }

    impl Visitor for CountingVisitor {
        fn kinds(&self) -> &'static [SyntaxKind] {
            self.kinds
        }

        fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
            if self.fail_on == Some(node.kind()) {
                return Err(RuleError::other("boom"));
            }
            self.collector.report(node.offset(), "seen");
            Ok(())
        }

        fn take_violations(&mut self) -> Vec<Violation> {
            self.collector.take()
        }
    }

    fn sample_tree() -> SyntaxTree {
        let kw = SyntaxNode::token(SyntaxKind::Keyword, "fallthrough", 0, Span::new(0, 11));
        let stmt = SyntaxNode::from_children(SyntaxKind::FallthroughStmt, vec![kw]);
        let ident = SyntaxNode::token(SyntaxKind::Identifier, "x", 12, Span::new(11, 13));
        let root = SyntaxNode::new(
            SyntaxKind::SourceFile,
            0,
            Span::new(0, 13),
            vec![stmt, ident],
        );
        SyntaxTree::new("fallthrough x", root)
    }

    #[test]
    fn test_drive_routes_by_kind() {
        let tree = sample_tree();
        let mut slots = vec![VisitorSlot::new(
            "r",
            Box::new(CountingVisitor::new("r", &[SyntaxKind::FallthroughStmt])),
        )];
        drive(&tree, &mut slots);

        let violations = slots[0].visitor.take_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].offset, 0);
    }

    #[test]
    fn test_drive_post_order() {
        let tree = sample_tree();
        let mut slots = vec![VisitorSlot::new(
            "r",
            Box::new(CountingVisitor::new(
                "r",
                &[SyntaxKind::Keyword, SyntaxKind::FallthroughStmt],
            )),
        )];
        drive(&tree, &mut slots);

        // Keyword child before its FallthroughStmt parent, both at offset 0
        let violations = slots[0].visitor.take_violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].offset, violations[1].offset);
    }

    #[test]
    fn test_fault_isolated_to_one_visitor() {
        let tree = sample_tree();
        let mut failing = CountingVisitor::new(
            "bad",
            &[SyntaxKind::FallthroughStmt, SyntaxKind::Identifier],
        );
        failing.fail_on = Some(SyntaxKind::FallthroughStmt);

        let mut slots = vec![
            VisitorSlot::new("bad", Box::new(failing)),
            VisitorSlot::new(
                "good",
                Box::new(CountingVisitor::new("good", &[SyntaxKind::Identifier])),
            ),
        ];
        drive(&tree, &mut slots);

        assert!(slots[0].fault.is_some());
        // Once faulted, the visitor sees no further nodes
        assert!(slots[0].visitor.take_violations().is_empty());
        // The healthy visitor is untouched
        assert_eq!(slots[1].visitor.take_violations().len(), 1);
        assert!(slots[1].fault.is_none());
    }

    #[test]
    fn test_determinism() {
        let tree = sample_tree();
        let run = || {
            let mut slots = vec![VisitorSlot::new(
                "r",
                Box::new(CountingVisitor::new(
                    "r",
                    &[SyntaxKind::FallthroughStmt, SyntaxKind::Identifier],
                )),
            )];
            drive(&tree, &mut slots);
            slots[0].visitor.take_violations()
        };
        assert_eq!(run(), run());
    }
}
