//! Flags `fallthrough` statements, which make case flow implicit.

use crate::descriptor::{RuleCategory, RuleDescriptor};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use crate::visitor::{Collector, Rule, RuleError, Visitor};

pub struct FallthroughRule {
    descriptor: RuleDescriptor,
}

impl FallthroughRule {
    pub fn new() -> Self {
        let descriptor = RuleDescriptor::new(
            "fallthrough",
            "Fallthrough",
            "Fallthrough should be avoided; list shared patterns on one \
             case instead of falling through",
        )
        .with_category(RuleCategory::Idiomatic)
        .with_non_triggering(&[
            "switch value {\ncase 1:\n    handleOne()\ndefault:\n    break\n}\n",
            "switch value {\ncase 1:\n    break\n}\n",
        ])
        .with_triggering(&[
            "switch value {\ncase 1:\n    ↓fallthrough\ndefault:\n    break\n}\n",
            "switch value {\ncase 1:\n    ↓fallthrough\ncase 2:\n    ↓fallthrough\ndefault:\n    break\n}\n",
        ]);
        Self { descriptor }
    }
}

impl Default for FallthroughRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for FallthroughRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn visitor(&self, severity: Severity) -> Box<dyn Visitor> {
        Box::new(FallthroughVisitor {
            collector: Collector::new(&self.descriptor, severity),
        })
    }
}

struct FallthroughVisitor {
    collector: Collector,
}

impl Visitor for FallthroughVisitor {
    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::FallthroughStmt]
    }

    fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
        self.collector
            .report(node.offset(), "case falls through implicitly");
        Ok(())
    }

    fn take_violations(&mut self) -> Vec<Violation> {
        self.collector.take()
    }
}
