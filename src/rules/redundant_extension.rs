//! Flags extension declarations whose member block is empty.

use crate::descriptor::{RuleCategory, RuleDescriptor};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use crate::visitor::{Collector, Rule, RuleError, Visitor};

pub struct RedundantExtensionRule {
    descriptor: RuleDescriptor,
}

impl RedundantExtensionRule {
    pub fn new() -> Self {
        let descriptor = RuleDescriptor::new(
            "redundant_extension",
            "Redundant Extension",
            "An extension with no members adds nothing and should be removed",
        )
        .with_category(RuleCategory::Lint)
        .with_non_triggering(&[
            "extension Foo {\n    func bar() {}\n}\n",
            "extension Foo { func bar() {} }\n",
        ])
        .with_triggering(&[
            "↓extension Foo {}\n",
            "↓extension Bar {\n}\n",
        ]);
        Self { descriptor }
    }
}

impl Default for RedundantExtensionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for RedundantExtensionRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn visitor(&self, severity: Severity) -> Box<dyn Visitor> {
        Box::new(RedundantExtensionVisitor {
            collector: Collector::new(&self.descriptor, severity),
        })
    }
}

struct RedundantExtensionVisitor {
    collector: Collector,
}

impl Visitor for RedundantExtensionVisitor {
    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ExtensionDecl]
    }

    fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
        // No member block at all means the source was incomplete; only a
        // present-but-empty block is redundant.
        let Some(block) = node.child_of_kind(SyntaxKind::MemberBlock) else {
            return Ok(());
        };
        if !block.children().is_empty() {
            return Ok(());
        }
        let Some(kw) = node.keyword("extension") else {
            return Ok(());
        };
        self.collector
            .report(kw.offset(), "extension declares no members");
        Ok(())
    }

    fn take_violations(&mut self) -> Vec<Violation> {
        self.collector.take()
    }
}
