//! Flags explicit `.init` calls on a type reference, where calling the
//! type directly reads better. Opt-in.

use crate::descriptor::{RuleCategory, RuleDescriptor};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use crate::visitor::{Collector, Rule, RuleError, Visitor};

pub struct ExplicitInitRule {
    descriptor: RuleDescriptor,
}

impl ExplicitInitRule {
    pub fn new() -> Self {
        let descriptor = RuleDescriptor::new(
            "explicit_init",
            "Explicit Init",
            "Explicitly calling .init on a type is redundant; call the \
             type directly",
        )
        .with_category(RuleCategory::Idiomatic)
        .opt_in()
        .with_non_triggering(&[
            "URL(string: path)\n",
            ".init(value)\n",
            "foo.init()\n",
            "Foo.create()\n",
            "config.session.init()\n",
        ])
        .with_triggering(&[
            "URL.↓init(string: path)\n",
            "let url = URL.↓init(string: path)\n",
            "Foo.↓init()\n",
        ]);
        Self { descriptor }
    }
}

impl Default for ExplicitInitRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ExplicitInitRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn visitor(&self, severity: Severity) -> Box<dyn Visitor> {
        Box::new(ExplicitInitVisitor {
            collector: Collector::new(&self.descriptor, severity),
        })
    }
}

struct ExplicitInitVisitor {
    collector: Collector,
}

impl Visitor for ExplicitInitVisitor {
    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MemberAccess]
    }

    fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
        // Needs an explicit base: a bare `.init(...)` has nothing to drop.
        let [base, member] = node.children() else {
            return Ok(());
        };
        if member.text() != "init" {
            return Ok(());
        }
        // Type references are plain capitalized identifiers in this
        // grammar; anything else is a value expression.
        let is_type_ref = base.kind() == SyntaxKind::Identifier
            && base.text().chars().next().is_some_and(|c| c.is_uppercase());
        if !is_type_ref {
            return Ok(());
        }
        self.collector
            .report(member.offset(), "redundant .init on a type reference");
        Ok(())
    }

    fn take_violations(&mut self) -> Vec<Violation> {
        self.collector.take()
    }
}
