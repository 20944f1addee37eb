//! Flags force tries (`try!`), which trap when the expression throws.

use crate::descriptor::{RuleCategory, RuleDescriptor};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use crate::visitor::{Collector, Rule, RuleError, Visitor};

pub struct ForceTryRule {
    descriptor: RuleDescriptor,
}

impl ForceTryRule {
    pub fn new() -> Self {
        let descriptor = RuleDescriptor::new(
            "force_try",
            "Force Try",
            "Force tries should be avoided; handle the error or use an \
             optional try instead of trapping",
        )
        .with_category(RuleCategory::Idiomatic)
        .with_severity(Severity::Error)
        .with_non_triggering(&[
            "try decode(data)\n",
            "try? decode(data)\n",
            "let parsed = try? decode(data)\n",
        ])
        .with_triggering(&[
            "↓try! decode(data)\n",
            "let parsed = ↓try! decode(data)\n",
        ]);
        Self { descriptor }
    }
}

impl Default for ForceTryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ForceTryRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn visitor(&self, severity: Severity) -> Box<dyn Visitor> {
        Box::new(ForceTryVisitor {
            collector: Collector::new(&self.descriptor, severity),
        })
    }
}

struct ForceTryVisitor {
    collector: Collector,
}

impl Visitor for ForceTryVisitor {
    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::TryExpr]
    }

    fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
        if node.operator("!").is_none() {
            return Ok(());
        }
        let Some(kw) = node.keyword("try") else {
            return Ok(());
        };
        self.collector
            .report(kw.offset(), "force try traps when the expression throws");
        Ok(())
    }

    fn take_violations(&mut self) -> Vec<Violation> {
        self.collector.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::verify_rule;
    use crate::lang::DemoParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_corpus() {
        verify_rule(&ForceTryRule::new(), &DemoParser::new()).unwrap();
    }

    #[test]
    fn test_descriptor() {
        let desc = ForceTryRule::new().descriptor().clone();
        assert_eq!(desc.id, "force_try");
        assert_eq!(desc.default_severity, Severity::Error);
        assert!(!desc.opt_in);
    }
}
