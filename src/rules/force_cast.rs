//! Flags force casts (`as!`), which trap at runtime when the cast fails.

use crate::descriptor::{RuleCategory, RuleDescriptor};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use crate::violation::{Severity, Violation};
use crate::visitor::{Collector, Rule, RuleError, Visitor};

pub struct ForceCastRule {
    descriptor: RuleDescriptor,
}

impl ForceCastRule {
    pub fn new() -> Self {
        let descriptor = RuleDescriptor::new(
            "force_cast",
            "Force Cast",
            "Force casts should be avoided; prefer conditional casts that \
             surface failure as a value instead of trapping",
        )
        .with_category(RuleCategory::Idiomatic)
        .with_severity(Severity::Error)
        .with_non_triggering(&[
            "NSNumber() as? Int\n",
            "NSNumber() as Int\n",
            "let width = bounds.width as? Double\n",
            "let label = \"as!\"\n",
        ])
        .with_triggering(&[
            "NSNumber() ↓as! Int\n",
            "let number = NSNumber() ↓as! Int\n",
            "value ↓as! Foo ↓as! Bar\n",
        ]);
        Self { descriptor }
    }
}

impl Default for ForceCastRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ForceCastRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn visitor(&self, severity: Severity) -> Box<dyn Visitor> {
        Box::new(ForceCastVisitor {
            collector: Collector::new(&self.descriptor, severity),
        })
    }
}

struct ForceCastVisitor {
    collector: Collector,
}

impl Visitor for ForceCastVisitor {
    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::AsExpr]
    }

    fn visit(&mut self, node: &SyntaxNode, _tree: &SyntaxTree) -> Result<(), RuleError> {
        if node.operator("!").is_none() {
            return Ok(());
        }
        let Some(kw) = node.keyword("as") else {
            return Ok(());
        };
        self.collector
            .report(kw.offset(), "force cast traps when the cast fails");
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
    use crate::lang::{DemoParser, SourceParser};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_corpus() {
        verify_rule(&ForceCastRule::new(), &DemoParser::new()).unwrap();
    }

    #[test]
    fn test_descriptor() {
        let desc = ForceCastRule::new().descriptor().clone();
        assert_eq!(desc.id, "force_cast");
        assert_eq!(desc.default_severity, Severity::Error);
        assert_eq!(desc.category, RuleCategory::Idiomatic);
        assert!(!desc.opt_in);
    }

    #[test]
    fn test_chained_casts_reported_in_text_order() {
        let tree = DemoParser::new().parse("value as! Foo as! Bar\n").unwrap();
        let rule = ForceCastRule::new();
        let mut visitor = rule.visitor(Severity::Error);
        tree.for_each_post_order(|n| {
            if visitor.kinds().contains(&n.kind()) {
                visitor.visit(n, &tree).unwrap();
            }
        });
        let offsets: Vec<usize> = visitor.take_violations().iter().map(|v| v.offset).collect();
        assert_eq!(offsets, vec![6, 14]);
    }
}
