//! Positioned syntax tree consumed by the rule engine
//!
//! The engine only requires a tree of this shape: typed kind tags, ordered
//! children, and a stable byte position per node. It never mutates a tree.

use crate::violation::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Node kind tags. A closed set so dispatch can route by kind lookup
/// instead of downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxKind {
    /// Root of a parsed source unit
    SourceFile,
    /// `extension Name { ... }`
    ExtensionDecl,
    /// Braced member/statement block
    MemberBlock,
    /// `func name(...) { ... }`
    FunctionDecl,
    /// `switch subject { ... }`
    SwitchStmt,
    /// `case pattern:` / `default:` clause with its statements
    SwitchCase,
    /// A lone `fallthrough` statement
    FallthroughStmt,
    /// `expr as Type`, `expr as! Type`, `expr as? Type`
    AsExpr,
    /// `try expr`, `try! expr`, `try? expr`
    TryExpr,
    /// `callee(args...)`
    CallExpr,
    /// `base.member` or leading-dot `.member`
    MemberAccess,
    /// Identifier token
    Identifier,
    /// Keyword token
    Keyword,
    /// Operator or punctuation token
    Operator,
    /// String or number literal token
    Literal,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyntaxKind::SourceFile => "source-file",
            SyntaxKind::ExtensionDecl => "extension-decl",
            SyntaxKind::MemberBlock => "member-block",
            SyntaxKind::FunctionDecl => "function-decl",
            SyntaxKind::SwitchStmt => "switch-stmt",
            SyntaxKind::SwitchCase => "switch-case",
            SyntaxKind::FallthroughStmt => "fallthrough-stmt",
            SyntaxKind::AsExpr => "as-expr",
            SyntaxKind::TryExpr => "try-expr",
            SyntaxKind::CallExpr => "call-expr",
            SyntaxKind::MemberAccess => "member-access",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::Keyword => "keyword",
            SyntaxKind::Operator => "operator",
            SyntaxKind::Literal => "literal",
        };
        write!(f, "{}", name)
    }
}

impl SyntaxKind {
    /// Leaf token kinds carry source text; structural kinds do not.
    pub fn is_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::Identifier
                | SyntaxKind::Keyword
                | SyntaxKind::Operator
                | SyntaxKind::Literal
        )
    }
}

/// Byte range in the source, including leading trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// An immutable node in a positioned syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    /// Content start: the first byte after leading trivia. This is the
    /// position violations anchor to.
    offset: usize,
    /// Full range including leading trivia.
    span: Span,
    /// Source text for token nodes, empty for structural nodes.
    text: String,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a leaf token node.
    pub fn token(kind: SyntaxKind, text: &str, offset: usize, span: Span) -> Self {
        debug_assert!(kind.is_token());
        Self {
            kind,
            offset,
            span,
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    /// Create a structural node with an explicit position.
    pub fn new(kind: SyntaxKind, offset: usize, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            offset,
            span,
            text: String::new(),
            children,
        }
    }

    /// Create a structural node positioned at its first child.
    ///
    /// Panics if `children` is empty; structural nodes without children
    /// must use [`SyntaxNode::new`] with an explicit position.
    pub fn from_children(kind: SyntaxKind, children: Vec<SyntaxNode>) -> Self {
        let first = children.first().expect("node requires at least one child");
        let offset = first.offset;
        let span = Span::new(
            first.span.start,
            children.last().map(|c| c.span.end).unwrap_or(first.span.end),
        );
        Self::new(kind, offset, span, children)
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Position after skipping leading trivia.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Token text. Empty for structural nodes.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn is_token(&self) -> bool {
        self.kind.is_token()
    }

    /// First child of the given kind.
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// First keyword child with the given text.
    pub fn keyword(&self, text: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|c| c.kind == SyntaxKind::Keyword && c.text == text)
    }

    /// First operator child with the given text.
    pub fn operator(&self, text: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|c| c.kind == SyntaxKind::Operator && c.text == text)
    }

    /// Child that immediately follows `child` in this node's child list.
    pub fn child_after(&self, child: &SyntaxNode) -> Option<&SyntaxNode> {
        let idx = self
            .children
            .iter()
            .position(|c| std::ptr::eq(c, child))?;
        self.children.get(idx + 1)
    }
}

/// A parsed source unit: the root node plus the source text it was parsed
/// from and a line-start table for offset resolution.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    line_starts: Vec<usize>,
    root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(source: &str, root: SyntaxNode) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source: source.to_string(),
            line_starts,
            root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Resolve a byte offset to a 1-based line/column location.
    pub fn location(&self, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        Location {
            line,
            column: offset - line_start + 1,
        }
    }

    /// Depth-first post-order walk: every node is visited after all of its
    /// children.
    pub fn for_each_post_order<F: FnMut(&SyntaxNode)>(&self, mut f: F) {
        fn walk<F: FnMut(&SyntaxNode)>(node: &SyntaxNode, f: &mut F) {
            for child in node.children() {
                walk(child, f);
            }
            f(node);
        }
        walk(&self.root, &mut f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_tree() -> SyntaxTree {
        // `a\nbb` with one identifier per line
        let a = SyntaxNode::token(SyntaxKind::Identifier, "a", 0, Span::new(0, 1));
        let b = SyntaxNode::token(SyntaxKind::Identifier, "bb", 2, Span::new(1, 4));
        let root = SyntaxNode::new(SyntaxKind::SourceFile, 0, Span::new(0, 4), vec![a, b]);
        SyntaxTree::new("a\nbb", root)
    }

    #[test]
    fn test_location_resolution() {
        let tree = tiny_tree();
        assert_eq!(tree.location(0), Location { line: 1, column: 1 });
        assert_eq!(tree.location(2), Location { line: 2, column: 1 });
        assert_eq!(tree.location(3), Location { line: 2, column: 2 });
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let tree = tiny_tree();
        let mut kinds = Vec::new();
        tree.for_each_post_order(|n| kinds.push(n.kind()));
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::SourceFile
            ]
        );
    }

    #[test]
    fn test_from_children_position() {
        let a = SyntaxNode::token(SyntaxKind::Keyword, "as", 4, Span::new(3, 6));
        let b = SyntaxNode::token(SyntaxKind::Operator, "!", 6, Span::new(6, 7));
        let node = SyntaxNode::from_children(SyntaxKind::AsExpr, vec![a, b]);
        assert_eq!(node.offset(), 4);
        assert_eq!(node.span(), Span::new(3, 7));
    }

    #[test]
    fn test_child_accessors() {
        let kw = SyntaxNode::token(SyntaxKind::Keyword, "as", 0, Span::new(0, 2));
        let op = SyntaxNode::token(SyntaxKind::Operator, "!", 2, Span::new(2, 3));
        let node = SyntaxNode::from_children(SyntaxKind::AsExpr, vec![kw, op]);

        let found = node.keyword("as").unwrap();
        assert_eq!(found.text(), "as");
        assert!(node.keyword("try").is_none());
        assert_eq!(node.operator("!").unwrap().offset(), 2);

        let next = node.child_after(found).unwrap();
        assert_eq!(next.text(), "!");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SyntaxKind::FallthroughStmt.to_string(), "fallthrough-stmt");
        assert_eq!(SyntaxKind::AsExpr.to_string(), "as-expr");
    }
}
