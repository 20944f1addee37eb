//! Tree builder for the demo grammar
//!
//! A tolerant recursive-descent pass over the token stream. Constructs it
//! does not understand are kept as plain token nodes so that a partially
//! understood source still produces a positioned tree; rules short-circuit
//! on missing substructure anyway.

use super::lexer::{lex, Token, TokenKind};
use super::{ParseError, SourceParser};
use crate::syntax::{Span, SyntaxKind, SyntaxNode, SyntaxTree};

/// The bundled Swift-flavored parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoParser;

impl DemoParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for DemoParser {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tokens = lex(source)?;
        let mut builder = TreeBuilder { tokens, pos: 0 };
        let root = builder.parse_file(source.len());
        Ok(SyntaxTree::new(source, root))
    }
}

struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl TreeBuilder {
    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.current().is_keyword(kw)
    }

    fn at_operator(&self, op: &str) -> bool {
        self.current().is_operator(op)
    }

    fn at_identifier(&self) -> bool {
        self.current().kind == TokenKind::Identifier
    }

    /// Consume the current token without producing a node.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token as a leaf node.
    fn bump_leaf(&mut self) -> SyntaxNode {
        let token = self.bump();
        leaf(&token)
    }

    fn parse_file(&mut self, source_len: usize) -> SyntaxNode {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_item());
        }
        let offset = items.first().map(|n| n.offset()).unwrap_or(0);
        SyntaxNode::new(
            SyntaxKind::SourceFile,
            offset,
            Span::new(0, source_len),
            items,
        )
    }

    /// One declaration or statement. Always consumes at least one token.
    fn parse_item(&mut self) -> SyntaxNode {
        if self.at_keyword("extension") {
            self.parse_extension()
        } else if self.at_keyword("func") {
            self.parse_func()
        } else if self.at_keyword("switch") {
            self.parse_switch()
        } else if self.at_keyword("fallthrough") {
            let kw = self.bump_leaf();
            SyntaxNode::from_children(SyntaxKind::FallthroughStmt, vec![kw])
        } else {
            self.parse_expr()
        }
    }

    fn parse_extension(&mut self) -> SyntaxNode {
        let mut children = vec![self.bump_leaf()];
        if self.at_identifier() {
            children.push(self.bump_leaf());
        }
        if self.at_operator("{") {
            children.push(self.parse_block());
        }
        SyntaxNode::from_children(SyntaxKind::ExtensionDecl, children)
    }

    fn parse_func(&mut self) -> SyntaxNode {
        let mut children = vec![self.bump_leaf()];
        if self.at_identifier() {
            children.push(self.bump_leaf());
        }
        // Parameter list kept as plain token leaves
        if self.at_operator("(") {
            let mut depth = 0usize;
            loop {
                if self.at_eof() {
                    break;
                }
                if self.at_operator("(") {
                    depth += 1;
                } else if self.at_operator(")") {
                    depth -= 1;
                    children.push(self.bump_leaf());
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                children.push(self.bump_leaf());
            }
        }
        if self.at_operator("->") {
            children.push(self.bump_leaf());
            if self.at_identifier() {
                children.push(self.bump_leaf());
            }
        }
        if self.at_operator("{") {
            children.push(self.parse_block());
        }
        SyntaxNode::from_children(SyntaxKind::FunctionDecl, children)
    }

    /// Braced block: `{ items... }`. Braces define the node span but are
    /// not children, so emptiness is just `children().is_empty()`.
    fn parse_block(&mut self) -> SyntaxNode {
        let lbrace = self.bump();
        let mut items = Vec::new();
        while !self.at_eof() && !self.at_operator("}") {
            items.push(self.parse_item());
        }
        let rbrace = self.bump();
        SyntaxNode::new(
            SyntaxKind::MemberBlock,
            lbrace.offset,
            Span::new(lbrace.full_start, rbrace.end),
            items,
        )
    }

    fn parse_switch(&mut self) -> SyntaxNode {
        let kw = self.bump_leaf();
        let offset = kw.offset();
        let start = kw.span().start;
        let mut children = vec![kw];
        if !self.at_operator("{") && !self.at_eof() {
            children.push(self.parse_expr());
        }

        let mut end = children.last().map(|c| c.span().end).unwrap_or(start);
        if self.at_operator("{") {
            self.bump();
            while !self.at_eof() && !self.at_operator("}") {
                if self.at_keyword("case") || self.at_keyword("default") {
                    children.push(self.parse_case());
                } else {
                    children.push(self.parse_item());
                }
            }
            let rbrace = self.bump();
            end = rbrace.end;
        }

        SyntaxNode::new(SyntaxKind::SwitchStmt, offset, Span::new(start, end), children)
    }

    /// `case pattern:` or `default:` plus the statements that follow, up
    /// to the next clause or the closing brace.
    fn parse_case(&mut self) -> SyntaxNode {
        let mut children = vec![self.bump_leaf()];
        while !self.at_eof() && !self.at_operator(":") && !self.at_operator("}") {
            children.push(self.bump_leaf());
        }
        if self.at_operator(":") {
            children.push(self.bump_leaf());
        }
        while !self.at_eof()
            && !self.at_operator("}")
            && !self.at_keyword("case")
            && !self.at_keyword("default")
        {
            children.push(self.parse_item());
        }
        SyntaxNode::from_children(SyntaxKind::SwitchCase, children)
    }

    fn parse_expr(&mut self) -> SyntaxNode {
        let mut expr = if self.at_keyword("try") {
            self.parse_try()
        } else {
            self.parse_postfix()
        };

        // `expr as Type`, `expr as! Type`, `expr as? Type`, chainable
        while self.at_keyword("as") {
            let mut children = vec![expr, self.bump_leaf()];
            if self.at_operator("!") || self.at_operator("?") {
                children.push(self.bump_leaf());
            }
            if self.at_identifier() {
                children.push(self.bump_leaf());
            }
            expr = SyntaxNode::from_children(SyntaxKind::AsExpr, children);
        }
        expr
    }

    fn parse_try(&mut self) -> SyntaxNode {
        let mut children = vec![self.bump_leaf()];
        if self.at_operator("!") || self.at_operator("?") {
            children.push(self.bump_leaf());
        }
        children.push(self.parse_postfix());
        SyntaxNode::from_children(SyntaxKind::TryExpr, children)
    }

    fn parse_postfix(&mut self) -> SyntaxNode {
        let mut expr = self.parse_primary();
        loop {
            if self.at_operator("(") {
                expr = self.parse_call(expr);
            } else if self.at_operator(".") {
                self.bump();
                if self.at_eof() {
                    break;
                }
                let member = self.bump_leaf();
                expr = SyntaxNode::from_children(SyntaxKind::MemberAccess, vec![expr, member]);
            } else {
                break;
            }
        }
        expr
    }

    fn parse_call(&mut self, callee: SyntaxNode) -> SyntaxNode {
        let offset = callee.offset();
        let start = callee.span().start;
        let mut children = vec![callee];
        self.bump();

        while !self.at_eof() && !self.at_operator(")") {
            // Argument label `name:`
            if self.at_identifier() && self.peek().is_some_and(|t| t.is_operator(":")) {
                children.push(self.bump_leaf());
                self.bump();
            }
            children.push(self.parse_expr());
            if self.at_operator(",") {
                self.bump();
            }
        }
        let rparen = self.bump();
        SyntaxNode::new(
            SyntaxKind::CallExpr,
            offset,
            Span::new(start, rparen.end),
            children,
        )
    }

    fn parse_primary(&mut self) -> SyntaxNode {
        // Leading-dot member access: `.init(...)`
        if self.at_operator(".") {
            let dot = self.bump();
            if self.at_eof() {
                return SyntaxNode::token(
                    SyntaxKind::Operator,
                    &dot.text,
                    dot.offset,
                    Span::new(dot.full_start, dot.end),
                );
            }
            let member = self.bump_leaf();
            let end = member.span().end;
            return SyntaxNode::new(
                SyntaxKind::MemberAccess,
                dot.offset,
                Span::new(dot.full_start, end),
                vec![member],
            );
        }
        // Any other token becomes a leaf; unknown constructs degrade to
        // token nodes instead of failing the parse.
        self.bump_leaf()
    }
}

fn leaf(token: &Token) -> SyntaxNode {
    let kind = match token.kind {
        TokenKind::Identifier => SyntaxKind::Identifier,
        TokenKind::Keyword => SyntaxKind::Keyword,
        TokenKind::Number | TokenKind::Str => SyntaxKind::Literal,
        TokenKind::Operator | TokenKind::Eof => SyntaxKind::Operator,
    };
    SyntaxNode::token(
        kind,
        &token.text,
        token.offset,
        Span::new(token.full_start, token.end),
    )
}
