//! Bundled source front end
//!
//! The engine itself is parser-agnostic: anything that can produce a
//! [`SyntaxTree`](crate::syntax::SyntaxTree) plugs in through
//! [`SourceParser`]. This module ships one such front end, a small
//! Swift-flavored demo grammar that covers the constructs the bundled
//! rules inspect: casts and `try` with `!`/`?` discriminators, `switch`
//! with `fallthrough`, `extension` declarations with member blocks, calls
//! and member access. Unknown constructs degrade to plain token nodes
//! rather than failing the parse.

mod lexer;
mod parser;

pub use parser::DemoParser;

use crate::syntax::SyntaxTree;
use thiserror::Error;

/// Error during parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated block comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },
}

/// Produces a positioned syntax tree from source text. Implemented by the
/// bundled [`DemoParser`] and by any external parser a host supplies.
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;
}
