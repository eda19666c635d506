//! LookML parser.
//!
//! Turns source text into a [`RawDocument`]: an untyped tree of key/value
//! entries plus a parallel [`PositionTree`]. The typed AST is built from this
//! output by [`crate::syntax::AstBuilder`].
//!
//! ```text
//! text ──Lexer──▶ tokens ──parse()──▶ RawDocument { tree, positions }
//! ```

mod error;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod raw;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind, is_expression_key, tokenize};
pub use parser::parse;
pub use raw::{PositionEntry, PositionTree, RawDocument, RawEntry, RawObject, RawScalar, RawValue};
