//! Parse error type.

use thiserror::Error;

use crate::base::Position;

/// Category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A character the lexer does not recognise.
    InvalidCharacter,
    UnterminatedString,
    /// An expression value without its `;;` terminator.
    UnterminatedExpression,
    /// A `{` with no matching `}`.
    UnclosedBrace,
    /// A `[` with no matching `]`.
    UnclosedBracket,
    ExpectedColon,
    ExpectedValue,
    UnexpectedToken,
}

/// The parser rejected the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .position.line + 1, .position.column + 1)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }
}
