//! Foundation types for the LookML toolchain.
//!
//! This module provides fundamental types used throughout the analyzer:
//! - [`Position`], [`Span`] - Line/column positions for AST nodes and symbols
//! - [`LineIndex`] - Byte offset to line/column conversion
//!
//! This module has NO dependencies on other lookml modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
