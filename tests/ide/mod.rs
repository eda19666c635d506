//! IDE feature tests
//!
//! Tests for:
//! - Code completion, including mid-edit documents
//! - Hover information
//! - Go to definition and find references
//! - Document and workspace symbols
//! - Semantic tokens

pub mod tests_completion;
pub mod tests_hover;
