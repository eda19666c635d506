//! Lexer and raw parser tests.

pub mod tests_lexer;
pub mod tests_parse;
