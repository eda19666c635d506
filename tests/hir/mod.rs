//! Semantic analysis tests
//!
//! Tests for:
//! - The reference scenarios (symbols and diagnostics per input)
//! - Model properties (idempotence, reference completeness, duplicates, cycles)
//! - Rule isolation and configuration

pub mod tests_config;
pub mod tests_properties;
pub mod tests_scenarios;
