//! High-level IR (HIR): the whole-workspace semantic model.
//!
//! ## Key Types
//!
//! - [`SemanticModel`] - immutable snapshot of symbols, references and diagnostics
//! - [`Symbol`] - one named construct or qualified field, keyed `"kind:qualifiedName"`
//! - [`Analyzer`] / [`analyze`] - rebuilds a model from a document set
//! - [`Rule`] - an isolated validation rule
//! - [`AnalysisConfig`] - disabled rules, severity overrides, deprecated parameters
//!
//! ## Passes
//!
//! ```text
//! documents ──▶ parse errors ──▶ symbols ──▶ cross references ──▶ rules ──▶ SemanticModel
//! ```

mod analyzer;
mod config;
mod diagnostics;
mod embedded;
mod model;
pub mod rules;
mod symbols;

pub use analyzer::{Analyzer, analyze};
pub use config::{AnalysisConfig, ConfigError, DEFAULT_DEPRECATED_PARAMETERS};
pub use diagnostics::{DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticCollector, Severity, codes};
pub use embedded::{EmbeddedReference, extract_embedded_references};
pub use model::SemanticModel;
pub use rules::{Rule, RuleContext, RuleError, SourceFile};
pub use symbols::{Declaration, Location, Symbol, SymbolId, SymbolKind, symbol_key};
