//! # lookml-base
//!
//! Core library for LookML parsing, AST, semantic analysis and IDE queries.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → IDE features (completion, hover, goto-def, references, tokens)
//!   ↓
//! hir       → Semantic model, analyzer passes, validation rules
//!   ↓
//! project   → Workspace document store, directory loading
//!   ↓
//! syntax    → Typed AST and the AST builder
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, position tree
//!   ↓
//! base      → Primitives (Position, Span, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use lookml::ide::AnalysisHost;
//! use lookml::base::Position;
//!
//! let mut host = AnalysisHost::new();
//! host.set_file_content(
//!     "orders.view.lkml",
//!     "view: orders {\n  dimension: id {\n    sql: ${TABLE}.id ;;\n  }\n}\n",
//! );
//!
//! let analysis = host.analysis();
//! assert!(analysis.diagnostics("orders.view.lkml").is_empty());
//! assert!(analysis.hover("orders.view.lkml", Position::new(1, 14)).is_some());
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project → hir → ide)
// ============================================================================

/// Foundation types: Position, Span, LineIndex
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, position tree
pub mod parser;

/// Syntax: typed AST nodes and the AST builder
pub mod syntax;

/// Project management: workspace documents and loading
pub mod project;

/// High-level IR: the semantic model and analyzer
pub mod hir;

/// IDE features: completion, hover, goto-definition, find-references
pub mod ide;

// Re-export foundation types
pub use base::{LineIndex, Position, Span, TextRange, TextSize};

// Re-export the main entry points
pub use hir::{AnalysisConfig, Diagnostic, SemanticModel, Severity, analyze};
pub use parser::ParseError;
pub use project::{Workspace, WorkspaceDocument};
pub use syntax::{LookmlFile, build_file};
