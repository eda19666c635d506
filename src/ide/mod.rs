//! IDE features: high-level APIs for editor-protocol handlers.
//!
//! This module is the read-only query surface over the semantic model (HIR).
//! Each function corresponds to an editor request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **No LSP types**: Uses our own types, converted at the protocol boundary
//! 3. **Silent misses**: An unresolvable position gives an empty result
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use lookml::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! host.set_file_content("orders.view.lkml", "view: orders { dimension: id {} }");
//!
//! let analysis = host.analysis();
//! let symbols = analysis.document_symbols("orders.view.lkml");
//! ```

mod analysis;
mod completion;
mod goto;
mod hover;
mod references;
mod semantic_tokens;
mod symbols;

pub use analysis::{Analysis, AnalysisHost, SharedAnalysisHost};
pub use completion::{
    CompletionContext, CompletionItem, CompletionKind, completion_context, completions,
};
pub use goto::{GotoResult, GotoTarget, goto_definition};
pub use hover::{HoverResult, hover};
pub use references::{Reference, ReferenceResult, find_references};
pub use semantic_tokens::{
    SemanticToken, TOKEN_MODIFIERS, TOKEN_TYPES, TokenType, decode as decode_semantic_tokens,
    encode as encode_semantic_tokens, modifiers, semantic_tokens,
};
pub use symbols::{SymbolInfo, document_symbols, workspace_symbols};
