//! AnalysisHost and Analysis: state management for IDE features.
//!
//! The `AnalysisHost` owns the workspace and provides `Analysis` snapshots
//! for querying. Every query on one `Analysis` sees the same documents and
//! the same semantic model.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//!
//! // Apply file changes
//! host.set_file_content("orders.view.lkml", "view: orders { }");
//!
//! // Get a snapshot for queries
//! let analysis = host.analysis();
//! let hover = analysis.hover("orders.view.lkml", Position::new(0, 7));
//! let diagnostics = analysis.diagnostics("orders.view.lkml");
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::base::Position;
use crate::hir::{AnalysisConfig, Analyzer, Diagnostic, SemanticModel};
use crate::parser::ParseError;
use crate::project::{LoadError, Workspace, WorkspaceLoader};

use super::semantic_tokens::encode;
use super::{
    CompletionItem, GotoResult, HoverResult, ReferenceResult, SemanticToken, SymbolInfo,
    completions, document_symbols, find_references, goto_definition, hover, semantic_tokens,
    workspace_symbols,
};

/// Owns all mutable state for the IDE layer.
///
/// Apply changes via `set_file_content()` and `remove_file()`,
/// then get a consistent snapshot via `analysis()`.
#[derive(Default)]
pub struct AnalysisHost {
    workspace: Workspace,
}

impl AnalysisHost {
    /// Create a new empty AnalysisHost.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            workspace: Workspace::with_config(config),
        }
    }

    /// Use a custom analyzer, e.g. one with extra rules.
    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            workspace: Workspace::with_analyzer(analyzer),
        }
    }

    /// Set the content of a file and re-analyze.
    ///
    /// Returns the parse error, if the file did not parse. The document is
    /// stored either way.
    pub fn set_file_content(&mut self, uri: &str, content: &str) -> Option<ParseError> {
        self.workspace
            .update_document(uri, content)
            .parse()
            .error()
            .cloned()
    }

    /// Remove a file. Returns whether it was present.
    pub fn remove_file(&mut self, uri: &str) -> bool {
        self.workspace.remove_document(uri).is_some()
    }

    pub fn has_file(&self, uri: &str) -> bool {
        self.workspace.get_document(uri).is_some()
    }

    /// Get the number of files loaded.
    pub fn file_count(&self) -> usize {
        self.workspace.document_count()
    }

    /// Load every LookML file under `dir`. Returns the number loaded.
    pub fn load_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize, LoadError> {
        WorkspaceLoader::new().load_directory(dir, &mut self.workspace)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.workspace.config()
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.workspace.set_config(config);
    }

    /// The current semantic model; stays valid after later edits.
    pub fn snapshot(&self) -> Arc<SemanticModel> {
        self.workspace.model()
    }

    /// Get an immutable snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            workspace: &self.workspace,
        }
    }
}

/// A read-only view over one workspace state.
///
/// Queries never fail loudly: unknown URIs and positions give empty results.
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    workspace: &'a Workspace,
}

impl<'a> Analysis<'a> {
    pub fn model(&self) -> &'a SemanticModel {
        self.workspace.model_ref()
    }

    pub fn diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        self.model().diagnostics_for(uri).to_vec()
    }

    pub fn all_diagnostics(&self) -> &'a [Diagnostic] {
        self.model().diagnostics()
    }

    pub fn completions(&self, uri: &str, position: Position) -> Vec<CompletionItem> {
        match self.workspace.get_document(uri) {
            Some(document) => completions(self.model(), document, position),
            None => Vec::new(),
        }
    }

    pub fn goto_definition(&self, uri: &str, position: Position) -> GotoResult {
        goto_definition(self.model(), uri, position)
    }

    pub fn find_references(
        &self,
        uri: &str,
        position: Position,
        include_declaration: bool,
    ) -> ReferenceResult {
        find_references(self.model(), uri, position, include_declaration)
    }

    pub fn hover(&self, uri: &str, position: Position) -> Option<HoverResult> {
        hover(self.workspace, uri, position)
    }

    /// Tokens for one document, as absolute positions.
    pub fn semantic_token_list(&self, uri: &str) -> Vec<SemanticToken> {
        match self.workspace.get_document(uri) {
            Some(document) => semantic_tokens(document.content(), self.workspace.config()),
            None => Vec::new(),
        }
    }

    /// Tokens for one document in LSP relative encoding.
    pub fn semantic_tokens(&self, uri: &str) -> Vec<u32> {
        encode(&self.semantic_token_list(uri))
    }

    pub fn document_symbols(&self, uri: &str) -> Vec<SymbolInfo> {
        document_symbols(self.model(), uri)
    }

    pub fn workspace_symbols(&self, query: Option<&str>) -> Vec<SymbolInfo> {
        workspace_symbols(self.model(), query)
    }
}

/// An [`AnalysisHost`] shared between threads.
///
/// Writers hold the lock for the whole edit-and-reanalyze step, so the
/// documents and the model are swapped together. Readers can take an
/// `Arc<SemanticModel>` snapshot and release the lock immediately.
#[derive(Clone, Default)]
pub struct SharedAnalysisHost {
    inner: Arc<RwLock<AnalysisHost>>,
}

impl SharedAnalysisHost {
    pub fn new(host: AnalysisHost) -> Self {
        Self {
            inner: Arc::new(RwLock::new(host)),
        }
    }

    pub fn set_file_content(&self, uri: &str, content: &str) -> Option<ParseError> {
        self.inner.write().set_file_content(uri, content)
    }

    pub fn remove_file(&self, uri: &str) -> bool {
        self.inner.write().remove_file(uri)
    }

    pub fn snapshot(&self) -> Arc<SemanticModel> {
        self.inner.read().snapshot()
    }

    /// Run `f` against a consistent [`Analysis`] under the read lock.
    pub fn with_analysis<R>(&self, f: impl FnOnce(Analysis<'_>) -> R) -> R {
        let host = self.inner.read();
        f(host.analysis())
    }
}
