//! The workspace document store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::hir::{AnalysisConfig, Analyzer, SemanticModel};

use super::document::WorkspaceDocument;

/// Documents keyed by URI plus the semantic model derived from them.
///
/// Every mutation re-analyzes the whole workspace before returning, so the
/// model is never stale with respect to the documents.
pub struct Workspace {
    documents: BTreeMap<String, WorkspaceDocument>,
    analyzer: Analyzer,
    model: Arc<SemanticModel>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Creates a new empty workspace
    pub fn new() -> Self {
        Self::with_analyzer(Analyzer::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self::with_analyzer(Analyzer::new(config))
    }

    /// Use a custom analyzer (rule set).
    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            documents: BTreeMap::new(),
            analyzer,
            model: Arc::new(SemanticModel::default()),
        }
    }

    /// Parse `content` and store it under `uri`, replacing any previous version.
    pub fn update_document(&mut self, uri: &str, content: &str) -> &WorkspaceDocument {
        self.documents
            .insert(uri.to_string(), WorkspaceDocument::new(uri, content));
        self.reanalyze();
        // just inserted
        &self.documents[uri]
    }

    /// Store many documents with a single re-analysis.
    pub fn update_documents<I, U, C>(&mut self, batch: I)
    where
        I: IntoIterator<Item = (U, C)>,
        U: Into<String>,
        C: Into<Arc<str>>,
    {
        for (uri, content) in batch {
            let uri = uri.into();
            let document = WorkspaceDocument::new(uri.clone(), content);
            self.documents.insert(uri, document);
        }
        self.reanalyze();
    }

    /// Remove a document. Returns it if it was present.
    pub fn remove_document(&mut self, uri: &str) -> Option<WorkspaceDocument> {
        let removed = self.documents.remove(uri);
        if removed.is_some() {
            self.reanalyze();
        }
        removed
    }

    pub fn get_document(&self, uri: &str) -> Option<&WorkspaceDocument> {
        self.documents.get(uri)
    }

    /// All documents in URI order.
    pub fn all_documents(&self) -> impl Iterator<Item = &WorkspaceDocument> {
        self.documents.values()
    }

    /// Documents that parsed successfully.
    pub fn parsed_documents(&self) -> impl Iterator<Item = &WorkspaceDocument> {
        self.documents.values().filter(|d| d.is_parsed())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// The current model. Holding the `Arc` keeps the snapshot alive across
    /// later edits.
    pub fn model(&self) -> Arc<SemanticModel> {
        Arc::clone(&self.model)
    }

    /// Borrow the current model without cloning the `Arc`.
    pub fn model_ref(&self) -> &SemanticModel {
        &self.model
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.analyzer.config()
    }

    /// Replace the configuration and re-analyze.
    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.analyzer.set_config(config);
        self.reanalyze();
    }

    fn reanalyze(&mut self) {
        let model = self.analyzer.analyze(self.documents.values());
        debug!(
            documents = self.documents.len(),
            symbols = model.symbol_count(),
            diagnostics = model.diagnostics().len(),
            "workspace re-analyzed"
        );
        self.model = Arc::new(model);
    }
}
