//! Symbol listing for workspace and document views.

use crate::base::Span;
use crate::hir::{SemanticModel, Symbol, SymbolKind};

/// A symbol for the workspace symbol list or document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Symbol name.
    pub name: String,
    /// Qualified name (`view.field`, `explore.join`).
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub uri: String,
    pub span: Span,
    pub selection_span: Span,
    /// Owning view or explore.
    pub container_name: Option<String>,
}

impl SymbolInfo {
    pub fn from_symbol(model: &SemanticModel, symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            qualified_name: symbol.qualified_name.clone(),
            kind: symbol.kind,
            uri: symbol.declaration.uri.clone(),
            span: symbol.declaration.span,
            selection_span: symbol.declaration.name_span,
            container_name: model.parent(symbol).map(|p| p.name.clone()),
        }
    }

    /// LSP `SymbolKind` number.
    pub fn lsp_kind(&self) -> u32 {
        match self.kind {
            SymbolKind::Model => 2,                                // Module
            SymbolKind::View | SymbolKind::Explore => 5,           // Class
            SymbolKind::Join => 13,                                // Variable
            SymbolKind::Dimension | SymbolKind::DimensionGroup => 8, // Field
            SymbolKind::Measure => 6,                              // Method
            SymbolKind::Filter | SymbolKind::Parameter => 7,       // Property
        }
    }
}

/// Symbols declared in one document, in source order.
pub fn document_symbols(model: &SemanticModel, uri: &str) -> Vec<SymbolInfo> {
    let mut symbols: Vec<SymbolInfo> = model
        .symbols_in_file(uri)
        .into_iter()
        .map(|s| SymbolInfo::from_symbol(model, s))
        .collect();
    symbols.sort_by_key(|s| (s.span.start, s.span.end));
    symbols
}

/// Get all symbols in the workspace, optionally filtered by a query.
///
/// The query is a case-insensitive substring match against the name or the
/// qualified name. Results are sorted by qualified name.
pub fn workspace_symbols(model: &SemanticModel, query: Option<&str>) -> Vec<SymbolInfo> {
    let query = query.map(str::to_lowercase).filter(|q| !q.is_empty());
    let mut results: Vec<SymbolInfo> = model
        .symbols()
        .filter(|symbol| {
            query.as_deref().is_none_or(|q| {
                symbol.name.to_lowercase().contains(q)
                    || symbol.qualified_name.to_lowercase().contains(q)
            })
        })
        .map(|s| SymbolInfo::from_symbol(model, s))
        .collect();
    results.sort_by(|a, b| {
        a.qualified_name
            .cmp(&b.qualified_name)
            .then_with(|| a.kind.cmp(&b.kind))
    });
    results
}
