//! Find references implementation.

use crate::base::Position;
use crate::hir::{Location, SemanticModel, SymbolKind};

/// Result of a find-references request.
#[derive(Clone, Debug, Default)]
pub struct ReferenceResult {
    /// All references found.
    pub references: Vec<Reference>,
    /// Whether the declaration was requested.
    pub include_declaration: bool,
}

impl ReferenceResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if any references were found.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Get the number of references.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.references.iter().map(|r| r.location.clone()).collect()
    }
}

/// A reference to a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub location: Location,
    /// Whether this is the declaration (vs a use).
    pub is_declaration: bool,
    pub kind: SymbolKind,
}

/// Find all references to the symbol at the given position.
pub fn find_references(
    model: &SemanticModel,
    uri: &str,
    position: Position,
    include_declaration: bool,
) -> ReferenceResult {
    let Some(symbol) = model.symbol_at(uri, position) else {
        return ReferenceResult::empty();
    };

    // the declaration, when requested, comes first
    let references = model
        .locations(symbol, include_declaration)
        .into_iter()
        .enumerate()
        .map(|(i, location)| Reference {
            location,
            is_declaration: include_declaration && i == 0,
            kind: symbol.kind,
        })
        .collect();

    ReferenceResult {
        references,
        include_declaration,
    }
}
