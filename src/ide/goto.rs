//! Go-to-definition implementation.

use crate::base::{Position, Span};
use crate::hir::{Location, SemanticModel, Symbol, SymbolKind};

/// Result of a go-to-definition request.
#[derive(Clone, Debug, Default)]
pub struct GotoResult {
    /// The targets to jump to.
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    /// Create an empty result (no targets found).
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Create a result with a single target.
    pub fn single(target: GotoTarget) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// Check if any targets were found.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target locations, as returned over the protocol.
    pub fn locations(&self) -> Vec<Location> {
        self.targets.iter().map(|t| t.location.clone()).collect()
    }
}

/// A target location for go-to-definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    /// The whole declaration.
    pub location: Location,
    pub name_span: Span,
    pub kind: SymbolKind,
    pub name: String,
}

impl From<&Symbol> for GotoTarget {
    fn from(symbol: &Symbol) -> Self {
        Self {
            location: symbol.declaration.location(),
            name_span: symbol.declaration.name_span,
            kind: symbol.kind,
            name: symbol.name.clone(),
        }
    }
}

/// Find the declaration of the symbol at the given position.
///
/// Works from a declaration (jumps to itself) or from any recorded
/// reference such as `${orders.id}` or `from: orders`.
pub fn goto_definition(model: &SemanticModel, uri: &str, position: Position) -> GotoResult {
    match model.symbol_at(uri, position) {
        Some(symbol) => GotoResult::single(GotoTarget::from(symbol)),
        None => GotoResult::empty(),
    }
}
