//! Semantic symbols: one per named construct and qualified field.

use crate::base::Span;
use crate::syntax::{FieldNode, NodeId};

/// The kind of a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Model,
    View,
    Explore,
    Join,
    Dimension,
    Measure,
    Filter,
    Parameter,
    DimensionGroup,
}

impl SymbolKind {
    /// Prefix of the symbol key, `"<prefix>:<qualified name>"`.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            SymbolKind::Model => "model",
            SymbolKind::View => "view",
            SymbolKind::Explore => "explore",
            SymbolKind::Join => "join",
            SymbolKind::Dimension => "dimension",
            SymbolKind::Measure => "measure",
            SymbolKind::Filter => "filter",
            SymbolKind::Parameter => "parameter",
            SymbolKind::DimensionGroup => "dimension_group",
        }
    }

    /// Human-readable name for messages and hover.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Model => "model",
            SymbolKind::View => "view",
            SymbolKind::Explore => "explore",
            SymbolKind::Join => "join",
            SymbolKind::Dimension => "dimension",
            SymbolKind::Measure => "measure",
            SymbolKind::Filter => "filter",
            SymbolKind::Parameter => "parameter",
            SymbolKind::DimensionGroup => "dimension group",
        }
    }

    /// Dimensions, measures, filters, parameters and dimension groups.
    pub fn is_field(&self) -> bool {
        matches!(
            self,
            SymbolKind::Dimension
                | SymbolKind::Measure
                | SymbolKind::Filter
                | SymbolKind::Parameter
                | SymbolKind::DimensionGroup
        )
    }

    pub fn of_field(field: &FieldNode<'_>) -> Self {
        match field {
            FieldNode::Dimension(_) => SymbolKind::Dimension,
            FieldNode::Measure(_) => SymbolKind::Measure,
            FieldNode::Filter(_) => SymbolKind::Filter,
            FieldNode::Parameter(_) => SymbolKind::Parameter,
            FieldNode::DimensionGroup(_) => SymbolKind::DimensionGroup,
        }
    }
}

/// Build a symbol key.
pub fn symbol_key(kind: SymbolKind, qualified_name: &str) -> String {
    format!("{}:{}", kind.key_prefix(), qualified_name)
}

/// Index of a symbol in its model's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A range in a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: String,
    pub span: Span,
}

impl Location {
    pub fn new(uri: impl Into<String>, span: Span) -> Self {
        Self {
            uri: uri.into(),
            span,
        }
    }
}

/// Where a symbol is declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub uri: String,
    /// The whole construct.
    pub span: Span,
    pub name_span: Span,
    /// The declaring AST node within the document at `uri`.
    pub node: NodeId,
}

impl Declaration {
    pub fn location(&self) -> Location {
        Location::new(self.uri.clone(), self.span)
    }
}

/// A named construct known to the semantic model.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    /// `view.field` for fields, `explore.join` for joins, the bare name otherwise.
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub declaration: Declaration,
    pub references: Vec<Location>,
    /// Owning view (fields) or explore (joins).
    pub parent: Option<SymbolId>,
}

impl Symbol {
    pub fn key(&self) -> String {
        symbol_key(self.kind, &self.qualified_name)
    }
}
