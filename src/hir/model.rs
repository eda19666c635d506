//! The semantic model: an immutable snapshot of symbols and diagnostics.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{Position, Span};
use crate::syntax::NodeId;

use super::diagnostics::Diagnostic;
use super::symbols::{Declaration, Location, Symbol, SymbolId, SymbolKind, symbol_key};

/// Field kinds in `${view.field}` resolution order.
const FIELD_LOOKUP_ORDER: [SymbolKind; 5] = [
    SymbolKind::Dimension,
    SymbolKind::DimensionGroup,
    SymbolKind::Measure,
    SymbolKind::Filter,
    SymbolKind::Parameter,
];

/// Whole-workspace symbols, diagnostics and lookup indexes.
///
/// Built by [`analyze`](super::analyze) and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct SemanticModel {
    pub(super) symbols: Vec<Symbol>,
    pub(super) by_key: FxHashMap<String, SymbolId>,
    pub(super) node_to_symbol: FxHashMap<(String, NodeId), SymbolId>,
    /// `view.created_date` → the `created` dimension group.
    pub(super) timeframe_aliases: FxHashMap<String, SymbolId>,
    pub(super) symbols_by_uri: BTreeMap<String, Vec<SymbolId>>,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) diagnostics_by_uri: BTreeMap<String, Vec<Diagnostic>>,
}

impl SemanticModel {
    pub fn symbol(&self, key: &str) -> Option<&Symbol> {
        self.by_key.get(key).and_then(|id| self.symbol_by_id(*id))
    }

    pub fn symbol_by_id(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Every symbol, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// All symbol keys, sorted.
    pub fn symbol_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Look a symbol up by kind and qualified name.
    pub fn lookup(&self, kind: SymbolKind, qualified_name: &str) -> Option<&Symbol> {
        trace!(kind = kind.key_prefix(), name = qualified_name, "lookup");
        self.symbol(&symbol_key(kind, qualified_name))
    }

    pub fn view(&self, name: &str) -> Option<&Symbol> {
        self.lookup(SymbolKind::View, name)
    }

    /// Resolve `view.field` as written in an expression: dimension, then
    /// dimension group (including `group_timeframe` names), measure, filter,
    /// parameter.
    pub fn field(&self, view: &str, field: &str) -> Option<&Symbol> {
        let qualified = format!("{view}.{field}");
        FIELD_LOOKUP_ORDER
            .iter()
            .find_map(|kind| self.lookup(*kind, &qualified))
            .or_else(|| {
                self.timeframe_aliases
                    .get(&qualified)
                    .and_then(|id| self.symbol_by_id(*id))
            })
    }

    /// Fields owned by a view symbol.
    pub fn children(&self, parent: SymbolId) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(move |s| s.parent == Some(parent))
    }

    /// Generated `group_timeframe` field names of a view, sorted, with the
    /// dimension group each belongs to.
    pub fn timeframe_fields(&self, view: &str) -> Vec<(&str, &Symbol)> {
        let prefix = format!("{view}.");
        let mut out: Vec<(&str, &Symbol)> = self
            .timeframe_aliases
            .iter()
            .filter_map(|(alias, id)| {
                let name = alias.strip_prefix(&prefix)?;
                Some((name, self.symbol_by_id(*id)?))
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn parent(&self, symbol: &Symbol) -> Option<&Symbol> {
        symbol.parent.and_then(|id| self.symbol_by_id(id))
    }

    pub fn symbol_for_node(&self, uri: &str, node: NodeId) -> Option<&Symbol> {
        self.node_to_symbol
            .get(&(uri.to_string(), node))
            .and_then(|id| self.symbol_by_id(*id))
    }

    /// Symbols declared in one document.
    pub fn symbols_in_file(&self, uri: &str) -> Vec<&Symbol> {
        self.symbols_by_uri
            .get(uri)
            .map(|ids| ids.iter().filter_map(|id| self.symbol_by_id(*id)).collect())
            .unwrap_or_default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for(&self, uri: &str) -> &[Diagnostic] {
        self.diagnostics_by_uri
            .get(uri)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The symbol whose declaration or one of whose references contains
    /// `position`; the smallest containing range wins.
    pub fn symbol_at(&self, uri: &str, position: Position) -> Option<&Symbol> {
        self.symbol_range_at(uri, position).map(|(symbol, _)| symbol)
    }

    /// Like [`symbol_at`](Self::symbol_at), also returning the matched range.
    pub fn symbol_range_at(&self, uri: &str, position: Position) -> Option<(&Symbol, Span)> {
        let mut best: Option<(&Symbol, Span)> = None;
        for symbol in &self.symbols {
            let declared = (symbol.declaration.uri == uri).then_some(symbol.declaration.span);
            let referenced = symbol
                .references
                .iter()
                .filter(|r| r.uri == uri)
                .map(|r| r.span);
            for span in declared.into_iter().chain(referenced) {
                if !span.contains(position) {
                    continue;
                }
                if best.is_none_or(|(_, current)| span.is_smaller_than(&current)) {
                    best = Some((symbol, span));
                }
            }
        }
        best
    }

    /// Declaration location and, optionally, every recorded reference.
    pub fn locations(&self, symbol: &Symbol, include_declaration: bool) -> Vec<Location> {
        let mut out = Vec::with_capacity(symbol.references.len() + 1);
        if include_declaration {
            out.push(symbol.declaration.location());
        }
        out.extend(symbol.references.iter().cloned());
        out
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.diagnostics.is_empty()
    }
}

/// Mutable state used while a model is being built.
#[derive(Debug, Default)]
pub(super) struct ModelBuilder {
    model: SemanticModel,
}

impl ModelBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn model(&self) -> &SemanticModel {
        &self.model
    }

    /// Declare a symbol. A second declaration of the same key replaces the
    /// first one in place (its id is kept, references are discarded).
    pub(super) fn declare(
        &mut self,
        kind: SymbolKind,
        name: &str,
        qualified_name: String,
        declaration: Declaration,
        parent: Option<SymbolId>,
    ) -> SymbolId {
        let key = symbol_key(kind, &qualified_name);
        let node_key = (declaration.uri.clone(), declaration.node);
        let uri = declaration.uri.clone();

        let id = match self.model.by_key.get(&key).copied() {
            Some(id) => {
                let previous = &self.model.symbols[id.index()];
                let previous_node = (previous.declaration.uri.clone(), previous.declaration.node);
                if let Some(ids) = self.model.symbols_by_uri.get_mut(&previous_node.0) {
                    ids.retain(|existing| *existing != id);
                }
                self.model.node_to_symbol.remove(&previous_node);
                self.model.symbols[id.index()] = Symbol {
                    id,
                    name: name.to_string(),
                    qualified_name,
                    kind,
                    declaration,
                    references: Vec::new(),
                    parent,
                };
                id
            }
            None => {
                let id = SymbolId(self.model.symbols.len() as u32);
                self.model.symbols.push(Symbol {
                    id,
                    name: name.to_string(),
                    qualified_name,
                    kind,
                    declaration,
                    references: Vec::new(),
                    parent,
                });
                self.model.by_key.insert(key, id);
                id
            }
        };

        self.model.node_to_symbol.insert(node_key, id);
        self.model.symbols_by_uri.entry(uri).or_default().push(id);
        id
    }

    /// Map another AST node onto an existing symbol, e.g. a refinement onto
    /// the view it refines.
    pub(super) fn attach_node(&mut self, uri: &str, node: NodeId, id: SymbolId) {
        self.model.node_to_symbol.insert((uri.to_string(), node), id);
    }

    pub(super) fn alias_timeframe(&mut self, qualified_name: String, group: SymbolId) {
        self.model.timeframe_aliases.insert(qualified_name, group);
    }

    pub(super) fn add_reference(&mut self, id: SymbolId, location: Location) {
        if let Some(symbol) = self.model.symbols.get_mut(id.index()) {
            symbol.references.push(location);
        }
    }

    pub(super) fn finish(mut self, diagnostics: Vec<Diagnostic>) -> SemanticModel {
        for diagnostic in &diagnostics {
            self.model
                .diagnostics_by_uri
                .entry(diagnostic.uri.clone())
                .or_default()
                .push(diagnostic.clone());
        }
        self.model.diagnostics = diagnostics;
        self.model
    }
}
