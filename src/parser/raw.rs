//! Raw parse output: a tree of key/value entries plus a parallel position tree.
//!
//! The raw tree knows nothing about LookML constructs; it is the untyped
//! output the AST builder consumes. Every [`RawObject`] entry has a matching
//! [`PositionEntry`] at the same index in the corresponding [`PositionTree`].

use crate::base::Span;

/// A scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScalar {
    /// A quoted string, unescaped.
    String(String),
    Number(f64),
    /// A bare word such as `number`, `yes` or `orders.id`.
    Ident(String),
}

impl RawScalar {
    pub fn as_text(&self) -> String {
        match self {
            RawScalar::String(s) | RawScalar::Ident(s) => s.clone(),
            RawScalar::Number(n) => n.to_string(),
        }
    }
}

/// A value in the raw tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(RawScalar),
    /// Text of a `key: ... ;;` value with surrounding whitespace trimmed.
    Expression(String),
    List(Vec<RawValue>),
    /// A `{ ... }` body, named or anonymous (the name lives on the entry).
    Object(RawObject),
}

impl RawValue {
    pub fn as_object(&self) -> Option<&RawObject> {
        match self {
            RawValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Textual form of a scalar or expression value.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Scalar(s) => Some(s.as_text()),
            RawValue::Expression(e) => Some(e.clone()),
            _ => None,
        }
    }
}

/// One `key: [name] value` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    /// The block name for `key: name { ... }` entries.
    pub name: Option<String>,
    pub value: RawValue,
}

/// An ordered list of entries. Duplicate keys (and duplicate named blocks)
/// are preserved in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObject {
    pub entries: Vec<RawEntry>,
}

impl RawObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RawEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    /// All named blocks of one construct kind, e.g. every `dimension: x { }`.
    pub fn named_blocks<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (usize, &'a str, &'a RawObject)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.key == key)
            .filter_map(|(i, e)| Some((i, e.name.as_deref()?, e.value.as_object()?)))
    }
}

/// Positions of one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionEntry {
    /// From the start of the key to the end of the value (closing brace, `;;`).
    pub span: Span,
    pub key_span: Span,
    pub name_span: Option<Span>,
    pub value_span: Span,
    /// Positions of the body of an object value.
    pub children: Option<PositionTree>,
    /// Positions of list items.
    pub items: Vec<Span>,
}

/// Positions parallel to a [`RawObject`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTree {
    pub entries: Vec<PositionEntry>,
}

impl PositionTree {
    pub fn entry(&self, index: usize) -> Option<&PositionEntry> {
        self.entries.get(index)
    }
}

/// The complete output of a successful parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    tree: RawObject,
    positions: PositionTree,
}

impl RawDocument {
    pub fn new(tree: RawObject, positions: PositionTree) -> Self {
        Self { tree, positions }
    }

    pub fn tree(&self) -> &RawObject {
        &self.tree
    }

    /// The position tree mirroring [`RawDocument::tree`].
    pub fn positions(&self) -> &PositionTree {
        &self.positions
    }
}
