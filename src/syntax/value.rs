//! Parameter values attached to AST nodes.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::base::Span;
use crate::parser::{RawEntry, RawScalar, RawValue};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    /// `yes` / `no`
    Boolean(bool),
}

/// A recursive parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Scalar(Scalar),
    /// A nested block such as `link: { ... }` or `set: name { ... }`.
    Object {
        kind: String,
        properties: IndexMap<String, ParameterValue>,
    },
    List(Vec<ParameterValue>),
}

impl ParameterValue {
    pub fn string(value: impl Into<String>) -> Self {
        ParameterValue::Scalar(Scalar::String(value.into()))
    }

    /// The value as text, for string, number and boolean scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Scalar(Scalar::String(s)) => Some(s),
            ParameterValue::Scalar(Scalar::Boolean(true)) => Some("yes"),
            ParameterValue::Scalar(Scalar::Boolean(false)) => Some("no"),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Scalar(Scalar::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// String items of a list value; a single string is treated as a one-item list.
    pub fn as_string_list(&self) -> Vec<String> {
        match self {
            ParameterValue::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    ParameterValue::Scalar(Scalar::Number(n)) => Some(n.to_string()),
                    other => other.as_str().map(str::to_string),
                })
                .collect(),
            other => other.as_str().map(|s| vec![s.to_string()]).unwrap_or_default(),
        }
    }

    /// Convert one raw entry (key already known) into a parameter value.
    pub(crate) fn from_raw_entry(entry: &RawEntry) -> Self {
        match &entry.value {
            RawValue::Object(body) => {
                let mut properties = Parameters::from_raw_entries(body.entries.iter(), &[]).values;
                if let Some(name) = &entry.name {
                    properties.shift_insert(0, "name".to_string(), ParameterValue::string(name));
                }
                ParameterValue::Object {
                    kind: entry.key.clone(),
                    properties,
                }
            }
            other => Self::from_raw(other),
        }
    }

    pub(crate) fn from_raw(value: &RawValue) -> Self {
        match value {
            RawValue::Scalar(RawScalar::String(s)) => ParameterValue::string(s.clone()),
            RawValue::Scalar(RawScalar::Number(n)) => ParameterValue::Scalar(Scalar::Number(*n)),
            RawValue::Scalar(RawScalar::Ident(s)) => match s.as_str() {
                "yes" => ParameterValue::Scalar(Scalar::Boolean(true)),
                "no" => ParameterValue::Scalar(Scalar::Boolean(false)),
                _ => ParameterValue::string(s.clone()),
            },
            RawValue::Expression(e) => ParameterValue::string(e.clone()),
            RawValue::List(items) => {
                ParameterValue::List(items.iter().map(Self::from_raw).collect())
            }
            RawValue::Object(body) => ParameterValue::Object {
                kind: String::new(),
                properties: Parameters::from_raw_entries(body.entries.iter(), &[]).values,
            },
        }
    }
}

/// The non-structural key/value pairs of a node.
///
/// A key repeated at the same level (several `link: {}` blocks, say) is
/// stored as a list of its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: IndexMap<String, ParameterValue>,
    spans: IndexMap<String, Span>,
    /// Keys that occurred more than once and were folded into a list.
    repeated: HashSet<String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(ParameterValue::as_str)
    }

    /// Span of the whole `key: value` entry; the last occurrence for repeated keys.
    pub fn span(&self, key: &str) -> Option<Span> {
        self.spans.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ParameterValue, span: Span) {
        let key = key.into();
        match self.values.get_mut(&key) {
            None => {
                self.values.insert(key.clone(), value);
            }
            Some(ParameterValue::List(items)) if self.repeated.contains(&key) => items.push(value),
            Some(existing) => {
                let previous = std::mem::replace(existing, ParameterValue::List(Vec::new()));
                *existing = ParameterValue::List(vec![previous, value]);
                self.repeated.insert(key.clone());
            }
        }
        self.spans.insert(key, span);
    }

    pub(crate) fn from_raw_entries<'a>(
        entries: impl Iterator<Item = &'a RawEntry>,
        structural: &[&str],
    ) -> Self {
        let mut params = Parameters::new();
        for entry in entries {
            if structural.contains(&entry.key.as_str()) {
                continue;
            }
            params.insert(
                entry.key.clone(),
                ParameterValue::from_raw_entry(entry),
                Span::unknown(),
            );
        }
        params
    }
}
