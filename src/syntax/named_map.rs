//! Name-keyed collection that keeps duplicate entries.

/// An insertion-ordered, name-keyed collection.
///
/// Every occurrence is kept so validation can see duplicates; lookups by
/// name resolve to the last occurrence (last write wins).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> NamedMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        self.entries.push((name.into(), value));
    }

    /// The last entry registered under `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// All entries in insertion order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries that are not shadowed by a later entry with the same name.
    pub fn effective(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, (name, _))| !self.entries[i + 1..].iter().any(|(n, _)| n == name))
            .map(|(_, (n, v))| (n.as_str(), v))
    }

    /// Entries hidden by a later entry with the same name.
    pub fn shadowed(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, (name, _))| self.entries[i + 1..].iter().any(|(n, _)| n == name))
            .map(|(_, (n, v))| (n.as_str(), v))
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
