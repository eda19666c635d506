//! Extraction of `${...}` references from SQL-like expression text.
//!
//! Pattern based and best effort: anything shaped like `${name}` or
//! `${name.name}` is reported, even inside SQL string literals.

use std::sync::LazyLock;

use regex::Regex;

use crate::base::{Position, Span};

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*)(?:\.([A-Za-z_][A-Za-z0-9_]*))?\s*\}")
        .unwrap_or_else(|e| panic!("invalid embedded reference pattern: {e}"))
});

/// One `${...}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedReference {
    /// `orders` in `${orders.id}`, or the whole name of `${id}`.
    pub head: String,
    /// `id` in `${orders.id}`.
    pub field: Option<String>,
    /// Byte range of the whole token within the scanned text.
    pub start: usize,
    pub end: usize,
}

impl EmbeddedReference {
    /// The referenced name as written, `orders.id` or `id`.
    pub fn path(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.head, field),
            None => self.head.clone(),
        }
    }

    /// Span of the token given the position where the scanned text starts.
    ///
    /// An unknown `origin` yields an unknown span.
    pub fn span(&self, text: &str, origin: Span) -> Span {
        if origin.is_unknown() {
            return Span::unknown();
        }
        let start = advance(origin.start, &text[..self.start]);
        let end = advance(start, &text[self.start..self.end]);
        Span::new(start, end)
    }
}

/// All `${...}` references in `text`, in order of appearance.
pub fn extract_embedded_references(text: &str) -> Vec<EmbeddedReference> {
    REFERENCE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(EmbeddedReference {
                head: caps.get(1)?.as_str().to_string(),
                field: caps.get(2).map(|m| m.as_str().to_string()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Move `from` over `text`, counting columns in characters.
fn advance(from: Position, text: &str) -> Position {
    let mut position = from;
    for ch in text.chars() {
        if ch == '\n' {
            position.line += 1;
            position.column = 0;
        } else {
            position.column += 1;
        }
    }
    position
}
