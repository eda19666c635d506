//! Conversion between byte offsets and line/column positions.

use text_size::TextSize;

use super::Position;

/// Maps byte offsets in a text to zero-indexed line/column positions.
///
/// Columns are counted in characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: Box<str>,
    /// Byte offset at which each line starts.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(offset as u32 + 1));
            }
        }
        Self {
            text: text.into(),
            line_starts,
        }
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(TextSize::of(&*self.text));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = usize::from(self.line_starts[line]);
        let end = usize::from(offset);
        let column = self
            .text
            .get(start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - start);
        Position::new(line, column)
    }

    /// Convert a position back to a byte offset, if it lies inside the text.
    pub fn offset(&self, position: Position) -> Option<TextSize> {
        let start = usize::from(*self.line_starts.get(position.line)?);
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .map(|o| usize::from(*o))
            .unwrap_or(self.text.len());
        let line_text = &self.text[start..line_end];

        let mut byte = 0;
        for (count, (idx, ch)) in line_text.char_indices().enumerate() {
            if count == position.column {
                return Some(TextSize::from((start + idx) as u32));
            }
            byte = idx + ch.len_utf8();
        }
        let chars = line_text.chars().count();
        (position.column == chars).then(|| TextSize::from((start + byte) as u32))
    }

    /// The text of a line without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = usize::from(*self.line_starts.get(line)?);
        let end = self
            .line_starts
            .get(line + 1)
            .map(|o| usize::from(*o))
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches(['\n', '\r']))
    }
}
