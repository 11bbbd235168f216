//! Byte offset to line/column resolution.

use std::ops::Range;

use ordolint_ast::Position;

/// Line table over one snapshot of the source text.
///
/// `\n` ends a line; a `\r` before it stays part of the line it ends, so
/// `\r\n` counts as a single break.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    text: String,
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(i, _)| saturating_u32(i + 1)),
        );
        Self {
            text: text.to_string(),
            line_starts,
        }
    }

    /// Length of the indexed text in bytes.
    pub fn len(&self) -> u32 {
        saturating_u32(self.text.len())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clamps `offset` into the text and onto a char boundary.
    pub fn clamp(&self, offset: u32) -> u32 {
        let mut offset = offset.min(self.len()) as usize;
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        saturating_u32(offset)
    }

    /// Returns the 1-based line and char column of `offset`.
    pub fn position(&self, offset: u32) -> Position {
        let offset = self.clamp(offset);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.text[line_start as usize..offset as usize]
            .chars()
            .count();
        Position::new(saturating_u32(line), saturating_u32(column).saturating_add(1))
    }

    /// Byte range of the line containing `offset`, line break included.
    pub fn line_range(&self, offset: u32) -> Range<u32> {
        let offset = self.clamp(offset);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or_else(|| self.len());
        start..end
    }
}

/// Offsets past `u32::MAX` pin to it, matching the tree layout.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
