//! Mapping between byte offsets and line/column positions.

use text_size::TextSize;

/// A zero-indexed line/column pair.
///
/// Formatters add one to each field before showing it to people.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Precomputed line-start table for one source file.
///
/// Built once per file and shared by every diagnostic that reports
/// against it. Columns are byte-based, which matches how the lexer
/// measures indentation.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each line.
    line_starts: Vec<TextSize>,
    len: TextSize,
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
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column pair.
    ///
    /// Offsets past the end of the text clamp to the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, col.into())
    }

    /// Converts a line/column pair back to a byte offset, if the line exists.
    pub fn offset(&self, pos: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(pos.line as usize)?;
        Some(start + TextSize::from(pos.col))
    }

    /// Byte offset of the start of `line`, if it exists.
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "class Counter(Component):\n    def render(self):\n        return div()\n";

    #[test]
    fn test_line_count() {
        let index = LineIndex::new(SOURCE);
        // Three content lines plus the empty line after the trailing newline.
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_line_col_at_start() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
    }

    #[test]
    fn test_line_col_mid_line() {
        let index = LineIndex::new(SOURCE);
        // "def" starts at column 4 of the second line.
        let offset = TextSize::from(26 + 4);
        assert_eq!(index.line_col(offset), LineCol::new(1, 4));
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        let index = LineIndex::new("x");
        assert_eq!(index.line_col(TextSize::from(100)), LineCol::new(0, 1));
    }

    #[test]
    fn test_offset_round_trip() {
        let index = LineIndex::new(SOURCE);
        let pos = LineCol::new(2, 8);
        let offset = index.offset(pos).unwrap();
        assert_eq!(index.line_col(offset), pos);
    }

    #[test]
    fn test_offset_out_of_bounds_line() {
        let index = LineIndex::new("one\ntwo\n");
        assert_eq!(index.offset(LineCol::new(10, 0)), None);
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::new("one\ntwo\n");
        assert_eq!(index.line_start(1), Some(TextSize::from(4)));
        assert_eq!(index.line_start(5), None);
    }

    #[test]
    fn test_empty_text() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
    }
}
