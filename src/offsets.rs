//! Offset conversion utilities
//!
//! The engine deals with several offset systems:
//! 1. **Engine offsets**: Unicode scalar values (Rust `char` count) into the
//!    plain-text projection
//! 2. **Rust strings**: UTF-8 byte indexing
//! 3. **JavaScript DOM**: UTF-16 code units (selection offsets, `maxlength`)
//!
//! UTF-16 and line/column conversions go through a `ropey::Rope` built over
//! the plain-text projection.

use ropey::Rope;

/// Convert a char offset to a UTF-8 byte offset (clamped to the end)
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

/// Convert a UTF-8 byte offset to a char offset
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text.char_indices()
        .take_while(|(idx, _)| *idx < byte_offset)
        .count()
}

/// Line and column of an offset, both 0-based and counted in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Index over a plain-text projection for repeated offset conversions
#[derive(Debug, Clone)]
pub struct OffsetIndex {
    rope: Rope,
}

impl OffsetIndex {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Length in chars
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Length in UTF-16 code units
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    /// Convert an engine offset to UTF-16 code units (clamped)
    ///
    /// # Example
    ///
    /// ```rust
    /// use mentionkit_core::offsets::OffsetIndex;
    ///
    /// // The emoji is one char but two UTF-16 code units
    /// let index = OffsetIndex::new("a😀b");
    /// assert_eq!(index.char_to_utf16(2), 3);
    /// ```
    pub fn char_to_utf16(&self, char_offset: usize) -> usize {
        self.rope
            .char_to_utf16_cu(char_offset.min(self.rope.len_chars()))
    }

    /// Convert UTF-16 code units (from the DOM) to an engine offset (clamped)
    ///
    /// An offset between the two halves of a surrogate pair resolves to the
    /// char containing it.
    pub fn utf16_to_char(&self, utf16_offset: usize) -> usize {
        self.rope
            .utf16_cu_to_char(utf16_offset.min(self.rope.len_utf16_cu()))
    }

    /// Line and column of an engine offset (clamped)
    pub fn line_column(&self, char_offset: usize) -> LineColumn {
        let offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        LineColumn {
            line,
            column: offset - self.rope.line_to_char(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        let text = "hello";
        assert_eq!(char_to_byte(text, 0), 0);
        assert_eq!(char_to_byte(text, 2), 2);
        assert_eq!(char_to_byte(text, 99), 5);
        assert_eq!(byte_to_char(text, 2), 2);
    }

    #[test]
    fn test_multibyte() {
        // "é" is 2 bytes, the emoji 4
        let text = "é😀x";
        assert_eq!(char_to_byte(text, 1), 2);
        assert_eq!(char_to_byte(text, 2), 6);
        assert_eq!(byte_to_char(text, 6), 2);
    }

    #[test]
    fn test_utf16_round_trip() {
        let index = OffsetIndex::new("Hi 😀 @alice");
        assert_eq!(index.len_chars(), 11);
        assert_eq!(index.len_utf16(), 12);

        for offset in 0..=index.len_chars() {
            let utf16 = index.char_to_utf16(offset);
            assert_eq!(index.utf16_to_char(utf16), offset);
        }
    }

    #[test]
    fn test_utf16_clamped() {
        let index = OffsetIndex::new("abc");
        assert_eq!(index.char_to_utf16(10), 3);
        assert_eq!(index.utf16_to_char(10), 3);
    }

    #[test]
    fn test_line_column() {
        let index = OffsetIndex::new("first\nsecond @al");

        assert_eq!(index.line_column(0), LineColumn { line: 0, column: 0 });
        assert_eq!(index.line_column(13), LineColumn { line: 1, column: 7 });
        assert_eq!(index.line_column(100), LineColumn { line: 1, column: 10 });
    }
}
