//! Text span and line map types for source location tracking.
//!
//! Offsets throughout the parser are byte offsets into the UTF-8 source
//! text. The line map converts them to line/column pairs on demand.

use memchr::memchr3;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Line and column information derived from source text.
///
/// Lines are 1-based and columns are 0-based, matching the conventional
/// AST `loc` output shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct LineAndColumn {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in bytes from the line start.
    pub column: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A start/end pair of line and column positions attached to a node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct SourceLocation {
    pub start: LineAndColumn,
    pub end: LineAndColumn,
}

impl SourceLocation {
    pub fn new(start: LineAndColumn, end: LineAndColumn) -> Self {
        Self { start, end }
    }
}

/// A map from byte offsets to line numbers, built once from source text
/// and queried (never mutated) afterwards.
///
/// All four ECMAScript line terminators start a new line: LF, CR (with
/// CRLF counted once), U+2028, and U+2029.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while let Some(off) = memchr3(b'\n', b'\r', 0xE2, &bytes[i..]) {
            let at = i + off;
            match bytes[at] {
                b'\n' => {
                    line_starts.push((at + 1) as u32);
                    i = at + 1;
                }
                b'\r' => {
                    if bytes.get(at + 1) == Some(&b'\n') {
                        line_starts.push((at + 2) as u32);
                        i = at + 2;
                    } else {
                        line_starts.push((at + 1) as u32);
                        i = at + 1;
                    }
                }
                // 0xE2: possible U+2028/U+2029 (E2 80 A8 / E2 80 A9)
                _ => {
                    if bytes.get(at + 1) == Some(&0x80)
                        && matches!(bytes.get(at + 2), Some(&0xA8) | Some(&0xA9))
                    {
                        line_starts.push((at + 3) as u32);
                    }
                    i = at + 1;
                }
            }
        }
        Self { line_starts }
    }

    /// Get the line index (0-based) for a byte offset.
    pub fn line_index_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the line (1-based) and column (0-based) for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let index = self.line_index_of(pos);
        let line_start = self.line_starts[index as usize];
        LineAndColumn {
            line: index + 1,
            column: pos - line_start,
        }
    }

    /// Get the source location covering a range of byte offsets.
    pub fn location_of(&self, pos: TextPos, end: TextPos) -> SourceLocation {
        SourceLocation {
            start: self.line_and_column_of(pos),
            end: self.line_and_column_of(end),
        }
    }

    /// Get the byte offset of the start of a line (0-based index).
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.length, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_text_span_from_bounds() {
        let span = TextSpan::from_bounds(5, 15);
        assert_eq!(span.start, 5);
        assert_eq!(span.length, 10);
    }

    #[test]
    fn test_line_map_lf() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_index_of(0), 0);
        assert_eq!(map.line_index_of(5), 0); // the newline itself
        assert_eq!(map.line_index_of(6), 1); // start of line2
        assert_eq!(map.line_index_of(12), 2);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc.line, 2);
        assert_eq!(lc.column, 2);
    }

    #[test]
    fn test_line_map_crlf_counts_once() {
        let map = LineMap::new("a\r\nb\rc");
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_and_column_of(3).line, 2);
        assert_eq!(map.line_and_column_of(5).line, 3);
    }

    #[test]
    fn test_line_map_unicode_separators() {
        let text = "a\u{2028}b\u{2029}c";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        // "a" is 1 byte, U+2028 is 3 bytes
        assert_eq!(map.line_and_column_of(4).line, 2);
        assert_eq!(map.line_and_column_of(8).line, 3);
    }
}
