//! Span utility functions for diagnostic processing.
//!
//! Provides helpers for computing 1-based line and column numbers from byte
//! offsets, used by `DiagnosticQueue` for sorting and by the test harness
//! for locating expected diagnostics.
//!
//! For repeated lookups on the same source, use [`LineIndex`] which
//! pre-computes line starts for O(log L) lookup instead of O(n) scanning.

use rill_ir::Span;

/// Pre-computed line start table for efficient line/column lookup.
///
/// # Example
///
/// ```
/// use rill_diagnostic::span_utils::LineIndex;
///
/// let source = "line1\nline2\nline3";
/// let index = LineIndex::new(source);
///
/// assert_eq!(index.line_col(source, 0), (1, 1));  // 'l' in line1
/// assert_eq!(index.line_col(source, 6), (2, 1));  // 'l' in line2
/// assert_eq!(index.line_col(source, 12), (3, 1)); // 'l' in line3
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// Byte offset of each line start. `line_starts[0]` is always 0;
    /// every later entry is the byte after a newline.
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Scan the source once and record every line start.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineIndex { line_starts }
    }

    /// Get the 1-based line number containing a byte offset.
    #[inline]
    pub fn line_of(&self, offset: u32) -> u32 {
        // Largest line start <= offset.
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx as u32) + 1
    }

    /// Get 1-based (line, column) for a byte offset.
    ///
    /// The column counts characters (not bytes) from the line start.
    pub fn line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_of(offset);
        let line_start = self
            .line_starts
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let offset = (offset as usize).min(source.len());

        let col_chars = source[line_start..offset].chars().count();
        let col = u32::try_from(col_chars).unwrap_or(u32::MAX - 1) + 1;

        (line, col)
    }

    /// Get 1-based (line, column) for the start of a span.
    pub fn span_start(&self, source: &str, span: Span) -> (u32, u32) {
        self.line_col(source, span.start)
    }

    /// Get the byte offset where a 1-based line starts.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.line_starts.get((line - 1) as usize).copied()
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Compute 1-based (line, column) from a byte offset with a linear scan.
///
/// For repeated lookups, build a [`LineIndex`] instead.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    let offset = offset as usize;
    let mut line = 1u32;
    let mut line_start = 0usize;

    for (i, byte) in source.bytes().enumerate() {
        if i >= offset {
            break;
        }
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }

    let col_chars = source[line_start..offset.min(source.len())].chars().count();
    let col = u32::try_from(col_chars).unwrap_or(u32::MAX - 1) + 1;

    (line, col)
}
