//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-line errors
//! - `ErrorGuaranteed` proof that errors were emitted
//!
//! Cascading errors never reach the queue in the first place: the binder
//! gives failed sub-expressions the error type, which converts silently, so
//! one mistake produces one diagnostic.

use std::hash::{Hash, Hasher};

use rill_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
///
/// Uses a lightweight hash instead of allocating an owned `String` prefix.
/// A hash collision only suppresses a rare duplicate.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before the queue stops accepting
    /// (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate diagnostics with same line and similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits.
    ///
    /// The verification harness uses this: golden tests list every expected
    /// diagnostic, so nothing may be limited or merged away.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queued diagnostic with position metadata for sorting and deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// Line number (1-based) for sorting.
    line: u32,
    /// Column number (1-based) for sorting within a line.
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic, line, column);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    /// Collected diagnostics.
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Last line with a syntax error (for dedup).
    last_syntax_line: Option<u32>,
    /// Last (line, code, `message_prefix_hash`) for non-syntax error dedup.
    last_error: Option<(u32, ErrorCode, u64)>,
    /// Configuration.
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_syntax_line: None,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        let is_error = diag.is_error();

        // Warnings pass through the limit; it only counts errors.
        if is_error && self.limit_reached() {
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag, line) {
            return false;
        }

        if is_error {
            if Self::is_syntax_error(&diag) {
                self.last_syntax_line = Some(line);
            } else {
                self.last_error = Some((line, diag.code, message_prefix_hash(&diag.message)));
            }
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });

        true
    }

    /// Add a diagnostic with position computed from source.
    pub fn add_with_source(&mut self, diag: Diagnostic, source: &str) -> bool {
        let (line, column) = Self::position_of(&diag, source);
        self.add(diag, line, column)
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The returned `ErrorGuaranteed` can only be obtained by recording an
    /// error, so callers can demand proof that a failure was reported.
    pub fn emit_error(&mut self, diag: Diagnostic, line: u32, column: u32) -> ErrorGuaranteed {
        self.add(diag, line, column);
        ErrorGuaranteed::new()
    }

    /// Emit an error diagnostic with position computed from source.
    pub fn emit_error_with_source(&mut self, diag: Diagnostic, source: &str) -> ErrorGuaranteed {
        let (line, column) = Self::position_of(&diag, source);
        self.emit_error(diag, line, column)
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them.
    ///
    /// Clears the queue after flushing. Skips sorting if already in order
    /// (common case for single-file compilation). The sort is stable, so
    /// diagnostics at the same position keep phase order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column));

        if !already_sorted {
            self.diagnostics.sort_by_key(|d| (d.line, d.column));
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_syntax_line = None;
        self.last_error = None;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    fn position_of(diag: &Diagnostic, source: &str) -> (u32, u32) {
        if let Some(span) = diag.primary_span() {
            crate::span_utils::offset_to_line_col(source, span.start)
        } else {
            (1, 1)
        }
    }

    /// Check if a diagnostic is a duplicate of a recent one.
    fn is_duplicate(&self, diag: &Diagnostic, line: u32) -> bool {
        if !diag.is_error() {
            return false;
        }

        // Syntax errors: dedupe same line. Recovery can report several
        // unexpected tokens on one broken line; the first tells the story.
        if Self::is_syntax_error(diag) {
            if let Some(last_line) = self.last_syntax_line {
                if last_line == line {
                    return true;
                }
            }
        } else {
            // Non-syntax errors: dedupe same line + code + message prefix.
            if let Some((last_line, last_code, last_hash)) = self.last_error {
                if last_line == line
                    && last_code == diag.code
                    && message_prefix_hash(&diag.message) == last_hash
                {
                    return true;
                }
            }
        }

        false
    }

    /// Check if a diagnostic is a syntax (parser) error.
    fn is_syntax_error(diag: &Diagnostic) -> bool {
        diag.code.is_parser_error()
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
        .with_note("use --error-limit to increase the limit")
}
