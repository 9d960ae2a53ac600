//! Diagnostic system for rich error reporting.
//!
//! Every phase of the compiler reports problems through the same pipeline:
//! build a [`Diagnostic`] with the builder API, hand it to a
//! [`queue::DiagnosticQueue`] which sorts and deduplicates, then render the
//! flushed list through an [`emitter::DiagnosticEmitter`].
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type provides type-level proof that at least one
//! error was emitted. This prevents "forgotten" error conditions where code
//! fails silently without reporting an error.
//!
//! ```text
//! // Can only get ErrorGuaranteed by emitting an error
//! let guarantee = queue.emit_error(diagnostic, line, column);
//!
//! // Functions can return ErrorGuaranteed to prove they reported errors
//! fn bind_module() -> Result<BoundModule, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

// Re-export the core types at the crate root.
pub use diagnostic::{
    expected_expression, expected_identifier, expected_type, type_mismatch, unclosed_delimiter,
    unexpected_token, unknown_identifier, Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use span_utils::LineIndex;
