//! Lexer error types.

use rill_ir::Span;

/// A lexer error located in the source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where the offending token starts.
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }

    /// Human-readable message for this error.
    pub fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::UnterminatedString => "unterminated string literal".to_owned(),
            LexErrorKind::InvalidEscape { escape_char } => {
                format!("invalid escape sequence `\\{escape_char}` in string literal")
            }
            LexErrorKind::InvalidNumber => "invalid numeric literal".to_owned(),
            LexErrorKind::UnterminatedBlockComment => "unterminated block comment".to_owned(),
            LexErrorKind::InvalidCharacter => "invalid character".to_owned(),
        }
    }
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// Missing closing `"` for string literal.
    UnterminatedString,
    /// Invalid escape in a string literal (e.g. `\q`).
    InvalidEscape { escape_char: char },
    /// Numeric literal out of range or unparseable.
    InvalidNumber,
    /// Missing closing `*/` for block comment.
    UnterminatedBlockComment,
    /// Byte sequence that matches no token.
    InvalidCharacter,
}
