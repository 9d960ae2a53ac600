//! Error recovery.
//!
//! After a parse error the parser does not give up; it skips ahead to a
//! token where parsing can safely resume. [`TokenSet`] describes those
//! resume points as a bitmask over token discriminants, and
//! [`synchronize`] drives the cursor to the nearest one.

use crate::cursor::Cursor;
use rill_ir::TokenKind;

/// A set of token kinds with O(1) membership testing.
///
/// One bit per [`TokenKind`] discriminant; payload variants are classified
/// by discriminant alone, so a set containing `Int(0)` contains every
/// integer literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        TokenSet(0)
    }

    /// Add a token kind, returning the extended set.
    ///
    /// Takes `self` by value so sets can be built in `const` initializers.
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1u64 << kind.discriminant_index()))
    }

    /// Check whether this set contains a token kind.
    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u64 << kind.discriminant_index())) != 0
    }

    /// Check whether this set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of token kinds in this set.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        TokenSet::new()
    }
}

/// Resume points for statement-level recovery inside a block: the next
/// statement can start after `;`, the enclosing block can close at `}`,
/// and a stray `fn` means the block was never closed.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::RBrace)
    .with(TokenKind::Fn)
    .with(TokenKind::Eof);

/// Resume points for item-level recovery: the next function definition.
pub const FUNCTION_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Fn)
    .with(TokenKind::Eof);

/// Advance the cursor until it sits on a token in `recovery` or reaches
/// the end of the stream.
///
/// Returns `true` if a recovery token was found and `false` at end of
/// input. The recovery token itself is not consumed.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains(cursor.current_kind()) {
            return true;
        }
        cursor.advance();
    }
    false
}
