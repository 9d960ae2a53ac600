//! Token navigation for the parser.
//!
//! [`Cursor`] owns the read position into an immutable token stream and
//! provides the primitives the grammar is built from: peek, check, advance,
//! and expect. Expectation failures build their [`ParseError`] on `#[cold]`
//! paths so the happy path stays small enough to inline.

use crate::ParseError;
use rill_diagnostic::ErrorCode;
use rill_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

/// Read position into a token stream.
///
/// The stream must be `Eof`-terminated (the lexer guarantees this), which
/// makes every lookup total: once the cursor reaches the trailing `Eof` it
/// stays there, so loops that advance until [`Cursor::is_at_end`] always
/// terminate.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of the stream.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        debug_assert!(
            matches!(
                tokens.as_slice().last().map(|t| &t.kind),
                Some(TokenKind::Eof)
            ),
            "token stream must be Eof-terminated"
        );
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    /// Get access to the string interner.
    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Current position in the token stream.
    ///
    /// Comparing positions before and after a parse attempt tells whether
    /// any tokens were consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &'a Token {
        debug_assert!(self.pos < self.tokens.len(), "cursor past end of stream");
        &self.tokens.as_slice()[self.pos]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the span of the most recently consumed token.
    ///
    /// [`Span::DUMMY`] before anything has been consumed.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens.as_slice()[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Peek at the kind one token ahead without advancing.
    #[inline]
    pub fn peek_next_kind(&self) -> &'a TokenKind {
        static EOF: TokenKind = TokenKind::Eof;
        match self.tokens.get(self.pos + 1) {
            Some(token) => &token.kind,
            None => &EOF,
        }
    }

    /// Check whether the cursor sits on the trailing `Eof`.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check whether the current token matches the given kind.
    ///
    /// Payload variants match on the discriminant alone, so
    /// `check(&TokenKind::Int(0))` matches any integer literal.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().discriminant_index() == kind.discriminant_index()
    }

    /// Consume the current token and return it.
    ///
    /// At the trailing `Eof` the cursor stays put and keeps returning the
    /// `Eof` token.
    #[inline]
    pub fn advance(&mut self) -> &'a Token {
        let consumed = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        consumed
    }

    /// Expect a specific token kind, consuming it on success.
    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: &TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.describe(),
                self.current_kind().describe()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.describe()))
    }

    /// Expect an identifier, consuming it and returning its interned name.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "expected identifier, found {}",
                self.current_kind().describe()
            ),
            self.current_span(),
        )
    }

    /// Expect the closing delimiter for `open`, consuming it on success and
    /// returning its span.
    ///
    /// Only `'('` and `'{'` have closing counterparts in the grammar.
    pub fn expect_closing(&mut self, open: char) -> Result<Span, ParseError> {
        let close = match open {
            '(' => TokenKind::RParen,
            _ => TokenKind::RBrace,
        };
        if self.check(&close) {
            Ok(self.advance().span)
        } else {
            Err(self.make_unclosed_error(open))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_unclosed_error(&self, open: char) -> ParseError {
        let close = match open {
            '(' => ')',
            _ => '}',
        };
        ParseError::new(
            ErrorCode::E1003,
            format!("unclosed delimiter `{open}`"),
            self.current_span(),
        )
        .with_context(format!("expected `{close}`"))
    }
}
