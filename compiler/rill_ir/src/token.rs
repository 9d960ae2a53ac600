//! Token types for the Rill lexer.

use super::{Name, Span};
use std::fmt;
use std::hash::Hash;

/// A token with its span in the source.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Create a dummy token for testing/generated code.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Rill.
///
/// Float literals store bits as u64 for Hash compatibility.
/// String/Ident use interned Name for Hash compatibility.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Integer literal: 42, `1_000` (negation folded in parser)
    Int(i64),
    /// Float literal: 3.14, 2.5e-8 (stored as bits for Eq/Hash)
    Float(u64),
    /// String literal (interned, escapes decoded): "hello"
    Str(Name),

    /// Identifier (interned)
    Ident(Name),

    // Keywords
    As,
    Break,
    Continue,
    Else,
    False,
    Fn,
    If,
    Let,
    Null,
    Return,
    True,
    While,

    // Type keywords
    IntType,   // int
    FloatType, // float
    BoolType,  // bool
    StrType,   // str
    VoidType,  // void

    // Punctuation
    LParen,         // (
    RParen,         // )
    LBrace,         // {
    RBrace,         // }
    Comma,          // ,
    Semicolon,      // ;
    Colon,          // :
    Arrow,          // ->
    Question,       // ?
    DoubleQuestion, // ??

    // Operators
    Eq,        // =
    EqEq,      // ==
    NotEq,     // !=
    Lt,        // <
    LtEq,      // <=
    Gt,        // >
    GtEq,      // >=
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    Bang,      // !
    AmpAmp,    // &&
    PipePipe,  // ||
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    Eof,

    /// Generic error token for unrecognized input.
    Error,
}

impl TokenKind {
    /// Number of distinct token kinds.
    pub const COUNT: u32 = 53;

    /// Stable index of this kind's discriminant, in declaration order.
    ///
    /// Payload variants share one index regardless of payload value. The
    /// indices fit in a `u64` bitmask, which is what the parser's recovery
    /// sets rely on.
    pub const fn discriminant_index(&self) -> u32 {
        match self {
            TokenKind::Int(_) => 0,
            TokenKind::Float(_) => 1,
            TokenKind::Str(_) => 2,
            TokenKind::Ident(_) => 3,
            TokenKind::As => 4,
            TokenKind::Break => 5,
            TokenKind::Continue => 6,
            TokenKind::Else => 7,
            TokenKind::False => 8,
            TokenKind::Fn => 9,
            TokenKind::If => 10,
            TokenKind::Let => 11,
            TokenKind::Null => 12,
            TokenKind::Return => 13,
            TokenKind::True => 14,
            TokenKind::While => 15,
            TokenKind::IntType => 16,
            TokenKind::FloatType => 17,
            TokenKind::BoolType => 18,
            TokenKind::StrType => 19,
            TokenKind::VoidType => 20,
            TokenKind::LParen => 21,
            TokenKind::RParen => 22,
            TokenKind::LBrace => 23,
            TokenKind::RBrace => 24,
            TokenKind::Comma => 25,
            TokenKind::Semicolon => 26,
            TokenKind::Colon => 27,
            TokenKind::Arrow => 28,
            TokenKind::Question => 29,
            TokenKind::DoubleQuestion => 30,
            TokenKind::Eq => 31,
            TokenKind::EqEq => 32,
            TokenKind::NotEq => 33,
            TokenKind::Lt => 34,
            TokenKind::LtEq => 35,
            TokenKind::Gt => 36,
            TokenKind::GtEq => 37,
            TokenKind::Plus => 38,
            TokenKind::Minus => 39,
            TokenKind::Star => 40,
            TokenKind::Slash => 41,
            TokenKind::Percent => 42,
            TokenKind::Bang => 43,
            TokenKind::AmpAmp => 44,
            TokenKind::PipePipe => 45,
            TokenKind::PlusEq => 46,
            TokenKind::MinusEq => 47,
            TokenKind::StarEq => 48,
            TokenKind::SlashEq => 49,
            TokenKind::PercentEq => 50,
            TokenKind::Eof => 51,
            TokenKind::Error => 52,
        }
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::As => "`as`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Else => "`else`",
            TokenKind::False => "`false`",
            TokenKind::Fn => "`fn`",
            TokenKind::If => "`if`",
            TokenKind::Let => "`let`",
            TokenKind::Null => "`null`",
            TokenKind::Return => "`return`",
            TokenKind::True => "`true`",
            TokenKind::While => "`while`",
            TokenKind::IntType => "`int`",
            TokenKind::FloatType => "`float`",
            TokenKind::BoolType => "`bool`",
            TokenKind::StrType => "`str`",
            TokenKind::VoidType => "`void`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Arrow => "`->`",
            TokenKind::Question => "`?`",
            TokenKind::DoubleQuestion => "`??`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Bang => "`!`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::PipePipe => "`||`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(v) => write!(f, "Int({v})"),
            TokenKind::Float(bits) => write!(f, "Float({})", f64::from_bits(*bits)),
            TokenKind::Str(name) => write!(f, "Str({name:?})"),
            TokenKind::Ident(name) => write!(f, "Ident({name:?})"),
            other => write!(f, "{}", other.describe().trim_matches('`')),
        }
    }
}

/// Token stream produced by the lexer.
///
/// A thin wrapper over `Vec<Token>`; always terminated by an `Eof` token
/// so the parser's lookahead never runs off the end.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Create a new empty token list.
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    /// Create a new token list with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Push a token.
    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Get a token by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens (including the trailing `Eof`).
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// View the tokens as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_push_get() {
        let mut list = TokenList::new();
        list.push(Token::new(TokenKind::Let, Span::new(0, 3)));
        list.push(Token::new(TokenKind::Eof, Span::point(3)));

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).map(|t| &t.kind), Some(&TokenKind::Let));
        assert_eq!(list.get(1).map(|t| &t.kind), Some(&TokenKind::Eof));
        assert!(list.get(2).is_none());
    }

    #[test]
    fn float_tokens_compare_by_bits() {
        let a = TokenKind::Float(2.5f64.to_bits());
        let b = TokenKind::Float(2.5f64.to_bits());
        let c = TokenKind::Float(3.5f64.to_bits());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn describe_covers_operators() {
        assert_eq!(TokenKind::DoubleQuestion.describe(), "`??`");
        assert_eq!(TokenKind::Arrow.describe(), "`->`");
        assert_eq!(TokenKind::Eof.describe(), "end of file");
    }

    #[test]
    fn discriminant_indices_are_unique_and_fit_a_u64() {
        let kinds = [
            TokenKind::Int(0),
            TokenKind::Float(0),
            TokenKind::Str(Name::EMPTY),
            TokenKind::Ident(Name::EMPTY),
            TokenKind::As,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Else,
            TokenKind::False,
            TokenKind::Fn,
            TokenKind::If,
            TokenKind::Let,
            TokenKind::Null,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::While,
            TokenKind::IntType,
            TokenKind::FloatType,
            TokenKind::BoolType,
            TokenKind::StrType,
            TokenKind::VoidType,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Arrow,
            TokenKind::Question,
            TokenKind::DoubleQuestion,
            TokenKind::Eq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Bang,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::PercentEq,
            TokenKind::Eof,
            TokenKind::Error,
        ];
        assert_eq!(kinds.len() as u32, TokenKind::COUNT);

        let mut seen = 0u64;
        for kind in &kinds {
            let index = kind.discriminant_index();
            assert!(index < 64, "{kind:?} index {index} does not fit a u64 mask");
            assert_eq!(seen & (1 << index), 0, "{kind:?} reuses index {index}");
            seen |= 1 << index;
        }
    }

    #[test]
    fn payload_variants_share_a_discriminant_index() {
        assert_eq!(
            TokenKind::Int(1).discriminant_index(),
            TokenKind::Int(i64::MAX).discriminant_index()
        );
        assert_ne!(
            TokenKind::Int(0).discriminant_index(),
            TokenKind::Float(0).discriminant_index()
        );
    }
}
