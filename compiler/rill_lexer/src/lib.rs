//! Lexer for Rill using logos with string interning.
//!
//! Produces a [`TokenList`] plus any [`LexError`]s. Lexing never stops
//! early: unrecognized input becomes an `Error` token and a recorded
//! error, so the parser always sees a complete, `Eof`-terminated stream.

use logos::{FilterResult, Logos};
use rill_ir::{Span, StringInterner, Token, TokenKind, TokenList};

mod error;

pub use error::{LexError, LexErrorKind};

/// Error payload for raw tokens that fail to lex.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
enum RawError {
    /// Input matched no rule (logos default).
    #[default]
    InvalidCharacter,
    UnterminatedString,
    InvalidEscape(char),
    InvalidNumber,
    UnterminatedBlockComment,
}

impl RawError {
    fn into_kind(self) -> LexErrorKind {
        match self {
            RawError::InvalidCharacter => LexErrorKind::InvalidCharacter,
            RawError::UnterminatedString => LexErrorKind::UnterminatedString,
            RawError::InvalidEscape(escape_char) => LexErrorKind::InvalidEscape { escape_char },
            RawError::InvalidNumber => LexErrorKind::InvalidNumber,
            RawError::UnterminatedBlockComment => LexErrorKind::UnterminatedBlockComment,
        }
    }
}

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r\n]+")] // Whitespace is insignificant
#[logos(skip r"//[^\n]*")] // Line comments
enum RawToken {
    /// Block comment: consumed by callback, skipped on success.
    /// Bind markers in test sources are ordinary block comments here.
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("as")]
    As,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("let")]
    Let,
    #[token("null")]
    Null,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("while")]
    While,

    #[token("int")]
    IntType,
    #[token("float")]
    FloatType,
    #[token("bool")]
    BoolType,
    #[token("str")]
    StrType,
    #[token("void")]
    VoidType,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("??")]
    DoubleQuestion,
    #[token("?")]
    Question,

    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+=")]
    PlusEq,
    #[token("+")]
    Plus,
    #[token("-=")]
    MinusEq,
    #[token("-")]
    Minus,
    #[token("*=")]
    StarEq,
    #[token("*")]
    Star,
    #[token("/=")]
    SlashEq,
    #[token("/")]
    Slash,
    #[token("%=")]
    PercentEq,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // Integer with underscores (negation folded in parser)
    #[regex(r"[0-9][0-9_]*", |lex| {
        lex.slice().replace('_', "").parse::<i64>().map_err(|_| RawError::InvalidNumber)
    })]
    Int(i64),

    // Float with optional exponent
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?", |lex| {
        lex.slice().replace('_', "").parse::<f64>().map_err(|_| RawError::InvalidNumber)
    })]
    Float(f64),

    // String literal: consumed by callback past the closing quote
    #[token("\"", lex_string)]
    Str(String),

    // Identifier
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Consume a block comment. The `/*` is already matched; scan for `*/`.
fn lex_block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> FilterResult<(), RawError> {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        FilterResult::Skip
    } else {
        lex.bump(lex.remainder().len());
        FilterResult::Error(RawError::UnterminatedBlockComment)
    }
}

/// Consume a string literal. The opening `"` is already matched; scan to
/// the closing quote, decoding escapes. Strings do not span lines.
fn lex_string(lex: &mut logos::Lexer<'_, RawToken>) -> Result<String, RawError> {
    let rem = lex.remainder();
    let mut out = String::new();
    let mut invalid_escape: Option<char> = None;
    let mut chars = rem.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return match invalid_escape {
                    None => Ok(out),
                    Some(escape_char) => Err(RawError::InvalidEscape(escape_char)),
                };
            }
            '\n' => {
                // Leave the newline for the skip rule
                lex.bump(i);
                return Err(RawError::UnterminatedString);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, '0')) => out.push('\0'),
                Some((_, other)) => {
                    if invalid_escape.is_none() {
                        invalid_escape = Some(other);
                    }
                }
                None => break,
            },
            c => out.push(c),
        }
    }

    lex.bump(rem.len());
    Err(RawError::UnterminatedString)
}

/// Result of lexing a source file.
#[derive(Debug, Default)]
pub struct LexResult {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

/// Lex source code into a `TokenList` plus recorded errors.
///
/// The returned list is always terminated by an `Eof` token.
pub fn lex(source: &str, interner: &StringInterner) -> LexResult {
    let mut tokens = TokenList::with_capacity(source.len() / 8 + 1);
    let mut errors = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());

        match token_result {
            Ok(raw) => {
                let kind = convert_token(raw, logos.slice(), interner);
                tokens.push(Token::new(kind, span));
            }
            Err(raw_err) => {
                errors.push(LexError::new(raw_err.into_kind(), span));
                tokens.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source file exceeds {} bytes", u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    LexResult { tokens, errors }
}

/// Convert a raw token to a `TokenKind`, interning strings.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::Str(content) => TokenKind::Str(interner.intern_owned(content)),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::As => TokenKind::As,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::Fn => TokenKind::Fn,
        RawToken::If => TokenKind::If,
        RawToken::Let => TokenKind::Let,
        RawToken::Null => TokenKind::Null,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::While => TokenKind::While,

        RawToken::IntType => TokenKind::IntType,
        RawToken::FloatType => TokenKind::FloatType,
        RawToken::BoolType => TokenKind::BoolType,
        RawToken::StrType => TokenKind::StrType,
        RawToken::VoidType => TokenKind::VoidType,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Question => TokenKind::Question,
        RawToken::DoubleQuestion => TokenKind::DoubleQuestion,

        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,

        // Skipped on success; an error variant is produced instead when
        // the comment is unterminated.
        RawToken::BlockComment => TokenKind::Error,
    }
}
