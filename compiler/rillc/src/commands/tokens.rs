//! The `tokens` command: debug token dump.

use rill_ir::{StringInterner, TokenKind};

use super::read_file;

/// Lex a file and print one token per line with its span.
pub fn dump_tokens(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let lexed = rill_lexer::lex(&source, &interner);

    for token in lexed.tokens.iter() {
        // Resolve interned payloads; everything else has a useful Debug.
        let kind = match token.kind {
            TokenKind::Ident(name) => format!("Ident({})", interner.lookup(name)),
            TokenKind::Str(name) => format!("Str({:?})", interner.lookup(name)),
            other => format!("{other:?}"),
        };
        println!("{:>5}..{:<5} {kind}", token.span.start, token.span.end);
    }

    if !lexed.errors.is_empty() {
        eprintln!("{} lex errors", lexed.errors.len());
        std::process::exit(1);
    }
}
