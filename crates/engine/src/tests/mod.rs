//! Unit tests over hand-built token streams.
//!
//! Every whitespace separated word of the source becomes one token, so
//! positions in the tests are word indices. A `//` comment runs to the end
//! of its line and is a single token.

use ir::{CastKind, FileTokens, Token, TokenKind};

mod suppress;

const RESERVED: &[&str] = &[
    "function", "fn", "class", "interface", "trait", "enum", "global", "if", "use", "new",
    "extends", "return", "echo",
];

pub(crate) fn toks(src: &str) -> Vec<Token> {
    let mut out = Vec::new();
    for (line, text) in src.lines().enumerate() {
        let (code, comment) = match text.find("//") {
            Some(at) => (&text[..at], Some(&text[at..])),
            None => (text, None),
        };
        for w in code.split_whitespace() {
            let col = out.len() + 1;
            out.push(Token::new(classify(w), w, line + 1, col));
        }
        if let Some(comment) = comment {
            let col = out.len() + 1;
            out.push(Token::new(TokenKind::Comment, comment.trim_end(), line + 1, col));
        }
    }
    out
}

fn classify(w: &str) -> TokenKind {
    if w.starts_with('$') {
        TokenKind::Variable
    } else if w.starts_with('\'') || w.starts_with('"') {
        TokenKind::from_string_literal(w)
    } else if let Some(cast) = CastKind::from_text(w).filter(|_| w.starts_with('(')) {
        TokenKind::Cast(cast)
    } else if w.chars().all(|c| c.is_ascii_digit()) {
        TokenKind::Number
    } else if w.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '\\') {
        TokenKind::from_word(w, RESERVED.contains(&w))
    } else {
        TokenKind::from_symbol(w)
    }
}

pub(crate) fn index(src: &str) -> FileTokens {
    FileTokens::new("mem.php", toks(src))
}

/// Position of the `nth` token (0-based) whose text is `text`.
pub(crate) fn nth(file: &FileTokens, text: &str, n: usize) -> usize {
    file.tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.text == text)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("no occurrence {n} of {text}"))
}

#[test]
fn helper_splits_lines_and_words() {
    let file = index("$a = 1 ;\n// CSRF ok");
    assert_eq!(file.len(), 5);
    assert_eq!(file.tokens[4].kind, TokenKind::Comment);
    assert_eq!(file.tokens[4].text, "// CSRF ok");
    assert_eq!(file.tokens[4].line, 2);
}
