//! PHP tokenizer on top of tree-sitter-php.
//!
//! The syntax tree is flattened back into source-ordered tokens. Literals,
//! variables and qualified names stay whole; casts such as `(int)` are merged
//! into a single [`TokenKind::Cast`] token. Everything else becomes one token
//! per leaf.

use anyhow::{anyhow, Context, Result};
use ir::{CastKind, FileTokens, Token, TokenKind};
use std::sync::Mutex;
use tracing::debug;

#[cfg(test)]
mod tests;

// Parser pool to avoid concurrency issues with tree-sitter
static PARSER_POOL: Mutex<Vec<tree_sitter::Parser>> = Mutex::new(Vec::new());

fn get_parser() -> tree_sitter::Parser {
    let pooled = PARSER_POOL.lock().ok().and_then(|mut pool| pool.pop());
    match pooled {
        Some(mut parser) => {
            parser.reset();
            parser
        }
        None => tree_sitter::Parser::new(),
    }
}

fn return_parser(mut parser: tree_sitter::Parser) {
    if let Ok(mut pool) = PARSER_POOL.lock() {
        if pool.len() < 10 {
            parser.reset();
            pool.push(parser);
        }
    }
}

/// Nodes emitted as one token regardless of their inner structure.
const ATOMIC: &[&str] = &[
    "variable_name",
    "string",
    "encapsed_string",
    "heredoc",
    "nowdoc",
    "shell_command_expression",
    "qualified_name",
    "comment",
    "integer",
    "float",
    "php_tag",
    "text",
];

/// Tokenizes PHP source into a flat token vector.
///
/// Syntax errors are tolerated: whatever tree-sitter recovers is emitted.
///
/// # Example
/// ```
/// use ir::TokenKind;
/// let toks = parsers::tokenize_php("<?php $a = (int) $_GET['id'];").unwrap();
/// assert_eq!(toks[1].kind, TokenKind::Variable);
/// assert!(toks.iter().any(|t| matches!(t.kind, TokenKind::Cast(_))));
/// ```
pub fn tokenize_php(content: &str) -> Result<Vec<Token>> {
    let mut parser = get_parser();
    parser
        .set_language(tree_sitter_php::language())
        .context("load php grammar")?;
    let tree = parser.parse(content, None);
    return_parser(parser);
    let tree = tree.ok_or_else(|| anyhow!("tree-sitter returned no tree"))?;
    let root = tree.root_node();
    if root.has_error() {
        debug!("php source contains syntax errors; tokenizing recovered tree");
    }
    let mut out = Vec::new();
    collect(root, content, &mut out);
    Ok(out)
}

/// Tokenizes PHP source and builds its structural index.
pub fn parse_php(content: &str, file_path: &str) -> Result<FileTokens> {
    let tokens = tokenize_php(content)
        .with_context(|| format!("Failed to tokenize {file_path}"))?;
    debug!(file = file_path, tokens = tokens.len(), "Tokenized php file");
    Ok(FileTokens::new(file_path, tokens))
}

fn collect(node: tree_sitter::Node, src: &str, out: &mut Vec<Token>) {
    if node.is_missing() || node.start_byte() == node.end_byte() {
        return;
    }
    let kind = node.kind();
    if kind == "cast_expression" && push_cast(node, src, out) {
        return;
    }
    if node.child_count() == 0 || ATOMIC.contains(&kind) {
        if let Some(tok) = leaf_token(node, src) {
            out.push(tok);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, src, out);
    }
}

/// Emits `( type )` as one cast token followed by the cast operand.
fn push_cast(node: tree_sitter::Node, src: &str, out: &mut Vec<Token>) -> bool {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    let Some(close) = children.iter().position(|c| c.kind() == ")") else {
        return false;
    };
    let start = node.start_byte();
    let end = children[close].end_byte();
    let Some(text) = src.get(start..end) else {
        return false;
    };
    let Some(cast) = CastKind::from_text(text) else {
        return false;
    };
    let pos = node.start_position();
    out.push(Token::new(
        TokenKind::Cast(cast),
        text,
        pos.row + 1,
        pos.column + 1,
    ));
    for child in &children[close + 1..] {
        collect(*child, src, out);
    }
    true
}

fn leaf_token(node: tree_sitter::Node, src: &str) -> Option<Token> {
    let text = src.get(node.byte_range())?;
    let kind = match node.kind() {
        "variable_name" => TokenKind::Variable,
        "string" | "encapsed_string" | "heredoc" | "nowdoc" | "shell_command_expression" => {
            TokenKind::from_string_literal(text)
        }
        "qualified_name" => TokenKind::Identifier,
        "comment" => TokenKind::Comment,
        "integer" | "float" => TokenKind::Number,
        "php_tag" => TokenKind::OpenTag,
        "text" => TokenKind::InlineHtml,
        _ if is_word(text) => TokenKind::from_word(text, !node.is_named()),
        _ => TokenKind::from_symbol(text),
    };
    let pos = node.start_position();
    Some(Token::new(kind, text, pos.row + 1, pos.column + 1))
}

fn is_word(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}
