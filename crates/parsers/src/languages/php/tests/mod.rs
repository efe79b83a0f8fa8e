//! Tokenizer tests over small PHP snippets.

use crate::{parse_file, parse_php, tokenize_php, ParserMetrics};
use ir::{CastKind, Token, TokenKind};
use std::fs;

fn tokens(code: &str) -> Vec<Token> {
    tokenize_php(code).expect("tokenize php snippet")
}

fn find<'a>(toks: &'a [Token], text: &str) -> (usize, &'a Token) {
    toks.iter()
        .enumerate()
        .find(|(_, t)| t.text == text)
        .unwrap_or_else(|| panic!("token {text} not found in {toks:?}"))
}

#[test]
fn variables_and_subscripts_stay_whole() {
    let toks = tokens("<?php $x = $_POST['a'];");
    assert_eq!(toks[0].kind, TokenKind::OpenTag);
    let (i, post) = find(&toks, "$_POST");
    assert_eq!(post.kind, TokenKind::Variable);
    assert_eq!(toks[i + 1].kind, TokenKind::OpenBracket);
    assert_eq!(toks[i + 2].text, "'a'");
    assert_eq!(toks[i + 2].kind, TokenKind::String);
    assert_eq!(toks[i + 3].kind, TokenKind::CloseBracket);
    let (_, eq) = find(&toks, "=");
    assert_eq!(eq.kind, TokenKind::Assignment);
}

#[test]
fn positions_are_one_based() {
    let toks = tokens("<?php\n  $a = 1;");
    let (_, a) = find(&toks, "$a");
    assert_eq!(a.line, 2);
    assert_eq!(a.column, 3);
}

#[test]
fn casts_merge_into_one_token() {
    let toks = tokens("<?php $a = (int) $_GET['n'];");
    let (i, cast) = toks
        .iter()
        .enumerate()
        .find(|(_, t)| matches!(t.kind, TokenKind::Cast(_)))
        .expect("cast token");
    assert_eq!(cast.kind, TokenKind::Cast(CastKind::Int));
    assert_eq!(cast.text, "(int)");
    assert_eq!(toks[i + 1].text, "$_GET");
}

#[test]
fn spaced_string_cast_is_not_narrowing() {
    let toks = tokens("<?php $a = ( string ) $_GET['n'];");
    let cast = toks
        .iter()
        .find_map(|t| match t.kind {
            TokenKind::Cast(c) => Some(c),
            _ => None,
        })
        .expect("cast token");
    assert_eq!(cast, CastKind::String);
    assert!(!cast.is_narrowing());
}

#[test]
fn keywords_get_dedicated_kinds() {
    let toks = tokens("<?php function f() { global $wpdb; if ( isset( $_POST['x'] ) ) {} }");
    assert_eq!(find(&toks, "function").1.kind, TokenKind::Function);
    assert_eq!(find(&toks, "global").1.kind, TokenKind::Global);
    assert_eq!(find(&toks, "isset").1.kind, TokenKind::Isset);
    assert_eq!(find(&toks, "if").1.kind, TokenKind::Keyword);
    assert_eq!(find(&toks, "f").1.kind, TokenKind::Identifier);
}

#[test]
fn interpolated_strings_are_one_token() {
    let toks = tokens("<?php $a = \"hello $name\"; $b = 'plain $x';");
    assert_eq!(
        find(&toks, "\"hello $name\"").1.kind,
        TokenKind::InterpolatedString
    );
    assert_eq!(find(&toks, "'plain $x'").1.kind, TokenKind::String);
    assert!(!toks.iter().any(|t| t.text == "$name"));
}

#[test]
fn namespaced_calls_keep_their_prefix() {
    let toks = tokens("<?php \\wp_verify_nonce( $n, 'act' );");
    let (i, call) = find(&toks, "\\wp_verify_nonce");
    assert_eq!(call.kind, TokenKind::Identifier);
    assert_eq!(call.call_name(), "wp_verify_nonce");
    assert_eq!(toks[i + 1].kind, TokenKind::OpenParen);
}

#[test]
fn comments_are_preserved_with_their_line() {
    let toks = tokens("<?php\n$a = 1; // phpcs:ignore\n");
    let comment = toks
        .iter()
        .find(|t| t.kind == TokenKind::Comment)
        .expect("comment token");
    assert!(comment.text.starts_with("// phpcs:ignore"));
    assert_eq!(comment.line, 2);
}

#[test]
fn inline_html_and_close_tag() {
    let toks = tokens("<p><?php echo 1; ?></p>");
    assert!(toks.iter().any(|t| t.kind == TokenKind::InlineHtml));
    assert!(toks.iter().any(|t| t.kind == TokenKind::CloseTag));
}

#[test]
fn syntax_errors_are_tolerated() {
    let toks = tokens("<?php function ( { $x = ");
    assert_eq!(toks[0].kind, TokenKind::OpenTag);
    assert!(toks.len() > 1);
}

#[test]
fn parse_php_indexes_regions() {
    let file = parse_php(
        "<?php class A { function m() { $x = function() { return 1; }; } }",
        "a.php",
    )
    .unwrap();
    assert_eq!(file.file_path, "a.php");
    assert_eq!(file.regions().len(), 3);
}

#[test]
fn parse_file_counts_metrics_and_skips_unknown_types() {
    let dir = tempfile::tempdir().unwrap();
    let php = dir.path().join("a.php");
    let css = dir.path().join("a.css");
    fs::write(&php, "<?php echo $_GET['q'];").unwrap();
    fs::write(&css, "body {}").unwrap();

    let mut metrics = ParserMetrics::default();
    let file = parse_file(&php, Some(&mut metrics)).unwrap().unwrap();
    assert!(file.tokens.iter().any(|t| t.text == "$_GET"));
    assert!(parse_file(&css, Some(&mut metrics)).unwrap().is_none());
    assert_eq!(metrics.files_parsed, 1);
    assert_eq!(metrics.parse_errors, 0);
}

#[test]
fn parse_file_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.php");
    let err = parse_file(&missing, None).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}
