use super::*;
use crate::suppress::{CommentSuppressions, Suppressions};

fn suppressions() -> CommentSuppressions {
    let mut s = CommentSuppressions::new().unwrap();
    s.register(
        "CSRF",
        &["WordPress.Security.NonceVerification", "wp.nonce-verification"],
    )
    .unwrap();
    s
}

fn suppressed(src: &str, var: &str) -> bool {
    let file = index(src);
    let pos = nth(&file, var, 0);
    suppressions().has_suppression(&file, "CSRF", pos)
}

#[test]
fn tag_after_semicolon_on_same_line() {
    assert!(suppressed("$y = $_POST [ 'a' ] ; // CSRF ok.", "$_POST"));
    assert!(suppressed("$y = $_POST [ 'a' ] ; // WPCS: csrf ok", "$_POST"));
}

#[test]
fn tag_on_next_line_does_not_count() {
    assert!(!suppressed("$y = $_POST [ 'a' ] ;\n// CSRF ok.", "$_POST"));
}

#[test]
fn tag_must_be_a_whole_word() {
    assert!(!suppressed("$y = $_POST ; // CSRFX", "$_POST"));
}

#[test]
fn tag_inside_the_statement() {
    assert!(suppressed("$y = foo ( $_POST // CSRF\n) ;", "$_POST"));
}

#[test]
fn unregistered_tag_never_matches() {
    let file = index("$y = $_POST ; // override");
    assert!(!suppressions().has_suppression(&file, "override", 2));
}

#[test]
fn blanket_phpcs_ignore_on_same_line() {
    assert!(suppressed("$y = $_POST ; // phpcs:ignore", "$_POST"));
}

#[test]
fn phpcs_ignore_alone_on_previous_line() {
    assert!(suppressed(
        "// phpcs:ignore WordPress.Security.NonceVerification.Recommended\n$y = $_GET ;",
        "$_GET"
    ));
    assert!(suppressed(
        "// phpcs:ignore WordPress.Security\n$y = $_GET ;",
        "$_GET"
    ));
}

#[test]
fn phpcs_ignore_by_rule_id_with_note() {
    assert!(suppressed(
        "$y = $_GET ; // phpcs:ignore wp.nonce-verification -- verified upstream",
        "$_GET"
    ));
}

#[test]
fn phpcs_ignore_for_other_sniffs() {
    assert!(!suppressed(
        "// phpcs:ignore WordPress.DB.DirectDatabaseQuery\n$y = $_GET ;",
        "$_GET"
    ));
    assert!(!suppressed("$y = $_GET ; // phpcs:ignoreFile", "$_GET"));
}

#[test]
fn phpcs_ignore_out_of_reach() {
    assert!(!suppressed("// phpcs:ignore\n$a = 1 ;\n$y = $_GET ;", "$_GET"));
    assert!(!suppressed("$a = 1 ; // phpcs:ignore\n$y = $_GET ;", "$_GET"));
}
