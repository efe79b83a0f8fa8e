use super::*;
// Structural index tests over hand-built token streams.

const RESERVED: &[&str] = &[
    "function", "fn", "class", "interface", "trait", "enum", "global", "if", "use", "new",
    "extends", "return",
];

/// Splits on whitespace; every word becomes one token.
fn toks(src: &str) -> Vec<Token> {
    src.split_whitespace()
        .enumerate()
        .map(|(i, w)| {
            let kind = if w.starts_with('$') {
                TokenKind::Variable
            } else if w.starts_with('\'') || w.starts_with('"') {
                TokenKind::from_string_literal(w)
            } else if w.starts_with("//") {
                TokenKind::Comment
            } else if let Some(cast) = CastKind::from_text(w).filter(|_| w.starts_with('(')) {
                TokenKind::Cast(cast)
            } else if w.chars().all(|c| c.is_ascii_digit()) {
                TokenKind::Number
            } else if w.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '\\') {
                TokenKind::from_word(w, RESERVED.contains(&w))
            } else {
                TokenKind::from_symbol(w)
            };
            Token::new(kind, w, 1, i + 1)
        })
        .collect()
}

fn index(src: &str) -> FileTokens {
    FileTokens::new("mem.php", toks(src))
}

#[test]
fn pairs_match_nested_brackets() {
    let file = index("f ( $a [ 1 ] , g ( ) ) ;");
    assert_eq!(file.pair_of(1), Some(10));
    assert_eq!(file.pair_of(10), Some(1));
    assert_eq!(file.pair_of(3), Some(5));
    assert_eq!(file.pair_of(8), Some(9));
    assert_eq!(file.pair_of(0), None);
}

#[test]
fn unbalanced_opener_stays_unpaired() {
    // f ( [ ) : the bracket never closes
    let file = index("f ( [ ) ;");
    assert_eq!(file.pair_of(1), Some(3));
    assert_eq!(file.pair_of(2), None);
}

#[test]
fn stray_closer_is_ignored() {
    let file = index(") f ( $a ) ;");
    assert_eq!(file.pair_of(0), None);
    assert_eq!(file.pair_of(2), Some(4));
}

#[test]
fn enclosing_parens_are_reported_innermost_first() {
    let file = index("a ( b ( $x ) ) ;");
    let parens: Vec<usize> = file.enclosing_parens(4).collect();
    assert_eq!(parens, vec![3, 1]);
    assert_eq!(file.paren_depth(4), 2);
    assert_eq!(file.innermost_paren(2), Some(1));
    // The parens themselves are not inside their own group.
    assert_eq!(file.innermost_paren(1), None);
    assert_eq!(file.innermost_paren(6), None);
}

#[test]
fn square_brackets_do_not_count_as_parens() {
    let file = index("$a [ $b ] ;");
    assert_eq!(file.paren_depth(2), 0);
}

#[test]
fn named_function_and_closure_regions() {
    let file = index("function f ( ) { $a = function ( $x ) use ( $y ) { $b ; } ; }");
    let regions = file.regions();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].kind, RegionKind::Function);
    assert_eq!(regions[0].opener, 4);
    assert_eq!(regions[0].closer, Some(20));
    assert_eq!(regions[1].kind, RegionKind::Closure);
    assert_eq!(regions[1].parent, Some(0));
    // `$b` lives in the closure, `$a` in the outer function.
    assert_eq!(file.innermost_region(16), Some(1));
    assert_eq!(file.innermost_region(5), Some(0));
    assert_eq!(file.innermost_region(20), None);
}

#[test]
fn class_body_contains_methods() {
    let file = index("class T extends Base { function test_a ( ) { $x ; } }");
    let (method_idx, method) = file.enclosing_regions(10).next().unwrap();
    assert_eq!(method.kind, RegionKind::Function);
    let class_idx = method.parent.unwrap();
    assert_eq!(file.region(class_idx).unwrap().kind, RegionKind::ClassLike);
    assert_eq!(file.region_owned_by(0), Some(class_idx));
    assert_eq!(file.region_owned_by(5), Some(method_idx));
}

#[test]
fn class_constant_is_not_a_declaration() {
    let file = index("$n = Foo :: class ; { }");
    assert!(file.regions().is_empty());
}

#[test]
fn abstract_method_has_no_region() {
    let file = index("interface I { function a ( ) ; }");
    assert_eq!(file.regions().len(), 1);
    assert_eq!(file.regions()[0].kind, RegionKind::ClassLike);
}

#[test]
fn unterminated_body_extends_to_end_of_file() {
    let file = index("function f ( ) { $a = 1 ;");
    let region = &file.regions()[0];
    assert_eq!(region.closer, None);
    assert!(region.contains(8));
    assert_eq!(file.innermost_region(8), Some(0));
}

#[test]
fn end_of_statement_skips_nested_groups() {
    let file = index("global $a , $b ; $c = f ( 1 ; 2 ) ;");
    assert_eq!(file.end_of_statement(0), Some(4));
    assert_eq!(file.end_of_statement(5), Some(13));
}

#[test]
fn end_of_statement_stops_at_enclosing_closer() {
    let file = index("{ global $a }");
    assert_eq!(file.end_of_statement(1), None);
}

#[test]
fn comments_are_skipped_by_neighbour_lookups() {
    let file = index("$a //note = 1");
    assert_eq!(file.next_non_trivial(0), Some(2));
    assert_eq!(file.prev_non_trivial(2), Some(0));
}

#[test]
fn string_literals_are_classified_by_interpolation() {
    assert_eq!(TokenKind::from_string_literal("'$x'"), TokenKind::String);
    assert_eq!(
        TokenKind::from_string_literal("\"wp_$x\""),
        TokenKind::InterpolatedString
    );
    assert_eq!(
        TokenKind::from_string_literal("\"{$x['a']}\""),
        TokenKind::InterpolatedString
    );
    assert_eq!(TokenKind::from_string_literal("\"\\$x\""), TokenKind::String);
    assert_eq!(TokenKind::from_string_literal("\"price: $5\""), TokenKind::String);
}

#[test]
fn words_keep_existence_kinds_regardless_of_grammar() {
    assert_eq!(TokenKind::from_word("isset", false), TokenKind::Isset);
    assert_eq!(TokenKind::from_word("EMPTY", true), TokenKind::Empty);
    assert_eq!(TokenKind::from_word("global", false), TokenKind::Identifier);
    assert_eq!(TokenKind::from_word("global", true), TokenKind::Global);
}

#[test]
fn casts_report_narrowing() {
    assert!(CastKind::Int.is_narrowing());
    assert!(CastKind::Unset.is_narrowing());
    assert!(!CastKind::String.is_narrowing());
    assert!(!CastKind::Array.is_narrowing());
}

#[test]
fn file_tokens_serialize_to_json() {
    let file = index("$a = 1 ;");
    let json = serde_json::to_value(&file).unwrap();
    assert_eq!(json["file_path"], "mem.php");
    assert_eq!(json["tokens"][0]["kind"], "variable");
    assert_eq!(json["tokens"][1]["kind"], "assignment");
}

#[test]
fn each_index_gets_its_own_id() {
    let first = index("$a = 1 ;");
    let second = index("$a = 1 ;");
    assert_ne!(first.id(), second.id());
    assert_eq!(first.clone().id(), first.id());
    let json = serde_json::to_value(&first).unwrap();
    assert!(json.get("id").is_none());
}
