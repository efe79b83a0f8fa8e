//! Read or write? Classification of variable occurrences.

use ir::{FileTokens, TokenKind};

/// The variable (or the closing `]` of an index) at `pos` is written to.
///
/// Index chains are followed, so `$a['x']['y'] .= ...` is a write to `$a`.
///
/// # Example
/// ```
/// use ir::{FileTokens, Token, TokenKind};
/// let toks = vec![
///     Token::new(TokenKind::Variable, "$a", 1, 1),
///     Token::new(TokenKind::OpenBracket, "[", 1, 3),
///     Token::new(TokenKind::String, "'k'", 1, 4),
///     Token::new(TokenKind::CloseBracket, "]", 1, 7),
///     Token::new(TokenKind::Assignment, "=", 1, 9),
///     Token::new(TokenKind::Number, "1", 1, 11),
/// ];
/// let file = FileTokens::new("a.php", toks);
/// assert!(engine::usage::is_assignment_target(&file, 0));
/// assert!(!engine::usage::is_assignment_target(&file, 2));
/// ```
pub fn is_assignment_target(file: &FileTokens, pos: usize) -> bool {
    let mut cur = pos;
    loop {
        match file.kind(cur) {
            Some(TokenKind::Variable) | Some(TokenKind::CloseBracket) => {}
            _ => return false,
        }
        let Some(next) = file.next_non_trivial(cur) else {
            return false;
        };
        match file.kind(next) {
            Some(TokenKind::Assignment) => return true,
            Some(TokenKind::OpenBracket) => match file.pair_of(next) {
                Some(close) => cur = close,
                None => return false,
            },
            _ => return false,
        }
    }
}

/// `pos` sits directly inside `isset( ... )` or `empty( ... )`.
pub fn is_inside_existence_check(file: &FileTokens, pos: usize) -> bool {
    file.innermost_paren(pos)
        .and_then(|open| file.prev_non_trivial(open))
        .and_then(|p| file.kind(p))
        .is_some_and(|k| matches!(k, TokenKind::Isset | TokenKind::Empty))
}
