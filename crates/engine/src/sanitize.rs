//! Decides whether a value is read only through a sanitizing transform.

use ir::{strip_quotes, FileTokens, TokenKind};
use loader::defaults::{SANITIZING_FUNCTIONS, UNSLASHING_SANITIZING_FUNCTIONS};
use std::collections::HashSet;

#[derive(Debug, Clone)]
/// Names of the functions whose result is safe to use.
pub struct SanitizingFunctions {
    names: HashSet<String>,
}

impl SanitizingFunctions {
    /// Curated WordPress sanitizers plus `custom`.
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = SANITIZING_FUNCTIONS
            .iter()
            .chain(UNSLASHING_SANITIZING_FUNCTIONS)
            .map(|n| n.to_ascii_lowercase())
            .chain(custom.into_iter().map(|n| n.as_ref().to_ascii_lowercase()))
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }
}

impl Default for SanitizingFunctions {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What owns a parenthesis group.
pub enum WrappingCall<'a> {
    /// `unset( ... )`: the value is thrown away, never read.
    Discard,
    /// `array_map( ... )`, with the callback name when the first argument
    /// is a plain string literal.
    MapCombinator(Option<&'a str>),
    /// Any other function call.
    Named(&'a str),
    /// Not a call: `isset`, `if`, a grouping paren...
    NotACall,
}

impl<'a> WrappingCall<'a> {
    /// Name to look up in the sanitizer list.
    pub fn effective_name(self) -> Option<&'a str> {
        match self {
            WrappingCall::Named(name) => Some(name),
            WrappingCall::MapCombinator(Some(callback)) => Some(callback),
            // A computed callback can't be resolved.
            WrappingCall::MapCombinator(None) => Some("array_map"),
            WrappingCall::Discard | WrappingCall::NotACall => None,
        }
    }
}

/// Classifies the call owning the paren group opened at `open`.
pub fn wrapping_call(file: &FileTokens, open: usize) -> WrappingCall<'_> {
    let Some(prev) = file.prev_non_trivial(open).and_then(|p| file.token(p)) else {
        return WrappingCall::NotACall;
    };
    match prev.kind {
        TokenKind::Unset => WrappingCall::Discard,
        TokenKind::Identifier if prev.call_name().eq_ignore_ascii_case("array_map") => {
            let callback = file
                .next_non_trivial(open)
                .and_then(|i| file.token(i))
                .filter(|t| t.kind == TokenKind::String)
                .map(|t| strip_quotes(&t.text));
            WrappingCall::MapCombinator(callback)
        }
        TokenKind::Identifier => WrappingCall::Named(prev.call_name()),
        _ => WrappingCall::NotACall,
    }
}

/// The token before `pos` is an `(int)`, `(float)`, `(bool)` or `(unset)`
/// cast.
pub fn is_safe_cast(file: &FileTokens, pos: usize) -> bool {
    matches!(
        file.prev_non_trivial(pos).and_then(|p| file.kind(p)),
        Some(TokenKind::Cast(cast)) if cast.is_narrowing()
    )
}

/// The value at `pos` is cast to a scalar, discarded, or passed straight
/// to a sanitizing function.
pub fn is_sanitized(file: &FileTokens, sanitizers: &SanitizingFunctions, pos: usize) -> bool {
    if is_safe_cast(file, pos) {
        return true;
    }
    let Some(open) = file.innermost_paren(pos) else {
        return false;
    };
    match wrapping_call(file, open) {
        WrappingCall::Discard => true,
        call => call
            .effective_name()
            .is_some_and(|name| sanitizers.contains(name)),
    }
}

/// Sanitization is the only thing done to the value at `pos`.
///
/// A bare cast qualifies. A cast inside any paren group does not, and a
/// sanitizing call only qualifies when it is the sole group around `pos`.
pub fn is_only_sanitized(
    file: &FileTokens,
    sanitizers: &SanitizingFunctions,
    pos: usize,
) -> bool {
    if !is_sanitized(file, sanitizers, pos) {
        return false;
    }
    if file.innermost_paren(pos).is_none() {
        return true;
    }
    if is_safe_cast(file, pos) {
        return false;
    }
    file.paren_depth(pos) == 1
}
