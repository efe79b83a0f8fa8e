//! Guard search: is there a nonce verification call before a position in
//! the same function scope?
//!
//! Callers typically ask this for many positions of the same function in
//! increasing order. [`GuardCache`] remembers the last scope it scanned, so
//! a scope is walked at most once no matter how many positions are queried.

use crate::scope::{enclosing_scope, Scope, ScopeLookup};
use ir::{FileTokens, TokenKind};
use loader::defaults::VERIFICATION_FUNCTIONS;
use std::collections::HashSet;
use tracing::trace;

#[derive(Debug, Clone)]
/// Names of the functions that verify a nonce.
pub struct VerificationFunctions {
    names: HashSet<String>,
}

impl VerificationFunctions {
    /// Built-in WordPress verifiers plus `custom`.
    ///
    /// # Example
    /// ```
    /// use engine::guard::VerificationFunctions;
    /// let v = VerificationFunctions::new(["my_verify"]);
    /// assert!(v.contains("check_admin_referer"));
    /// assert!(v.contains("My_Verify"));
    /// assert!(!v.contains("wp_create_nonce"));
    /// ```
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = VERIFICATION_FUNCTIONS
            .iter()
            .map(|n| n.to_ascii_lowercase())
            .chain(custom.into_iter().map(|n| n.as_ref().to_ascii_lowercase()))
            .collect();
        Self { names }
    }

    /// Function names are case-insensitive in PHP.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }
}

impl Default for VerificationFunctions {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GuardEntry {
    file_id: u64,
    scope: Scope,
    /// Everything in `[scope.start, scanned_end)` has been examined.
    scanned_end: usize,
    found: Option<usize>,
}

#[derive(Debug, Default)]
/// Single-entry memo of the most recently searched scope.
///
/// One cache belongs to one analysis context. Files are told apart by
/// [`FileTokens::id`], so a re-indexed file never hits a stale entry.
pub struct GuardCache {
    entry: Option<GuardEntry>,
    comparisons: usize,
}

impl GuardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the cached scope. The comparison counter is kept.
    pub fn reset(&mut self) {
        self.entry = None;
    }

    /// Tokens examined by guard scans since the cache was created.
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Whether a verification call guards `pos`.
    ///
    /// The call must precede `pos` within the enclosing function scope.
    /// With `existence_check` set (the use sits inside `isset()`/`empty()`)
    /// a call anywhere in the scope counts. An unterminated scope counts as
    /// guarded so that half-typed code stays quiet.
    pub fn has_guard_before(
        &mut self,
        file: &FileTokens,
        verifiers: &VerificationFunctions,
        pos: usize,
        existence_check: bool,
    ) -> bool {
        let scope = match enclosing_scope(file, pos) {
            ScopeLookup::Function(s) | ScopeLookup::File(s) => s,
            ScopeLookup::Unterminated => {
                trace!(file = %file.file_path, pos, "unterminated scope, skipping guard search");
                return true;
            }
        };
        let end = if existence_check { scope.end } else { pos };

        let start = match &self.entry {
            Some(e) if e.file_id == file.id() && e.scope.start == scope.start => {
                if let Some(found) = e.found {
                    return existence_check || found < pos;
                }
                if end <= e.scanned_end {
                    return false;
                }
                e.scanned_end
            }
            _ => {
                self.entry = Some(GuardEntry {
                    file_id: file.id(),
                    scope,
                    scanned_end: scope.start,
                    found: None,
                });
                scope.start
            }
        };

        let limit = end.min(file.len());
        let mut found = None;
        for i in start..limit {
            self.comparisons += 1;
            if is_guard_call(file, verifiers, i) {
                found = Some(i);
                break;
            }
        }
        if let Some(entry) = self.entry.as_mut() {
            match found {
                Some(i) => {
                    entry.found = Some(i);
                    entry.scanned_end = i + 1;
                }
                None => entry.scanned_end = end,
            }
        }
        trace!(file = %file.file_path, pos, from = start, to = limit, ?found, "guard scan");
        found.is_some()
    }
}

/// A verification function name used as a call.
fn is_guard_call(file: &FileTokens, verifiers: &VerificationFunctions, pos: usize) -> bool {
    let Some(tok) = file.token(pos) else {
        return false;
    };
    tok.kind == TokenKind::Identifier
        && verifiers.contains(tok.call_name())
        && file
            .next_non_trivial(pos)
            .is_some_and(|n| file.kind(n) == Some(TokenKind::OpenParen))
}
