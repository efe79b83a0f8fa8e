//! Resolution of the function-like body that bounds guard searches.

use ir::{FileTokens, RegionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Half-open token range `[start, end)`.
pub struct Scope {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLookup {
    /// Body of the nearest enclosing function or closure, braces included.
    Function(Scope),
    /// Module level code: the whole file.
    File(Scope),
    /// The nearest function-like body never closes.
    Unterminated,
}

impl ScopeLookup {
    pub fn scope(self) -> Option<Scope> {
        match self {
            ScopeLookup::Function(s) | ScopeLookup::File(s) => Some(s),
            ScopeLookup::Unterminated => None,
        }
    }
}

/// Finds the innermost function or closure body around `pos`.
///
/// Class bodies are walked through: a method's scope is the method body,
/// while code directly in a class body resolves to the file.
pub fn enclosing_scope(file: &FileTokens, pos: usize) -> ScopeLookup {
    let nearest = file
        .enclosing_regions(pos)
        .find(|(_, r)| r.kind.is_function_like());
    match nearest {
        Some((_, region)) => match region.closer {
            Some(closer) => ScopeLookup::Function(Scope {
                start: region.opener,
                end: closer,
            }),
            None => ScopeLookup::Unterminated,
        },
        None => ScopeLookup::File(Scope {
            start: 0,
            end: file.len(),
        }),
    }
}

/// Index of the nearest named function region around `pos`.
pub fn enclosing_function(file: &FileTokens, pos: usize) -> Option<usize> {
    file.enclosing_regions(pos)
        .find(|(_, r)| r.kind == RegionKind::Function)
        .map(|(idx, _)| idx)
}
