//! Recognition of unit test methods, where overriding globals is expected.

use crate::scope::enclosing_function;
use ir::{FileTokens, Region, RegionKind, TokenKind};
use loader::defaults::TEST_CLASSES;
use std::collections::HashSet;

/// Predicate telling whether a position lies in a test method.
pub trait TestHarness: Send + Sync {
    fn in_test_method(&self, file: &FileTokens, pos: usize) -> bool;
}

#[derive(Debug, Clone)]
/// Test base classes, matched against a class's own name and its parent.
pub struct TestClasses {
    names: HashSet<String>,
}

impl TestClasses {
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = TEST_CLASSES
            .iter()
            .map(|n| normalize(n))
            .chain(custom.into_iter().map(|n| normalize(n.as_ref())))
            .collect();
        Self { names }
    }

    /// Class names are case-insensitive and may be fully qualified.
    ///
    /// # Example
    /// ```
    /// use engine::harness::TestClasses;
    /// let classes = TestClasses::default();
    /// assert!(classes.contains("\\WP_UnitTestCase"));
    /// assert!(classes.contains("phpunit\\framework\\testcase"));
    /// assert!(!classes.contains("WP_Widget"));
    /// ```
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }
}

impl Default for TestClasses {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl TestHarness for TestClasses {
    fn in_test_method(&self, file: &FileTokens, pos: usize) -> bool {
        let Some(method) = enclosing_function(file, pos).and_then(|idx| file.region(idx)) else {
            return false;
        };
        let Some(class) = method
            .parent
            .and_then(|idx| file.region(idx))
            .filter(|r| r.kind == RegionKind::ClassLike)
        else {
            return false;
        };
        class_names(file, class).any(|name| self.contains(name))
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

/// The declared name of a class and the name after `extends`.
fn class_names<'a>(file: &'a FileTokens, class: &Region) -> impl Iterator<Item = &'a str> + 'a {
    let owner = class.owner;
    (owner + 1..class.opener).filter_map(move |i| {
        let tok = file.token(i).filter(|t| t.kind == TokenKind::Identifier)?;
        let prev = file.prev_non_trivial(i)?;
        let named = prev == owner || file.tokens[prev].text.eq_ignore_ascii_case("extends");
        named.then_some(tok.text.as_str())
    })
}
