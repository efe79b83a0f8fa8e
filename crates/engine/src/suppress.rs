//! Inline comments that silence a rule at one position.
//!
//! Two forms are understood:
//!
//! - a comment naming the rule's tag (`// CSRF ok.`, `// override ok.`)
//!   inside the statement or right after its `;` on the same line;
//! - `// phpcs:ignore [Code, ...]` on the same line, or alone on the line
//!   before.

use ir::{FileTokens, TokenKind};
use regex::Regex;
use std::collections::HashMap;
use tracing::trace;

/// Lookup of suppression comments for a rule tag.
pub trait Suppressions: Send + Sync {
    fn has_suppression(&self, file: &FileTokens, tag: &str, pos: usize) -> bool;
}

#[derive(Debug, Clone)]
struct TagEntry {
    pattern: Regex,
    /// Sniff codes and rule ids a `phpcs:ignore` list may name.
    codes: Vec<String>,
}

#[derive(Debug, Clone)]
/// Comment based [`Suppressions`].
pub struct CommentSuppressions {
    tags: HashMap<String, TagEntry>,
    phpcs_ignore: Regex,
}

impl CommentSuppressions {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tags: HashMap::new(),
            phpcs_ignore: Regex::new(r"(?i)phpcs:ignore\b(?P<codes>[^\r\n]*)")?,
        })
    }

    /// Makes `tag` known, together with the codes that `phpcs:ignore` may
    /// use to name it.
    ///
    /// # Example
    /// ```
    /// use engine::suppress::CommentSuppressions;
    /// let mut s = CommentSuppressions::new().unwrap();
    /// s.register("CSRF", &["WordPress.Security.NonceVerification", "wp.nonce-verification"])
    ///     .unwrap();
    /// ```
    pub fn register(&mut self, tag: &str, codes: &[&str]) -> Result<(), regex::Error> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(tag)))?;
        self.tags.insert(
            tag.to_string(),
            TagEntry {
                pattern,
                codes: codes.iter().map(|c| c.to_string()).collect(),
            },
        );
        Ok(())
    }

    fn tagged_comment(&self, file: &FileTokens, entry: &TagEntry, pos: usize) -> bool {
        let end = (pos..file.len())
            .find(|&i| {
                matches!(
                    file.kind(i),
                    Some(TokenKind::Semicolon) | Some(TokenKind::CloseTag)
                )
            })
            .unwrap_or(file.len());
        if let Some(semi) = file.token(end).filter(|t| t.kind == TokenKind::Semicolon) {
            let trailing = file
                .token(end + 1)
                .filter(|t| t.kind == TokenKind::Comment && t.line == semi.line);
            if trailing.is_some_and(|c| entry.pattern.is_match(&c.text)) {
                return true;
            }
        }
        (pos..end).rev().any(|i| {
            file.token(i)
                .is_some_and(|t| t.kind == TokenKind::Comment && entry.pattern.is_match(&t.text))
        })
    }

    fn phpcs_ignored(&self, file: &FileTokens, codes: &[String], pos: usize) -> bool {
        let Some(line) = file.token(pos).map(|t| t.line) else {
            return false;
        };
        let before = (0..pos)
            .rev()
            .take_while(|&i| file.tokens[i].line + 1 >= line)
            .filter(|&i| {
                let t = &file.tokens[i];
                t.line == line || (t.line + 1 == line && alone_on_line(file, i))
            });
        let after = (pos + 1..file.len()).take_while(|&i| file.tokens[i].line == line);
        before.chain(after).any(|i| {
            let t = &file.tokens[i];
            if t.kind != TokenKind::Comment {
                return false;
            }
            let Some(caps) = self.phpcs_ignore.captures(&t.text) else {
                return false;
            };
            let listed = caps.name("codes").map_or("", |m| m.as_str());
            ignore_list_matches(listed, codes)
        })
    }
}

impl Suppressions for CommentSuppressions {
    fn has_suppression(&self, file: &FileTokens, tag: &str, pos: usize) -> bool {
        let Some(entry) = self.tags.get(tag) else {
            return false;
        };
        let suppressed =
            self.tagged_comment(file, entry, pos) || self.phpcs_ignored(file, &entry.codes, pos);
        if suppressed {
            trace!(file = %file.file_path, pos, tag, "suppressed by comment");
        }
        suppressed
    }
}

/// No code shares the line of the comment at `pos`.
fn alone_on_line(file: &FileTokens, pos: usize) -> bool {
    let line = file.tokens[pos].line;
    let prev_same = pos > 0 && file.tokens[pos - 1].line == line;
    let next_same = file.tokens.get(pos + 1).is_some_and(|t| t.line == line);
    !prev_same && !next_same
}

/// Whether a `phpcs:ignore` code list covers one of `codes`. An empty list
/// ignores everything; a code also covers its more specific children.
fn ignore_list_matches(listed: &str, codes: &[String]) -> bool {
    let listed = listed.split("--").next().unwrap_or_default();
    let listed = listed.trim().trim_end_matches("*/").trim();
    if listed.is_empty() {
        return true;
    }
    listed
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .any(|item| {
            codes.iter().any(|code| {
                item == code
                    || code.starts_with(&format!("{item}."))
                    || item.starts_with(&format!("{code}."))
            })
        })
}
