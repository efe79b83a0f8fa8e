//! Structural index over a token vector.
//!
//! Built once per file by [`FileTokens::new`]. Answers the questions the
//! rules ask over and over (which bracket closes this one, which paren groups
//! wrap this token, which function body contains it) with table lookups.

use crate::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Named function or method body.
    Function,
    /// Anonymous function body.
    Closure,
    /// Body of a class, anonymous class, interface, trait or enum.
    ClassLike,
}

impl RegionKind {
    pub fn is_function_like(self) -> bool {
        matches!(self, RegionKind::Function | RegionKind::Closure)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Brace-delimited body owned by a declaration keyword.
pub struct Region {
    pub kind: RegionKind,
    /// Index of the `function` / `class` / ... keyword.
    pub owner: usize,
    /// Index of the opening brace.
    pub opener: usize,
    /// Index of the closing brace; `None` while the body is unterminated.
    pub closer: Option<usize>,
    /// Nearest enclosing region.
    pub parent: Option<usize>,
}

impl Region {
    /// Whether `pos` lies strictly between the braces. An unterminated body
    /// extends to the end of the file.
    pub fn contains(&self, pos: usize) -> bool {
        pos > self.opener && self.closer.map_or(true, |c| pos < c)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Tokens of one file plus their structural index.
pub struct FileTokens {
    /// Unique per indexed token stream. Two versions of the same path get
    /// different ids; clones share one.
    #[serde(skip, default = "next_id")]
    id: u64,
    pub file_path: String,
    pub tokens: Vec<Token>,
    pairs: Vec<Option<usize>>,
    innermost_paren: Vec<Option<usize>>,
    paren_parent: HashMap<usize, Option<usize>>,
    regions: Vec<Region>,
    innermost_region: Vec<Option<usize>>,
    region_by_owner: HashMap<usize, usize>,
}

impl FileTokens {
    /// Indexes `tokens` for the file at `file_path`.
    ///
    /// # Example
    /// ```
    /// use ir::{FileTokens, Token, TokenKind};
    /// let toks = vec![
    ///     Token::new(TokenKind::Identifier, "f", 1, 1),
    ///     Token::new(TokenKind::OpenParen, "(", 1, 2),
    ///     Token::new(TokenKind::Variable, "$a", 1, 3),
    ///     Token::new(TokenKind::CloseParen, ")", 1, 5),
    /// ];
    /// let file = FileTokens::new("a.php", toks);
    /// assert_eq!(file.pair_of(1), Some(3));
    /// assert_eq!(file.innermost_paren(2), Some(1));
    /// ```
    pub fn new(file_path: impl Into<String>, tokens: Vec<Token>) -> Self {
        let pairs = match_pairs(&tokens);
        let (innermost_paren, paren_parent) = nest_parens(&tokens, &pairs);
        let regions = find_regions(&tokens, &pairs);
        let (regions, innermost_region) = nest_regions(tokens.len(), regions);
        let region_by_owner = regions
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.owner, idx))
            .collect();
        Self {
            id: next_id(),
            file_path: file_path.into(),
            tokens,
            pairs,
            innermost_paren,
            paren_parent,
            regions,
            innermost_region,
            region_by_owner,
        }
    }

    /// Identity of this token stream, the key of per-file caches.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, pos: usize) -> Option<&Token> {
        self.tokens.get(pos)
    }

    pub fn kind(&self, pos: usize) -> Option<TokenKind> {
        self.tokens.get(pos).map(|t| t.kind)
    }

    /// Matching bracket of an opener or closer.
    pub fn pair_of(&self, pos: usize) -> Option<usize> {
        self.pairs.get(pos).copied().flatten()
    }

    /// Opener of the innermost matched paren group strictly enclosing `pos`.
    pub fn innermost_paren(&self, pos: usize) -> Option<usize> {
        self.innermost_paren.get(pos).copied().flatten()
    }

    /// Openers of every paren group enclosing `pos`, innermost first.
    pub fn enclosing_parens(&self, pos: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.innermost_paren(pos), move |open| {
            self.paren_parent.get(open).copied().flatten()
        })
    }

    /// Number of paren groups enclosing `pos`.
    pub fn paren_depth(&self, pos: usize) -> usize {
        self.enclosing_parens(pos).count()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, idx: usize) -> Option<&Region> {
        self.regions.get(idx)
    }

    /// Innermost region whose body contains `pos`.
    pub fn innermost_region(&self, pos: usize) -> Option<usize> {
        self.innermost_region.get(pos).copied().flatten()
    }

    /// Region whose declaration keyword sits at `owner`.
    pub fn region_owned_by(&self, owner: usize) -> Option<usize> {
        self.region_by_owner.get(&owner).copied()
    }

    /// Regions enclosing `pos`, innermost first.
    pub fn enclosing_regions(&self, pos: usize) -> impl Iterator<Item = (usize, &Region)> + '_ {
        std::iter::successors(self.innermost_region(pos), move |idx| {
            self.regions[*idx].parent
        })
        .map(move |idx| (idx, &self.regions[idx]))
    }

    /// First non-comment token after `pos`.
    pub fn next_non_trivial(&self, pos: usize) -> Option<usize> {
        (pos + 1..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivial())
    }

    /// Last non-comment token before `pos`.
    pub fn prev_non_trivial(&self, pos: usize) -> Option<usize> {
        (0..pos.min(self.tokens.len()))
            .rev()
            .find(|&i| !self.tokens[i].kind.is_trivial())
    }

    /// Index of the `;` or `?>` ending the statement that contains `pos`.
    ///
    /// Bracketed groups opened after `pos` are skipped whole. Hitting a
    /// closer that belongs to an enclosing group, or the end of the file,
    /// means the statement has no end yet.
    pub fn end_of_statement(&self, pos: usize) -> Option<usize> {
        let mut i = pos + 1;
        while i < self.tokens.len() {
            let kind = self.tokens[i].kind;
            match kind {
                TokenKind::Semicolon | TokenKind::CloseTag => return Some(i),
                k if k.is_opener() => i = self.pair_of(i)?,
                k if k.is_closer() => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }
}

fn match_pairs(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut pairs = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind.is_opener() {
            stack.push(i);
        } else if tok.kind.is_closer() {
            // Unbalanced openers between the closer and its match stay unpaired.
            let Some(depth) = stack
                .iter()
                .rposition(|&o| tokens[o].kind.closer() == Some(tok.kind))
            else {
                continue;
            };
            let open = stack[depth];
            stack.truncate(depth);
            pairs[open] = Some(i);
            pairs[i] = Some(open);
        }
    }
    pairs
}

type ParenNesting = (Vec<Option<usize>>, HashMap<usize, Option<usize>>);

fn nest_parens(tokens: &[Token], pairs: &[Option<usize>]) -> ParenNesting {
    let mut innermost = vec![None; tokens.len()];
    let mut parent = HashMap::new();
    let mut stack: Vec<usize> = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::CloseParen && pairs[i].is_some() && stack.last() == pairs[i].as_ref()
        {
            stack.pop();
        }
        innermost[i] = stack.last().copied();
        if tok.kind == TokenKind::OpenParen && pairs[i].is_some() {
            parent.insert(i, stack.last().copied());
            stack.push(i);
        }
    }
    (innermost, parent)
}

fn find_regions(tokens: &[Token], pairs: &[Option<usize>]) -> Vec<Region> {
    let prev = |pos: usize| (0..pos).rev().find(|&i| !tokens[i].kind.is_trivial());
    let next = |pos: usize| (pos + 1..tokens.len()).find(|&i| !tokens[i].kind.is_trivial());
    let mut regions = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        let kind = match tok.kind {
            TokenKind::Function => {
                let after = next(i).map(|n| &tokens[n]);
                let anonymous = match after {
                    Some(t) if t.kind == TokenKind::OpenParen => true,
                    Some(t) if t.text == "&" => next(next(i).unwrap_or(i))
                        .is_some_and(|n| tokens[n].kind == TokenKind::OpenParen),
                    _ => false,
                };
                if anonymous {
                    RegionKind::Closure
                } else {
                    RegionKind::Function
                }
            }
            TokenKind::ClassLike => RegionKind::ClassLike,
            _ => continue,
        };
        if let Some(p) = prev(i) {
            // `Foo::class`, `use function bar;`
            if tokens[p].kind == TokenKind::DoubleColon
                || tokens[p].kind == TokenKind::ObjectOperator
                || tokens[p].text.eq_ignore_ascii_case("use")
            {
                continue;
            }
        }
        if let Some(opener) = find_body_opener(tokens, pairs, i, kind) {
            regions.push(Region {
                kind,
                owner: i,
                opener,
                closer: pairs[opener],
                parent: None,
            });
        }
    }
    regions
}

/// Finds the `{` opening the body declared by the keyword at `owner`.
fn find_body_opener(
    tokens: &[Token],
    pairs: &[Option<usize>],
    owner: usize,
    kind: RegionKind,
) -> Option<usize> {
    let mut i = owner + 1;
    let mut seen_params = kind == RegionKind::ClassLike;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenBrace if seen_params => return Some(i),
            TokenKind::OpenParen => {
                // Parameter list, `use (...)` clause or anonymous class args.
                i = pairs[i]?;
                seen_params = true;
            }
            TokenKind::Semicolon | TokenKind::CloseBrace | TokenKind::CloseTag => return None,
            TokenKind::OpenBrace => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

fn nest_regions(len: usize, mut regions: Vec<Region>) -> (Vec<Region>, Vec<Option<usize>>) {
    regions.sort_by_key(|r| r.opener);
    let mut by_opener: HashMap<usize, usize> = HashMap::new();
    for (idx, r) in regions.iter().enumerate() {
        by_opener.insert(r.opener, idx);
    }
    let mut innermost = vec![None; len];
    // (region, first index no longer inside it)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for (i, slot) in innermost.iter_mut().enumerate() {
        while let Some(&(_, limit)) = stack.last() {
            if i >= limit {
                stack.pop();
            } else {
                break;
            }
        }
        *slot = stack.last().map(|&(idx, _)| idx);
        if let Some(&idx) = by_opener.get(&i) {
            let parent_limit = stack.last().map_or(len, |&(_, limit)| limit);
            let limit = regions[idx].closer.map_or(parent_limit, |c| c.min(parent_limit));
            regions[idx].parent = stack.last().map(|&(p, _)| p);
            stack.push((idx, limit));
        }
    }
    (regions, innermost)
}
