//! Main types for the **token IR**.
//!
//! A source file is flattened into an ordered vector of [`Token`]s. The
//! module [`structure`] then builds a [`FileTokens`] index over that vector
//! (bracket pairs, parenthesis nesting, scope regions) once per file, so
//! rules can query structure by index instead of re-deriving it.

pub mod structure;

use serde::{Deserialize, Serialize};

pub use structure::{FileTokens, Region, RegionKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Target type of a `(type)` cast.
pub enum CastKind {
    Int,
    Float,
    Bool,
    String,
    Array,
    Object,
    Unset,
}

impl CastKind {
    /// Parses the text of a cast such as `( int )` or `(boolean)`.
    ///
    /// # Example
    /// ```
    /// use ir::CastKind;
    /// assert_eq!(CastKind::from_text("( Integer )"), Some(CastKind::Int));
    /// assert_eq!(CastKind::from_text("(foo)"), None);
    /// ```
    pub fn from_text(text: &str) -> Option<Self> {
        let inner: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
            .collect();
        match inner.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(CastKind::Int),
            "float" | "double" | "real" => Some(CastKind::Float),
            "bool" | "boolean" => Some(CastKind::Bool),
            "string" | "binary" => Some(CastKind::String),
            "array" => Some(CastKind::Array),
            "object" => Some(CastKind::Object),
            "unset" => Some(CastKind::Unset),
            _ => None,
        }
    }

    /// Casts whose result can no longer carry attacker-controlled markup.
    pub fn is_narrowing(self) -> bool {
        matches!(
            self,
            CastKind::Int | CastKind::Float | CastKind::Bool | CastKind::Unset
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Category of a token.
pub enum TokenKind {
    /// `$name`
    Variable,
    /// Bare name: function, constant or class reference.
    Identifier,
    /// Any reserved word without a dedicated kind (`if`, `echo`, `use`...).
    Keyword,
    Function,
    /// Arrow function keyword.
    Fn,
    /// `class`, `interface`, `trait` or `enum`.
    ClassLike,
    Global,
    Isset,
    Empty,
    Unset,
    /// Single quoted or otherwise non-interpolated string literal.
    String,
    /// Double quoted string or heredoc containing `$var` / `{$expr}`.
    InterpolatedString,
    Number,
    Cast(CastKind),
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Comma,
    /// `=` and compound assignments such as `.=` or `??=`.
    Assignment,
    DoubleColon,
    /// `->` and `?->`
    ObjectOperator,
    Operator,
    Comment,
    OpenTag,
    CloseTag,
    InlineHtml,
}

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", ".=", "%=", "**=", "&=", "|=", "^=", "<<=", ">>=", "??=",
];

impl TokenKind {
    /// Classifies punctuation and operators.
    ///
    /// # Example
    /// ```
    /// use ir::TokenKind;
    /// assert_eq!(TokenKind::from_symbol(".="), TokenKind::Assignment);
    /// assert_eq!(TokenKind::from_symbol("=="), TokenKind::Operator);
    /// ```
    pub fn from_symbol(text: &str) -> Self {
        match text {
            "(" => TokenKind::OpenParen,
            ")" => TokenKind::CloseParen,
            "[" => TokenKind::OpenBracket,
            "]" => TokenKind::CloseBracket,
            "{" => TokenKind::OpenBrace,
            "}" => TokenKind::CloseBrace,
            ";" => TokenKind::Semicolon,
            "," => TokenKind::Comma,
            "::" => TokenKind::DoubleColon,
            "->" | "?->" => TokenKind::ObjectOperator,
            "?>" => TokenKind::CloseTag,
            t if ASSIGNMENT_OPERATORS.contains(&t) => TokenKind::Assignment,
            _ => TokenKind::Operator,
        }
    }

    /// Classifies a word. `reserved` tells whether the tokenizer saw the
    /// word as a language keyword rather than as a plain name.
    ///
    /// `isset`, `empty` and `unset` keep their dedicated kinds either way,
    /// since grammars disagree on whether they are names or keywords.
    pub fn from_word(text: &str, reserved: bool) -> Self {
        let lower = text.to_ascii_lowercase();
        match lower.as_str() {
            "isset" => return TokenKind::Isset,
            "empty" => return TokenKind::Empty,
            "unset" => return TokenKind::Unset,
            _ => {}
        }
        if !reserved {
            return TokenKind::Identifier;
        }
        match lower.as_str() {
            "function" => TokenKind::Function,
            "fn" => TokenKind::Fn,
            "class" | "interface" | "trait" | "enum" => TokenKind::ClassLike,
            "global" => TokenKind::Global,
            _ => TokenKind::Keyword,
        }
    }

    /// Classifies a string literal by whether it interpolates variables.
    pub fn from_string_literal(text: &str) -> Self {
        if has_interpolation(text) {
            TokenKind::InterpolatedString
        } else {
            TokenKind::String
        }
    }

    /// Comments carry no code and are skipped by every structural walk.
    pub fn is_trivial(self) -> bool {
        matches!(self, TokenKind::Comment)
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
        )
    }

    /// Closer kind that balances this opener.
    pub fn closer(self) -> Option<Self> {
        match self {
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenBracket => Some(TokenKind::CloseBracket),
            TokenKind::OpenBrace => Some(TokenKind::CloseBrace),
            _ => None,
        }
    }
}

/// Detects `$var` or `{$expr}` interpolation in a double quoted string or
/// heredoc. Single quoted strings and nowdocs never interpolate.
fn has_interpolation(text: &str) -> bool {
    let body = text.trim_start_matches(['b', 'B']);
    let interpolating = body.starts_with('"') || (body.starts_with("<<<") && !body.contains("<<<'"));
    if !interpolating {
        return false;
    }
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' => {
                if let Some(&next) = bytes.get(i + 1) {
                    if next == b'_' || next == b'{' || next.is_ascii_alphabetic() {
                        return true;
                    }
                }
                i += 1;
            }
            b'{' if bytes.get(i + 1) == Some(&b'$') => return true,
            _ => i += 1,
        }
    }
    false
}

/// Removes one layer of matching quotes around a string literal.
///
/// # Example
/// ```
/// assert_eq!(ir::strip_quotes("'wpdb'"), "wpdb");
/// assert_eq!(ir::strip_quotes("\"post\""), "post");
/// assert_eq!(ir::strip_quotes("plain"), "plain");
/// ```
pub fn strip_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Smallest unit of source handed to the rules. Its position is its index
/// within [`FileTokens`].
pub struct Token {
    pub kind: TokenKind,
    /// Literal content as written in the file.
    pub text: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Name of a called function without a leading namespace separator.
    pub fn call_name(&self) -> &str {
        self.text.trim_start_matches('\\')
    }
}

#[cfg(test)]
mod tests;
