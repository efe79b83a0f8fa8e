//! Assignments that overwrite WordPress core globals.
//!
//! Two shapes are caught: `$GLOBALS['wpdb'] = ...` and a `global $wpdb;`
//! declaration followed by `$wpdb = ...` in the same scope. Bodies of
//! functions, closures and classes declared after the `global` statement
//! are not searched.

use super::{Rule, RuleContext};
use crate::scope::{enclosing_scope, ScopeLookup};
use crate::usage::is_assignment_target;
use crate::Diagnostic;
use ir::{strip_quotes, FileTokens, Token, TokenKind};
use loader::defaults::WP_GLOBALS;
use loader::{GlobalOverrideSettings, Severity};
use std::collections::HashSet;
use tracing::{debug, trace};

pub const CODE: &str = "OverrideProhibited";

pub struct GlobalOverride {
    /// Protected names without the leading `$`.
    protected: HashSet<String>,
    treat_files_as_scoped: bool,
}

impl GlobalOverride {
    pub const ID: &'static str = "wp.global-override";
    pub const SNIFF_CODE: &'static str = "WordPress.WP.GlobalVariablesOverride";
    pub const TAG: &'static str = "override";

    /// WordPress core globals plus `custom`, written with or without `$`.
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let protected = WP_GLOBALS
            .iter()
            .map(|n| n.to_string())
            .chain(
                custom
                    .into_iter()
                    .map(|n| n.as_ref().trim_start_matches('$').to_string()),
            )
            .collect();
        Self {
            protected,
            treat_files_as_scoped: false,
        }
    }

    pub fn from_settings(settings: &GlobalOverrideSettings) -> Self {
        Self {
            treat_files_as_scoped: settings.treat_files_as_scoped,
            ..Self::new(&settings.custom_protected_globals)
        }
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(name.trim_start_matches('$'))
    }

    /// `$GLOBALS['name'] = ...`
    fn check_globals_index(&self, ctx: &RuleContext<'_>, pos: usize, out: &mut Vec<Diagnostic>) {
        let file = ctx.file;
        let Some(open) = file
            .next_non_trivial(pos)
            .filter(|&n| file.kind(n) == Some(TokenKind::OpenBracket))
        else {
            return;
        };
        let Some(close) = file.pair_of(open) else {
            return;
        };
        let mut name = String::new();
        for tok in &file.tokens[open + 1..close] {
            match tok.kind {
                // The key can't be resolved statically.
                TokenKind::Variable | TokenKind::InterpolatedString => return,
                TokenKind::String => name.push_str(strip_quotes(&tok.text)),
                _ => {}
            }
        }
        if !self.protected.contains(&name) || !is_assignment_target(file, close) {
            return;
        }
        self.report(ctx, pos, &format!("${name}"), out);
    }

    /// `global $name;` followed by `$name = ...`
    fn check_global_statement(
        &self,
        ctx: &RuleContext<'_>,
        pos: usize,
        out: &mut Vec<Diagnostic>,
    ) {
        let file = ctx.file;
        let Some(end) = file.end_of_statement(pos) else {
            return;
        };
        let names: HashSet<&str> = file.tokens[pos + 1..end]
            .iter()
            .filter(|t| t.kind == TokenKind::Variable && self.is_protected(&t.text))
            .map(|t| t.text.as_str())
            .collect();
        if names.is_empty() {
            return;
        }

        // Nested function, closure and class bodies have their own locals.
        let limit = match enclosing_scope(file, pos) {
            ScopeLookup::Function(scope) => scope.end,
            ScopeLookup::Unterminated => return,
            ScopeLookup::File(_) if self.treat_files_as_scoped => return,
            ScopeLookup::File(scope) => scope.end,
        };

        let mut i = end + 1;
        while i < limit {
            let tok = &file.tokens[i];
            match tok.kind {
                TokenKind::Function | TokenKind::ClassLike => {
                    match skip_body(file, i) {
                        Skip::To(next) => {
                            i = next;
                            continue;
                        }
                        Skip::NotADeclaration => {}
                        Skip::Unterminated => {
                            debug!(file = %file.file_path, pos = i, "declaration without body, stopping");
                            return;
                        }
                    }
                }
                TokenKind::Variable if names.contains(tok.text.as_str()) => {
                    let static_access = file
                        .prev_non_trivial(i)
                        .is_some_and(|p| file.kind(p) == Some(TokenKind::DoubleColon));
                    if !static_access && is_assignment_target(file, i) {
                        self.report(ctx, i, &tok.text, out);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn report(&self, ctx: &RuleContext<'_>, pos: usize, name: &str, out: &mut Vec<Diagnostic>) {
        if ctx.harness.in_test_method(ctx.file, pos) {
            trace!(pos, name, "override inside test method");
            return;
        }
        if ctx.suppressions.has_suppression(ctx.file, Self::TAG, pos) {
            return;
        }
        out.push(Diagnostic::new(
            ctx.file,
            pos,
            Severity::Error,
            Self::ID,
            CODE,
            format!("Overriding WordPress globals is prohibited. Found assignment to {name}"),
        ));
    }
}

enum Skip {
    /// Resume after the body's closing brace.
    To(usize),
    /// `Foo::class`, `use function ...`
    NotADeclaration,
    Unterminated,
}

fn skip_body(file: &FileTokens, keyword: usize) -> Skip {
    if let Some(closer) = file
        .region_owned_by(keyword)
        .and_then(|idx| file.region(idx))
        .map(|r| r.closer)
    {
        return closer.map_or(Skip::Unterminated, |c| Skip::To(c + 1));
    }
    let declares = file.prev_non_trivial(keyword).map_or(true, |p| {
        let prev = &file.tokens[p];
        !matches!(prev.kind, TokenKind::DoubleColon | TokenKind::ObjectOperator)
            && !prev.text.eq_ignore_ascii_case("use")
    });
    if declares {
        Skip::Unterminated
    } else {
        Skip::NotADeclaration
    }
}

impl Rule for GlobalOverride {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn sniff_code(&self) -> &'static str {
        Self::SNIFF_CODE
    }

    fn suppression_tag(&self) -> &'static str {
        Self::TAG
    }

    fn interests(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Global => true,
            TokenKind::Variable => token.text == "$GLOBALS",
            _ => false,
        }
    }

    fn check(&self, ctx: &mut RuleContext<'_>, pos: usize, out: &mut Vec<Diagnostic>) {
        match ctx.file.kind(pos) {
            Some(TokenKind::Global) => self.check_global_statement(ctx, pos, out),
            Some(TokenKind::Variable) => self.check_globals_index(ctx, pos, out),
            _ => {}
        }
    }
}
