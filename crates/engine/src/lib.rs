//! Analysis engine that runs the WordPress security rules over token IR.
//!
//! The [`Analyzer`] walks a file's tokens in order, hands each token to the
//! rules interested in it and collects the resulting [`Diagnostic`]s. Guard
//! searches share one [`GuardCache`] per analysis context: one per file in
//! [`Analyzer::analyze`], one per worker thread in
//! [`Analyzer::analyze_files`].

use ir::FileTokens;
pub use loader::Severity;
use loader::Settings;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub mod guard;
pub mod harness;
pub mod rules;
pub mod sanitize;
pub mod scope;
pub mod suppress;
pub mod usage;

pub use guard::{GuardCache, VerificationFunctions};
pub use harness::{TestClasses, TestHarness};
pub use rules::{GlobalOverride, NonceVerification, Rule, RuleContext};
pub use sanitize::SanitizingFunctions;
pub use scope::{enclosing_scope, Scope, ScopeLookup};
pub use suppress::{CommentSuppressions, Suppressions};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Result of a rule firing at one token.
pub struct Diagnostic {
    /// File the token belongs to.
    pub file: String,
    /// Index of the token in the file's token stream.
    pub position: usize,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    /// Rule that produced the diagnostic.
    pub rule_id: String,
    /// Message code, e.g. `NoNonceVerification`.
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        file: &FileTokens,
        position: usize,
        severity: Severity,
        rule_id: &str,
        code: &str,
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = file
            .token(position)
            .map_or((0, 0), |t| (t.line, t.column));
        Self {
            file: file.file_path.clone(),
            position,
            line,
            column,
            severity,
            rule_id: rule_id.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

fn dedup_diagnostics(diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    diagnostics.retain(|d| seen.insert((d.position, d.rule_id.clone(), d.code.clone())));
}

/// Rules plus the collaborators they consult.
pub struct Analyzer {
    rules: Vec<Box<dyn Rule>>,
    suppressions: Box<dyn Suppressions>,
    harness: Box<dyn TestHarness>,
}

impl Analyzer {
    pub fn new(
        rules: Vec<Box<dyn Rule>>,
        suppressions: Box<dyn Suppressions>,
        harness: Box<dyn TestHarness>,
    ) -> Self {
        Self {
            rules,
            suppressions,
            harness,
        }
    }

    /// Builds the enabled rules, registering each rule's suppression tag.
    ///
    /// # Example
    /// ```
    /// use engine::Analyzer;
    /// let analyzer = Analyzer::from_settings(&loader::Settings::default()).unwrap();
    /// assert_eq!(
    ///     analyzer.rule_ids().collect::<Vec<_>>(),
    ///     ["wp.nonce-verification", "wp.global-override"]
    /// );
    /// ```
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if settings.nonce_verification.enabled {
            rules.push(Box::new(NonceVerification::from_settings(
                &settings.nonce_verification,
            )));
        }
        if settings.global_override.enabled {
            rules.push(Box::new(GlobalOverride::from_settings(
                &settings.global_override,
            )));
        }
        let mut suppressions = CommentSuppressions::new()?;
        for rule in &rules {
            suppressions.register(rule.suppression_tag(), &[rule.sniff_code(), rule.id()])?;
        }
        let harness = TestClasses::new(&settings.global_override.custom_test_classes);
        debug!(rules = rules.len(), "Analyzer ready");
        Ok(Self::new(rules, Box::new(suppressions), Box::new(harness)))
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.id())
    }

    /// Analyzes one file with a fresh guard cache.
    pub fn analyze(&self, file: &FileTokens) -> Vec<Diagnostic> {
        let mut cache = GuardCache::new();
        self.analyze_with_cache(file, &mut cache)
    }

    /// Analyzes one file reusing a caller-owned guard cache.
    ///
    /// Diagnostics come back ordered by position, without duplicates.
    pub fn analyze_with_cache(&self, file: &FileTokens, cache: &mut GuardCache) -> Vec<Diagnostic> {
        let mut ctx = RuleContext {
            file,
            guards: cache,
            suppressions: self.suppressions.as_ref(),
            harness: self.harness.as_ref(),
        };
        let mut out = Vec::new();
        for (pos, token) in file.tokens.iter().enumerate() {
            for rule in &self.rules {
                if rule.interests(token) {
                    rule.check(&mut ctx, pos, &mut out);
                }
            }
        }
        out.sort_by_key(|d| d.position);
        dedup_diagnostics(&mut out);
        debug!(
            file = %file.file_path,
            diagnostics = out.len(),
            "File analysis completed"
        );
        out
    }

    /// Analyzes files in parallel. Each worker owns its guard cache and the
    /// output keeps the order of `files`.
    pub fn analyze_files(&self, files: &[FileTokens]) -> Vec<Diagnostic> {
        debug!("Starting analysis of {} files", files.len());
        let per_file: Vec<Vec<Diagnostic>> = files
            .par_iter()
            .map_init(GuardCache::new, |cache, file| {
                self.analyze_with_cache(file, cache)
            })
            .collect();
        per_file.into_iter().flatten().collect()
    }
}
