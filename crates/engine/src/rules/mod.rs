//! Rules run by the [`Analyzer`](crate::Analyzer).

use crate::guard::GuardCache;
use crate::harness::TestHarness;
use crate::suppress::Suppressions;
use crate::Diagnostic;
use ir::{FileTokens, Token};

pub mod global_override;
pub mod nonce_verification;

pub use global_override::GlobalOverride;
pub use nonce_verification::NonceVerification;

/// Everything a rule may consult while checking one file.
pub struct RuleContext<'a> {
    pub file: &'a FileTokens,
    pub guards: &'a mut GuardCache,
    pub suppressions: &'a dyn Suppressions,
    pub harness: &'a dyn TestHarness,
}

pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `wp.nonce-verification`.
    fn id(&self) -> &'static str;
    /// PHPCS style sniff code, accepted by `phpcs:ignore`.
    fn sniff_code(&self) -> &'static str;
    /// Word that silences the rule in an inline comment.
    fn suppression_tag(&self) -> &'static str;
    /// Cheap pre-filter on a single token.
    fn interests(&self, token: &Token) -> bool;
    /// Examines the token at `pos`, which passed [`Rule::interests`].
    fn check(&self, ctx: &mut RuleContext<'_>, pos: usize, out: &mut Vec<Diagnostic>);
}
