//! Request data processed without a nonce check.

use super::{Rule, RuleContext};
use crate::guard::VerificationFunctions;
use crate::sanitize::{is_only_sanitized, SanitizingFunctions};
use crate::usage::{is_assignment_target, is_inside_existence_check};
use crate::Diagnostic;
use ir::{Token, TokenKind};
use loader::{NonceVerificationSettings, Severity};
use std::collections::HashMap;
use tracing::trace;

pub const MESSAGE: &str = "Processing form data without nonce verification.";

pub struct NonceVerification {
    superglobals: HashMap<String, Severity>,
    verifiers: VerificationFunctions,
    sanitizers: SanitizingFunctions,
}

impl NonceVerification {
    pub const ID: &'static str = "wp.nonce-verification";
    pub const SNIFF_CODE: &'static str = "WordPress.Security.NonceVerification";
    pub const TAG: &'static str = "CSRF";

    pub fn new(
        superglobals: HashMap<String, Severity>,
        verifiers: VerificationFunctions,
        sanitizers: SanitizingFunctions,
    ) -> Self {
        Self {
            superglobals,
            verifiers,
            sanitizers,
        }
    }

    pub fn from_settings(settings: &NonceVerificationSettings) -> Self {
        let superglobals = settings
            .superglobals
            .iter()
            .map(|(name, sev)| (name.clone(), *sev))
            .collect();
        let verifiers = VerificationFunctions::new(&settings.custom_verification_functions);
        let sanitizers = SanitizingFunctions::new(
            settings
                .custom_sanitizing_functions
                .iter()
                .chain(&settings.custom_unslashing_sanitizing_functions),
        );
        Self::new(superglobals, verifiers, sanitizers)
    }

    fn message_code(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "NoNonceVerification",
            Severity::Warning => "NoNonceVerificationRecommended",
        }
    }
}

impl Rule for NonceVerification {
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
        token.kind == TokenKind::Variable && self.superglobals.contains_key(&token.text)
    }

    fn check(&self, ctx: &mut RuleContext<'_>, pos: usize, out: &mut Vec<Diagnostic>) {
        let file = ctx.file;
        let Some(&severity) = file
            .token(pos)
            .and_then(|t| self.superglobals.get(&t.text))
        else {
            return;
        };
        if ctx.suppressions.has_suppression(file, Self::TAG, pos) {
            return;
        }
        if is_assignment_target(file, pos) {
            trace!(pos, "superglobal is written, not read");
            return;
        }
        if is_only_sanitized(file, &self.sanitizers, pos) {
            trace!(pos, "superglobal is sanitized");
            return;
        }
        let existence_check = is_inside_existence_check(file, pos);
        if ctx
            .guards
            .has_guard_before(file, &self.verifiers, pos, existence_check)
        {
            return;
        }
        out.push(Diagnostic::new(
            file,
            pos,
            severity,
            Self::ID,
            Self::message_code(severity),
            MESSAGE,
        ));
    }
}
