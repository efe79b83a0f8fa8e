#![allow(dead_code)]

use engine::{Analyzer, Diagnostic};
use ir::FileTokens;
use loader::Settings;

pub fn php(path: &str, code: &str) -> FileTokens {
    parsers::parse_php(code, path).unwrap()
}

pub fn analyze(code: &str) -> Vec<Diagnostic> {
    analyze_with(code, &Settings::default())
}

pub fn analyze_with(code: &str, settings: &Settings) -> Vec<Diagnostic> {
    let analyzer = Analyzer::from_settings(settings).unwrap();
    analyzer.analyze(&php("test.php", code))
}

/// `(rule_id, code)` of every diagnostic, in order.
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<(&str, &str)> {
    diagnostics
        .iter()
        .map(|d| (d.rule_id.as_str(), d.code.as_str()))
        .collect()
}
