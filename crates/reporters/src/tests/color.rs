use crate::color_severity;
use loader::Severity;

#[test]
fn warning_is_yellow() {
    assert_eq!(color_severity(Severity::Warning), "\x1b[33mWARNING\x1b[0m");
}

#[test]
fn error_is_red() {
    assert_eq!(color_severity(Severity::Error), "\x1b[31mERROR\x1b[0m");
}
