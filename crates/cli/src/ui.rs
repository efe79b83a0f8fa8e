//! Terminal presentation helpers.

use colored::Colorize;
use std::io::IsTerminal;

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │     WPSEC  WORDPRESS  SECURITY       │
    │     Nonce and global checks          │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

/// Colors are used only on an interactive stderr without `NO_COLOR`.
fn use_colored_output() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Prints a `[TAG] message` line on stderr.
pub fn print_status(tag: &str, message: &str) {
    if use_colored_output() {
        eprintln!("{} {}", format!("[{tag}]").cyan().bold(), message);
    } else {
        eprintln!("[{tag}] {message}");
    }
}

pub fn print_failure(tag: &str, message: &str) {
    if use_colored_output() {
        eprintln!("{} {}", format!("[{tag}]").red().bold(), message);
    } else {
        eprintln!("[{tag}] {message}");
    }
}
