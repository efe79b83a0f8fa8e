//! Common utilities for the command line interface.
use regex::Regex;
use std::fs;
use std::path::Path;

pub mod args;
pub mod config;
pub mod output;
pub mod scan;
pub mod ui;

/// Default maximum size: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Converts a basic glob pattern to an anchored regular expression.
/// `**` crosses directories, `*` and `?` stay within one path segment.
///
/// # Example
///
/// ```
/// use wpsec::glob_to_regex;
/// let re = glob_to_regex("includes/*.php").unwrap();
/// assert!(re.is_match("includes/save.php"));
/// assert!(!re.is_match("includes/admin/save.php"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, regex::Error> {
    let mut regex = String::from("^");
    let mut literal = String::new();
    let mut chars = pat.chars().peekable();
    while let Some(c) = chars.next() {
        let piece = match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                ".*"
            }
            '*' => "[^/]*",
            '?' => "[^/]",
            _ => {
                literal.push(c);
                continue;
            }
        };
        regex.push_str(&regex::escape(&literal));
        literal.clear();
        regex.push_str(piece);
    }
    regex.push_str(&regex::escape(&literal));
    regex.push('$');
    Regex::new(&regex)
}

/// Transforms a glob-style exclusion string into [`Regex`].
/// A trailing slash excludes everything below the directory.
///
/// # Example
///
/// ```
/// use wpsec::parse_exclude;
/// let re = parse_exclude("vendor/").unwrap();
/// assert!(re.is_match("vendor/composer/autoload.php"));
/// ```
pub fn parse_exclude(s: &str) -> Result<Regex, String> {
    let glob_str = if s.ends_with('/') {
        format!("{s}**")
    } else {
        s.to_string()
    };
    glob_to_regex(&glob_str).map_err(|e| e.to_string())
}

/// Directories nobody wants scanned: dependencies and VCS metadata.
pub fn default_excludes() -> Vec<Regex> {
    ["**/node_modules/**", "**/vendor/**", "**/.git/**"]
        .iter()
        .filter_map(|p| parse_exclude(p).ok())
        .collect()
}

/// Indicates whether a path should be skipped according to patterns or size.
/// Separators are normalised to support Windows and Unix.
///
/// # Example
///
/// ```
/// use wpsec::{is_excluded, parse_exclude};
/// use std::path::Path;
/// let patterns = vec![parse_exclude("tests/**").unwrap()];
/// assert!(is_excluded(Path::new("tests/bootstrap.php"), &patterns, 0));
/// ```
pub fn is_excluded(path: &Path, patterns: &[Regex], max_file_size: u64) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    if patterns.iter().any(|re| re.is_match(&path_str)) {
        return true;
    }
    max_file_size > 0
        && fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > max_file_size)
}
