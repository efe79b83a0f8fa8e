use clap::{Args as ClapArgs, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;

use crate::output::Format;
use crate::DEFAULT_MAX_FILE_SIZE;
use loader::Severity;

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "wpsec - nonce verification and global override checks for WordPress PHP code",
    long_about = "wpsec scans WordPress plugins and themes for two classes of problems:

• Request data ($_POST, $_GET, $_REQUEST, $_FILES) processed before a nonce check
• Assignments that overwrite WordPress core globals such as $wpdb or $post

Examples:
  wpsec scan wp-content/plugins/my-plugin
  wpsec scan . --format sarif --fail-on error
  wpsec scan . --settings wpsec.yaml
  wpsec rules
  wpsec tokens includes/save.php",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan PHP files for nonce and global override problems
    Scan(ScanArgs),
    /// List the rules and their suppression markers
    Rules(RulesArgs),
    /// Print the token stream of a PHP file as JSON
    Tokens(TokensArgs),
}

#[derive(ClapArgs)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,
    /// Rule settings file (YAML or JSON)
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Output format for scan results
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Exit with error code if diagnostics of this severity or higher are found
    #[arg(long = "fail-on", value_parser = parse_severity)]
    pub fail_on: Option<Severity>,
    /// Number of parallel threads to use for scanning
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
    /// Exclude paths matching these globs
    #[arg(long, value_parser = crate::parse_exclude, value_delimiter = ',')]
    pub exclude: Vec<Regex>,
    /// Don't use default exclusion patterns
    #[arg(long)]
    pub no_default_exclude: bool,
    /// Maximum file size to scan (in bytes)
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(ClapArgs)]
pub struct RulesArgs {
    /// Rule settings file (YAML or JSON)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct TokensArgs {
    /// PHP file to tokenize
    pub path: PathBuf,
    /// Include the scope regions next to the tokens
    #[arg(long)]
    pub regions: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parse_severity_rejects_invalid_input() {
        assert!(parse_severity("bogus").is_err());
        assert_eq!(parse_severity("warn"), Ok(Severity::Warning));
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(parse_threads("0").is_err());
        assert_eq!(parse_threads("3"), Ok(3));
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
