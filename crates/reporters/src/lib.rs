//! Formatters for diagnostics in text, JSON and SARIF.
//! Provide human and tool-friendly output.

use engine::Diagnostic;
use loader::Severity;
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

mod sarif;

pub use sarif::to_sarif;

/// Returns the severity colored with simple ANSI codes.
fn color_severity(sev: Severity) -> String {
    let code = match sev {
        Severity::Warning => "\x1b[33m",
        Severity::Error => "\x1b[31m",
    };
    format!("{code}{sev}\x1b[0m")
}

fn simple_box(title: &str) -> String {
    let width = title.len() + 2;
    format!(
        "╭{}╮\n│ {} │\n╰{}╯\n",
        "─".repeat(width),
        title,
        "─".repeat(width)
    )
}

fn scan_stats(info: &ScanInfo) -> String {
    let rule = "    ──────────────────────────────────────────────────────────────────────────────\n";
    let mut output = simple_box("Analysis Status");
    output.push('\n');
    output.push_str(&format!(
        "    Scanning {} files with {} rules:\n\n",
        info.files_analyzed,
        info.rules.len()
    ));

    output.push_str("    RULES\n");
    output.push_str(rule);
    for id in &info.rules {
        output.push_str(&format!("    {id}\n"));
    }
    output.push('\n');

    output.push_str("    PERFORMANCE\n");
    output.push_str(rule);
    output.push_str(&format!("    Duration                  {}ms\n", info.duration_ms));
    output.push_str(&format!(
        "    Failed files              {}\n",
        info.failed_files
    ));
    output.push_str(&format!(
        "    Success rate              {:.1}%\n",
        if info.files_analyzed > 0 {
            (info.files_analyzed.saturating_sub(info.failed_files)) as f64
                / info.files_analyzed as f64
                * 100.0
        } else {
            0.0
        }
    ));
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported formats for printing diagnostics.
pub enum Format {
    /// Human-readable output in plain text.
    Text,
    /// JSON structure for integrations.
    Json,
    /// SARIF 2.1.0 report.
    Sarif,
}

#[derive(Serialize)]
struct DiagnosticsOut<'a> {
    diagnostics: &'a [Diagnostic],
    total: usize,
}

/// Additional information to display in statistics.
#[derive(Debug, Clone, Default)]
pub struct ScanInfo {
    /// Ids of the rules that ran.
    pub rules: Vec<String>,
    pub files_analyzed: usize,
    pub duration_ms: u64,
    pub failed_files: usize,
}

/// Prints diagnostics to stdout in the selected format.
///
/// # Example
/// ```
/// use reporters::{print_diagnostics, Format, ScanInfo};
/// let info = ScanInfo {
///     rules: vec!["wp.nonce-verification".into()],
///     files_analyzed: 5,
///     duration_ms: 1000,
///     failed_files: 0,
/// };
/// print_diagnostics(&[], Format::Text, Some(&info)).unwrap();
/// ```
pub fn print_diagnostics(
    diagnostics: &[Diagnostic],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    let mut out = io::stdout();
    write_diagnostics(&mut out, diagnostics, fmt, scan_info)
}

/// Writes diagnostics to a generic `Write`.
pub fn write_diagnostics<W: Write>(
    out: &mut W,
    diagnostics: &[Diagnostic],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    debug!(?fmt, count = diagnostics.len(), "Writing report");
    match fmt {
        Format::Text => {
            if let Some(info) = scan_info {
                writeln!(out, "{}", scan_stats(info))?;
            }
            writeln!(out, "{}", simple_box("Results"))?;
            if diagnostics.is_empty() {
                writeln!(out, "✔ No issues found.")?;
                return Ok(());
            }
            writeln!(out, "⚠ Found {} issue(s):\n", diagnostics.len())?;
            for d in diagnostics {
                writeln!(
                    out,
                    "{} {}:{}:{} {}.{}",
                    color_severity(d.severity),
                    d.file,
                    d.line,
                    d.column,
                    d.rule_id,
                    d.code
                )?;
                writeln!(out, "    {}", d.message)?;
                writeln!(out)?;
            }
            writeln!(out, "Total: {}", diagnostics.len())?;
        }
        Format::Json => {
            let json = DiagnosticsOut {
                diagnostics,
                total: diagnostics.len(),
            };
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
        }
        Format::Sarif => {
            let sarif = sarif::to_sarif(diagnostics);
            serde_json::to_writer_pretty(&mut *out, &sarif)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
