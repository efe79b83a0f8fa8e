use clap::ValueEnum;
use engine::Diagnostic;
use reporters::{self, ScanInfo};

/// Supported output formats for scan results.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Sarif,
}

impl From<Format> for reporters::Format {
    fn from(fmt: Format) -> Self {
        match fmt {
            Format::Text => reporters::Format::Text,
            Format::Json => reporters::Format::Json,
            Format::Sarif => reporters::Format::Sarif,
        }
    }
}

pub fn print_diagnostics(
    diagnostics: &[Diagnostic],
    fmt: Format,
    info: Option<&ScanInfo>,
) -> anyhow::Result<()> {
    reporters::print_diagnostics(diagnostics, fmt.into(), info)?;
    Ok(())
}
