//! Converters of source files to the token IR used by the engine.

use anyhow::Context;
use ir::FileTokens;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Default, Clone, Serialize)]
pub struct ParserMetrics {
    pub files_parsed: usize,
    pub parse_errors: usize,
}

pub mod languages;
pub use languages::*;

/// Determines the supported file type from the extension.
///
/// # Example
/// ```
/// use parsers::detect_type;
/// use std::path::Path;
/// assert_eq!(detect_type(Path::new("plugin.php")), Some("php"));
/// assert_eq!(detect_type(Path::new("style.css")), None);
/// ```
pub fn detect_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let detected = match ext.as_deref() {
        Some("php") | Some("inc") | Some("phtml") => Some("php"),
        _ => None,
    };
    if let Some(t) = detected {
        debug!(file = %path.display(), file_type = t, "File type detected");
    } else {
        debug!(file = %path.display(), "Unsupported file type");
    }
    detected
}

/// Reads a file and produces its token IR [`FileTokens`].
///
/// Returns `Ok(None)` for files of an unsupported type.
///
/// # Example
/// ```
/// use parsers::parse_file;
/// use std::fs;
/// let path = std::env::temp_dir().join("wpsec_ex.php");
/// fs::write(&path, "<?php echo $_POST['a'];").unwrap();
/// let file = parse_file(&path, None).unwrap().unwrap();
/// assert!(file.tokens.iter().any(|t| t.text == "$_POST"));
/// ```
pub fn parse_file(
    path: &Path,
    mut metrics: Option<&mut ParserMetrics>,
) -> anyhow::Result<Option<FileTokens>> {
    let Some(ftype) = detect_type(path) else {
        return Ok(None);
    };
    debug!(file = %path.display(), file_type = ftype, "Parsing file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_path = path.to_string_lossy();
    match parse_php(&content, &file_path) {
        Ok(file) => {
            if let Some(m) = metrics.as_deref_mut() {
                m.files_parsed += 1;
            }
            Ok(Some(file))
        }
        Err(e) => {
            if let Some(m) = metrics.as_deref_mut() {
                m.parse_errors += 1;
            }
            Err(e)
        }
    }
}
