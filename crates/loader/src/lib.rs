//! Loads rule settings from YAML or JSON and exposes the curated
//! WordPress name lists the rules start from.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::{fs, path::Path};
use tracing::debug;

pub mod defaults;
pub mod walk;

pub use walk::visit;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
/// Severity of a diagnostic. Ordered so that `Warning < Error`.
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
/// Settings for every rule, as read from a settings file.
pub struct Settings {
    pub nonce_verification: NonceVerificationSettings,
    pub global_override: GlobalOverrideSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NonceVerificationSettings {
    pub enabled: bool,
    /// Extra functions that verify a nonce, on top of the WordPress ones.
    pub custom_verification_functions: Vec<String>,
    /// Extra functions whose result is safe to use.
    pub custom_sanitizing_functions: Vec<String>,
    /// Extra functions that both unslash and sanitize.
    pub custom_unslashing_sanitizing_functions: Vec<String>,
    /// Request superglobals to watch and the severity of an unverified read.
    /// Replaces the default table when given.
    pub superglobals: BTreeMap<String, Severity>,
}

impl Default for NonceVerificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_verification_functions: Vec::new(),
            custom_sanitizing_functions: Vec::new(),
            custom_unslashing_sanitizing_functions: Vec::new(),
            superglobals: defaults::SUPERGLOBALS
                .iter()
                .map(|(name, sev)| (name.to_string(), *sev))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalOverrideSettings {
    pub enabled: bool,
    /// Extra protected globals, written with or without the leading `$`.
    pub custom_protected_globals: Vec<String>,
    /// Extra unit test base classes whose methods may override globals.
    pub custom_test_classes: Vec<String>,
    /// Treat every file as if it were included from within a function, so
    /// top-level `global` statements are ignored.
    pub treat_files_as_scoped: bool,
}

impl Default for GlobalOverrideSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_protected_globals: Vec::new(),
            custom_test_classes: Vec::new(),
            treat_files_as_scoped: false,
        }
    }
}

impl Settings {
    /// Checks entries serde cannot reject on its own.
    ///
    /// # Example
    /// ```
    /// use loader::{Settings, Severity};
    /// let mut settings = Settings::default();
    /// assert!(settings.validate().is_ok());
    /// settings
    ///     .nonce_verification
    ///     .superglobals
    ///     .insert("_COOKIE".into(), Severity::Warning);
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> anyhow::Result<()> {
        for name in self.nonce_verification.superglobals.keys() {
            if !name.starts_with('$') || name.len() < 2 {
                bail!("superglobal '{name}' must be a variable name starting with '$'");
            }
        }
        let functions = self
            .nonce_verification
            .custom_verification_functions
            .iter()
            .chain(&self.nonce_verification.custom_sanitizing_functions)
            .chain(&self.nonce_verification.custom_unslashing_sanitizing_functions);
        for name in functions {
            if name.trim().is_empty() || name.contains(['$', '(', ' ']) {
                bail!("invalid function name '{name}'");
            }
        }
        for name in &self.global_override.custom_protected_globals {
            if name.trim_start_matches('$').is_empty() {
                bail!("empty protected global name");
            }
        }
        Ok(())
    }
}

/// Reads settings from a `.yaml`, `.yml` or `.json` file and validates them.
///
/// # Example
/// ```
/// use loader::load_settings;
/// use std::fs;
/// let path = std::env::temp_dir().join("wpsec_settings_ex.yaml");
/// fs::write(&path, "nonce_verification:\n  custom_verification_functions: [my_check]\n").unwrap();
/// let settings = load_settings(&path).unwrap();
/// assert_eq!(settings.nonce_verification.custom_verification_functions, ["my_check"]);
/// assert!(settings.global_override.enabled);
/// ```
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let settings: Settings = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?,
        other => bail!(
            "unsupported settings format '{other}' for {}",
            path.display()
        ),
    };
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    debug!(file = %path.display(), "Loaded settings");
    Ok(settings)
}
