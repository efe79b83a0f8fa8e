//! User level defaults read from `config.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("wpsec")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("wpsec")
}

fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Settings file used when `--settings` is not given. Relative paths
    /// resolve against the config directory.
    pub settings: Option<PathBuf>,
    /// Extra exclusion globs added to the command line ones.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.scan.settings.as_ref().map(|p| {
            if p.is_relative() {
                config_dir().join(p)
            } else {
                p.clone()
            }
        })
    }
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}
