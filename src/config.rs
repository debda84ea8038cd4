//! Application configuration, stored as TOML.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "tft-companion.toml";

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rule configuration document
    pub rules_path: PathBuf,
    /// Directory holding champions.json and comps.json
    pub data_dir: PathBuf,
    /// Completed-match records
    pub history_path: PathBuf,
    /// How often `watch` checks its files for changes
    pub poll_interval_ms: u64,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("data/rules.json"),
            data_dir: PathBuf::from("data"),
            history_path: PathBuf::from("data/match_history.json"),
            poll_interval_ms: 500,
            format: OutputFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise fall back to the default file,
    /// then to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }

        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.exists() {
            let config = Self::load(default)?;
            info!("Loaded configuration from {}", default.display());
            return Ok(config);
        }

        info!("Using default configuration");
        Ok(Self::default())
    }

    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin the pollers
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
