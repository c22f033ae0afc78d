//! Store configuration
//!
//! Tunables for a store's dispatch loop, loaded from .redux-pipeline.toml.

use crate::config_file::ConfigFile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Store configuration loaded from .redux-pipeline.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Optional cap on nested dispatch calls (the outermost dispatch counts as 1).
    /// Unbounded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dispatch_depth: Option<usize>,

    /// Selected subscriptions skip callbacks when the selected value is unchanged
    #[serde(default = "default_skip_repeats")]
    pub skip_repeats: bool,

    /// Log every dispatch entry and exit (with nesting depth) at debug level
    #[serde(default)]
    pub log_actions: bool,
}

fn default_skip_repeats() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: None,
            skip_repeats: default_skip_repeats(),
            log_actions: false,
        }
    }
}

impl StoreConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(file) = ConfigFile::find() {
            match Self::from_toml_str(&file.content) {
                Ok(config) => {
                    log::info!("Loaded store config from {}", file.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config file {}: {:#}",
                        file.path.display(),
                        e
                    );
                }
            }
        }

        log::debug!("Using default store config");
        Self::default()
    }

    /// Parse config from TOML content; missing fields fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid store config")?;
        if config.max_dispatch_depth == Some(0) {
            anyhow::bail!("max_dispatch_depth must be at least 1");
        }
        Ok(config)
    }
}
