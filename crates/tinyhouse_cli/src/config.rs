//! TOML configuration for the driver.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tinyhouse_core::STARTPOS;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tinyhouse.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Position the solve starts from.
    pub start: String,
    /// Tablebase output file.
    pub out: PathBuf,
    /// Optional JSON file for solve statistics.
    pub stats: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            start: STARTPOS.to_string(),
            out: PathBuf::from("tinyhouse.tb"),
            stats: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub depth: u8,
    pub tt_entries: usize,
    /// 0 means no time limit.
    pub move_time_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 9,
            tt_entries: classical_engine::DEFAULT_TT_ENTRIES,
            move_time_ms: 0,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads `path` when given, which must exist. Otherwise loads
    /// [`DEFAULT_CONFIG_FILE`] if present and falls back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                debug!(path = %path.display(), ?config, "config loaded");
                Ok(config)
            }
            None => Self::load_if_present(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    fn load_if_present(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
