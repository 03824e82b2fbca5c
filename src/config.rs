//! Dashboard configuration, read from an optional JSON file next to the binary's working directory.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "aircrash_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CSV loaded at startup.
    pub data_path: PathBuf,
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub log_filter: String,
    pub window_width: f32,
    pub window_height: f32,
    /// Length of the manufacturer and country rankings.
    pub top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("env/aircrahesFullDataUpdated_2024.csv"),
            log_filter: "aircrash_dashboard=info".to_string(),
            window_width: 1400.0,
            window_height: 900.0,
            top_n: crate::views::TOP_N,
        }
    }
}

impl AppConfig {
    /// Load [`CONFIG_FILE`] from the working directory, or defaults when it is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
