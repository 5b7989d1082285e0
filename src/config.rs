//! Runtime configuration.
//!
//! Settings come from an optional TOML file, then the environment (a `.env`
//! file is loaded first by the binary), then command line flags. Every
//! field has a default, so running without any config file is normal.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ingest::wspr_live::WSPR_LIVE_BASE_URL;
use crate::model::AnalysisError;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "WSPRANALYSIS_CONFIG";

/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV: &str = "WSPR_LIVE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// wspr.live endpoint (or a mirror)
    pub base_url: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// Reference transmit power used when `--norm` is not given
    pub default_norm_power_dbm: i64,
    /// Query duration used when `--duration` is not given, e.g. "24h"
    pub default_duration: String,
    pub log_file: Option<String>,
    pub log_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: WSPR_LIVE_BASE_URL.to_string(),
            timeout_secs: 60,
            default_norm_power_dbm: 43,
            default_duration: "24h".to_string(),
            log_file: None,
            log_timestamps: false,
        }
    }
}

impl Config {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, AnalysisError> {
        toml::from_str(contents).map_err(|e| AnalysisError::ConfigError(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|e| {
            AnalysisError::ConfigError(format!("reading {}: {}", path_ref.display(), e))
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            AnalysisError::ConfigError(msg) => {
                AnalysisError::ConfigError(format!("parsing {}: {}", path_ref.display(), msg))
            }
            other => other,
        })
    }

    /// Load from `path` if given, otherwise from `$WSPRANALYSIS_CONFIG` if
    /// set, otherwise defaults; then apply `$WSPR_LIVE_URL`.
    pub fn resolve(path: Option<&Path>) -> Result<Self, AnalysisError> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let config = match (path, env_path) {
            (Some(p), _) => Self::load(p)?,
            (None, Some(p)) => Self::load(p)?,
            (None, None) => Self::default(),
        };
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Replace `base_url` when an override is present and non-empty.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
