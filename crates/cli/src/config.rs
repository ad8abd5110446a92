// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `config.toml` inside the config directory
//! (`RAGQ_CONFIG_DIR`, or `ragq/` under the platform config directory) and
//! includes:
//! - `api_url`: base URL of the document repository
//! - `timeout_secs`: per-request HTTP timeout
//! - `data_dir`: where the upload queue database lives
//! - `[queue]`: retry and retention settings for the upload queue
//!
//! A missing file means all defaults. `RAGQ_API_URL` and `RAGQ_DATA_DIR`
//! override the file at runtime without being written back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ragq_core::{ProcessorConfig, Retention};

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "ragq";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_DB_NAME: &str = "queue.db";
const QUEUE_LOCK_NAME: &str = "queue.lock";

/// Keys accepted by `ragq config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "api_url",
    "timeout_secs",
    "data_dir",
    "queue.max_retries",
    "queue.base_delay_ms",
    "queue.completed_ttl_secs",
    "queue.stale_ttl_secs",
];

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the repository API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// HTTP request timeout in seconds (default: 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory holding the queue database. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Upload queue tuning.
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Retry and retention settings for the upload queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Attempts per upload before it is failed for good (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit after a failed attempt, in milliseconds (default: 1000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Completed uploads older than this are swept, in seconds (default: 1 hour).
    #[serde(default = "default_completed_ttl_secs")]
    pub completed_ttl_secs: u64,
    /// Uploads of any status older than this are swept, in seconds (default: 1 day).
    #[serde(default = "default_stale_ttl_secs")]
    pub stale_ttl_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_completed_ttl_secs() -> u64 {
    60 * 60
}

fn default_stale_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            completed_ttl_secs: default_completed_ttl_secs(),
            stale_ttl_secs: default_stale_ttl_secs(),
        }
    }
}

impl QueueConfig {
    /// Retry policy for the queue processor.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }

    /// Age limits for the cleanup sweep.
    pub fn retention(&self) -> Retention {
        Retention {
            completed_ttl: Duration::from_secs(self.completed_ttl_secs),
            stale_ttl: Duration::from_secs(self.stale_ttl_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            data_dir: None,
            queue: QueueConfig::default(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

impl Config {
    /// Loads configuration from the given config directory.
    ///
    /// A missing `config.toml` yields the defaults.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given config directory, creating it if needed.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Applies `RAGQ_API_URL` and `RAGQ_DATA_DIR` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env::api_url() {
            self.api_url = url;
        }
        if let Some(dir) = env::data_dir() {
            self.data_dir = Some(dir);
        }
        self
    }

    /// Sets a value by dotted key, validating it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                let url = value.trim().trim_end_matches('/');
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(Error::InvalidConfigValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "must start with http:// or https://".to_string(),
                    });
                }
                self.api_url = url.to_string();
            }
            "timeout_secs" => self.timeout_secs = parse_number(key, value)?,
            "data_dir" => {
                self.data_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "queue.max_retries" => self.queue.max_retries = parse_number(key, value)?,
            "queue.base_delay_ms" => self.queue.base_delay_ms = parse_number(key, value)?,
            "queue.completed_ttl_secs" => {
                self.queue.completed_ttl_secs = parse_number(key, value)?
            }
            "queue.stale_ttl_secs" => self.queue.stale_ttl_secs = parse_number(key, value)?,
            _ => return Err(Error::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory holding the queue database and its lock file.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("could not determine data directory".to_string()))
    }

    /// Path of the upload queue database.
    pub fn queue_db_path(&self) -> Result<PathBuf> {
        Ok(self.resolved_data_dir()?.join(QUEUE_DB_NAME))
    }

    /// Path of the advisory lock held while a processing pass runs.
    pub fn queue_lock_path(&self) -> Result<PathBuf> {
        Ok(self.resolved_data_dir()?.join(QUEUE_LOCK_NAME))
    }
}

/// Find the config directory: `RAGQ_CONFIG_DIR`, else `<platform config>/ragq`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::config_dir() {
        return Ok(dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
