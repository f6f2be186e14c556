//! Core configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log levels accepted by `log_level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Maximum level of log output
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Snapshot file used when `--data` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Reject updates of records that changed since they were read
    #[serde(default = "default_optimistic_locking")]
    pub optimistic_locking: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_optimistic_locking() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_file: None,
            optimistic_locking: default_optimistic_locking(),
        }
    }
}

/// Configuration manager trait
pub trait ConfigManager {
    /// Load configuration
    fn load_config(&mut self) -> Result<AppConfig, crate::error::ConfigError>;
    /// Save configuration
    fn save_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
    /// Validate configuration
    fn validate_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
}
