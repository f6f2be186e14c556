//! coursetrack Configuration Management
//!
//! Loads the application configuration from an optional TOML file and
//! `COURSETRACK_*` environment variables, validates it and writes it back.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{AppConfig, ConfigManager as ConfigManagerTrait};
