// CLI error types

use thiserror::Error;

use coursetrack_application::ApplicationError;
use coursetrack_config::ConfigError;
use coursetrack_persistence::PersistenceError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'coursetrack --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => format!(
                "Configuration error: {}\n\nCheck the config file or COURSETRACK_* variables.",
                msg
            ),
            CliError::Storage(msg) => format!(
                "Storage error: {}\n\nCheck the file passed with --data.",
                msg
            ),
            CliError::Application(ApplicationError::ConcurrencyConflict(key)) => format!(
                "The completion record of {} changed while it was being updated. Run the command again.",
                key
            ),
            CliError::Application(err) => err.to_string(),
            CliError::Internal(msg) => format!("Internal error: {}\n\nPlease report this issue.", msg),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        CliError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Internal(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
