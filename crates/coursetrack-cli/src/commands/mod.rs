// Command handlers for the coursetrack CLI

pub mod completion;
pub mod course;
pub mod report;

pub use completion::{AggregateCommand, CompleteCommand, EnrolCommand, ShowCommand, StartCommand};
pub use course::{BulkStartCommand, ReaggregateCommand};
pub use report::ReportCommand;

use chrono::{DateTime, Utc};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command, returning its printable result
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value>;
}

/// Unix seconds from the command line
pub(crate) fn parse_time(secs: Option<i64>) -> CliResult<Option<DateTime<Utc>>> {
    secs.map(|s| {
        if s <= 0 {
            return Err(CliError::invalid_argument(format!(
                "time must be positive Unix seconds, got {}",
                s
            )));
        }
        DateTime::from_timestamp(s, 0)
            .ok_or_else(|| CliError::invalid_argument(format!("time out of range: {}", s)))
    })
    .transpose()
}
