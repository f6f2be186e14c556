// Record-level commands: enrol, start, complete, aggregate, show

use coursetrack_application::{
    ApplicationError, CompletionService, EnrolmentService, UserEnrolled,
};
use coursetrack_domain::value_objects::{CompletionKey, CourseId, UserId};

use super::{parse_time, Command};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::router::RecordArgs;

fn ids(record: RecordArgs) -> (UserId, CourseId) {
    (UserId::new(record.user), CourseId::new(record.course))
}

/// Handle a user-enrolled event
pub struct EnrolCommand {
    record: RecordArgs,
    time: Option<i64>,
}

impl EnrolCommand {
    pub fn new(record: RecordArgs, time: Option<i64>) -> Self {
        Self { record, time }
    }
}

#[async_trait::async_trait]
impl Command for EnrolCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let (user_id, course_id) = ids(self.record);
        let event = UserEnrolled {
            user_id,
            course_id,
            time_start: parse_time(self.time)?,
        };
        let outcome = EnrolmentService::new(ctx.ports())
            .handle_user_enrolled(event)
            .await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Mark a user as in progress
pub struct StartCommand {
    record: RecordArgs,
    time: Option<i64>,
}

impl StartCommand {
    pub fn new(record: RecordArgs, time: Option<i64>) -> Self {
        Self { record, time }
    }
}

#[async_trait::async_trait]
impl Command for StartCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let (user_id, course_id) = ids(self.record);
        let outcome = CompletionService::new(ctx.ports())
            .mark_in_progress(user_id, course_id, parse_time(self.time)?)
            .await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Mark a course complete
pub struct CompleteCommand {
    record: RecordArgs,
    time: Option<i64>,
}

impl CompleteCommand {
    pub fn new(record: RecordArgs, time: Option<i64>) -> Self {
        Self { record, time }
    }
}

#[async_trait::async_trait]
impl Command for CompleteCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let (user_id, course_id) = ids(self.record);
        let outcome = CompletionService::new(ctx.ports())
            .mark_complete(user_id, course_id, parse_time(self.time)?)
            .await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Aggregate criteria into the course status
pub struct AggregateCommand {
    record: RecordArgs,
}

impl AggregateCommand {
    pub fn new(record: RecordArgs) -> Self {
        Self { record }
    }
}

#[async_trait::async_trait]
impl Command for AggregateCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let (user_id, course_id) = ids(self.record);
        let outcome = CompletionService::new(ctx.ports())
            .aggregate(user_id, course_id)
            .await?;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Show a stored record
pub struct ShowCommand {
    record: RecordArgs,
}

impl ShowCommand {
    pub fn new(record: RecordArgs) -> Self {
        Self { record }
    }
}

#[async_trait::async_trait]
impl Command for ShowCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let (user_id, course_id) = ids(self.record);
        let record = CompletionService::new(ctx.ports())
            .get(user_id, course_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::CompletionNotFound(CompletionKey::new(user_id, course_id).to_string())
            })?;
        Ok(serde_json::to_value(record)?)
    }
}
