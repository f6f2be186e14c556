// Course-level commands: bulk-start, reaggregate

use serde_json::json;

use coursetrack_application::{CompletionService, EnrolmentService, ReaggregationService};
use coursetrack_domain::value_objects::CourseId;

use super::Command;
use crate::context::AppContext;
use crate::error::CliResult;

/// Create records for every live participant of a course
pub struct BulkStartCommand {
    course: i64,
}

impl BulkStartCommand {
    pub fn new(course: i64) -> Self {
        Self { course }
    }
}

#[async_trait::async_trait]
impl Command for BulkStartCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let summary = EnrolmentService::new(ctx.ports())
            .start_users_bulk(CourseId::new(self.course))
            .await?;
        Ok(serde_json::to_value(summary)?)
    }
}

/// Sweep flagged records of a course
pub struct ReaggregateCommand {
    course: i64,
    flag_all: bool,
}

impl ReaggregateCommand {
    pub fn new(course: i64) -> Self {
        Self {
            course,
            flag_all: false,
        }
    }

    /// Flag every incomplete record before sweeping
    pub fn with_flag_all(mut self, flag_all: bool) -> Self {
        self.flag_all = flag_all;
        self
    }
}

#[async_trait::async_trait]
impl Command for ReaggregateCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let course_id = CourseId::new(self.course);
        let service =
            ReaggregationService::with_completion(CompletionService::new(ctx.ports()));

        let flagged = if self.flag_all {
            service.flag_course(course_id).await?
        } else {
            0
        };
        let summary = service.run_pending(course_id).await?;

        Ok(json!({
            "flagged": flagged,
            "processed": summary.processed,
            "completed": summary.completed,
        }))
    }
}
