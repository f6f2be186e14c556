// User completion report

use coursetrack_application::CompletionReportService;
use coursetrack_domain::value_objects::{CourseId, UserId};

use super::Command;
use crate::context::AppContext;
use crate::error::CliResult;

/// Completion report of one user
pub struct ReportCommand {
    user: i64,
    course: Option<i64>,
}

impl ReportCommand {
    pub fn new(user: i64, course: Option<i64>) -> Self {
        Self { user, course }
    }
}

#[async_trait::async_trait]
impl Command for ReportCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<serde_json::Value> {
        let report = CompletionReportService::new(ctx.ports())
            .user_report(UserId::new(self.user), self.course.map(CourseId::new))
            .await?;
        Ok(serde_json::to_value(report)?)
    }
}
