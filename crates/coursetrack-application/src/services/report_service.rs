//! Completion Report Application Service
//!
//! Read-only: builds the per-user completion status report from stored
//! records and criterion completions.

use tracing::debug;

use coursetrack_domain::completion::{CompletionRecord, CriterionCompletion, CriterionType};
use coursetrack_domain::entities::Course;
use coursetrack_domain::value_objects::{CourseId, UserId};

use crate::dto::{CourseReport, CourseStatus, ReportRow, UserCompletionReport};
use crate::errors::{ApplicationError, ApplicationResult};
use crate::ports::CompletionPorts;
use crate::services::CompletionService;

/// Completion Report Application Service
pub struct CompletionReportService {
    completion: CompletionService,
}

impl CompletionReportService {
    pub fn new(ports: CompletionPorts) -> Self {
        Self {
            completion: CompletionService::new(ports),
        }
    }

    pub fn with_completion(completion: CompletionService) -> Self {
        Self { completion }
    }

    /// Completion status of a user in one course, or in every course the
    /// user is enrolled in
    pub async fn user_report(
        &self,
        user_id: UserId,
        course_id: Option<CourseId>,
    ) -> ApplicationResult<UserCompletionReport> {
        let ports = self.completion.ports();
        let user = ports
            .catalog
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApplicationError::UserNotFound(user_id.to_string()))?;

        let courses = match course_id {
            Some(course_id) => vec![ports
                .catalog
                .find_course(course_id)
                .await?
                .ok_or_else(|| ApplicationError::CourseNotFound(course_id.to_string()))?],
            None => ports.catalog.enrolled_courses(user_id).await?,
        };

        let mut report = UserCompletionReport::new(user.id, user.username);
        for course in courses {
            if !self.is_tracked(user_id, course.id).await? {
                debug!(user_id = %user_id, course_id = %course.id, "no live enrolment");
                continue;
            }
            if let Some(course_report) = self.course_report(user_id, course).await? {
                report.push(course_report);
            }
        }

        debug!(user_id = %user_id, courses = report.course_count(), "report built");
        Ok(report)
    }

    /// Whether the user actively participates in the course
    ///
    /// Suspended enrolments, disabled enrolment methods and ended windows do
    /// not count.
    async fn is_tracked(&self, user_id: UserId, course_id: CourseId) -> ApplicationResult<bool> {
        let now = self.completion.now();
        Ok(self
            .completion
            .ports()
            .enrolments
            .user_enrolments(user_id, course_id)
            .await?
            .iter()
            .any(|w| w.is_live(now)))
    }

    /// `None` when completion tracking is off for the course
    async fn course_report(
        &self,
        user_id: UserId,
        course: Course,
    ) -> ApplicationResult<Option<CourseReport>> {
        match self.completion.settings(course.id).await? {
            Some(settings) if settings.enabled => {}
            _ => return Ok(None),
        }

        let ports = self.completion.ports();
        let record = ports.repository.find(user_id, course.id).await?;
        let criteria = ports
            .criteria
            .criterion_completions(user_id, course.id)
            .await?;

        Ok(Some(CourseReport {
            course_id: course.id,
            course_name: course.full_name,
            status: course_status(record.as_ref(), &criteria),
            rows: report_rows(&criteria),
            time_completed: record.and_then(|r| r.time_completed()),
        }))
    }
}

fn course_status(record: Option<&CompletionRecord>, criteria: &[CriterionCompletion]) -> CourseStatus {
    if record.is_some_and(|r| r.is_complete()) {
        return CourseStatus::Complete;
    }
    let started = record.is_some_and(|r| r.is_started());
    if !started && !criteria.iter().any(CriterionCompletion::is_complete) {
        CourseStatus::NotYetStarted
    } else {
        CourseStatus::InProgress
    }
}

/// Prerequisite summary first, single criteria next, activity summary last
fn report_rows(criteria: &[CriterionCompletion]) -> Vec<ReportRow> {
    let count = |kind: CriterionType| {
        let group: Vec<_> = criteria.iter().filter(|c| c.criterion_type == kind).collect();
        let done = group.iter().filter(|c| c.is_complete()).count();
        (done, group.len())
    };

    let mut rows = Vec::new();

    let (done, total) = count(CriterionType::CoursePrerequisite);
    if total > 0 {
        rows.push(ReportRow::summary("Prerequisites completed", done, total));
    }

    rows.extend(
        criteria
            .iter()
            .filter(|c| {
                !matches!(
                    c.criterion_type,
                    CriterionType::Activity | CriterionType::CoursePrerequisite
                )
            })
            .map(|c| ReportRow::single(c.title.clone(), c.is_complete())),
    );

    let (done, total) = count(CriterionType::Activity);
    if total > 0 {
        rows.push(ReportRow::summary("Activities completed", done, total));
    }

    rows
}
