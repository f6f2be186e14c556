//! Reaggregation Application Service
//!
//! Records are flagged when a course's criteria or a user's criterion
//! completions change. A sweep later recomputes every flagged record.

use tracing::{debug, info};

use coursetrack_domain::value_objects::CourseId;

use crate::dto::ReaggregationSummary;
use crate::errors::ApplicationResult;
use crate::ports::CompletionPorts;
use crate::services::CompletionService;

/// Reaggregation Application Service
pub struct ReaggregationService {
    completion: CompletionService,
}

impl ReaggregationService {
    pub fn new(ports: CompletionPorts) -> Self {
        Self {
            completion: CompletionService::new(ports),
        }
    }

    pub fn with_completion(completion: CompletionService) -> Self {
        Self { completion }
    }

    /// Flag every record of a course for reaggregation
    ///
    /// Completed records are skipped since they are never re-evaluated.
    /// Returns the number of records flagged.
    pub async fn flag_course(&self, course_id: CourseId) -> ApplicationResult<usize> {
        let now = self.completion.now();
        let records = self
            .completion
            .ports()
            .repository
            .find_by_course(course_id)
            .await?;

        let mut flagged = 0;
        for mut record in records.into_iter().filter(|r| !r.is_complete()) {
            record.flag_for_reaggregation(now);
            self.completion.save(record).await?;
            flagged += 1;
        }

        info!(course_id = %course_id, flagged, "course flagged for reaggregation");
        Ok(flagged)
    }

    /// Aggregate every record of the course whose flag is due, then clear it
    pub async fn run_pending(&self, course_id: CourseId) -> ApplicationResult<ReaggregationSummary> {
        let mut summary = ReaggregationSummary::default();

        match self.completion.settings(course_id).await? {
            Some(settings) if settings.enabled => {}
            _ => {
                debug!(course_id = %course_id, "completion not enabled, no sweep");
                return Ok(summary);
            }
        }

        let now = self.completion.now();
        let records = self
            .completion
            .ports()
            .repository
            .find_by_course(course_id)
            .await?;

        for mut record in records.into_iter().filter(|r| r.needs_reaggregation(now)) {
            record.clear_reaggregation();
            let outcome = self.completion.aggregate_record(record).await?;
            summary.processed += 1;
            if outcome.just_completed() {
                summary.completed += 1;
            }
        }

        info!(
            course_id = %course_id,
            processed = summary.processed,
            completed = summary.completed,
            "reaggregation sweep finished"
        );
        Ok(summary)
    }
}
