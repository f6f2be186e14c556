//! Completion Application Service
//!
//! Owns the four record operations (`mark_enrolled`, `mark_in_progress`,
//! `mark_complete`, `aggregate`) and the persistence rules shared by them.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use coursetrack_domain::completion::{
    known_time, CompletionRecord, CourseCompletionSettings, CriteriaAggregator,
};
use coursetrack_domain::entities::earliest_current_start;
use coursetrack_domain::errors::DomainError;
use coursetrack_domain::value_objects::{CourseId, UserId};

use crate::cache::CourseSettingsCache;
use crate::dto::CompletionOutcome;
use crate::errors::{ApplicationError, ApplicationResult};
use crate::events::ApplicationEvent;
use crate::ports::CompletionPorts;

/// Completion Application Service
///
/// Request-scoped: the course settings cache lives as long as the service.
pub struct CompletionService {
    ports: CompletionPorts,
    settings: CourseSettingsCache,
}

impl CompletionService {
    /// Create a new CompletionService with injected dependencies
    pub fn new(ports: CompletionPorts) -> Self {
        Self {
            ports,
            settings: CourseSettingsCache::new(),
        }
    }

    pub fn ports(&self) -> &CompletionPorts {
        &self.ports
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.ports.clock.now()
    }

    /// `time` when it is a usable instant, otherwise now
    pub(crate) fn time_or_now(&self, time: Option<DateTime<Utc>>) -> DateTime<Utc> {
        known_time(time).unwrap_or_else(|| self.now())
    }

    /// Forget cached course settings
    pub fn clear_cache(&self) {
        self.settings.clear();
    }

    /// Completion settings of a course, cached for the life of the service
    ///
    /// `None` when the course is unknown to the criteria source.
    pub async fn settings(
        &self,
        course_id: CourseId,
    ) -> ApplicationResult<Option<CourseCompletionSettings>> {
        if let Some(settings) = self.settings.get(course_id) {
            return Ok(Some(settings));
        }

        debug!(course_id = %course_id, "loading completion settings");
        let settings = self.ports.criteria.completion_settings(course_id).await?;
        if let Some(settings) = settings {
            self.settings.insert(course_id, settings);
        }
        Ok(settings)
    }

    /// Stored record of a user in a course
    pub async fn get(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> ApplicationResult<Option<CompletionRecord>> {
        Ok(self.ports.repository.find(user_id, course_id).await?)
    }

    /// Stored record, or a fresh unsaved one
    pub(crate) async fn load_or_new(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> ApplicationResult<CompletionRecord> {
        Ok(self
            .ports
            .repository
            .find(user_id, course_id)
            .await?
            .unwrap_or_else(|| CompletionRecord::new(user_id, course_id)))
    }

    /// Mark the user as enrolled, then aggregate
    ///
    /// The enrolment time is only recorded when none is known. The record is
    /// stored even when the course does not track completion.
    pub async fn mark_enrolled(
        &self,
        user_id: UserId,
        course_id: CourseId,
        time: Option<DateTime<Utc>>,
    ) -> ApplicationResult<CompletionOutcome> {
        let mut record = self.load_or_new(user_id, course_id).await?;
        record.mark_enrolled(self.time_or_now(time));
        self.save_and_aggregate(record).await
    }

    /// Mark the user as in progress, then aggregate
    ///
    /// The start time is only recorded when none is known. The record is
    /// stored even when the course does not track completion.
    pub async fn mark_in_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        time: Option<DateTime<Utc>>,
    ) -> ApplicationResult<CompletionOutcome> {
        let mut record = self.load_or_new(user_id, course_id).await?;
        record.mark_in_progress(self.time_or_now(time));
        self.save_and_aggregate(record).await
    }

    /// Mark the course complete for the user
    ///
    /// A completed record is never touched again; the completion event is
    /// published only on the transition.
    pub async fn mark_complete(
        &self,
        user_id: UserId,
        course_id: CourseId,
        time: Option<DateTime<Utc>>,
    ) -> ApplicationResult<CompletionOutcome> {
        let record = self.load_or_new(user_id, course_id).await?;
        if record.is_complete() {
            debug!(key = %record.key(), "already complete");
            return Ok(CompletionOutcome::AlreadyComplete(record));
        }
        self.complete_record(record, time).await
    }

    /// Recompute the user's completion status from the course criteria
    pub async fn aggregate(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> ApplicationResult<CompletionOutcome> {
        let record = self.load_or_new(user_id, course_id).await?;
        self.aggregate_record(record).await
    }

    /// Flag an existing record for the next reaggregation sweep
    ///
    /// Returns `None` when the user has no record in the course.
    pub async fn flag_for_reaggregation(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> ApplicationResult<Option<CompletionRecord>> {
        let Some(mut record) = self.ports.repository.find(user_id, course_id).await? else {
            return Ok(None);
        };
        record.flag_for_reaggregation(self.now());
        Ok(Some(self.save(record).await?))
    }

    /// Settings of a course that tracks completion, `None` otherwise
    async fn tracking_settings(
        &self,
        course_id: CourseId,
    ) -> ApplicationResult<Option<CourseCompletionSettings>> {
        match self.settings(course_id).await? {
            Some(settings) if settings.enabled => Ok(Some(settings)),
            _ => {
                debug!(course_id = %course_id, "completion not enabled, skipping aggregation");
                Ok(None)
            }
        }
    }

    /// Persist a changed record, aggregating it when the course tracks
    /// completion
    pub(crate) async fn save_and_aggregate(
        &self,
        record: CompletionRecord,
    ) -> ApplicationResult<CompletionOutcome> {
        if record.is_complete() {
            let saved = self.save(record).await?;
            return Ok(CompletionOutcome::AlreadyComplete(saved));
        }
        match self.tracking_settings(record.course_id()).await? {
            Some(settings) => self.evaluate(record, settings).await,
            None => Ok(CompletionOutcome::Saved(self.save(record).await?)),
        }
    }

    /// Aggregate an in-memory record and persist the result
    ///
    /// Nothing is stored for a course that does not track completion.
    pub(crate) async fn aggregate_record(
        &self,
        record: CompletionRecord,
    ) -> ApplicationResult<CompletionOutcome> {
        // A completed record is never re-evaluated
        if record.is_complete() {
            let saved = self.save(record).await?;
            return Ok(CompletionOutcome::AlreadyComplete(saved));
        }
        match self.tracking_settings(record.course_id()).await? {
            Some(settings) => self.evaluate(record, settings).await,
            None => Ok(CompletionOutcome::NotApplicable),
        }
    }

    /// Fold the criteria of an incomplete record and persist the result
    async fn evaluate(
        &self,
        record: CompletionRecord,
        settings: CourseCompletionSettings,
    ) -> ApplicationResult<CompletionOutcome> {
        let course_id = record.course_id();
        let completions = self
            .ports
            .criteria
            .criterion_completions(record.user_id(), course_id)
            .await?;

        if completions.is_empty() {
            debug!(key = %record.key(), "no criteria defined");
            return Ok(CompletionOutcome::Saved(self.save(record).await?));
        }

        let result = CriteriaAggregator::evaluate(settings.aggregation_method, &completions);
        debug!(
            key = %record.key(),
            status = ?result.status,
            activity = ?result.activity,
            prerequisite = ?result.prerequisite,
            role = ?result.role,
            "criteria aggregated"
        );

        if result.is_complete() {
            self.complete_record(record, result.completed_at).await
        } else {
            Ok(CompletionOutcome::Saved(self.save(record).await?))
        }
    }

    /// Transition to complete at `time` (now when unusable), persist, then
    /// publish
    async fn complete_record(
        &self,
        mut record: CompletionRecord,
        time: Option<DateTime<Utc>>,
    ) -> ApplicationResult<CompletionOutcome> {
        let at = self.time_or_now(time);
        let Some(event) = record.mark_complete(at) else {
            return Ok(CompletionOutcome::AlreadyComplete(record));
        };

        let saved = self.save(record).await?;
        info!(key = %saved.key(), time_completed = %at, "course completed");
        let event = event.with_occurred_at(self.now());
        self.ports.events.publish(ApplicationEvent::from(event)).await;

        Ok(CompletionOutcome::Completed(saved))
    }

    /// Insert or update a record
    ///
    /// On first insert a missing enrolment time is taken from the earliest
    /// current enrolment window, falling back to now.
    pub(crate) async fn save(
        &self,
        mut record: CompletionRecord,
    ) -> ApplicationResult<CompletionRecord> {
        let result = if record.is_persisted() {
            self.ports.repository.update(&record).await
        } else {
            if record.time_enrolled().is_none() {
                let now = self.now();
                let windows = self
                    .ports
                    .enrolments
                    .user_enrolments(record.user_id(), record.course_id())
                    .await?;
                record.mark_enrolled(earliest_current_start(&windows, now).unwrap_or(now));
            }
            self.ports.repository.insert(&record).await
        };

        result.map_err(|err| {
            if let DomainError::ConcurrencyConflict { resource } = &err {
                warn!(resource = %resource, "completion record changed concurrently");
            }
            ApplicationError::from(err)
        })
    }
}
