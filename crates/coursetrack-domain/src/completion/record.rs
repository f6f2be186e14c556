//! Completion record entity
//!
//! One record per user/course pair. The record is plain data: persistence is
//! done through [`crate::repositories::CompletionRepository`].
//!
//! # Invariants
//! - `time_completed` never changes once set
//! - `time_started <= time_completed` when both are set
//! - `time_enrolled` and `time_started` are only ever set while unset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::completion::CourseCompleted;
use crate::value_objects::{CompletionId, CompletionKey, CourseId, UserId};

/// `time` unless it lies at or before the Unix epoch
///
/// Stored rows use `0` for "not set", so such instants cannot round-trip and
/// count as unknown everywhere.
pub fn known_time(time: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    time.filter(|t| t.timestamp() > 0)
}

/// Progress of one user in one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Surrogate key, `None` until first stored
    id: Option<CompletionId>,

    user_id: UserId,

    course_id: CourseId,

    time_enrolled: Option<DateTime<Utc>>,

    time_started: Option<DateTime<Utc>>,

    time_completed: Option<DateTime<Utc>>,

    /// Set when the record needs its status recomputed
    reaggregate: Option<DateTime<Utc>>,

    /// Concurrency version for optimistic locking
    version: u64,
}

impl CompletionRecord {
    /// Create an unsaved record for a user/course pair
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            id: None,
            user_id,
            course_id,
            time_enrolled: None,
            time_started: None,
            time_completed: None,
            reaggregate: None,
            version: 0,
        }
    }

    /// Reconstitute a record from persistence
    ///
    /// Bypasses the transition rules since the data was produced by them.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CompletionId,
        user_id: UserId,
        course_id: CourseId,
        time_enrolled: Option<DateTime<Utc>>,
        time_started: Option<DateTime<Utc>>,
        time_completed: Option<DateTime<Utc>>,
        reaggregate: Option<DateTime<Utc>>,
        version: u64,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            course_id,
            time_enrolled,
            time_started,
            time_completed,
            reaggregate,
            version,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> Option<CompletionId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn key(&self) -> CompletionKey {
        CompletionKey::new(self.user_id, self.course_id)
    }

    pub fn time_enrolled(&self) -> Option<DateTime<Utc>> {
        self.time_enrolled
    }

    pub fn time_started(&self) -> Option<DateTime<Utc>> {
        self.time_started
    }

    pub fn time_completed(&self) -> Option<DateTime<Utc>> {
        self.time_completed
    }

    pub fn reaggregate(&self) -> Option<DateTime<Utc>> {
        self.reaggregate
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the record has been stored before
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.time_completed.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.time_started.is_some()
    }

    /// Whether a reaggregation is due at `now`
    pub fn needs_reaggregation(&self, now: DateTime<Utc>) -> bool {
        matches!(self.reaggregate, Some(flag) if flag <= now)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Record the enrolment time if none is known yet
    ///
    /// Returns `true` when the field changed.
    pub fn mark_enrolled(&mut self, at: DateTime<Utc>) -> bool {
        if self.time_enrolled.is_some() {
            return false;
        }
        self.time_enrolled = Some(at);
        true
    }

    /// Record the start time if none is known yet
    ///
    /// Returns `true` when the field changed.
    pub fn mark_in_progress(&mut self, at: DateTime<Utc>) -> bool {
        if self.time_started.is_some() {
            return false;
        }
        let at = match self.time_completed {
            Some(completed) => at.min(completed),
            None => at,
        };
        self.time_started = Some(at);
        true
    }

    /// Complete the course at `at`
    ///
    /// Returns the completion event on the incomplete to complete transition
    /// and `None` when the record was already complete.
    pub fn mark_complete(&mut self, at: DateTime<Utc>) -> Option<CourseCompleted> {
        if self.time_completed.is_some() {
            return None;
        }

        self.time_started = Some(match self.time_started {
            Some(started) => started.min(at),
            None => at,
        });
        self.time_completed = Some(at);

        Some(CourseCompleted::new(self.user_id, self.course_id, at))
    }

    /// Flag the record for a later reaggregation
    pub fn flag_for_reaggregation(&mut self, at: DateTime<Utc>) {
        self.reaggregate = Some(at);
    }

    pub fn clear_reaggregation(&mut self) {
        self.reaggregate = None;
    }

    /// Identity and version assigned by a repository write
    pub fn stored_as(mut self, id: CompletionId, version: u64) -> Self {
        self.id = Some(id);
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn record() -> CompletionRecord {
        CompletionRecord::new(UserId::new(1), CourseId::new(2))
    }

    #[test]
    fn test_new_record_is_blank() {
        let r = record();
        assert!(!r.is_persisted());
        assert!(!r.is_complete());
        assert!(!r.is_started());
        assert_eq!(r.time_enrolled(), None);
        assert_eq!(r.reaggregate(), None);
        assert_eq!(r.version(), 0);
    }

    #[test]
    fn test_known_time_drops_epoch_and_earlier() {
        assert_eq!(known_time(Some(at(1))), Some(at(1)));
        assert_eq!(known_time(Some(at(0))), None);
        assert_eq!(known_time(Some(at(-5))), None);
        assert_eq!(known_time(None), None);
    }

    #[test]
    fn test_mark_enrolled_only_once() {
        let mut r = record();
        assert!(r.mark_enrolled(at(100)));
        assert!(!r.mark_enrolled(at(50)));
        assert_eq!(r.time_enrolled(), Some(at(100)));
    }

    #[test]
    fn test_mark_in_progress_only_once() {
        let mut r = record();
        assert!(r.mark_in_progress(at(100)));
        assert!(!r.mark_in_progress(at(200)));
        assert_eq!(r.time_started(), Some(at(100)));
    }

    #[test]
    fn test_mark_complete_sets_started_and_emits_event() {
        let mut r = record();
        let event = r.mark_complete(at(1000)).expect("first completion emits");
        assert_eq!(event.time_completed, at(1000));
        assert_eq!(event.user_id, UserId::new(1));
        assert_eq!(r.time_started(), Some(at(1000)));
        assert_eq!(r.time_completed(), Some(at(1000)));
    }

    #[test]
    fn test_mark_complete_is_idempotent() {
        let mut r = record();
        r.mark_complete(at(1000));
        assert!(r.mark_complete(at(2000)).is_none());
        assert_eq!(r.time_completed(), Some(at(1000)));
    }

    #[test]
    fn test_started_never_after_completed() {
        let mut r = record();
        r.mark_in_progress(at(900));
        r.mark_complete(at(500));
        assert_eq!(r.time_started(), Some(at(500)));
        assert!(r.time_started() <= r.time_completed());
    }

    #[test]
    fn test_in_progress_after_complete_is_clamped() {
        let mut r = CompletionRecord::reconstitute(
            CompletionId::new(1),
            UserId::new(1),
            CourseId::new(2),
            Some(at(10)),
            None,
            Some(at(300)),
            None,
            1,
        );
        r.mark_in_progress(at(400));
        assert_eq!(r.time_started(), Some(at(300)));
    }

    #[test]
    fn test_reaggregation_flag() {
        let mut r = record();
        assert!(!r.needs_reaggregation(at(100)));
        r.flag_for_reaggregation(at(50));
        assert!(r.needs_reaggregation(at(100)));
        assert!(!r.needs_reaggregation(at(10)));
        r.clear_reaggregation();
        assert!(!r.needs_reaggregation(at(100)));
    }

    #[test]
    fn test_stored_as_assigns_identity() {
        let r = record().stored_as(CompletionId::new(9), 3);
        assert_eq!(r.id(), Some(CompletionId::new(9)));
        assert_eq!(r.version(), 3);
        assert!(r.is_persisted());
    }
}
