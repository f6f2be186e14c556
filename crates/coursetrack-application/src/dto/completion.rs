//! Completion and enrolment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursetrack_domain::completion::CompletionRecord;
use coursetrack_domain::value_objects::{CourseId, UserId};

/// Result of a completion record operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// Record stored; the course is not complete
    Saved(CompletionRecord),
    /// Record transitioned to complete and was stored
    Completed(CompletionRecord),
    /// Record was complete before the call; completion time untouched
    AlreadyComplete(CompletionRecord),
    /// Completion tracking is disabled or unknown for the course
    NotApplicable,
}

impl CompletionOutcome {
    pub fn record(&self) -> Option<&CompletionRecord> {
        match self {
            CompletionOutcome::Saved(r)
            | CompletionOutcome::Completed(r)
            | CompletionOutcome::AlreadyComplete(r) => Some(r),
            CompletionOutcome::NotApplicable => None,
        }
    }

    pub fn into_record(self) -> Option<CompletionRecord> {
        match self {
            CompletionOutcome::Saved(r)
            | CompletionOutcome::Completed(r)
            | CompletionOutcome::AlreadyComplete(r) => Some(r),
            CompletionOutcome::NotApplicable => None,
        }
    }

    /// Whether this call completed the course
    pub fn just_completed(&self) -> bool {
        matches!(self, CompletionOutcome::Completed(_))
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, CompletionOutcome::NotApplicable)
    }
}

/// A user was enrolled in a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnrolled {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Start of the new enrolment, if it has one
    #[serde(default)]
    pub time_start: Option<DateTime<Utc>>,
}

/// Why an enrolment event did not start completion tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    UnknownCourse,
    UnknownUser,
    CompletionDisabled,
    StartOnEnrolDisabled,
}

/// Result of handling an enrolment event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum EnrolmentOutcome {
    Started(CompletionOutcome),
    Ignored(IgnoreReason),
}

/// Result of seeding completion records for a whole course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkStartSummary {
    /// Records created by this run
    pub created: usize,
    /// Live participants that already had a record
    pub skipped: usize,
}

/// Result of a pending-reaggregation sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReaggregationSummary {
    /// Flagged records that were re-evaluated
    pub processed: usize,
    /// Of those, records completed by the sweep
    pub completed: usize,
}
