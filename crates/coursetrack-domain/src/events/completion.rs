//! Completion record domain events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DomainEvent, EventMetadata};
use crate::value_objects::{CompletionKey, CourseId, UserId};

/// Event emitted when a user completes a course
///
/// Emitted once, on the transition from incomplete to complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseCompleted {
    pub metadata: EventMetadata,

    pub user_id: UserId,

    pub course_id: CourseId,

    /// Completion time recorded on the record
    pub time_completed: DateTime<Utc>,
}

impl CourseCompleted {
    /// Event stamped as occurring at the completion time
    pub fn new(user_id: UserId, course_id: CourseId, time_completed: DateTime<Utc>) -> Self {
        Self {
            metadata: EventMetadata::new(time_completed),
            user_id,
            course_id,
            time_completed,
        }
    }

    /// Restamp the event with the moment it was emitted
    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.metadata.occurred_at = occurred_at;
        self
    }
}

impl DomainEvent for CourseCompleted {
    fn event_id(&self) -> Uuid {
        self.metadata.event_id
    }

    fn aggregate_id(&self) -> String {
        CompletionKey::new(self.user_id, self.course_id).to_string()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata.occurred_at
    }

    fn event_type(&self) -> &str {
        "CourseCompleted"
    }
}
