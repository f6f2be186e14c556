//! Application layer events
//!
//! Application events represent use-case-level facts that are significant
//! to external consumers (notifications, audit logs, webhooks).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursetrack_domain::events::completion::CourseCompleted;
use coursetrack_domain::events::DomainEvent;
use coursetrack_domain::value_objects::{CourseId, UserId};

/// Application-level event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationEvent {
    /// A user completed a course; published at most once per completion
    CourseCompleted {
        /// Id of the originating domain event, stable across redeliveries
        event_id: Uuid,
        user_id: UserId,
        course_id: CourseId,
        time_completed: DateTime<Utc>,
        occurred_at: DateTime<Utc>,
    },

    /// Completion records were seeded for a course's participants
    UsersStarted {
        course_id: CourseId,
        created: usize,
        timestamp: DateTime<Utc>,
    },
}

impl ApplicationEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ApplicationEvent::CourseCompleted { .. } => "CourseCompleted",
            ApplicationEvent::UsersStarted { .. } => "UsersStarted",
        }
    }

    /// Get the event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ApplicationEvent::CourseCompleted { occurred_at, .. } => *occurred_at,
            ApplicationEvent::UsersStarted { timestamp, .. } => *timestamp,
        }
    }
}

impl From<CourseCompleted> for ApplicationEvent {
    fn from(event: CourseCompleted) -> Self {
        ApplicationEvent::CourseCompleted {
            event_id: event.event_id(),
            user_id: event.user_id,
            course_id: event.course_id,
            time_completed: event.time_completed,
            occurred_at: event.occurred_at(),
        }
    }
}

/// Event publisher port
///
/// Fire-and-forget: publishing never fails the use case that emitted the
/// event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an application event
    async fn publish(&self, event: ApplicationEvent);
}

/// No-op event publisher
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ApplicationEvent) {}
}

/// Publisher that writes every event to the log
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: ApplicationEvent) {
        match &event {
            ApplicationEvent::CourseCompleted {
                event_id,
                user_id,
                course_id,
                time_completed,
                ..
            } => tracing::info!(
                event_id = %event_id,
                user_id = %user_id,
                course_id = %course_id,
                time_completed = %time_completed,
                "course completed"
            ),
            ApplicationEvent::UsersStarted {
                course_id, created, ..
            } => tracing::info!(course_id = %course_id, created, "users started"),
        }
    }
}

/// In-memory event collector for testing
#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<ApplicationEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<ApplicationEvent> {
        self.events.lock().clone()
    }

    /// Number of collected events of the given type
    pub fn count(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    /// Clear collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ApplicationEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_event_from_domain_event() {
        let domain =
            CourseCompleted::new(UserId::new(1), CourseId::new(2), at(1000)).with_occurred_at(at(1500));
        let event_id = domain.event_id();
        let event = ApplicationEvent::from(domain);

        assert_eq!(event.event_type(), "CourseCompleted");
        assert_eq!(event.timestamp(), at(1500));
        let ApplicationEvent::CourseCompleted {
            event_id: carried,
            time_completed,
            ..
        } = event
        else {
            panic!("expected a completion event");
        };
        assert_eq!(carried, event_id);
        assert_eq!(time_completed, at(1000));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ApplicationEvent::UsersStarted {
            course_id: CourseId::new(5),
            created: 3,
            timestamp: at(10),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UsersStarted");
        assert_eq!(json["created"], 3);
    }

    #[tokio::test]
    async fn test_in_memory_publisher() {
        let publisher = InMemoryEventPublisher::new();

        publisher
            .publish(ApplicationEvent::from(CourseCompleted::new(
                UserId::new(1),
                CourseId::new(2),
                at(5),
            )))
            .await;

        assert_eq!(publisher.events().len(), 1);
        assert_eq!(publisher.count("CourseCompleted"), 1);
        publisher.clear();
        assert!(publisher.events().is_empty());
    }
}
