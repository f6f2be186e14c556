//! Domain events
//!
//! Events are emitted by entity transitions and forwarded by the application
//! layer to its publisher.

pub mod completion;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata common to all domain events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Fresh event id, stamped with `occurred_at`
    pub fn new(occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at,
        }
    }
}

/// Common interface of domain events
///
/// `event_id` is unique per emitted event, so consumers can drop
/// redeliveries.
pub trait DomainEvent: std::fmt::Debug + Send + Sync {
    fn event_id(&self) -> Uuid;

    /// Identifier of the entity the event belongs to
    fn aggregate_id(&self) -> String;

    fn occurred_at(&self) -> DateTime<Utc>;

    fn event_type(&self) -> &str;
}
