//! Shared fixtures for the coursetrack integration tests
//!
//! Builds an in-memory store and wires it into the application ports with a
//! fixed clock and a collecting event publisher.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use coursetrack_application::events::InMemoryEventPublisher;
use coursetrack_application::CompletionPorts;
use coursetrack_domain::completion::{AggregationMethod, CourseCompletionSettings, CriterionType};
use coursetrack_domain::entities::{Course, EnrolmentWindow, User};
use coursetrack_domain::ports::FixedClock;
use coursetrack_domain::value_objects::{CourseId, CriterionId, UserId};
use coursetrack_persistence::memory::CriterionDefinition;
use coursetrack_persistence::InMemoryStore;

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Store plus the test doubles wired around it
pub struct Fixture {
    pub store: InMemoryStore,
    pub events: Arc<InMemoryEventPublisher>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    /// Empty store with the clock at `now` (Unix seconds)
    pub fn new(now: i64) -> Self {
        Self::with_store(InMemoryStore::new(), now)
    }

    pub fn with_store(store: InMemoryStore, now: i64) -> Self {
        Self {
            store,
            events: Arc::new(InMemoryEventPublisher::new()),
            clock: Arc::new(FixedClock::at_secs(now)),
        }
    }

    pub fn ports(&self) -> CompletionPorts {
        CompletionPorts {
            repository: self.store.completions.clone(),
            enrolments: self.store.enrolments.clone(),
            criteria: self.store.criteria.clone(),
            catalog: self.store.catalog.clone(),
            events: self.events.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Course with completion enabled under `method`
    pub fn course(&self, id: i64, method: AggregationMethod) -> CourseId {
        self.course_with(id, CourseCompletionSettings::enabled(method))
    }

    pub fn course_with(&self, id: i64, settings: CourseCompletionSettings) -> CourseId {
        let course_id = CourseId::new(id);
        self.store
            .catalog
            .add_course(Course::new(course_id, format!("C{}", id), format!("Course {}", id)));
        self.store.criteria.set_settings(course_id, settings);
        course_id
    }

    pub fn user(&self, id: i64) -> UserId {
        let user_id = UserId::new(id);
        self.store
            .catalog
            .add_user(User::new(user_id, format!("user{}", id)));
        user_id
    }

    /// Active enrolment starting at `start`
    pub fn enrol(&self, user_id: UserId, course_id: CourseId, start: i64) {
        self.store
            .enrolments
            .add(EnrolmentWindow::active(user_id, course_id).starting(at(start)));
    }

    pub fn criterion(
        &self,
        course_id: CourseId,
        id: i64,
        criterion_type: CriterionType,
        title: &str,
    ) -> CriterionId {
        let criterion_id = CriterionId::new(id);
        self.store.criteria.add_criterion(CriterionDefinition {
            criterion_id,
            course_id,
            criterion_type,
            title: title.to_string(),
        });
        criterion_id
    }
}
