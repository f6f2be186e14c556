//! Mock ports shared by the service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use coursetrack_domain::completion::{
    AggregationMethod, CompletionRecord, CourseCompletionSettings, CriterionCompletion,
    CriterionType,
};
use coursetrack_domain::entities::{Course, EnrolmentWindow, User};
use coursetrack_domain::errors::{DomainError, DomainResult};
use coursetrack_domain::ports::{CourseCatalog, CriteriaSource, EnrolmentSource, FixedClock};
use coursetrack_domain::repositories::CompletionRepository;
use coursetrack_domain::value_objects::{CompletionId, CourseId, CriterionId, UserId};

use crate::events::InMemoryEventPublisher;
use crate::ports::CompletionPorts;
use crate::services::CompletionService;

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn uid(raw: i64) -> UserId {
    UserId::new(raw)
}

pub fn cid(raw: i64) -> CourseId {
    CourseId::new(raw)
}

// ============================================================================
// Mock Implementations
// ============================================================================

/// In-memory completion repository with version checks
#[derive(Default)]
pub struct MockCompletionRepository {
    records: RwLock<HashMap<(UserId, CourseId), CompletionRecord>>,
    next_id: AtomicUsize,
}

impl MockCompletionRepository {
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Store a record as-is, bypassing the service
    pub fn seed(&self, record: CompletionRecord) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let version = record.version().max(1);
        let stored = record.stored_as(CompletionId::new(id), version);
        self.records
            .write()
            .unwrap()
            .insert((stored.user_id(), stored.course_id()), stored);
    }
}

#[async_trait]
impl CompletionRepository for MockCompletionRepository {
    async fn find(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Option<CompletionRecord>> {
        Ok(self.records.read().unwrap().get(&(user_id, course_id)).cloned())
    }

    async fn find_by_course(&self, course_id: CourseId) -> DomainResult<Vec<CompletionRecord>> {
        let mut found: Vec<_> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.course_id() == course_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.user_id());
        Ok(found)
    }

    async fn insert(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord> {
        let mut records = self.records.write().unwrap();
        let key = (record.user_id(), record.course_id());
        if records.contains_key(&key) {
            return Err(DomainError::DuplicateEntity {
                entity_type: "CompletionRecord".into(),
                key: record.key().to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let stored = record.clone().stored_as(CompletionId::new(id), 1);
        records.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord> {
        let mut records = self.records.write().unwrap();
        let key = (record.user_id(), record.course_id());
        let current = records
            .get(&key)
            .ok_or_else(|| DomainError::not_found("CompletionRecord", record.key()))?;
        if current.version() != record.version() {
            return Err(DomainError::ConcurrencyConflict {
                resource: record.key().to_string(),
            });
        }
        let id = current.id().unwrap_or(CompletionId::new(0));
        let stored = record.clone().stored_as(id, record.version() + 1);
        records.insert(key, stored.clone());
        Ok(stored)
    }
}

/// Enrolment windows keyed by course
#[derive(Default)]
pub struct MockEnrolmentSource {
    windows: RwLock<Vec<EnrolmentWindow>>,
}

#[async_trait]
impl EnrolmentSource for MockEnrolmentSource {
    async fn user_enrolments(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<EnrolmentWindow>> {
        Ok(self
            .windows
            .read()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == user_id && w.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn course_enrolments(&self, course_id: CourseId) -> DomainResult<Vec<EnrolmentWindow>> {
        Ok(self
            .windows
            .read()
            .unwrap()
            .iter()
            .filter(|w| w.course_id == course_id)
            .cloned()
            .collect())
    }
}

/// Course settings and criterion completions; counts settings lookups
#[derive(Default)]
pub struct MockCriteriaSource {
    settings: RwLock<HashMap<CourseId, CourseCompletionSettings>>,
    completions: RwLock<HashMap<(UserId, CourseId), Vec<CriterionCompletion>>>,
    lookups: AtomicUsize,
}

impl MockCriteriaSource {
    pub fn settings_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CriteriaSource for MockCriteriaSource {
    async fn completion_settings(
        &self,
        course_id: CourseId,
    ) -> DomainResult<Option<CourseCompletionSettings>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.settings.read().unwrap().get(&course_id).copied())
    }

    async fn criterion_completions(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<CriterionCompletion>> {
        Ok(self
            .completions
            .read()
            .unwrap()
            .get(&(user_id, course_id))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MockCatalog {
    courses: RwLock<Vec<Course>>,
    users: RwLock<Vec<User>>,
    enrolments: Arc<MockEnrolmentSource>,
}

#[async_trait]
impl CourseCatalog for MockCatalog {
    async fn find_course(&self, course_id: CourseId) -> DomainResult<Option<Course>> {
        Ok(self
            .courses
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == course_id)
            .cloned())
    }

    async fn find_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn enrolled_courses(&self, user_id: UserId) -> DomainResult<Vec<Course>> {
        let windows = self.enrolments.windows.read().unwrap();
        Ok(self
            .courses
            .read()
            .unwrap()
            .iter()
            .filter(|c| windows.iter().any(|w| w.user_id == user_id && w.course_id == c.id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Wires the mocks into a port bundle and offers fixture helpers
pub struct Harness {
    pub repository: Arc<MockCompletionRepository>,
    pub enrolments: Arc<MockEnrolmentSource>,
    pub criteria: Arc<MockCriteriaSource>,
    pub catalog: Arc<MockCatalog>,
    pub events: Arc<InMemoryEventPublisher>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new(now: i64) -> Self {
        let enrolments = Arc::new(MockEnrolmentSource::default());
        let catalog = Arc::new(MockCatalog {
            enrolments: enrolments.clone(),
            ..Default::default()
        });
        Self {
            repository: Arc::new(MockCompletionRepository::default()),
            enrolments,
            criteria: Arc::new(MockCriteriaSource::default()),
            catalog,
            events: Arc::new(InMemoryEventPublisher::new()),
            clock: Arc::new(FixedClock::at_secs(now)),
        }
    }

    pub fn ports(&self) -> CompletionPorts {
        CompletionPorts {
            repository: self.repository.clone(),
            enrolments: self.enrolments.clone(),
            criteria: self.criteria.clone(),
            catalog: self.catalog.clone(),
            events: self.events.clone(),
            clock: self.clock.clone(),
        }
    }

    pub fn service(&self) -> CompletionService {
        CompletionService::new(self.ports())
    }

    pub fn settings(&self, course: i64, settings: CourseCompletionSettings) {
        self.criteria
            .settings
            .write()
            .unwrap()
            .insert(cid(course), settings);
        let mut courses = self.catalog.courses.write().unwrap();
        if !courses.iter().any(|c| c.id == cid(course)) {
            courses.push(Course::new(
                cid(course),
                format!("C{}", course),
                format!("Course {}", course),
            ));
        }
    }

    /// Course with completion enabled
    pub fn course(&self, course: i64, method: AggregationMethod) {
        self.settings(course, CourseCompletionSettings::enabled(method));
    }

    pub fn disabled_course(&self, course: i64) {
        self.settings(course, CourseCompletionSettings::disabled());
    }

    pub fn user(&self, user: i64, username: &str) {
        self.catalog
            .users
            .write()
            .unwrap()
            .push(User::new(uid(user), username));
    }

    pub fn window(&self, window: EnrolmentWindow) {
        self.enrolments.windows.write().unwrap().push(window);
    }

    /// Active enrolment starting at `start`
    pub fn enrol(&self, user: i64, course: i64, start: i64) {
        self.window(EnrolmentWindow::active(uid(user), cid(course)).starting(at(start)));
    }

    pub fn criterion(
        &self,
        user: i64,
        course: i64,
        criterion: i64,
        criterion_type: CriterionType,
        method: AggregationMethod,
        completed: Option<i64>,
    ) {
        let mut c = CriterionCompletion::new(CriterionId::new(criterion), criterion_type, method)
            .with_title(format!("Criterion {}", criterion));
        if let Some(secs) = completed {
            c = c.with_completed_at(at(secs));
        }
        self.criteria
            .completions
            .write()
            .unwrap()
            .entry((uid(user), cid(course)))
            .or_default()
            .push(c);
    }
}
