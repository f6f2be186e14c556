//! In-memory store bundling every repository and source
//!
//! The catalog and the enrolment source share one enrolment table.

use std::sync::Arc;

use coursetrack_domain::value_objects::CourseId;

use crate::memory::{
    InMemoryCompletionRepository, InMemoryCourseCatalog, InMemoryCriteriaSource,
    InMemoryEnrolmentSource,
};
use crate::snapshot::{CourseSettingsEntry, Snapshot};

/// All in-memory tables, behind shared handles
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    pub completions: Arc<InMemoryCompletionRepository>,
    pub enrolments: Arc<InMemoryEnrolmentSource>,
    pub criteria: Arc<InMemoryCriteriaSource>,
    pub catalog: Arc<InMemoryCourseCatalog>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store with optimistic locking on
    pub fn new() -> Self {
        let enrolments = Arc::new(InMemoryEnrolmentSource::new());
        Self {
            completions: Arc::new(InMemoryCompletionRepository::new()),
            catalog: Arc::new(InMemoryCourseCatalog::new(enrolments.clone())),
            enrolments,
            criteria: Arc::new(InMemoryCriteriaSource::new()),
        }
    }

    /// Store filled from a snapshot
    pub fn from_snapshot(snapshot: Snapshot, optimistic_locking: bool) -> Self {
        let enrolments = Arc::new(InMemoryEnrolmentSource::with_windows(snapshot.enrolments));

        let catalog = InMemoryCourseCatalog::new(enrolments.clone());
        snapshot.courses.into_iter().for_each(|c| catalog.add_course(c));
        snapshot.users.into_iter().for_each(|u| catalog.add_user(u));

        let criteria = InMemoryCriteriaSource::new();
        for entry in snapshot.settings {
            criteria.set_settings(entry.course_id, entry.settings);
        }
        snapshot
            .criteria
            .into_iter()
            .for_each(|c| criteria.add_criterion(c));
        for m in snapshot.methods {
            criteria.set_method(m.course_id, m.criterion_type, m.method);
        }
        for entry in snapshot.criterion_completions {
            criteria.add_completion(entry);
        }

        Self {
            completions: Arc::new(
                InMemoryCompletionRepository::with_rows(snapshot.completions)
                    .with_optimistic_locking(optimistic_locking),
            ),
            enrolments,
            criteria: Arc::new(criteria),
            catalog: Arc::new(catalog),
        }
    }

    /// Current contents as a snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            courses: self.catalog.courses(),
            users: self.catalog.users(),
            settings: self
                .criteria
                .settings()
                .into_iter()
                .map(|(course_id, settings)| CourseSettingsEntry { course_id, settings })
                .collect(),
            criteria: self.criteria.criteria(),
            methods: self.criteria.methods(),
            criterion_completions: self.criteria.completions(),
            enrolments: self.enrolments.windows(),
            completions: self.completions.rows(),
        }
    }

    /// Ids of every course with completion settings
    pub fn course_ids(&self) -> Vec<CourseId> {
        self.criteria.settings().into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use coursetrack_domain::completion::{
        AggregationMethod, CompletionRecord, CourseCompletionSettings, CriterionType,
    };
    use coursetrack_domain::entities::{Course, EnrolmentWindow, User};
    use coursetrack_domain::ports::{CourseCatalog, CriteriaSource};
    use coursetrack_domain::repositories::CompletionRepository;
    use coursetrack_domain::value_objects::{CriterionId, UserId};

    use crate::memory::{CriterionDefinition, TypeMethod};

    #[tokio::test]
    async fn test_snapshot_survives_store() {
        let store = InMemoryStore::new();
        let course = CourseId::new(10);
        let user = UserId::new(1);
        store.catalog.add_course(Course::new(course, "ALG", "Algebra"));
        store.catalog.add_user(User::new(user, "learner"));
        store.enrolments.add(EnrolmentWindow::active(user, course));
        store
            .criteria
            .set_settings(course, CourseCompletionSettings::enabled(AggregationMethod::All));
        store.criteria.add_criterion(CriterionDefinition {
            criterion_id: CriterionId::new(5),
            course_id: course,
            criterion_type: CriterionType::Activity,
            title: "Quiz".into(),
        });
        store
            .criteria
            .set_method(course, CriterionType::Activity, AggregationMethod::Any);
        store.criteria.complete(
            user,
            CriterionId::new(5),
            DateTime::from_timestamp(300, 0).unwrap(),
        );
        store
            .completions
            .insert(&CompletionRecord::new(user, course))
            .await
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.methods,
            vec![TypeMethod {
                course_id: course,
                criterion_type: CriterionType::Activity,
                method: AggregationMethod::Any,
            }]
        );

        let reloaded = InMemoryStore::from_snapshot(snapshot.clone(), true);
        assert_eq!(reloaded.snapshot(), snapshot);
        assert_eq!(reloaded.course_ids(), vec![course]);

        let completions = reloaded
            .criteria
            .criterion_completions(user, course)
            .await
            .unwrap();
        assert!(completions[0].is_complete());
        assert_eq!(
            reloaded.catalog.enrolled_courses(user).await.unwrap().len(),
            1
        );
        assert!(reloaded.completions.find(user, course).await.unwrap().is_some());
    }
}
