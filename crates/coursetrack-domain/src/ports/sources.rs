//! Read-only sources consulted by completion tracking

use async_trait::async_trait;

use crate::{
    completion::{CourseCompletionSettings, CriterionCompletion},
    entities::{Course, EnrolmentWindow, User},
    errors::*,
    value_objects::*,
};

/// Enrolment windows of users in courses
#[async_trait]
pub trait EnrolmentSource: Send + Sync {
    /// All enrolment windows of one user in one course
    async fn user_enrolments(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<EnrolmentWindow>>;

    /// All enrolment windows in a course
    async fn course_enrolments(&self, course_id: CourseId) -> DomainResult<Vec<EnrolmentWindow>>;
}

/// Completion configuration and per-user criterion completions
#[async_trait]
pub trait CriteriaSource: Send + Sync {
    /// Completion settings of a course, `None` for an unknown course
    async fn completion_settings(
        &self,
        course_id: CourseId,
    ) -> DomainResult<Option<CourseCompletionSettings>>;

    /// Every criterion of the course joined with the user's completion of it
    /// and the method configured for its type
    async fn criterion_completions(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<CriterionCompletion>>;
}

/// Course and user lookups
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn find_course(&self, course_id: CourseId) -> DomainResult<Option<Course>>;

    async fn find_user(&self, user_id: UserId) -> DomainResult<Option<User>>;

    /// Courses the user holds any enrolment in, active or not
    async fn enrolled_courses(&self, user_id: UserId) -> DomainResult<Vec<Course>>;
}
