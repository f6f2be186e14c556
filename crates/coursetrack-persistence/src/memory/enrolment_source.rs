//! In-Memory Enrolment Source

use async_trait::async_trait;
use parking_lot::RwLock;

use coursetrack_domain::{
    entities::EnrolmentWindow,
    errors::DomainResult,
    ports::EnrolmentSource,
    value_objects::{CourseId, UserId},
};

/// Enrolment windows held in a list
#[derive(Debug, Default)]
pub struct InMemoryEnrolmentSource {
    windows: RwLock<Vec<EnrolmentWindow>>,
}

impl InMemoryEnrolmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows(windows: Vec<EnrolmentWindow>) -> Self {
        Self {
            windows: RwLock::new(windows),
        }
    }

    pub fn add(&self, window: EnrolmentWindow) {
        self.windows.write().push(window);
    }

    pub fn windows(&self) -> Vec<EnrolmentWindow> {
        self.windows.read().clone()
    }

    /// Courses the user holds any enrolment in, in first-seen order
    pub fn courses_of(&self, user_id: UserId) -> Vec<CourseId> {
        let mut courses = Vec::new();
        for window in self.windows.read().iter().filter(|w| w.user_id == user_id) {
            if !courses.contains(&window.course_id) {
                courses.push(window.course_id);
            }
        }
        courses
    }
}

#[async_trait]
impl EnrolmentSource for InMemoryEnrolmentSource {
    async fn user_enrolments(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<EnrolmentWindow>> {
        Ok(self
            .windows
            .read()
            .iter()
            .filter(|w| w.user_id == user_id && w.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn course_enrolments(&self, course_id: CourseId) -> DomainResult<Vec<EnrolmentWindow>> {
        Ok(self
            .windows
            .read()
            .iter()
            .filter(|w| w.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filters_by_user_and_course() {
        let source = InMemoryEnrolmentSource::new();
        source.add(EnrolmentWindow::active(UserId::new(1), CourseId::new(10)));
        source.add(EnrolmentWindow::active(UserId::new(1), CourseId::new(11)));
        source.add(EnrolmentWindow::active(UserId::new(2), CourseId::new(10)).suspended());

        let mine = source
            .user_enrolments(UserId::new(1), CourseId::new(10))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let course = source.course_enrolments(CourseId::new(10)).await.unwrap();
        assert_eq!(course.len(), 2);

        assert_eq!(
            source.courses_of(UserId::new(1)),
            vec![CourseId::new(10), CourseId::new(11)]
        );
    }
}
