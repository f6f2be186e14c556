//! In-Memory Course Catalog

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use coursetrack_domain::{
    entities::{Course, User},
    errors::DomainResult,
    ports::CourseCatalog,
    value_objects::{CourseId, UserId},
};

use super::InMemoryEnrolmentSource;

/// Courses and users held in memory
///
/// Enrolled courses are resolved through the shared enrolment source.
#[derive(Debug)]
pub struct InMemoryCourseCatalog {
    courses: RwLock<Vec<Course>>,
    users: RwLock<Vec<User>>,
    enrolments: Arc<InMemoryEnrolmentSource>,
}

impl InMemoryCourseCatalog {
    pub fn new(enrolments: Arc<InMemoryEnrolmentSource>) -> Self {
        Self {
            courses: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
            enrolments,
        }
    }

    /// Add or replace a course
    pub fn add_course(&self, course: Course) {
        let mut courses = self.courses.write();
        courses.retain(|c| c.id != course.id);
        courses.push(course);
    }

    /// Add or replace a user
    pub fn add_user(&self, user: User) {
        let mut users = self.users.write();
        users.retain(|u| u.id != user.id);
        users.push(user);
    }

    pub fn courses(&self) -> Vec<Course> {
        self.courses.read().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.users.read().clone()
    }
}

#[async_trait]
impl CourseCatalog for InMemoryCourseCatalog {
    async fn find_course(&self, course_id: CourseId) -> DomainResult<Option<Course>> {
        Ok(self
            .courses
            .read()
            .iter()
            .find(|c| c.id == course_id)
            .cloned())
    }

    async fn find_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == user_id).cloned())
    }

    async fn enrolled_courses(&self, user_id: UserId) -> DomainResult<Vec<Course>> {
        let courses = self.courses.read();
        Ok(self
            .enrolments
            .courses_of(user_id)
            .into_iter()
            .filter_map(|id| courses.iter().find(|c| c.id == id).cloned())
            .collect())
    }
}
