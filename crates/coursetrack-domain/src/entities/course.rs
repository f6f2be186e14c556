//! Course and user records as seen by completion tracking

use serde::{Deserialize, Serialize};

use crate::value_objects::{CourseId, UserId};

/// A course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub short_name: String,
    pub full_name: String,
}

impl Course {
    pub fn new(id: CourseId, short_name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id,
            short_name: short_name.into(),
            full_name: full_name.into(),
        }
    }
}

/// A user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
