//! Value objects representing immutable domain concepts

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw identifier value
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// User identifier
    UserId
);
numeric_id!(
    /// Course identifier
    CourseId
);
numeric_id!(
    /// Surrogate key of a stored completion record
    CompletionId
);
numeric_id!(
    /// Completion criterion identifier
    CriterionId
);

/// Key identifying a completion record: one per user/course pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionKey {
    pub user_id: UserId,
    pub course_id: CourseId,
}

impl CompletionKey {
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self { user_id, course_id }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {} / course {}", self.user_id, self.course_id)
    }
}
