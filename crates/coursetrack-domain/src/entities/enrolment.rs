//! Enrolment windows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::completion::known_time;
use crate::value_objects::{CourseId, UserId};

/// Status of a user's enrolment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrolmentStatus {
    #[default]
    Active,
    Suspended,
}

/// One enrolment of a user in a course through one enrolment instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentWindow {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Start of the window, `None` when open from the beginning
    #[serde(default)]
    pub time_start: Option<DateTime<Utc>>,
    /// End of the window, `None` when open-ended
    #[serde(default)]
    pub time_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: EnrolmentStatus,
    /// Whether the enrolment instance (method) is enabled in the course
    #[serde(default = "default_true")]
    pub instance_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl EnrolmentWindow {
    /// An active, open-ended enrolment
    pub fn active(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            user_id,
            course_id,
            time_start: None,
            time_end: None,
            status: EnrolmentStatus::Active,
            instance_enabled: true,
        }
    }

    pub fn starting(mut self, at: DateTime<Utc>) -> Self {
        self.time_start = Some(at);
        self
    }

    pub fn ending(mut self, at: DateTime<Utc>) -> Self {
        self.time_end = Some(at);
        self
    }

    pub fn suspended(mut self) -> Self {
        self.status = EnrolmentStatus::Suspended;
        self
    }

    pub fn with_instance_disabled(mut self) -> Self {
        self.instance_enabled = false;
        self
    }

    /// Active user enrolment through an enabled instance that has not ended
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == EnrolmentStatus::Active
            && self.instance_enabled
            && self.time_end.map_or(true, |end| end > now)
    }

    /// Live enrolment that has already started
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_live(now) && self.time_start.map_or(true, |start| start < now)
    }
}

/// Earliest start among the windows current at `now`
///
/// Windows without a start time after the epoch carry no usable date and
/// are ignored.
pub fn earliest_current_start(
    windows: &[EnrolmentWindow],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    windows
        .iter()
        .filter(|w| w.is_current(now))
        .filter_map(|w| known_time(w.time_start))
        .min()
}
