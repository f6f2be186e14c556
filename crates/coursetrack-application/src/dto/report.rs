//! User completion report DTOs
//!
//! Structured form of the per-user completion status report. Rendering is
//! left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursetrack_domain::value_objects::{CourseId, UserId};

/// Where a user stands in a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    NotYetStarted,
    InProgress,
    Complete,
}

/// Status cell of a report row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Complete,
    Incomplete,
    /// Summary of a group of criteria: `done` of `total`
    Count { done: usize, total: usize },
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowStatus::Complete => write!(f, "Complete"),
            RowStatus::Incomplete => write!(f, "Incomplete"),
            RowStatus::Count { done, total } => write!(f, "{} of {}", done, total),
        }
    }
}

/// One row of a course's criteria table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub title: String,
    pub status: RowStatus,
    pub complete: bool,
}

impl ReportRow {
    /// Summary row for a group of criteria
    pub fn summary(title: impl Into<String>, done: usize, total: usize) -> Self {
        Self {
            title: title.into(),
            status: RowStatus::Count { done, total },
            complete: done == total,
        }
    }

    /// Row for a single criterion
    pub fn single(title: impl Into<String>, complete: bool) -> Self {
        Self {
            title: title.into(),
            status: if complete {
                RowStatus::Complete
            } else {
                RowStatus::Incomplete
            },
            complete,
        }
    }
}

/// Completion status of one course for the reported user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseReport {
    pub course_id: CourseId,
    pub course_name: String,
    pub status: CourseStatus,
    pub rows: Vec<ReportRow>,
    /// Set for completed courses
    pub time_completed: Option<DateTime<Utc>>,
}

/// Completion status of a user across courses, grouped by status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCompletionReport {
    pub user_id: UserId,
    pub username: String,
    pub in_progress: Vec<CourseReport>,
    pub complete: Vec<CourseReport>,
    pub not_yet_started: Vec<CourseReport>,
}

impl UserCompletionReport {
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            in_progress: Vec::new(),
            complete: Vec::new(),
            not_yet_started: Vec::new(),
        }
    }

    /// File a course report under its status
    pub fn push(&mut self, course: CourseReport) {
        match course.status {
            CourseStatus::InProgress => self.in_progress.push(course),
            CourseStatus::Complete => self.complete.push(course),
            CourseStatus::NotYetStarted => self.not_yet_started.push(course),
        }
    }

    /// No course was accessible for the user
    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty() && self.complete.is_empty() && self.not_yet_started.is_empty()
    }

    pub fn course_count(&self) -> usize {
        self.in_progress.len() + self.complete.len() + self.not_yet_started.len()
    }
}
