//! Criterion completion inputs and per-course completion settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::known_time;
use crate::value_objects::CriterionId;

/// How a group of criteria combines into one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    /// Every criterion in the group must be complete
    #[default]
    All,
    /// At least one criterion in the group suffices
    Any,
}

/// Kind of completion criterion
///
/// Activity, prerequisite and role criteria are aggregated in their own
/// bucket first; every other type folds straight into the overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionType {
    Activity,
    CoursePrerequisite,
    Role,
    /// Any other criterion type (self completion, date, grade, duration, ...)
    Other(u8),
}

/// One criterion of a course together with a user's completion of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionCompletion {
    pub criterion_id: CriterionId,
    pub criterion_type: CriterionType,
    /// Method configured for this criterion type in the course
    #[serde(default)]
    pub aggregation_method: AggregationMethod,
    /// When the user completed the criterion, if at all
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Human-readable label, used by reports
    #[serde(default)]
    pub title: String,
}

impl CriterionCompletion {
    /// Create an incomplete criterion
    pub fn new(
        criterion_id: CriterionId,
        criterion_type: CriterionType,
        aggregation_method: AggregationMethod,
    ) -> Self {
        Self {
            criterion_id,
            criterion_type,
            aggregation_method,
            completed_at: None,
            title: String::new(),
        }
    }

    /// Mark the criterion as completed at `at`
    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Attach a report label
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Whether the user has completed this criterion
    pub fn is_complete(&self) -> bool {
        self.completion_time().is_some()
    }

    /// Completion time, if the criterion carries a usable one
    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        known_time(self.completed_at)
    }
}

/// Completion tracking settings of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCompletionSettings {
    /// Completion tracking is enabled for the course
    pub enabled: bool,
    /// Method combining the criteria buckets into the overall status
    #[serde(default)]
    pub aggregation_method: AggregationMethod,
    /// Mark users as started as soon as they enrol
    #[serde(default)]
    pub start_on_enrol: bool,
}

impl CourseCompletionSettings {
    pub fn enabled(aggregation_method: AggregationMethod) -> Self {
        Self {
            enabled: true,
            aggregation_method,
            start_on_enrol: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            aggregation_method: AggregationMethod::All,
            start_on_enrol: false,
        }
    }

    pub fn with_start_on_enrol(mut self, start_on_enrol: bool) -> Self {
        self.start_on_enrol = start_on_enrol;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn activity() -> CriterionCompletion {
        CriterionCompletion::new(CriterionId::new(1), CriterionType::Activity, AggregationMethod::All)
    }

    #[test]
    fn test_completed_criterion() {
        let criterion = activity().with_completed_at(at(30));
        assert!(criterion.is_complete());
        assert_eq!(criterion.completion_time(), Some(at(30)));
    }

    #[test]
    fn test_epoch_completion_is_not_complete() {
        assert!(!activity().with_completed_at(at(0)).is_complete());
        assert!(!activity().with_completed_at(at(-60)).is_complete());
        assert!(!activity().is_complete());
    }
}
