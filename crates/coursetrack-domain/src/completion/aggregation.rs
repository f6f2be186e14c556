//! Criteria aggregation
//!
//! A course's criteria are grouped into activity, prerequisite and role
//! buckets, each folded with the method configured for its type. The bucket
//! results, plus every criterion of another type, are then folded with the
//! course's overall method.
//!
//! Folding is three-valued. A bucket that never received an input stays
//! [`AggregateState::Unset`] and is left out of the overall fold, so an empty
//! bucket can never drag an `All` aggregation down to incomplete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::criteria::{AggregationMethod, CriterionCompletion, CriterionType};

/// Three-valued aggregation accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AggregateState {
    /// No input folded yet
    #[default]
    Unset,
    Complete,
    Incomplete,
}

impl AggregateState {
    /// Fold one completion flag into the accumulator
    pub fn fold(self, method: AggregationMethod, complete: bool) -> Self {
        match method {
            AggregationMethod::All => {
                if complete && self != AggregateState::Incomplete {
                    AggregateState::Complete
                } else {
                    AggregateState::Incomplete
                }
            }
            AggregationMethod::Any => {
                if complete {
                    AggregateState::Complete
                } else if self == AggregateState::Unset {
                    AggregateState::Incomplete
                } else {
                    self
                }
            }
        }
    }

    /// Fold a sequence of completion flags, starting from `Unset`
    pub fn fold_all<I>(method: AggregationMethod, inputs: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        inputs
            .into_iter()
            .fold(AggregateState::Unset, |state, complete| state.fold(method, complete))
    }

    /// `None` while unset, otherwise the resolved flag
    pub fn resolved(self) -> Option<bool> {
        match self {
            AggregateState::Unset => None,
            AggregateState::Complete => Some(true),
            AggregateState::Incomplete => Some(false),
        }
    }

    pub fn is_complete(self) -> bool {
        self == AggregateState::Complete
    }
}

/// Outcome of aggregating one user's criteria in one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Overall course status
    pub status: AggregateState,
    pub activity: AggregateState,
    pub prerequisite: AggregateState,
    pub role: AggregateState,
    /// Latest completion time across all completed criteria
    pub completed_at: Option<DateTime<Utc>>,
    /// Number of criteria evaluated
    pub criteria_count: usize,
}

impl AggregationResult {
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    pub fn has_criteria(&self) -> bool {
        self.criteria_count > 0
    }
}

/// Pure criteria aggregation rule
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaAggregator;

impl CriteriaAggregator {
    /// Evaluate the overall status of `completions` under `overall`
    pub fn evaluate(
        overall: AggregationMethod,
        completions: &[CriterionCompletion],
    ) -> AggregationResult {
        let mut status = AggregateState::Unset;
        let mut activity = AggregateState::Unset;
        let mut prerequisite = AggregateState::Unset;
        let mut role = AggregateState::Unset;
        let mut completed_at: Option<DateTime<Utc>> = None;

        for completion in completions {
            completed_at = completed_at.max(completion.completion_time());
            let complete = completion.is_complete();
            let method = completion.aggregation_method;

            match completion.criterion_type {
                CriterionType::Activity => activity = activity.fold(method, complete),
                CriterionType::CoursePrerequisite => {
                    prerequisite = prerequisite.fold(method, complete)
                }
                CriterionType::Role => role = role.fold(method, complete),
                CriterionType::Other(_) => status = status.fold(overall, complete),
            }
        }

        // Bucket order is fixed: role, activity, prerequisite
        for bucket in [role, activity, prerequisite] {
            if let Some(complete) = bucket.resolved() {
                status = status.fold(overall, complete);
            }
        }

        AggregationResult {
            status,
            activity,
            prerequisite,
            role,
            completed_at,
            criteria_count: completions.len(),
        }
    }
}
