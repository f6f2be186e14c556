//! In-Memory Criteria Source
//!
//! Keeps criteria definitions, per-type aggregation methods and user
//! completions apart, and joins them on read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use coursetrack_domain::{
    completion::{
        known_time, AggregationMethod, CourseCompletionSettings, CriterionCompletion,
        CriterionType,
    },
    errors::DomainResult,
    ports::CriteriaSource,
    value_objects::{CourseId, CriterionId, UserId},
};

/// A completion criterion configured in a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDefinition {
    pub criterion_id: CriterionId,
    pub course_id: CourseId,
    pub criterion_type: CriterionType,
    #[serde(default)]
    pub title: String,
}

/// Aggregation method of one criterion type in a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMethod {
    pub course_id: CourseId,
    pub criterion_type: CriterionType,
    pub method: AggregationMethod,
}

/// A user's completion of one criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionCompletionEntry {
    pub user_id: UserId,
    pub criterion_id: CriterionId,
    #[serde(default)]
    pub time_completed: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Tables {
    settings: HashMap<CourseId, CourseCompletionSettings>,
    criteria: Vec<CriterionDefinition>,
    methods: HashMap<(CourseId, CriterionType), AggregationMethod>,
    completions: HashMap<(UserId, CriterionId), Option<DateTime<Utc>>>,
}

/// Criteria configuration and completions held in memory
#[derive(Debug, Default)]
pub struct InMemoryCriteriaSource {
    tables: RwLock<Tables>,
}

impl InMemoryCriteriaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_settings(&self, course_id: CourseId, settings: CourseCompletionSettings) {
        self.tables.write().settings.insert(course_id, settings);
    }

    pub fn add_criterion(&self, definition: CriterionDefinition) {
        self.tables.write().criteria.push(definition);
    }

    /// Method for a criterion type; types without one aggregate with ALL
    pub fn set_method(&self, course_id: CourseId, criterion_type: CriterionType, method: AggregationMethod) {
        self.tables
            .write()
            .methods
            .insert((course_id, criterion_type), method);
    }

    /// Record that a user completed a criterion
    pub fn complete(&self, user_id: UserId, criterion_id: CriterionId, at: DateTime<Utc>) {
        self.tables
            .write()
            .completions
            .insert((user_id, criterion_id), Some(at));
    }

    pub fn add_completion(&self, entry: CriterionCompletionEntry) {
        self.tables
            .write()
            .completions
            .insert((entry.user_id, entry.criterion_id), entry.time_completed);
    }

    pub fn settings(&self) -> Vec<(CourseId, CourseCompletionSettings)> {
        let mut settings: Vec<_> = self
            .tables
            .read()
            .settings
            .iter()
            .map(|(id, s)| (*id, *s))
            .collect();
        settings.sort_by_key(|(id, _)| *id);
        settings
    }

    pub fn criteria(&self) -> Vec<CriterionDefinition> {
        self.tables.read().criteria.clone()
    }

    pub fn methods(&self) -> Vec<TypeMethod> {
        let mut methods: Vec<_> = self
            .tables
            .read()
            .methods
            .iter()
            .map(|((course_id, criterion_type), method)| TypeMethod {
                course_id: *course_id,
                criterion_type: *criterion_type,
                method: *method,
            })
            .collect();
        methods.sort_by_key(|m| m.course_id);
        methods
    }

    pub fn completions(&self) -> Vec<CriterionCompletionEntry> {
        let mut entries: Vec<_> = self
            .tables
            .read()
            .completions
            .iter()
            .map(|((user_id, criterion_id), time_completed)| CriterionCompletionEntry {
                user_id: *user_id,
                criterion_id: *criterion_id,
                time_completed: *time_completed,
            })
            .collect();
        entries.sort_by_key(|e| (e.user_id, e.criterion_id));
        entries
    }
}

#[async_trait]
impl CriteriaSource for InMemoryCriteriaSource {
    async fn completion_settings(
        &self,
        course_id: CourseId,
    ) -> DomainResult<Option<CourseCompletionSettings>> {
        Ok(self.tables.read().settings.get(&course_id).copied())
    }

    async fn criterion_completions(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Vec<CriterionCompletion>> {
        let tables = self.tables.read();
        Ok(tables
            .criteria
            .iter()
            .filter(|c| c.course_id == course_id)
            .map(|c| {
                let method = tables
                    .methods
                    .get(&(course_id, c.criterion_type))
                    .copied()
                    .unwrap_or_default();
                let mut completion =
                    CriterionCompletion::new(c.criterion_id, c.criterion_type, method)
                        .with_title(c.title.clone());
                completion.completed_at = known_time(
                    tables
                        .completions
                        .get(&(user_id, c.criterion_id))
                        .copied()
                        .flatten(),
                );
                completion
            })
            .collect())
    }
}
