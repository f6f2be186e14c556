//! In-Memory Completion Repository Implementation
//!
//! Records are kept in their stored row shape so the zero-as-unset column
//! convention is exercised the same way a table would.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use coursetrack_domain::{
    completion::CompletionRecord,
    errors::DomainResult,
    repositories::CompletionRepository,
    value_objects::{CompletionId, CourseId, UserId},
};

use crate::error::PersistenceError;
use crate::row::CompletionRow;

#[derive(Debug, Default)]
struct Table {
    rows: HashMap<(UserId, CourseId), CompletionRow>,
    next_id: i64,
}

/// Thread-safe in-memory implementation of CompletionRepository
///
/// The user/course pair is unique. With optimistic locking on (the default)
/// an update carrying a stale version is rejected.
#[derive(Debug)]
pub struct InMemoryCompletionRepository {
    table: RwLock<Table>,
    optimistic_locking: bool,
}

impl Default for InMemoryCompletionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCompletionRepository {
    /// Create a new empty in-memory completion repository
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
            optimistic_locking: true,
        }
    }

    /// Create with initial rows, e.g. loaded from a snapshot
    pub fn with_rows(rows: Vec<CompletionRow>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|r| ((UserId::new(r.userid), CourseId::new(r.course)), r))
            .collect();
        Self {
            table: RwLock::new(Table { rows, next_id }),
            optimistic_locking: true,
        }
    }

    /// Turn version checks on updates on or off
    pub fn with_optimistic_locking(mut self, enabled: bool) -> Self {
        self.optimistic_locking = enabled;
        self
    }

    /// All rows ordered by id
    pub fn rows(&self) -> Vec<CompletionRow> {
        let mut rows: Vec<_> = self.table.read().rows.values().copied().collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    /// Get the current count of records (for testing)
    pub fn count(&self) -> usize {
        self.table.read().rows.len()
    }

    /// Clear all records (for testing)
    pub fn clear(&self) {
        let mut table = self.table.write();
        table.rows.clear();
        table.next_id = 0;
    }
}

#[async_trait]
impl CompletionRepository for InMemoryCompletionRepository {
    async fn find(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Option<CompletionRecord>> {
        let table = self.table.read();
        match table.rows.get(&(user_id, course_id)) {
            Some(row) => Ok(Some(row.to_record()?)),
            None => Ok(None),
        }
    }

    async fn find_by_course(&self, course_id: CourseId) -> DomainResult<Vec<CompletionRecord>> {
        let mut rows: Vec<_> = self
            .table
            .read()
            .rows
            .values()
            .filter(|r| r.course == course_id.get())
            .copied()
            .collect();
        rows.sort_by_key(|r| r.userid);

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row.to_record()?);
        }
        Ok(records)
    }

    async fn insert(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord> {
        let mut table = self.table.write();
        let key = (record.user_id(), record.course_id());
        if table.rows.contains_key(&key) {
            return Err(PersistenceError::Duplicate {
                entity_type: "CompletionRecord",
                key: record.key().to_string(),
            }
            .into());
        }

        table.next_id += 1;
        let id = CompletionId::new(table.next_id);
        table.rows.insert(key, CompletionRow::from_record(record, id, 1));
        debug!(key = %record.key(), id = %id, "completion record inserted");

        Ok(record.clone().stored_as(id, 1))
    }

    async fn update(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord> {
        let mut table = self.table.write();
        let key = (record.user_id(), record.course_id());
        let current = table
            .rows
            .get(&key)
            .copied()
            .ok_or_else(|| PersistenceError::not_found("CompletionRecord", record.key().to_string()))?;

        if self.optimistic_locking && current.version != record.version() {
            return Err(PersistenceError::concurrency_conflict(format!(
                "{} (stored version {}, given {})",
                record.key(),
                current.version,
                record.version()
            ))
            .into());
        }

        let id = CompletionId::new(current.id);
        let version = current.version + 1;
        table
            .rows
            .insert(key, CompletionRow::from_record(record, id, version));

        Ok(record.clone().stored_as(id, version))
    }
}
