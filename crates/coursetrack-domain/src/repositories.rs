//! Repository interfaces for data persistence
//!
//! These interfaces define the contracts for storing completion records.
//! Implementations are provided by infrastructure crates; the domain layer
//! holds no concrete storage.

use async_trait::async_trait;

use crate::{completion::CompletionRecord, errors::*, value_objects::*};

/// Repository for completion records
///
/// Records are keyed by their user/course pair, which is unique.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Find the record of a user in a course
    async fn find(&self, user_id: UserId, course_id: CourseId)
        -> DomainResult<Option<CompletionRecord>>;

    /// All records of a course
    async fn find_by_course(&self, course_id: CourseId) -> DomainResult<Vec<CompletionRecord>>;

    /// Insert a new record
    ///
    /// Returns the stored record with its assigned id and version. Fails with
    /// `DuplicateEntity` when the user/course pair already has a record.
    async fn insert(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord>;

    /// Update an existing record
    ///
    /// Returns the stored record with its new version. Fails with
    /// `ConcurrencyConflict` when the stored version differs from the
    /// record's, and with `EntityNotFound` when the record was never stored.
    async fn update(&self, record: &CompletionRecord) -> DomainResult<CompletionRecord>;
}
