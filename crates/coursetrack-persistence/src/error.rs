//! Persistence Layer Error Types
//!
//! Error mapping to domain types

use coursetrack_domain::errors::DomainError;
use thiserror::Error;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Unique key already taken
    #[error("Duplicate {entity_type}: {key}")]
    Duplicate {
        entity_type: &'static str,
        key: String,
    },

    /// Concurrency conflict (optimistic locking)
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Stored row cannot be turned back into a record
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a concurrency conflict error
    pub fn concurrency_conflict(message: impl Into<String>) -> Self {
        Self::ConcurrencyConflict(message.into())
    }
}

/// Convert persistence errors to domain errors
impl From<PersistenceError> for DomainError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity_type, id } => DomainError::EntityNotFound {
                entity_type: entity_type.to_string(),
                id,
            },
            PersistenceError::Duplicate { entity_type, key } => DomainError::DuplicateEntity {
                entity_type: entity_type.to_string(),
                key,
            },
            PersistenceError::ConcurrencyConflict(msg) => {
                DomainError::ConcurrencyConflict { resource: msg }
            }
            PersistenceError::InvalidRow(msg)
            | PersistenceError::Serialization(msg)
            | PersistenceError::Deserialization(msg) => DomainError::StorageFailure { reason: msg },
            PersistenceError::Io(err) => DomainError::StorageFailure {
                reason: err.to_string(),
            },
        }
    }
}
