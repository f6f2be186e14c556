//! Domain errors for coursetrack

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    EntityNotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with key {key}")]
    DuplicateEntity { entity_type: String, key: String },

    #[error("Concurrency conflict: {resource}")]
    ConcurrencyConflict { resource: String },

    #[error("Storage failure: {reason}")]
    StorageFailure { reason: String },

    #[error("Source unavailable: {source_name} - {reason}")]
    SourceUnavailable { source_name: String, reason: String },
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::EntityNotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
