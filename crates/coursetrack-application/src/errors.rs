//! Application layer error types
//!
//! These errors represent application-level failures suitable for the CLI
//! and other callers. They wrap domain errors with additional context.

use coursetrack_domain::errors::DomainError;
use thiserror::Error;

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Application layer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    // === Validation Errors ===

    /// Input validation failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // === Not Found Errors ===

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Course not found
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Completion record not found
    #[error("Completion record not found: {0}")]
    CompletionNotFound(String),

    // === Conflict Errors ===

    /// Record changed since it was read
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Record already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // === Infrastructure Errors ===

    /// Repository operation failed
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// An external source failed
    #[error("Source error: {0}")]
    SourceError(String),

    // === Domain Error Wrapper ===

    /// Wrapped domain error
    #[error("Domain error: {0}")]
    DomainError(String),
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError { field, reason } => {
                ApplicationError::ValidationFailed(format!("{}: {}", field, reason))
            }
            DomainError::EntityNotFound { entity_type, id } => match entity_type.as_str() {
                "User" => ApplicationError::UserNotFound(id),
                "Course" => ApplicationError::CourseNotFound(id),
                _ => ApplicationError::CompletionNotFound(format!("{} {}", entity_type, id)),
            },
            DomainError::ConcurrencyConflict { resource } => {
                ApplicationError::ConcurrencyConflict(resource)
            }
            DomainError::DuplicateEntity { entity_type, key } => {
                ApplicationError::AlreadyExists(format!("{} {}", entity_type, key))
            }
            DomainError::StorageFailure { reason } => ApplicationError::RepositoryError(reason),
            DomainError::SourceUnavailable {
                source_name,
                reason,
            } => ApplicationError::SourceError(format!("{}: {}", source_name, reason)),
            other => ApplicationError::DomainError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = ApplicationError::CourseNotFound("12".into());
        assert_eq!(err.to_string(), "Course not found: 12");
    }

    #[test]
    fn test_conflict_conversion() {
        let domain_err = DomainError::ConcurrencyConflict {
            resource: "user 1 / course 2".into(),
        };
        let app_err: ApplicationError = domain_err.into();
        assert_eq!(
            app_err,
            ApplicationError::ConcurrencyConflict("user 1 / course 2".into())
        );
    }

    #[test]
    fn test_not_found_conversion_by_entity() {
        let app_err: ApplicationError = DomainError::not_found("User", 3).into();
        assert!(matches!(app_err, ApplicationError::UserNotFound(id) if id == "3"));
    }

    #[test]
    fn test_storage_failure_conversion() {
        let app_err: ApplicationError = DomainError::StorageFailure {
            reason: "disk full".into(),
        }
        .into();
        assert!(matches!(app_err, ApplicationError::RepositoryError(_)));
    }
}
