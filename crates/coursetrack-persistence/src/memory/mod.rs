//! In-Memory Implementations
//!
//! Thread-safe in-memory implementations of the domain repository and
//! source interfaces. Used by the CLI (backed by a snapshot file) and by
//! tests.

mod completion_repository;
mod course_catalog;
mod criteria_source;
mod enrolment_source;

pub use completion_repository::InMemoryCompletionRepository;
pub use course_catalog::InMemoryCourseCatalog;
pub use criteria_source::{
    CriterionCompletionEntry, CriterionDefinition, InMemoryCriteriaSource, TypeMethod,
};
pub use enrolment_source::InMemoryEnrolmentSource;
