//! coursetrack Domain Layer
//!
//! Core business rules for course-completion tracking. This crate holds the
//! completion record entity, the criteria aggregation rule, domain events and
//! the port traits that infrastructure crates implement.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Domain Layer                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  completion/        │ entities/         │ ports/            │ events/   │
//! │  ───────────        │ ─────────         │ ──────            │ ───────   │
//! │  CompletionRecord   │ Course, User      │ EnrolmentSource   │ Course-   │
//! │  CriteriaAggregator │ EnrolmentWindow   │ CriteriaSource    │ Completed │
//! │  AggregateState     │                   │ CourseCatalog     │           │
//! │                     │                   │ Clock             │           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The domain layer defines only interfaces for I/O; it never talks to a
//! store itself.

pub mod completion;
pub mod entities;
pub mod errors;
pub mod events;
pub mod ports;
pub mod repositories;
pub mod value_objects;

pub use completion::*;
pub use entities::*;
pub use errors::{DomainError, DomainResult};
pub use value_objects::*;
