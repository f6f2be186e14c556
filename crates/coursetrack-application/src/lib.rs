//! coursetrack Application Layer
//!
//! Implements the completion use cases by orchestrating the domain entity,
//! the aggregation rule and the ports. Services are request-scoped: build
//! them per request (or per batch run) and drop them afterwards, which also
//! discards the course settings cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Application Layer                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Services              │ DTOs               │ Ports            │ Events │
//! │  ─────────             │ ────               │ ─────            │ ────── │
//! │  CompletionService     │ CompletionOutcome  │ CompletionPorts  │ AppEvt │
//! │  EnrolmentService      │ UserEnrolled       │ EventPublisher   │        │
//! │  ReaggregationService  │ BulkStartSummary   │                  │        │
//! │  CompletionReportSvc   │ UserCompletionRpt  │                  │        │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ depends on
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Layer                                     │
//! │  CompletionRecord, CriteriaAggregator, Domain Events, Port Traits       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Non-Goals
//!
//! - Aggregation logic (belongs in Domain Layer)
//! - Direct I/O operations (belongs in Infrastructure Layer)
//! - HTTP/CLI handling (belongs in Presentation Layer)

pub mod cache;
pub mod dto;
pub mod errors;
pub mod events;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use cache::CourseSettingsCache;
pub use dto::*;
pub use errors::{ApplicationError, ApplicationResult};
pub use events::{ApplicationEvent, EventPublisher};
pub use ports::CompletionPorts;
pub use services::*;
