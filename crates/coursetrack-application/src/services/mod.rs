//! Application layer services
//!
//! These services orchestrate the completion record, the aggregation rule
//! and the ports. Every service is request-scoped and uses constructor
//! injection for its dependencies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Services                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CompletionService        - Record transitions, aggregation  │
//! │  EnrolmentService         - Start on enrol, bulk start       │
//! │  ReaggregationService     - Flagged record sweeps            │
//! │  CompletionReportService  - Per-user status report           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The other services wrap a [`CompletionService`]; build them with
//! `with_completion` to share one settings cache across a request.

mod completion_service;
mod enrolment_service;
mod reaggregation_service;
mod report_service;

#[cfg(test)]
pub(crate) mod testing;

pub use completion_service::CompletionService;
pub use enrolment_service::EnrolmentService;
pub use reaggregation_service::ReaggregationService;
pub use report_service::CompletionReportService;
