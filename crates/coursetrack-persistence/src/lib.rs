//! coursetrack Persistence Layer
//!
//! Infrastructure layer providing implementations of the repository and
//! source interfaces defined in `coursetrack-domain`.
//!
//! ## Features
//!
//! - **In-Memory Implementations**: thread-safe tables for the completion
//!   repository, enrolment source, criteria source and course catalog
//! - **Snapshots**: the whole store as one JSON document, so a CLI run can
//!   load state, act on it and write it back
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Infrastructure Layer                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  memory/                         │  snapshot / store             │
//! │  ─────────                       │  ────────────────             │
//! │  InMemoryCompletionRepository    │  Snapshot (JSON)              │
//! │  InMemoryEnrolmentSource         │  CompletionRow (0 = unset)    │
//! │  InMemoryCriteriaSource          │  InMemoryStore                │
//! │  InMemoryCourseCatalog           │                               │
//! └─────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ implements
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                               │
//! │  CompletionRepository, EnrolmentSource, CriteriaSource, Catalog  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use coursetrack_persistence::{InMemoryStore, Snapshot};
//! use coursetrack_domain::repositories::CompletionRepository;
//! use std::sync::Arc;
//!
//! let store = InMemoryStore::from_snapshot(Snapshot::load(path)?, true);
//! let repo: Arc<dyn CompletionRepository> = store.completions.clone();
//! ```

pub mod error;
pub mod memory;
pub mod row;
pub mod snapshot;
pub mod store;

pub use error::PersistenceError;

// Re-export commonly used types
pub use memory::{
    InMemoryCompletionRepository, InMemoryCourseCatalog, InMemoryCriteriaSource,
    InMemoryEnrolmentSource,
};
pub use row::CompletionRow;
pub use snapshot::Snapshot;
pub use store::InMemoryStore;
