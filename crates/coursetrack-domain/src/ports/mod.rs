//! Port interfaces for external collaborators
//!
//! Ports define the contracts for the systems completion tracking reads from.
//! These are implemented by infrastructure crates.
//!
//! ## Modules
//!
//! - `clock`: time source
//! - `sources`: enrolment, criteria and course catalog sources

pub mod clock;
pub mod sources;

pub use clock::*;
pub use sources::*;
