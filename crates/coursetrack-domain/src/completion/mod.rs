//! Course completion: the per-user record and the criteria aggregation rule
//!
//! - `record`: `CompletionRecord` entity and its state transitions
//! - `criteria`: criterion completion inputs and course settings
//! - `aggregation`: three-valued fold and `CriteriaAggregator`

mod aggregation;
mod criteria;
mod record;

pub use aggregation::*;
pub use criteria::*;
pub use record::*;
