//! Data transfer objects returned by the application services

mod completion;
mod report;

pub use completion::*;
pub use report::*;
