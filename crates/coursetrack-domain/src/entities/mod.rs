//! Supporting entities read from external sources
//!
//! - `course`: course and user identity records
//! - `enrolment`: enrolment windows of a user in a course

mod course;
mod enrolment;

pub use course::*;
pub use enrolment::*;
