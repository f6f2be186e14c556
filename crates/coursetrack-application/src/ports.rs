//! Port bundle handed to the application services
//!
//! Infrastructure Layer provides the implementations; the services only see
//! the domain traits.

use std::sync::Arc;

use coursetrack_domain::ports::{Clock, CourseCatalog, CriteriaSource, EnrolmentSource};
use coursetrack_domain::repositories::CompletionRepository;

use crate::events::EventPublisher;

/// Collaborators of the completion services
#[derive(Clone)]
pub struct CompletionPorts {
    pub repository: Arc<dyn CompletionRepository>,
    pub enrolments: Arc<dyn EnrolmentSource>,
    pub criteria: Arc<dyn CriteriaSource>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub events: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}
