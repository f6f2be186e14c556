//! Request-scoped cache of course completion settings
//!
//! Aggregating many records of one course would otherwise ask the criteria
//! source for the same settings over and over. The cache lives as long as the
//! service that owns it; it is never shared between service instances.

use std::collections::HashMap;

use parking_lot::Mutex;

use coursetrack_domain::completion::CourseCompletionSettings;
use coursetrack_domain::value_objects::CourseId;

/// Map from course to its completion settings
#[derive(Debug, Default)]
pub struct CourseSettingsCache {
    entries: Mutex<HashMap<CourseId, CourseCompletionSettings>>,
}

impl CourseSettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, course_id: CourseId) -> Option<CourseCompletionSettings> {
        self.entries.lock().get(&course_id).copied()
    }

    pub fn insert(&self, course_id: CourseId, settings: CourseCompletionSettings) {
        self.entries.lock().insert(course_id, settings);
    }

    /// Drop one course, e.g. after its settings changed
    pub fn invalidate(&self, course_id: CourseId) {
        self.entries.lock().remove(&course_id);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetrack_domain::completion::AggregationMethod;

    #[test]
    fn test_insert_get_invalidate() {
        let cache = CourseSettingsCache::new();
        let course = CourseId::new(1);
        assert!(cache.get(course).is_none());

        let settings = CourseCompletionSettings::enabled(AggregationMethod::Any);
        cache.insert(course, settings);
        assert_eq!(cache.get(course), Some(settings));
        assert_eq!(cache.len(), 1);

        cache.invalidate(course);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = CourseSettingsCache::new();
        cache.insert(CourseId::new(1), CourseCompletionSettings::disabled());
        cache.insert(CourseId::new(2), CourseCompletionSettings::disabled());
        cache.clear();
        assert!(cache.is_empty());
    }
}
