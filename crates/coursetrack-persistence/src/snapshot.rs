//! JSON snapshot of the whole in-memory store
//!
//! Completion records use the stored row shape (Unix seconds, `0` for
//! unset); the other tables use their natural serde form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use coursetrack_domain::completion::CourseCompletionSettings;
use coursetrack_domain::entities::{Course, EnrolmentWindow, User};
use coursetrack_domain::value_objects::CourseId;

use crate::error::PersistenceError;
use crate::memory::{CriterionCompletionEntry, CriterionDefinition, TypeMethod};
use crate::row::CompletionRow;

/// Completion settings of one course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSettingsEntry {
    pub course_id: CourseId,
    #[serde(flatten)]
    pub settings: CourseCompletionSettings,
}

/// Every table of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub settings: Vec<CourseSettingsEntry>,
    #[serde(default)]
    pub criteria: Vec<CriterionDefinition>,
    #[serde(default)]
    pub methods: Vec<TypeMethod>,
    #[serde(default)]
    pub criterion_completions: Vec<CriterionCompletionEntry>,
    #[serde(default)]
    pub enrolments: Vec<EnrolmentWindow>,
    #[serde(default)]
    pub completions: Vec<CompletionRow>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(|e| PersistenceError::Deserialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    /// Read a snapshot file
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        debug!(path = %path.display(), "loading snapshot");
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursetrack_domain::completion::AggregationMethod;

    const SAMPLE: &str = r#"{
        "courses": [{"id": 10, "short_name": "ALG", "full_name": "Algebra"}],
        "settings": [{"course_id": 10, "enabled": true, "aggregation_method": "any"}],
        "completions": [
            {"id": 1, "userid": 3, "course": 10, "timeenrolled": 100, "timestarted": 0,
             "timecompleted": 0, "reaggregate": 0, "version": 1}
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        assert_eq!(snapshot.courses.len(), 1);
        assert!(snapshot.users.is_empty());
        assert_eq!(
            snapshot.settings[0].settings,
            CourseCompletionSettings::enabled(AggregationMethod::Any)
        );
        assert_eq!(snapshot.completions[0].timestarted, 0);
    }

    #[test]
    fn test_rows_keep_zero_columns() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["completions"][0]["timecompleted"], 0);
        assert_eq!(json["completions"][0]["timeenrolled"], 100);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();

        snapshot.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_bad_json_is_a_deserialization_error() {
        let err = Snapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Deserialization(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
