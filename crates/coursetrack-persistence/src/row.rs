//! Stored shape of a completion record
//!
//! Timestamps are Unix seconds and `0` stands for "not set", matching the
//! column layout of the completions table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursetrack_domain::completion::CompletionRecord;
use coursetrack_domain::value_objects::{CompletionId, CourseId, UserId};

use crate::error::PersistenceError;

/// One row of the completions table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRow {
    pub id: i64,
    pub userid: i64,
    pub course: i64,
    #[serde(default)]
    pub timeenrolled: i64,
    #[serde(default)]
    pub timestarted: i64,
    #[serde(default)]
    pub timecompleted: i64,
    #[serde(default)]
    pub reaggregate: i64,
    #[serde(default)]
    pub version: u64,
}

impl CompletionRow {
    /// Row for a record stored under `id` with `version`
    pub fn from_record(record: &CompletionRecord, id: CompletionId, version: u64) -> Self {
        Self {
            id: id.get(),
            userid: record.user_id().get(),
            course: record.course_id().get(),
            timeenrolled: to_secs(record.time_enrolled()),
            timestarted: to_secs(record.time_started()),
            timecompleted: to_secs(record.time_completed()),
            reaggregate: to_secs(record.reaggregate()),
            version,
        }
    }

    pub fn to_record(&self) -> Result<CompletionRecord, PersistenceError> {
        Ok(CompletionRecord::reconstitute(
            CompletionId::new(self.id),
            UserId::new(self.userid),
            CourseId::new(self.course),
            from_secs(self.timeenrolled)?,
            from_secs(self.timestarted)?,
            from_secs(self.timecompleted)?,
            from_secs(self.reaggregate)?,
            self.version,
        ))
    }
}

fn to_secs(time: Option<DateTime<Utc>>) -> i64 {
    time.map_or(0, |t| t.timestamp())
}

fn from_secs(secs: i64) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    if secs <= 0 {
        return Ok(None);
    }
    DateTime::from_timestamp(secs, 0)
        .map(Some)
        .ok_or_else(|| PersistenceError::InvalidRow(format!("timestamp out of range: {}", secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_unset_times_stored_as_zero() {
        let mut record = CompletionRecord::new(UserId::new(4), CourseId::new(7));
        record.mark_enrolled(at(100));

        let row = CompletionRow::from_record(&record, CompletionId::new(1), 1);

        assert_eq!(row.userid, 4);
        assert_eq!(row.course, 7);
        assert_eq!(row.timeenrolled, 100);
        assert_eq!(row.timestarted, 0);
        assert_eq!(row.timecompleted, 0);
        assert_eq!(row.reaggregate, 0);
    }

    #[test]
    fn test_zero_reads_back_as_unset() {
        let row = CompletionRow {
            id: 3,
            userid: 1,
            course: 2,
            timeenrolled: 50,
            timestarted: 0,
            timecompleted: 0,
            reaggregate: 0,
            version: 2,
        };
        let record = row.to_record().unwrap();
        assert_eq!(record.id(), Some(CompletionId::new(3)));
        assert_eq!(record.time_enrolled(), Some(at(50)));
        assert_eq!(record.time_started(), None);
        assert_eq!(record.version(), 2);
    }

    #[test]
    fn test_missing_columns_default_to_unset() {
        let row: CompletionRow =
            serde_json::from_str(r#"{"id": 1, "userid": 2, "course": 3}"#).unwrap();
        assert_eq!(row.timeenrolled, 0);
        assert!(!row.to_record().unwrap().is_complete());
    }

    #[test]
    fn test_non_positive_times_read_back_as_unset() {
        let row = CompletionRow {
            id: 1,
            userid: 1,
            course: 1,
            timeenrolled: -30,
            timestarted: 0,
            timecompleted: -1,
            reaggregate: 0,
            version: 1,
        };
        let record = row.to_record().unwrap();
        assert_eq!(record.time_enrolled(), None);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        let row = CompletionRow {
            id: 1,
            userid: 1,
            course: 1,
            timeenrolled: i64::MAX,
            timestarted: 0,
            timecompleted: 0,
            reaggregate: 0,
            version: 1,
        };
        assert!(matches!(row.to_record(), Err(PersistenceError::InvalidRow(_))));
    }
}
