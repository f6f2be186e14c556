//! Enrolment Application Service
//!
//! Starts completion tracking when users enrol, one at a time or for a whole
//! course at once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use coursetrack_domain::completion::{known_time, CompletionRecord};
use coursetrack_domain::entities::EnrolmentWindow;
use coursetrack_domain::errors::DomainError;
use coursetrack_domain::value_objects::{CourseId, UserId};

use crate::dto::{BulkStartSummary, EnrolmentOutcome, IgnoreReason, UserEnrolled};
use crate::errors::ApplicationResult;
use crate::events::ApplicationEvent;
use crate::ports::CompletionPorts;
use crate::services::CompletionService;

/// Enrolment Application Service
pub struct EnrolmentService {
    completion: CompletionService,
}

impl EnrolmentService {
    pub fn new(ports: CompletionPorts) -> Self {
        Self {
            completion: CompletionService::new(ports),
        }
    }

    /// Build on an existing completion service, sharing its settings cache
    pub fn with_completion(completion: CompletionService) -> Self {
        Self { completion }
    }

    pub fn completion(&self) -> &CompletionService {
        &self.completion
    }

    /// Handle a user-enrolled event
    ///
    /// Only courses that start users on enrolment are affected. Unknown
    /// courses and users are logged and ignored.
    pub async fn handle_user_enrolled(
        &self,
        event: UserEnrolled,
    ) -> ApplicationResult<EnrolmentOutcome> {
        let ports = self.completion.ports();

        if ports.catalog.find_course(event.course_id).await?.is_none() {
            warn!(course_id = %event.course_id, "enrolment event for unknown course");
            return Ok(EnrolmentOutcome::Ignored(IgnoreReason::UnknownCourse));
        }
        if ports.catalog.find_user(event.user_id).await?.is_none() {
            warn!(user_id = %event.user_id, "enrolment event for unknown user");
            return Ok(EnrolmentOutcome::Ignored(IgnoreReason::UnknownUser));
        }

        let settings = match self.completion.settings(event.course_id).await? {
            Some(settings) if settings.enabled => settings,
            _ => return Ok(EnrolmentOutcome::Ignored(IgnoreReason::CompletionDisabled)),
        };
        if !settings.start_on_enrol {
            debug!(course_id = %event.course_id, "course does not start users on enrolment");
            return Ok(EnrolmentOutcome::Ignored(IgnoreReason::StartOnEnrolDisabled));
        }

        let time = self.completion.time_or_now(event.time_start);
        let mut record = self
            .completion
            .load_or_new(event.user_id, event.course_id)
            .await?;
        record.mark_enrolled(time);
        record.mark_in_progress(time);

        info!(user_id = %event.user_id, course_id = %event.course_id, "user started on enrolment");
        let outcome = self.completion.aggregate_record(record).await?;
        Ok(EnrolmentOutcome::Started(outcome))
    }

    /// Create completion records for every live participant of a course
    ///
    /// Users that already have a record are left untouched, so running this
    /// twice creates nothing the second time.
    pub async fn start_users_bulk(&self, course_id: CourseId) -> ApplicationResult<BulkStartSummary> {
        let ports = self.completion.ports();
        let settings = match self.completion.settings(course_id).await? {
            Some(settings) if settings.enabled => settings,
            Some(_) => {
                info!(course_id = %course_id, "completion disabled, nothing to start");
                return Ok(BulkStartSummary::default());
            }
            None => {
                warn!(course_id = %course_id, "bulk start for unknown course");
                return Ok(BulkStartSummary::default());
            }
        };

        let now = self.completion.now();
        let windows = ports.enrolments.course_enrolments(course_id).await?;
        let mut summary = BulkStartSummary::default();

        for (user_id, earliest) in live_participants(&windows, now) {
            if ports.repository.find(user_id, course_id).await?.is_some() {
                summary.skipped += 1;
                continue;
            }

            let mut record = CompletionRecord::new(user_id, course_id);
            record.mark_enrolled(earliest.unwrap_or(now));
            if settings.start_on_enrol {
                record.mark_in_progress(now);
            }

            match ports.repository.insert(&record).await {
                Ok(_) => summary.created += 1,
                // Created between the lookup and the insert
                Err(DomainError::DuplicateEntity { .. }) => summary.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            course_id = %course_id,
            created = summary.created,
            skipped = summary.skipped,
            "bulk start finished"
        );
        if summary.created > 0 {
            ports
                .events
                .publish(ApplicationEvent::UsersStarted {
                    course_id,
                    created: summary.created,
                    timestamp: now,
                })
                .await;
        }

        Ok(summary)
    }
}

/// Users with a live enrolment, with the earliest start among their live
/// windows that carry one
fn live_participants(
    windows: &[EnrolmentWindow],
    now: DateTime<Utc>,
) -> BTreeMap<UserId, Option<DateTime<Utc>>> {
    let mut users: BTreeMap<UserId, Option<DateTime<Utc>>> = BTreeMap::new();
    for window in windows.iter().filter(|w| w.is_live(now)) {
        let earliest = users.entry(window.user_id).or_insert(None);
        if let Some(start) = known_time(window.time_start) {
            *earliest = Some(earliest.map_or(start, |e| e.min(start)));
        }
    }
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CompletionOutcome;
    use crate::services::testing::*;
    use coursetrack_domain::completion::{AggregationMethod, CourseCompletionSettings};
    use coursetrack_domain::repositories::CompletionRepository;

    fn start_on_enrol_course(h: &Harness, course: i64) {
        h.settings(
            course,
            CourseCompletionSettings::enabled(AggregationMethod::All).with_start_on_enrol(true),
        );
    }

    #[tokio::test]
    async fn test_enrolment_starts_user_at_enrolment_time() {
        let h = Harness::new(5000);
        start_on_enrol_course(&h, 10);
        h.user(1, "learner");
        let service = EnrolmentService::new(h.ports());

        let outcome = service
            .handle_user_enrolled(UserEnrolled {
                user_id: uid(1),
                course_id: cid(10),
                time_start: Some(at(4000)),
            })
            .await
            .unwrap();

        let EnrolmentOutcome::Started(CompletionOutcome::Saved(record)) = outcome else {
            panic!("expected a started record");
        };
        assert_eq!(record.time_enrolled(), Some(at(4000)));
        assert_eq!(record.time_started(), Some(at(4000)));
        assert_eq!(record.time_completed(), None);
    }

    #[tokio::test]
    async fn test_enrolment_without_start_time_uses_now() {
        let h = Harness::new(5000);
        start_on_enrol_course(&h, 10);
        h.user(1, "learner");
        let service = EnrolmentService::new(h.ports());

        let outcome = service
            .handle_user_enrolled(UserEnrolled {
                user_id: uid(1),
                course_id: cid(10),
                time_start: None,
            })
            .await
            .unwrap();

        let EnrolmentOutcome::Started(started) = outcome else {
            panic!("expected a started record");
        };
        assert_eq!(started.record().unwrap().time_started(), Some(at(5000)));
    }

    #[tokio::test]
    async fn test_epoch_enrolment_times_use_now() {
        let h = Harness::new(5000);
        start_on_enrol_course(&h, 10);
        h.user(1, "learner");
        h.enrol(2, 10, 0);
        let service = EnrolmentService::new(h.ports());

        let outcome = service
            .handle_user_enrolled(UserEnrolled {
                user_id: uid(1),
                course_id: cid(10),
                time_start: Some(at(0)),
            })
            .await
            .unwrap();
        let EnrolmentOutcome::Started(started) = outcome else {
            panic!("expected a started record");
        };
        let record = started.record().unwrap();
        assert_eq!(record.time_enrolled(), Some(at(5000)));
        assert_eq!(record.time_started(), Some(at(5000)));

        service.start_users_bulk(cid(10)).await.unwrap();
        let seeded = h.repository.find(uid(2), cid(10)).await.unwrap().unwrap();
        assert_eq!(seeded.time_enrolled(), Some(at(5000)));
    }

    #[tokio::test]
    async fn test_enrolment_ignored_cases() {
        let h = Harness::new(5000);
        h.user(1, "learner");
        h.course(10, AggregationMethod::All);
        h.disabled_course(11);
        let service = EnrolmentService::new(h.ports());

        let enrolled = |course| UserEnrolled {
            user_id: uid(1),
            course_id: cid(course),
            time_start: None,
        };

        assert_eq!(
            service.handle_user_enrolled(enrolled(99)).await.unwrap(),
            EnrolmentOutcome::Ignored(IgnoreReason::UnknownCourse)
        );
        assert_eq!(
            service.handle_user_enrolled(enrolled(11)).await.unwrap(),
            EnrolmentOutcome::Ignored(IgnoreReason::CompletionDisabled)
        );
        assert_eq!(
            service.handle_user_enrolled(enrolled(10)).await.unwrap(),
            EnrolmentOutcome::Ignored(IgnoreReason::StartOnEnrolDisabled)
        );

        let unknown_user = UserEnrolled {
            user_id: uid(2),
            course_id: cid(10),
            time_start: None,
        };
        assert_eq!(
            service.handle_user_enrolled(unknown_user).await.unwrap(),
            EnrolmentOutcome::Ignored(IgnoreReason::UnknownUser)
        );
        assert!(h.repository.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_start_seeds_live_participants() {
        let h = Harness::new(1000);
        start_on_enrol_course(&h, 10);
        h.enrol(1, 10, 300);
        h.enrol(1, 10, 200);
        h.window(EnrolmentWindow::active(uid(2), cid(10)));
        h.window(EnrolmentWindow::active(uid(3), cid(10)).starting(at(100)).ending(at(500)));
        h.window(EnrolmentWindow::active(uid(4), cid(10)).suspended());
        h.enrol(5, 10, 2000);
        let service = EnrolmentService::new(h.ports());

        let summary = service.start_users_bulk(cid(10)).await.unwrap();

        assert_eq!(summary, BulkStartSummary { created: 3, skipped: 0 });
        let repo = &h.repository;
        let first = repo.find(uid(1), cid(10)).await.unwrap().unwrap();
        assert_eq!(first.time_enrolled(), Some(at(200)));
        assert_eq!(first.time_started(), Some(at(1000)));
        assert_eq!(first.reaggregate(), None);
        let open = repo.find(uid(2), cid(10)).await.unwrap().unwrap();
        assert_eq!(open.time_enrolled(), Some(at(1000)));
        // Future enrolments are seeded with their start time
        let future = repo.find(uid(5), cid(10)).await.unwrap().unwrap();
        assert_eq!(future.time_enrolled(), Some(at(2000)));
        assert!(repo.find(uid(3), cid(10)).await.unwrap().is_none());
        assert!(repo.find(uid(4), cid(10)).await.unwrap().is_none());
        assert_eq!(h.events.count("UsersStarted"), 1);
    }

    #[tokio::test]
    async fn test_bulk_start_is_idempotent() {
        let h = Harness::new(1000);
        h.course(10, AggregationMethod::All);
        h.enrol(1, 10, 100);
        h.enrol(2, 10, 100);
        let service = EnrolmentService::new(h.ports());

        let first = service.start_users_bulk(cid(10)).await.unwrap();
        let second = service.start_users_bulk(cid(10)).await.unwrap();

        assert_eq!(first.created, 2);
        assert_eq!(second, BulkStartSummary { created: 0, skipped: 2 });
        assert_eq!(h.repository.len(), 2);
        let record = h.repository.find(uid(1), cid(10)).await.unwrap().unwrap();
        assert_eq!(record.time_started(), None);
        assert_eq!(h.events.count("UsersStarted"), 1);
    }

    #[tokio::test]
    async fn test_bulk_start_keeps_existing_records() {
        let h = Harness::new(1000);
        h.course(10, AggregationMethod::All);
        h.enrol(1, 10, 100);
        let mut existing = CompletionRecord::new(uid(1), cid(10));
        existing.mark_enrolled(at(50));
        h.repository.seed(existing);
        let service = EnrolmentService::new(h.ports());

        let summary = service.start_users_bulk(cid(10)).await.unwrap();

        assert_eq!(summary, BulkStartSummary { created: 0, skipped: 1 });
        let record = h.repository.find(uid(1), cid(10)).await.unwrap().unwrap();
        assert_eq!(record.time_enrolled(), Some(at(50)));
    }

    #[tokio::test]
    async fn test_bulk_start_on_disabled_course_does_nothing() {
        let h = Harness::new(1000);
        h.disabled_course(10);
        h.enrol(1, 10, 100);
        let service = EnrolmentService::new(h.ports());

        let summary = service.start_users_bulk(cid(10)).await.unwrap();
        assert_eq!(summary, BulkStartSummary::default());
        assert!(h.repository.is_empty());

        let unknown = service.start_users_bulk(cid(77)).await.unwrap();
        assert_eq!(unknown, BulkStartSummary::default());
    }
}
