use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use backend_domain::{resolve_status, NotificationFact};

use crate::{AppError, AppState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    pub scanned: usize,
    pub updated: usize,
    pub failed: usize,
}

impl fmt::Display for TransitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned={} updated={} failed={}",
            self.scanned, self.updated, self.failed
        )
    }
}

/// Recomputes every event's status from `now` and persists the ones that changed.
///
/// A failure on one event is logged and counted; only failing to list events
/// aborts the pass.
pub async fn run_status_pass(state: &AppState, now: DateTime<Utc>) -> Result<TransitionReport, AppError> {
    let events = state.event_repo.list_events(None).await.map_err(|err| {
        error!(error = %err, "failed to list events for status pass");
        AppError::Internal(err)
    })?;
    let offset = state.config.event_offset();
    let mut report = TransitionReport {
        scanned: events.len(),
        ..TransitionReport::default()
    };

    for event in events {
        let next = match resolve_status(&event, now, offset) {
            Ok(status) => status,
            Err(err) => {
                warn!(event_id = %event.id, error = %err, "event schedule is unparsable, skipping");
                report.failed += 1;
                continue;
            }
        };
        if next == event.status {
            continue;
        }
        match state.event_repo.update_status(event.id, next).await {
            Ok(true) => {
                report.updated += 1;
                info!(
                    event_id = %event.id,
                    event_name = %event.name,
                    from = %event.status,
                    to = %next,
                    "event status updated"
                );
                state.notifier.dispatch(NotificationFact::EventTransitioned {
                    event_id: event.id,
                    event_name: event.name.clone(),
                    from: event.status,
                    to: next,
                });
                state.metrics.record_notifications(1);
            }
            Ok(false) => {
                debug!(event_id = %event.id, status = %next, "status already current");
            }
            Err(err) => {
                error!(event_id = %event.id, error = %err, "failed to persist event status");
                report.failed += 1;
            }
        }
    }

    state.metrics.record_transitions(report.updated, report.failed);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::EventStatus;

    use crate::test_support::{at, seed_event, TestHarness};

    #[tokio::test]
    async fn pass_sets_status_from_clock_regardless_of_stored_value() {
        let harness = TestHarness::new().await;
        let upcoming = seed_event(&harness, "09:00", "12:00", EventStatus::Completed).await;
        let ongoing = seed_event(&harness, "06:00", "11:00", EventStatus::Upcoming).await;
        let completed = seed_event(&harness, "05:00", "07:00", EventStatus::Ongoing).await;

        let report = run_status_pass(&harness.state, at(8, 0)).await.expect("pass");
        assert_eq!(report.scanned, 3);
        assert_eq!(report.updated, 3);
        assert_eq!(report.failed, 0);

        assert_eq!(harness.status_of(upcoming).await, EventStatus::Upcoming);
        assert_eq!(harness.status_of(ongoing).await, EventStatus::Ongoing);
        assert_eq!(harness.status_of(completed).await, EventStatus::Completed);
        assert_eq!(harness.notifier.kinds(), vec!["event_transitioned"; 3]);
    }

    #[tokio::test]
    async fn second_pass_without_time_advance_writes_nothing() {
        let harness = TestHarness::new().await;
        seed_event(&harness, "06:00", "11:00", EventStatus::Upcoming).await;
        seed_event(&harness, "05:00", "07:00", EventStatus::Upcoming).await;

        let first = run_status_pass(&harness.state, at(8, 0)).await.expect("first");
        assert_eq!(first.updated, 2);
        let writes = harness.status_writes();

        let second = run_status_pass(&harness.state, at(8, 0)).await.expect("second");
        assert_eq!(second.updated, 0);
        assert_eq!(harness.status_writes(), writes);
    }

    #[tokio::test]
    async fn unparsable_schedule_does_not_abort_batch() {
        let harness = TestHarness::new().await;
        let broken = seed_event(&harness, "dawn", "11:00", EventStatus::Upcoming).await;
        let fine = seed_event(&harness, "05:00", "07:00", EventStatus::Upcoming).await;

        let report = run_status_pass(&harness.state, at(8, 0)).await.expect("pass");
        assert_eq!(report.failed, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(harness.status_of(broken).await, EventStatus::Upcoming);
        assert_eq!(harness.status_of(fine).await, EventStatus::Completed);
    }

    #[tokio::test]
    async fn store_failure_for_one_event_is_isolated() {
        let harness = TestHarness::new().await;
        let failing = seed_event(&harness, "05:00", "07:00", EventStatus::Upcoming).await;
        let healthy = seed_event(&harness, "06:00", "07:30", EventStatus::Upcoming).await;
        harness.fail_status_updates_for(failing);

        let report = run_status_pass(&harness.state, at(8, 0)).await.expect("pass");
        assert_eq!(report.failed, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(harness.status_of(healthy).await, EventStatus::Completed);
    }
}
