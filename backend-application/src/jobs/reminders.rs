use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use backend_domain::{
    wants_upcoming_reminder, wants_waste_reminder, Event, EventStatus, NotificationFact,
};

use crate::{AppError, AppState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub upcoming_sent: usize,
    pub waste_sent: usize,
    pub failed_events: usize,
}

impl fmt::Display for ReminderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upcoming_sent={} waste_sent={} failed_events={}",
            self.upcoming_sent, self.waste_sent, self.failed_events
        )
    }
}

/// Daily notification pass: lead-time reminders for upcoming events and
/// upload nudges for volunteers who have not logged waste yet.
pub async fn run_reminder_pass(state: &AppState, now: DateTime<Utc>) -> Result<ReminderReport, AppError> {
    let offset = state.config.event_offset();
    let today = now.with_timezone(&offset).date_naive();
    let events = state.event_repo.list_events(None).await.map_err(|err| {
        error!(error = %err, "failed to list events for reminders");
        AppError::Internal(err)
    })?;

    let mut report = ReminderReport::default();
    for event in &events {
        if wants_upcoming_reminder(event, today, state.config.reminder_days_before_event) {
            match send_upcoming_reminders(state, event).await {
                Ok(sent) => report.upcoming_sent += sent,
                Err(err) => {
                    warn!(event_id = %event.id, error = %err, "upcoming reminders failed");
                    report.failed_events += 1;
                }
            }
        } else if wants_waste_reminder(event, today, state.config.reminder_days_after_event, offset) {
            match send_waste_reminders(state, event).await {
                Ok(sent) => report.waste_sent += sent,
                Err(err) => {
                    warn!(event_id = %event.id, error = %err, "waste upload reminders failed");
                    report.failed_events += 1;
                }
            }
        }
    }

    state
        .metrics
        .record_notifications(report.upcoming_sent + report.waste_sent);
    info!(
        upcoming = report.upcoming_sent,
        waste = report.waste_sent,
        failed = report.failed_events,
        "reminder pass finished"
    );
    Ok(report)
}

async fn send_upcoming_reminders(state: &AppState, event: &Event) -> anyhow::Result<usize> {
    let volunteers = state
        .volunteer_repo
        .fetch_volunteers(&event.registered_volunteers)
        .await?;
    let event_link = format!("{}/events/{}", state.config.public_base_url, event.id);
    let mut sent = 0;
    for volunteer in volunteers.into_iter().filter(|v| !v.email.is_empty()) {
        state.notifier.dispatch(NotificationFact::UpcomingEventReminder {
            event_id: event.id,
            event_name: event.name.clone(),
            volunteer_id: volunteer.id,
            email: volunteer.email,
            event_link: event_link.clone(),
        });
        sent += 1;
    }
    Ok(sent)
}

async fn send_waste_reminders(state: &AppState, event: &Event) -> anyhow::Result<usize> {
    let mut pending = Vec::new();
    for volunteer_id in &event.registered_volunteers {
        if !state.waste_repo.has_submission(event.id, *volunteer_id).await? {
            pending.push(*volunteer_id);
        }
    }
    if pending.is_empty() {
        return Ok(0);
    }
    let volunteers = state.volunteer_repo.fetch_volunteers(&pending).await?;
    let upload_link = format!(
        "{}/events/{}/upload-waste",
        state.config.public_base_url, event.id
    );
    let mut sent = 0;
    for volunteer in volunteers.into_iter().filter(|v| !v.email.is_empty()) {
        state.notifier.dispatch(NotificationFact::WasteUploadReminder {
            event_id: event.id,
            event_name: event.name.clone(),
            volunteer_id: volunteer.id,
            email: volunteer.email,
            upload_link: upload_link.clone(),
        });
        sent += 1;
    }
    if event.status == EventStatus::Ongoing && sent > 0 {
        info!(event_id = %event.id, sent, "nudged volunteers during ongoing event");
    }
    Ok(sent)
}
