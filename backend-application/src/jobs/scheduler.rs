use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info};

use backend_domain::{JobKind, RuntimeConfig};

use crate::jobs::{run_job, run_status_tick};
use crate::AppState;

/// Owns the background job loops. Built and started by the process entry point.
pub struct JobScheduler {
    state: AppState,
}

pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                error!(error = %err, "scheduler task panicked");
            }
        }
    }
}

impl JobScheduler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn start(self, shutdown: watch::Receiver<bool>) -> SchedulerHandle {
        let status_task = tokio::spawn(status_loop(self.state.clone(), shutdown.clone()));
        let reminder_task = tokio::spawn(reminder_loop(self.state, shutdown));
        SchedulerHandle {
            tasks: vec![status_task, reminder_task],
        }
    }
}

async fn status_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let period = Duration::from_secs(state.config.status_job_interval_seconds.max(1));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_seconds = period.as_secs(), "status transition job started");

    loop {
        tokio::select! {
            _ = ticker.tick() => run_status_tick(&state, Utc::now()).await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("status transition job stopped");
}

async fn reminder_loop(state: AppState, mut shutdown: watch::Receiver<bool>) {
    info!(
        hour = state.config.reminder_hour,
        minute = state.config.reminder_minute,
        "reminder job started"
    );
    loop {
        let now = Utc::now();
        let next = next_reminder_time(&state.config, now);
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::select! {
            _ = sleep(wait) => {
                if let Err(err) = run_job(&state, JobKind::Reminders, Utc::now()).await {
                    error!(error = %err, "reminder tick failed");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("reminder job stopped");
}

/// Next daily reminder instant strictly after `now`, in the event offset.
pub fn next_reminder_time(config: &RuntimeConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = config.event_offset();
    let local_now = now.with_timezone(&offset);
    let today = local_now.date_naive();
    let candidate = today
        .and_hms_opt(config.reminder_hour, config.reminder_minute, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single());
    match candidate {
        Some(time) if time > local_now => time.with_timezone(&Utc),
        Some(time) => (time + ChronoDuration::days(1)).with_timezone(&Utc),
        None => now + ChronoDuration::days(1),
    }
}
