use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use backend_domain::JobKind;

use crate::jobs::{finalize_completed_events, run_reminder_pass, run_status_pass};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Serialize)]
pub struct JobRunOutcome {
    pub job: JobKind,
    pub skipped: bool,
    pub summary: Option<String>,
}

/// Runs one tick of `kind` behind its gate and records the result in the job status.
///
/// A tick that finds the previous one still running returns a skipped outcome.
pub async fn run_job(state: &AppState, kind: JobKind, now: DateTime<Utc>) -> Result<JobRunOutcome, AppError> {
    let Some(_guard) = state.job_gates.gate(kind).try_enter() else {
        warn!(job = kind.as_str(), "previous run still in progress, skipping tick");
        state.metrics.record_job_skipped();
        state.job_status.write().await.progress_mut(kind).skipped += 1;
        return Ok(JobRunOutcome {
            job: kind,
            skipped: true,
            summary: None,
        });
    };

    {
        let mut status = state.job_status.write().await;
        let progress = status.progress_mut(kind);
        progress.running = true;
        progress.last_started_at = Some(now);
    }
    state.metrics.record_job_tick();

    let result = match kind {
        JobKind::StatusTransition => run_status_pass(state, now).await.map(|r| r.to_string()),
        JobKind::ImpactGeneration => finalize_completed_events(state, now)
            .await
            .map(|r| r.to_string()),
        JobKind::Reminders => run_reminder_pass(state, now).await.map(|r| r.to_string()),
    };

    {
        let mut status = state.job_status.write().await;
        let progress = status.progress_mut(kind);
        progress.running = false;
        progress.runs += 1;
        progress.last_finished_at = Some(Utc::now());
        match &result {
            Ok(summary) => {
                progress.last_summary = Some(summary.clone());
                progress.last_error = None;
            }
            Err(err) => {
                progress.last_error = Some(err.to_string());
            }
        }
    }

    match result {
        Ok(summary) => {
            info!(job = kind.as_str(), %summary, "job tick finished");
            Ok(JobRunOutcome {
                job: kind,
                skipped: false,
                summary: Some(summary),
            })
        }
        Err(err) => {
            state.metrics.record_job_error();
            Err(err)
        }
    }
}

/// One scheduled status tick: transitions first, then the impact post-pass so
/// events completed in this tick are summarized in the same tick.
pub async fn run_status_tick(state: &AppState, now: DateTime<Utc>) {
    if let Err(err) = run_job(state, JobKind::StatusTransition, now).await {
        error!(error = %err, "status transition tick failed");
    }
    if let Err(err) = run_job(state, JobKind::ImpactGeneration, now).await {
        error!(error = %err, "impact generation tick failed");
    }
}
