use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use backend_domain::{aggregate_impact, Event, EventId, EventStatus, ImpactSummary, InsertOutcome};

use crate::{AppError, AppState};

#[derive(Debug, Clone)]
pub enum ImpactOutcome {
    Created(ImpactSummary),
    AlreadyExists,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub completed_events: usize,
    pub created: usize,
    pub already_present: usize,
}

impl fmt::Display for ImpactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "completed_events={} created={} already_present={}",
            self.completed_events, self.created, self.already_present
        )
    }
}

/// Creates the impact summary for a completed event at most once.
///
/// The existence check is only a shortcut; the store's unique key on the event id
/// decides, and losing that race is reported as `AlreadyExists`.
pub async fn generate_impact(
    state: &AppState,
    event: &Event,
    now: DateTime<Utc>,
) -> Result<ImpactOutcome> {
    if state.impact_repo.fetch_summary(event.id).await?.is_some() {
        debug!(event_id = %event.id, "impact summary already present");
        return Ok(ImpactOutcome::AlreadyExists);
    }

    let records = state.waste_repo.fetch_by_event(event.id).await?;
    let summary = {
        let coefficients = state.coefficients.read().await;
        aggregate_impact(
            event.id,
            event.volunteer_register_count,
            &records,
            &coefficients,
            now,
        )
    };

    match state.impact_repo.insert_if_absent(&summary).await? {
        InsertOutcome::Created => {
            state.metrics.record_impact_created();
            info!(
                event_id = %event.id,
                total_weight = summary.total_weight,
                co2_offset = summary.co2_offset_estimate,
                groups = summary.weight_by_category_and_type.len(),
                "impact summary generated"
            );
            Ok(ImpactOutcome::Created(summary))
        }
        InsertOutcome::AlreadyExists => {
            state.metrics.record_impact_duplicate();
            debug!(event_id = %event.id, "impact summary created concurrently, keeping existing");
            Ok(ImpactOutcome::AlreadyExists)
        }
    }
}

/// Summarizes every completed event that has no summary yet. A store failure ends the pass.
pub async fn finalize_completed_events(
    state: &AppState,
    now: DateTime<Utc>,
) -> Result<ImpactReport, AppError> {
    let events = state
        .event_repo
        .list_events(Some(EventStatus::Completed))
        .await
        .map_err(|err| {
            error!(error = %err, "failed to list completed events");
            AppError::Internal(err)
        })?;

    let mut report = ImpactReport {
        completed_events: events.len(),
        ..ImpactReport::default()
    };
    for event in &events {
        let outcome = generate_impact(state, event, now).await.map_err(|err| {
            error!(event_id = %event.id, error = %err, "impact generation failed");
            AppError::Internal(err)
        })?;
        match outcome {
            ImpactOutcome::Created(_) => report.created += 1,
            ImpactOutcome::AlreadyExists => report.already_present += 1,
        }
    }
    Ok(report)
}

/// On-demand generation for one event; the event must already be completed.
pub async fn generate_impact_for(
    state: &AppState,
    event_id: EventId,
    now: DateTime<Utc>,
) -> Result<ImpactOutcome, AppError> {
    let event = state
        .event_repo
        .fetch_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("event".to_string()))?;
    if event.status != EventStatus::Completed {
        return Err(AppError::BadRequest(format!(
            "event is {}, impact is generated after completion",
            event.status
        )));
    }
    Ok(generate_impact(state, &event, now).await?)
}
