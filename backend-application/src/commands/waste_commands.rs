use std::collections::HashMap;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use backend_domain::{
    EventId, VolunteerId, WasteKind, WasteRecord, WasteRecordId, WasteSubmission,
};

use crate::{AppError, AppState};

const MAX_BATCH_RECORDS: usize = 1000;
const REWARD_POINTS_PER_KG: f64 = 10.0;

pub async fn submit_waste(
    state: &AppState,
    submission: WasteSubmission,
    now: DateTime<Utc>,
) -> Result<WasteRecord, AppError> {
    submit_waste_batch(state, vec![submission], now)
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow!("waste insert returned no record")))
}

/// Validates and appends a batch to the ledger in one write, then credits volunteers.
pub async fn submit_waste_batch(
    state: &AppState,
    submissions: Vec<WasteSubmission>,
    now: DateTime<Utc>,
) -> Result<Vec<WasteRecord>, AppError> {
    if submissions.is_empty() {
        return Err(AppError::BadRequest("no waste records".to_string()));
    }
    if submissions.len() > MAX_BATCH_RECORDS {
        return Err(AppError::BadRequest(format!(
            "batch exceeds {} records",
            MAX_BATCH_RECORDS
        )));
    }

    let mut known_events: HashMap<EventId, bool> = HashMap::new();
    let mut records = Vec::with_capacity(submissions.len());
    for (index, submission) in submissions.into_iter().enumerate() {
        let record = build_record(submission, now)
            .map_err(|message| AppError::BadRequest(format!("record {}: {}", index, message)))?;
        let exists = match known_events.get(&record.event_id) {
            Some(exists) => *exists,
            None => {
                let exists = state.event_repo.fetch_event(record.event_id).await?.is_some();
                known_events.insert(record.event_id, exists);
                exists
            }
        };
        if !exists {
            return Err(AppError::NotFound(format!("event {}", record.event_id)));
        }
        records.push(record);
    }

    let mut finalized: HashMap<EventId, usize> = HashMap::new();
    for event_id in known_events.keys() {
        if state.impact_repo.fetch_summary(*event_id).await?.is_some() {
            finalized.insert(*event_id, 0);
        }
    }

    state.waste_repo.insert_records(&records).await?;
    state.metrics.record_waste(records.len());
    info!(records = records.len(), "waste records appended");

    for record in &records {
        if let Some(count) = finalized.get_mut(&record.event_id) {
            *count += 1;
        }
    }
    for (event_id, count) in finalized {
        state.metrics.record_late_waste(count);
        warn!(
            event_id = %event_id,
            records = count,
            "waste recorded after the impact summary was finalized; the summary will not include it"
        );
    }

    credit_volunteers(state, &records).await;
    Ok(records)
}

fn build_record(submission: WasteSubmission, now: DateTime<Utc>) -> Result<WasteRecord, String> {
    let kind = WasteKind::new(&submission.category, &submission.waste_type);
    if kind.is_blank() {
        return Err("category and type are required".to_string());
    }
    if !submission.weight.is_finite() || submission.weight <= 0.0 {
        return Err(format!("weight must be positive, got {}", submission.weight));
    }
    Ok(WasteRecord {
        id: WasteRecordId::new(),
        event_id: submission.event_id,
        volunteer_id: submission.volunteer_id,
        category: kind.category,
        waste_type: kind.waste_type,
        weight: submission.weight,
        bag_count: submission.bag_count,
        collected_at: submission.collected_at.unwrap_or(now),
    })
}

pub fn reward_points_for(weight: f64) -> u64 {
    (weight * REWARD_POINTS_PER_KG).floor().max(0.0) as u64
}

/// Ledger writes are already committed; a failed credit is logged, not returned.
async fn credit_volunteers(state: &AppState, records: &[WasteRecord]) {
    let mut credits: HashMap<VolunteerId, (f64, u64)> = HashMap::new();
    for record in records {
        if let Some(volunteer_id) = record.volunteer_id {
            let entry = credits.entry(volunteer_id).or_insert((0.0, 0));
            entry.0 += record.weight;
            entry.1 += reward_points_for(record.weight);
        }
    }
    for (volunteer_id, (weight, points)) in credits {
        match state
            .volunteer_repo
            .credit_collection(volunteer_id, weight, points)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(volunteer_id = %volunteer_id, "waste credited to unknown volunteer"),
            Err(err) => warn!(volunteer_id = %volunteer_id, error = %err, "failed to credit volunteer"),
        }
    }
}
