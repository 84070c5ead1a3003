use backend_domain::{round2, EventId, WasteRecord, WasteStats};

use crate::{AppError, AppState};

const ANONYMOUS: &str = "anonymous";

pub async fn list_event_waste(state: &AppState, event_id: EventId) -> Result<Vec<WasteRecord>, AppError> {
    ensure_event(state, event_id).await?;
    let mut records = state.waste_repo.fetch_by_event(event_id).await?;
    records.sort_by(|a, b| a.collected_at.cmp(&b.collected_at));
    Ok(records)
}

pub async fn waste_stats(state: &AppState, event_id: EventId) -> Result<WasteStats, AppError> {
    ensure_event(state, event_id).await?;
    let records = state.waste_repo.fetch_by_event(event_id).await?;
    Ok(summarize(&records))
}

fn summarize(records: &[WasteRecord]) -> WasteStats {
    let mut stats = WasteStats {
        record_count: records.len(),
        ..WasteStats::default()
    };
    for record in records {
        stats.total_weight += record.weight;
        *stats.by_type.entry(record.kind().to_string()).or_insert(0.0) += record.weight;
        let volunteer = record
            .volunteer_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        *stats.by_volunteer.entry(volunteer).or_insert(0.0) += record.weight;
    }
    stats.total_weight = round2(stats.total_weight);
    stats.by_type.values_mut().for_each(|weight| *weight = round2(*weight));
    stats.by_volunteer.values_mut().for_each(|weight| *weight = round2(*weight));
    stats
}

async fn ensure_event(state: &AppState, event_id: EventId) -> Result<(), AppError> {
    if state.event_repo.fetch_event(event_id).await?.is_none() {
        return Err(AppError::NotFound(format!("event {}", event_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::EventStatus;

    use crate::test_support::{seed_event, seed_volunteer, seed_waste, TestHarness};

    #[tokio::test]
    async fn stats_group_by_kind_and_volunteer() {
        let harness = TestHarness::new().await;
        let event_id = seed_event(&harness, "04:00", "05:00", EventStatus::Completed).await;
        let volunteer = seed_volunteer(&harness, "v@shore.test").await;
        seed_waste(&harness, event_id, "plastic", "bottle", 1.1).await;
        seed_waste(&harness, event_id, "plastic", "bottle", 2.2).await;
        harness.record_waste_by(event_id, volunteer, 0.5).await;

        let stats = waste_stats(&harness.state, event_id).await.expect("stats");
        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.total_weight, 3.8);
        assert_eq!(stats.by_type.get("plastic/bottle"), Some(&3.3));
        assert_eq!(stats.by_volunteer.get(ANONYMOUS), Some(&3.3));
        assert_eq!(stats.by_volunteer.get(&volunteer.to_string()), Some(&0.5));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let harness = TestHarness::new().await;
        let err = list_event_waste(&harness.state, EventId::new())
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
