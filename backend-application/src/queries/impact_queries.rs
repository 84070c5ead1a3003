use backend_domain::{EventId, ImpactSummary};

use crate::{AppError, AppState};

pub async fn get_impact(state: &AppState, event_id: EventId) -> Result<ImpactSummary, AppError> {
    state
        .impact_repo
        .fetch_summary(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("impact summary for event {}", event_id)))
}
