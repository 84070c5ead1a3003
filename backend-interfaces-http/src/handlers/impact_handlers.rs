use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use backend_application::jobs::{generate_impact_for, ImpactOutcome};
use backend_application::queries::impact_queries;
use backend_application::AppState;
use backend_domain::{EventId, ImpactSummary};

use crate::error::HttpError;

pub async fn get_impact(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<ImpactSummary>, HttpError> {
    Ok(Json(impact_queries::get_impact(&state, event_id).await?))
}

/// 201 with the new summary, or 200 with the one already stored.
pub async fn generate_impact(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<(StatusCode, Json<ImpactSummary>), HttpError> {
    match generate_impact_for(&state, event_id, Utc::now()).await? {
        ImpactOutcome::Created(summary) => Ok((StatusCode::CREATED, Json(summary))),
        ImpactOutcome::AlreadyExists => {
            let summary = impact_queries::get_impact(&state, event_id).await?;
            Ok((StatusCode::OK, Json(summary)))
        }
    }
}
