use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use backend_application::commands::waste_commands;
use backend_application::queries::waste_queries;
use backend_application::AppState;
use backend_domain::{EventId, WasteRecord, WasteStats, WasteSubmission};

use crate::error::HttpError;
use crate::middleware::parse_waste_batch;

#[derive(Serialize)]
pub struct BatchAccepted {
    pub accepted: usize,
}

pub async fn submit_waste(
    State(state): State<AppState>,
    Json(payload): Json<WasteSubmission>,
) -> Result<(StatusCode, Json<WasteRecord>), HttpError> {
    let record = waste_commands::submit_waste(&state, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn submit_waste_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<BatchAccepted>), HttpError> {
    let submissions = parse_waste_batch(&headers, &body).map_err(|err| {
        warn!("failed to parse waste batch: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let records = waste_commands::submit_waste_batch(&state, submissions, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(BatchAccepted {
            accepted: records.len(),
        }),
    ))
}

pub async fn list_event_waste(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<WasteRecord>>, HttpError> {
    Ok(Json(waste_queries::list_event_waste(&state, event_id).await?))
}

pub async fn event_waste_stats(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<WasteStats>, HttpError> {
    Ok(Json(waste_queries::waste_stats(&state, event_id).await?))
}
