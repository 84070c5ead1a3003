use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::commands::coefficient_commands;
use backend_application::jobs::{run_job, JobRunOutcome};
use backend_application::queries::{coefficient_queries, job_queries};
use backend_application::AppState;
use backend_domain::{CoefficientsPayload, JobKind, JobStatus, NotificationDelivery, WasteCoefficient};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(serde::Serialize)]
struct TargetStatus {
    status: String,
    configured: bool,
}

#[derive(serde::Deserialize)]
pub struct DeliveryQuery {
    pub limit: Option<usize>,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.health.check_store()).await {
        Ok(Ok(true)) => StatusCode::OK,
        Ok(Ok(false)) => StatusCode::SERVICE_UNAVAILABLE,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

pub async fn get_job_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<JobStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(job_queries::job_status(&state).await?))
}

pub async fn trigger_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job): Path<String>,
) -> Result<Json<JobRunOutcome>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let kind = JobKind::parse(&job)
        .ok_or_else(|| HttpError::BadRequest(format!("unknown job '{}'", job)))?;
    Ok(Json(run_job(&state, kind, Utc::now()).await?))
}

pub async fn get_coefficients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<WasteCoefficient>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(coefficient_queries::list_coefficients(&state).await?))
}

pub async fn update_coefficients(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CoefficientsPayload>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    coefficient_commands::update_coefficients(&state, payload.coefficients).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DeliveryQuery>,
) -> Result<Json<Vec<NotificationDelivery>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    Ok(Json(state.notifier.recent_deliveries(limit).await))
}

pub async fn notification_target_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let configured = state.config.notification_webhook_url.is_some();
    if !authorize(&state.config, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(TargetStatus {
                status: "unauthorized".to_string(),
                configured,
            }),
        )
            .into_response();
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let (status, label) = match timeout(
        Duration::from_secs(timeout_secs),
        state.health.check_notification_target(),
    )
    .await
    {
        Ok(Ok(_)) => (StatusCode::OK, "ok"),
        Ok(Err(err)) => {
            error!("notification target check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
        Err(_) => {
            error!("notification target check timeout after {}s", timeout_secs);
            (StatusCode::SERVICE_UNAVAILABLE, "timeout")
        }
    };
    (
        status,
        Json(TargetStatus {
            status: label.to_string(),
            configured,
        }),
    )
        .into_response()
}
