use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use backend_application::commands::event_commands;
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{
    Event, EventId, EventListQuery, EventUpdateRequest, NewEventRequest, RegistrationRequest,
    VolunteerId,
};

use crate::error::HttpError;

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<NewEventRequest>,
) -> Result<(StatusCode, Json<Event>), HttpError> {
    let event = event_commands::create_event(&state, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>, HttpError> {
    Ok(Json(event_queries::list_events(&state, &query).await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Event>, HttpError> {
    Ok(Json(event_queries::get_event(&state, event_id).await?))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(payload): Json<EventUpdateRequest>,
) -> Result<Json<Event>, HttpError> {
    let event = event_commands::update_event(&state, event_id, payload, Utc::now()).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<StatusCode, HttpError> {
    event_commands::delete_event(&state, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<Json<Event>, HttpError> {
    let event =
        event_commands::register_volunteer(&state, event_id, payload.volunteer_id, Utc::now()).await?;
    Ok(Json(event))
}

pub async fn unregister_from_event(
    State(state): State<AppState>,
    Path((event_id, volunteer_id)): Path<(EventId, VolunteerId)>,
) -> Result<StatusCode, HttpError> {
    event_commands::unregister_volunteer(&state, event_id, volunteer_id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}
