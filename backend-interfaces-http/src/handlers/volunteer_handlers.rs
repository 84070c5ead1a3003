use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use backend_application::commands::volunteer_commands;
use backend_application::queries::volunteer_queries;
use backend_application::AppState;
use backend_domain::{NewVolunteerRequest, Volunteer, VolunteerId};

use crate::error::HttpError;

pub async fn create_volunteer(
    State(state): State<AppState>,
    Json(payload): Json<NewVolunteerRequest>,
) -> Result<(StatusCode, Json<Volunteer>), HttpError> {
    let volunteer = volunteer_commands::create_volunteer(&state, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(volunteer)))
}

pub async fn get_volunteer(
    State(state): State<AppState>,
    Path(volunteer_id): Path<VolunteerId>,
) -> Result<Json<Volunteer>, HttpError> {
    Ok(Json(volunteer_queries::get_volunteer(&state, volunteer_id).await?))
}
