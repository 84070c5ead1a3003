use axum::extract::{Path, Query, State};
use axum::Json;

use backend_application::queries::{dashboard_queries, volunteer_queries};
use backend_application::AppState;
use backend_domain::{
    EventDashboard, EventId, LeaderboardEntry, LeaderboardQuery, OverallDashboard,
    VolunteerDashboard, VolunteerId,
};

use crate::error::HttpError;

pub async fn overall_dashboard(
    State(state): State<AppState>,
) -> Result<Json<OverallDashboard>, HttpError> {
    Ok(Json(dashboard_queries::overall(&state).await?))
}

pub async fn event_dashboard(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<EventDashboard>, HttpError> {
    Ok(Json(dashboard_queries::event_dashboard(&state, event_id).await?))
}

pub async fn volunteer_dashboard(
    State(state): State<AppState>,
    Path(volunteer_id): Path<VolunteerId>,
) -> Result<Json<VolunteerDashboard>, HttpError> {
    Ok(Json(
        dashboard_queries::volunteer_dashboard(&state, volunteer_id).await?,
    ))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, HttpError> {
    Ok(Json(volunteer_queries::leaderboard(&state, &query).await?))
}
