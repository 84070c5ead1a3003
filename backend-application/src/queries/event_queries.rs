use backend_domain::{Event, EventId, EventListQuery, EventStatus};

use crate::{AppError, AppState};

pub async fn list_events(state: &AppState, query: &EventListQuery) -> Result<Vec<Event>, AppError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<EventStatus>()
                .map_err(|err| AppError::BadRequest(err.to_string()))?,
        ),
    };
    let mut events = state.event_repo.list_events(status).await?;
    events.sort_by(|a, b| {
        a.date_of_event
            .cmp(&b.date_of_event)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    Ok(events)
}

pub async fn get_event(state: &AppState, id: EventId) -> Result<Event, AppError> {
    state
        .event_repo
        .fetch_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))
}
