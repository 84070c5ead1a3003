use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use backend_domain::{
    canonical_clock_time, BeachLocation, Event, EventId, EventStatus, EventUpdateRequest,
    EventWindow, NewEventRequest, NotificationFact, RegistrationOutcome, VolunteerId,
};

use crate::{AppError, AppState};

const MIN_UNREGISTER_NOTICE_HOURS: i64 = 24;

pub async fn create_event(
    state: &AppState,
    request: NewEventRequest,
    now: DateTime<Utc>,
) -> Result<Event, AppError> {
    let request = request.normalized();
    if request.name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if request.beach_name.is_empty() {
        return Err(AppError::BadRequest("beach_name is required".to_string()));
    }
    let schedule = validate_schedule(
        state,
        request.date_of_event,
        &request.start_time,
        &request.end_time,
        request.registration_deadline,
    )?;
    validate_location(request.beach_location)?;

    let event = Event {
        id: EventId::new(),
        name: request.name,
        date_of_event: request.date_of_event,
        start_time: schedule.start_time,
        end_time: schedule.end_time,
        registration_deadline: request.registration_deadline,
        beach_name: request.beach_name,
        beach_address: request.beach_address.unwrap_or_default(),
        beach_location: request.beach_location,
        description: request.description.unwrap_or_default(),
        organizer_id: request.organizer_id,
        status: schedule.window.status_at(now),
        volunteer_register_count: 0,
        registered_volunteers: Vec::new(),
        created_at: now,
    };
    state.event_repo.insert_event(&event).await?;
    info!(event_id = %event.id, name = %event.name, status = %event.status, "event created");

    state.notifier.dispatch(NotificationFact::EventCreated {
        event_id: event.id,
        event_name: event.name.clone(),
        date_of_event: event.date_of_event,
        beach_name: event.beach_name.clone(),
    });
    state.metrics.record_notifications(1);
    Ok(event)
}

/// Applies a partial edit. Schedule edits are re-validated and the status is
/// recomputed from the new window, so it never disagrees with the clock.
pub async fn update_event(
    state: &AppState,
    event_id: EventId,
    request: EventUpdateRequest,
    now: DateTime<Utc>,
) -> Result<Event, AppError> {
    let current = fetch_event(state, event_id).await?;
    if current.status == EventStatus::Completed {
        return Err(AppError::Conflict("completed events cannot be edited".to_string()));
    }

    let mut updated = request.apply_to(&current);
    if updated.name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if updated.beach_name.is_empty() {
        return Err(AppError::BadRequest("beach_name is required".to_string()));
    }
    let schedule = validate_schedule(
        state,
        updated.date_of_event,
        &updated.start_time,
        &updated.end_time,
        updated.registration_deadline,
    )?;
    validate_location(updated.beach_location)?;
    updated.start_time = schedule.start_time;
    updated.end_time = schedule.end_time;
    updated.status = schedule.window.status_at(now);

    if !state.event_repo.update_event(&updated).await? {
        return Err(AppError::NotFound("event".to_string()));
    }
    info!(event_id = %event_id, status = %updated.status, "event updated");

    let rescheduled = updated.date_of_event != current.date_of_event
        || updated.start_time != current.start_time
        || updated.end_time != current.end_time;
    let mut facts = Vec::new();
    if rescheduled {
        facts.push(NotificationFact::EventRescheduled {
            event_id,
            event_name: updated.name.clone(),
            date_of_event: updated.date_of_event,
            start_time: updated.start_time.clone(),
            end_time: updated.end_time.clone(),
        });
    }
    if updated.status != current.status {
        facts.push(NotificationFact::EventTransitioned {
            event_id,
            event_name: updated.name.clone(),
            from: current.status,
            to: updated.status,
        });
    }
    state.metrics.record_notifications(facts.len());
    for fact in facts {
        state.notifier.dispatch(fact);
    }
    fetch_event(state, event_id).await
}

/// Only events with no waste and no summary can be removed; the ledger is append-only.
pub async fn delete_event(state: &AppState, event_id: EventId) -> Result<(), AppError> {
    let event = fetch_event(state, event_id).await?;
    if event.status != EventStatus::Upcoming {
        return Err(AppError::Conflict(format!(
            "only upcoming events can be deleted, event is {}",
            event.status
        )));
    }
    if !state.event_repo.delete_event(event_id).await? {
        return Err(AppError::Conflict(
            "event already has recorded waste".to_string(),
        ));
    }
    info!(event_id = %event_id, registrations = event.volunteer_register_count, "event deleted");

    if !event.registered_volunteers.is_empty() {
        state.notifier.dispatch(NotificationFact::EventCancelled {
            event_id,
            event_name: event.name,
            registered_volunteers: event.registered_volunteers,
        });
        state.metrics.record_notifications(1);
    }
    Ok(())
}

struct Schedule {
    window: EventWindow,
    start_time: String,
    end_time: String,
}

fn validate_schedule(
    state: &AppState,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    registration_deadline: DateTime<Utc>,
) -> Result<Schedule, AppError> {
    let invalid = |err: anyhow::Error| AppError::BadRequest(format!("invalid event time: {}", err));
    let start_time = canonical_clock_time(start_time).map_err(invalid)?;
    let end_time = canonical_clock_time(end_time).map_err(invalid)?;
    let window = EventWindow::resolve(date, &start_time, &end_time, state.config.event_offset())
        .map_err(invalid)?;
    if window.end <= window.start {
        return Err(AppError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }
    if registration_deadline > window.start {
        return Err(AppError::BadRequest(
            "registration_deadline must not be after the event start".to_string(),
        ));
    }
    Ok(Schedule {
        window,
        start_time,
        end_time,
    })
}

fn validate_location(location: Option<BeachLocation>) -> Result<(), AppError> {
    if let Some(location) = location {
        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(AppError::BadRequest("beach_location out of range".to_string()));
        }
    }
    Ok(())
}

pub async fn register_volunteer(
    state: &AppState,
    event_id: EventId,
    volunteer_id: VolunteerId,
    now: DateTime<Utc>,
) -> Result<Event, AppError> {
    let event = fetch_event(state, event_id).await?;
    if state.volunteer_repo.fetch_volunteer(volunteer_id).await?.is_none() {
        return Err(AppError::NotFound("volunteer".to_string()));
    }
    if now > event.registration_deadline {
        return Err(AppError::BadRequest(
            "registration deadline has passed".to_string(),
        ));
    }
    if event.status != EventStatus::Upcoming {
        return Err(AppError::BadRequest(
            "event is not open for registration".to_string(),
        ));
    }
    if event.is_registered(volunteer_id) {
        return Err(AppError::Conflict("volunteer already registered".to_string()));
    }

    match state.event_repo.add_registration(event_id, volunteer_id).await? {
        RegistrationOutcome::Registered => {}
        RegistrationOutcome::AlreadyRegistered => {
            return Err(AppError::Conflict("volunteer already registered".to_string()));
        }
        RegistrationOutcome::EventMissing => {
            return Err(AppError::NotFound("event".to_string()));
        }
    }
    state.metrics.record_registration();
    info!(event_id = %event_id, volunteer_id = %volunteer_id, "volunteer registered");
    fetch_event(state, event_id).await
}

pub async fn unregister_volunteer(
    state: &AppState,
    event_id: EventId,
    volunteer_id: VolunteerId,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let event = fetch_event(state, event_id).await?;
    if !event.is_registered(volunteer_id) {
        return Err(AppError::BadRequest(
            "volunteer is not registered for this event".to_string(),
        ));
    }
    let window = EventWindow::for_event(&event, state.config.event_offset())?;
    if window.start - now < Duration::hours(MIN_UNREGISTER_NOTICE_HOURS) {
        return Err(AppError::BadRequest(format!(
            "cannot unregister less than {} hours before the event",
            MIN_UNREGISTER_NOTICE_HOURS
        )));
    }
    if !state
        .event_repo
        .remove_registration(event_id, volunteer_id)
        .await?
    {
        return Err(AppError::BadRequest(
            "volunteer is not registered for this event".to_string(),
        ));
    }
    info!(event_id = %event_id, volunteer_id = %volunteer_id, "volunteer unregistered");
    Ok(())
}

async fn fetch_event(state: &AppState, event_id: EventId) -> Result<Event, AppError> {
    state
        .event_repo
        .fetch_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("event".to_string()))
}
