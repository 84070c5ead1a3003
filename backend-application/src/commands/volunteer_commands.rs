use chrono::{DateTime, Utc};
use tracing::info;

use backend_domain::{InsertOutcome, NewVolunteerRequest, Volunteer, VolunteerId};

use crate::{AppError, AppState};

pub async fn create_volunteer(
    state: &AppState,
    request: NewVolunteerRequest,
    now: DateTime<Utc>,
) -> Result<Volunteer, AppError> {
    let request = request.normalized();
    if request.name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if !is_plausible_email(&request.email) {
        return Err(AppError::BadRequest(format!("invalid email '{}'", request.email)));
    }

    let volunteer = Volunteer {
        id: VolunteerId::new(),
        name: request.name,
        email: request.email,
        waste_collected: 0.0,
        reward_points: 0,
        created_at: now,
    };
    match state.volunteer_repo.insert_volunteer(&volunteer).await? {
        InsertOutcome::Created => {
            info!(volunteer_id = %volunteer.id, "volunteer created");
            Ok(volunteer)
        }
        InsertOutcome::AlreadyExists => Err(AppError::Conflict(format!(
            "email '{}' is already registered",
            volunteer.email
        ))),
    }
}

fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !value.chars().any(char::is_whitespace)
}
