// Event entity
// A scheduled beach cleanup and its registration roster

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, EventStatus, VolunteerId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeachLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date_of_event: NaiveDate,
    /// Local wall-clock start, "HH:MM".
    pub start_time: String,
    /// Local wall-clock end, "HH:MM".
    pub end_time: String,
    pub registration_deadline: DateTime<Utc>,
    pub beach_name: String,
    pub beach_address: String,
    pub beach_location: Option<BeachLocation>,
    pub description: String,
    pub organizer_id: Option<String>,
    pub status: EventStatus,
    pub volunteer_register_count: u32,
    pub registered_volunteers: Vec<VolunteerId>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_registered(&self, volunteer_id: VolunteerId) -> bool {
        self.registered_volunteers.contains(&volunteer_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventRequest {
    pub name: String,
    pub date_of_event: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub registration_deadline: DateTime<Utc>,
    pub beach_name: String,
    #[serde(default)]
    pub beach_address: Option<String>,
    #[serde(default)]
    pub beach_location: Option<BeachLocation>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organizer_id: Option<String>,
}

impl NewEventRequest {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            date_of_event: self.date_of_event,
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            registration_deadline: self.registration_deadline,
            beach_name: self.beach_name.trim().to_string(),
            beach_address: trimmed_option(&self.beach_address),
            beach_location: self.beach_location,
            description: trimmed_option(&self.description),
            organizer_id: trimmed_option(&self.organizer_id),
        }
    }
}

fn trimmed_option(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Partial edit of an event. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUpdateRequest {
    pub name: Option<String>,
    pub date_of_event: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub beach_name: Option<String>,
    pub beach_address: Option<String>,
    pub beach_location: Option<BeachLocation>,
    pub description: Option<String>,
}

impl EventUpdateRequest {
    /// The event with this edit applied. Text fields are trimmed; times are left for validation.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut updated = event.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(date) = self.date_of_event {
            updated.date_of_event = date;
        }
        if let Some(start_time) = &self.start_time {
            updated.start_time = start_time.trim().to_string();
        }
        if let Some(end_time) = &self.end_time {
            updated.end_time = end_time.trim().to_string();
        }
        if let Some(deadline) = self.registration_deadline {
            updated.registration_deadline = deadline;
        }
        if let Some(beach_name) = &self.beach_name {
            updated.beach_name = beach_name.trim().to_string();
        }
        if let Some(address) = &self.beach_address {
            updated.beach_address = address.trim().to_string();
        }
        if self.beach_location.is_some() {
            updated.beach_location = self.beach_location;
        }
        if let Some(description) = &self.description {
            updated.description = description.trim().to_string();
        }
        updated
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub volunteer_id: VolunteerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    AlreadyRegistered,
    EventMissing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> Event {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).single().expect("created");
        Event {
            id: EventId::new(),
            name: "Dawn sweep".to_string(),
            date_of_event: NaiveDate::from_ymd_opt(2026, 3, 14).expect("date"),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            registration_deadline: created,
            beach_name: "South Cove".to_string(),
            beach_address: "Pier road".to_string(),
            beach_location: None,
            description: String::new(),
            organizer_id: Some("ngo-1".to_string()),
            status: EventStatus::Upcoming,
            volunteer_register_count: 1,
            registered_volunteers: vec![VolunteerId::new()],
            created_at: created,
        }
    }

    #[test]
    fn update_keeps_absent_fields() {
        let original = event();
        let edit = EventUpdateRequest {
            name: Some("  Dusk sweep ".to_string()),
            end_time: Some("13:30".to_string()),
            ..EventUpdateRequest::default()
        };
        let updated = edit.apply_to(&original);
        assert_eq!(updated.name, "Dusk sweep");
        assert_eq!(updated.end_time, "13:30");
        assert_eq!(updated.start_time, "09:00");
        assert_eq!(updated.beach_address, "Pier road");
        assert_eq!(updated.registered_volunteers, original.registered_volunteers);
    }

    #[test]
    fn text_only_edit_leaves_schedule_alone() {
        let edit: EventUpdateRequest =
            serde_json::from_str(r#"{"description": "bring gloves"}"#).expect("json");
        let original = event();
        let updated = edit.apply_to(&original);
        assert_eq!(updated.description, "bring gloves");
        assert_eq!(updated.date_of_event, original.date_of_event);
        assert_eq!(updated.start_time, original.start_time);
        assert_eq!(updated.end_time, original.end_time);
    }
}
