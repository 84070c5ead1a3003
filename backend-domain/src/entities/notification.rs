// Facts handed to the notification dispatcher

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, EventStatus, VolunteerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationFact {
    EventCreated {
        event_id: EventId,
        event_name: String,
        date_of_event: NaiveDate,
        beach_name: String,
    },
    EventTransitioned {
        event_id: EventId,
        event_name: String,
        from: EventStatus,
        to: EventStatus,
    },
    EventRescheduled {
        event_id: EventId,
        event_name: String,
        date_of_event: NaiveDate,
        start_time: String,
        end_time: String,
    },
    EventCancelled {
        event_id: EventId,
        event_name: String,
        registered_volunteers: Vec<VolunteerId>,
    },
    UpcomingEventReminder {
        event_id: EventId,
        event_name: String,
        volunteer_id: VolunteerId,
        email: String,
        event_link: String,
    },
    WasteUploadReminder {
        event_id: EventId,
        event_name: String,
        volunteer_id: VolunteerId,
        email: String,
        upload_link: String,
    },
}

impl NotificationFact {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationFact::EventCreated { .. } => "event_created",
            NotificationFact::EventTransitioned { .. } => "event_transitioned",
            NotificationFact::EventRescheduled { .. } => "event_rescheduled",
            NotificationFact::EventCancelled { .. } => "event_cancelled",
            NotificationFact::UpcomingEventReminder { .. } => "upcoming_event_reminder",
            NotificationFact::WasteUploadReminder { .. } => "waste_upload_reminder",
        }
    }

    pub fn event_id(&self) -> EventId {
        match self {
            NotificationFact::EventCreated { event_id, .. }
            | NotificationFact::EventTransitioned { event_id, .. }
            | NotificationFact::EventRescheduled { event_id, .. }
            | NotificationFact::EventCancelled { event_id, .. }
            | NotificationFact::UpcomingEventReminder { event_id, .. }
            | NotificationFact::WasteUploadReminder { event_id, .. } => *event_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDelivery {
    pub kind: String,
    pub event_id: EventId,
    pub delivered: bool,
    pub error: Option<String>,
    pub attempted_at: DateTime<Utc>,
}
