use async_trait::async_trait;

use crate::entities::{
    CategoryWeight,
    Event,
    ImpactSummary,
    InsertOutcome,
    RegistrationOutcome,
    Volunteer,
    WasteCoefficient,
    WasteRecord,
};
use crate::value_objects::{EventId, EventStatus, VolunteerId};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_event(&self, event: &Event) -> anyhow::Result<()>;
    async fn fetch_event(&self, id: EventId) -> anyhow::Result<Option<Event>>;
    async fn list_events(&self, status: Option<EventStatus>) -> anyhow::Result<Vec<Event>>;
    /// Atomic single-row write. Returns false when the stored status already matches.
    async fn update_status(&self, id: EventId, status: EventStatus) -> anyhow::Result<bool>;
    /// Rewrites the editable fields and status. The roster is untouched.
    async fn update_event(&self, event: &Event) -> anyhow::Result<bool>;
    /// Removes the event and its registrations. Returns false, deleting nothing,
    /// when the event is missing or already has waste or a summary.
    async fn delete_event(&self, id: EventId) -> anyhow::Result<bool>;
    async fn add_registration(
        &self,
        id: EventId,
        volunteer_id: VolunteerId,
    ) -> anyhow::Result<RegistrationOutcome>;
    async fn remove_registration(&self, id: EventId, volunteer_id: VolunteerId) -> anyhow::Result<bool>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait WasteRepository: Send + Sync {
    /// All-or-nothing append of one or more records.
    async fn insert_records(&self, records: &[WasteRecord]) -> anyhow::Result<()>;
    async fn fetch_by_event(&self, event_id: EventId) -> anyhow::Result<Vec<WasteRecord>>;
    async fn fetch_by_volunteer(&self, volunteer_id: VolunteerId) -> anyhow::Result<Vec<WasteRecord>>;
    async fn has_submission(&self, event_id: EventId, volunteer_id: VolunteerId) -> anyhow::Result<bool>;
    async fn totals_by_kind(&self) -> anyhow::Result<Vec<CategoryWeight>>;
}

#[async_trait]
pub trait ImpactRepository: Send + Sync {
    /// Insert guarded by the unique event id; a conflict reports `AlreadyExists`.
    async fn insert_if_absent(&self, summary: &ImpactSummary) -> anyhow::Result<InsertOutcome>;
    async fn fetch_summary(&self, event_id: EventId) -> anyhow::Result<Option<ImpactSummary>>;
    async fn list_summaries(&self) -> anyhow::Result<Vec<ImpactSummary>>;
}

#[async_trait]
pub trait VolunteerRepository: Send + Sync {
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> anyhow::Result<InsertOutcome>;
    async fn fetch_volunteer(&self, id: VolunteerId) -> anyhow::Result<Option<Volunteer>>;
    async fn fetch_volunteers(&self, ids: &[VolunteerId]) -> anyhow::Result<Vec<Volunteer>>;
    /// Highest reward points first; ties by weight collected, then name.
    async fn top_by_points(&self, limit: usize) -> anyhow::Result<Vec<Volunteer>>;
    async fn credit_collection(
        &self,
        id: VolunteerId,
        weight: f64,
        reward_points: u64,
    ) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait CoefficientRepository: Send + Sync {
    async fn load_coefficients(&self, path: &str) -> anyhow::Result<Vec<WasteCoefficient>>;
    async fn save_coefficients(&self, path: &str, entries: &[WasteCoefficient]) -> anyhow::Result<()>;
}
