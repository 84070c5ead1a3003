// In-process store behind the same ports as Postgres. Used for local runs and tests.

use std::collections::{BTreeMap, HashMap};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{
    EventRepository, ImpactRepository, VolunteerRepository, WasteRepository,
};
use backend_domain::{
    CategoryWeight, Event, EventId, EventStatus, ImpactSummary, InsertOutcome,
    RegistrationOutcome, Volunteer, VolunteerId, WasteKind, WasteRecord,
};

#[derive(Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    waste: Vec<WasteRecord>,
    summaries: HashMap<EventId, ImpactSummary>,
    volunteers: HashMap<VolunteerId, Volunteer>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_event(&self, event: &Event) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(anyhow!("event {} already exists", event.id));
        }
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn fetch_event(&self, id: EventId) -> anyhow::Result<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self, status: Option<EventStatus>) -> anyhow::Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| status.map_or(true, |wanted| event.status == wanted))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn update_status(&self, id: EventId, status: EventStatus) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&id) {
            Some(event) if event.status != status => {
                event.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_event(&self, event: &Event) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.events.get_mut(&event.id) else {
            return Ok(false);
        };
        let registered_volunteers = std::mem::take(&mut stored.registered_volunteers);
        *stored = Event {
            registered_volunteers,
            volunteer_register_count: stored.volunteer_register_count,
            created_at: stored.created_at,
            ..event.clone()
        };
        Ok(true)
    }

    async fn delete_event(&self, id: EventId) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.summaries.contains_key(&id) || tables.waste.iter().any(|record| record.event_id == id) {
            return Ok(false);
        }
        Ok(tables.events.remove(&id).is_some())
    }

    async fn add_registration(
        &self,
        id: EventId,
        volunteer_id: VolunteerId,
    ) -> anyhow::Result<RegistrationOutcome> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(RegistrationOutcome::EventMissing);
        };
        if event.is_registered(volunteer_id) {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        event.registered_volunteers.push(volunteer_id);
        event.volunteer_register_count = event.registered_volunteers.len() as u32;
        Ok(RegistrationOutcome::Registered)
    }

    async fn remove_registration(&self, id: EventId, volunteer_id: VolunteerId) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(false);
        };
        let before = event.registered_volunteers.len();
        event.registered_volunteers.retain(|existing| *existing != volunteer_id);
        event.volunteer_register_count = event.registered_volunteers.len() as u32;
        Ok(event.registered_volunteers.len() != before)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl WasteRepository for InMemoryStore {
    async fn insert_records(&self, records: &[WasteRecord]) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(orphan) = records
            .iter()
            .find(|record| !tables.events.contains_key(&record.event_id))
        {
            return Err(anyhow!("waste record references unknown event {}", orphan.event_id));
        }
        tables.waste.extend_from_slice(records);
        Ok(())
    }

    async fn fetch_by_event(&self, event_id: EventId) -> anyhow::Result<Vec<WasteRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .waste
            .iter()
            .filter(|record| record.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn fetch_by_volunteer(&self, volunteer_id: VolunteerId) -> anyhow::Result<Vec<WasteRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .waste
            .iter()
            .filter(|record| record.volunteer_id == Some(volunteer_id))
            .cloned()
            .collect())
    }

    async fn has_submission(&self, event_id: EventId, volunteer_id: VolunteerId) -> anyhow::Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .waste
            .iter()
            .any(|record| record.event_id == event_id && record.volunteer_id == Some(volunteer_id)))
    }

    async fn totals_by_kind(&self) -> anyhow::Result<Vec<CategoryWeight>> {
        let tables = self.tables.read().await;
        let mut totals: BTreeMap<WasteKind, f64> = BTreeMap::new();
        for record in &tables.waste {
            *totals.entry(record.kind()).or_insert(0.0) += record.weight;
        }
        Ok(totals
            .into_iter()
            .map(|(kind, weight)| CategoryWeight {
                category: kind.category,
                waste_type: kind.waste_type,
                weight,
            })
            .collect())
    }
}

#[async_trait]
impl ImpactRepository for InMemoryStore {
    async fn insert_if_absent(&self, summary: &ImpactSummary) -> anyhow::Result<InsertOutcome> {
        let mut tables = self.tables.write().await;
        if tables.summaries.contains_key(&summary.event_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        tables.summaries.insert(summary.event_id, summary.clone());
        Ok(InsertOutcome::Created)
    }

    async fn fetch_summary(&self, event_id: EventId) -> anyhow::Result<Option<ImpactSummary>> {
        Ok(self.tables.read().await.summaries.get(&event_id).cloned())
    }

    async fn list_summaries(&self) -> anyhow::Result<Vec<ImpactSummary>> {
        let tables = self.tables.read().await;
        let mut summaries: Vec<ImpactSummary> = tables.summaries.values().cloned().collect();
        summaries.sort_by(|a, b| a.generated_at.cmp(&b.generated_at));
        Ok(summaries)
    }
}

#[async_trait]
impl VolunteerRepository for InMemoryStore {
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> anyhow::Result<InsertOutcome> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .volunteers
            .values()
            .any(|existing| existing.id == volunteer.id || existing.email == volunteer.email);
        if taken {
            return Ok(InsertOutcome::AlreadyExists);
        }
        tables.volunteers.insert(volunteer.id, volunteer.clone());
        Ok(InsertOutcome::Created)
    }

    async fn fetch_volunteer(&self, id: VolunteerId) -> anyhow::Result<Option<Volunteer>> {
        Ok(self.tables.read().await.volunteers.get(&id).cloned())
    }

    async fn fetch_volunteers(&self, ids: &[VolunteerId]) -> anyhow::Result<Vec<Volunteer>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.volunteers.get(id).cloned())
            .collect())
    }

    async fn top_by_points(&self, limit: usize) -> anyhow::Result<Vec<Volunteer>> {
        let tables = self.tables.read().await;
        let mut volunteers: Vec<Volunteer> = tables.volunteers.values().cloned().collect();
        volunteers.sort_by(|a, b| {
            b.reward_points
                .cmp(&a.reward_points)
                .then_with(|| b.waste_collected.total_cmp(&a.waste_collected))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        volunteers.truncate(limit);
        Ok(volunteers)
    }

    async fn credit_collection(
        &self,
        id: VolunteerId,
        weight: f64,
        reward_points: u64,
    ) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(volunteer) = tables.volunteers.get_mut(&id) else {
            return Ok(false);
        };
        volunteer.waste_collected += weight;
        volunteer.reward_points += reward_points;
        Ok(true)
    }
}
