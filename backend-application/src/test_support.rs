// Shared fixtures for application tests, backed by the in-memory store

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::RwLock;

use backend_domain::ports::{
    EventRepository, NotificationDispatcher, VolunteerRepository, WasteRepository,
};
use backend_domain::{
    CoefficientTable, Event, EventId, EventStatus, EventWindow, JobStatus, NotificationDelivery,
    NotificationFact, RegistrationOutcome, RuntimeConfig, Volunteer, VolunteerId,
    WasteCoefficient, WasteRecord, WasteRecordId,
};
use backend_infrastructure::repositories::{CoefficientFileRepository, InMemoryStore};
use backend_infrastructure::services::DefaultHealthService;

use crate::jobs::JobGates;
use crate::{AppState, Metrics};

pub(crate) fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid test day")
}

pub(crate) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0)
        .single()
        .expect("valid test time")
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    facts: Mutex<Vec<NotificationFact>>,
}

impl RecordingNotifier {
    pub(crate) fn facts(&self) -> Vec<NotificationFact> {
        self.facts.lock().expect("notifier lock").clone()
    }

    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.facts().iter().map(NotificationFact::kind).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    fn dispatch(&self, fact: NotificationFact) {
        self.facts.lock().expect("notifier lock").push(fact);
    }

    async fn check_target(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn recent_deliveries(&self, _limit: usize) -> Vec<NotificationDelivery> {
        Vec::new()
    }
}

/// Event repository wrapper that counts status writes and injects failures.
pub(crate) struct FlakyEventRepository {
    inner: Arc<InMemoryStore>,
    status_writes: AtomicUsize,
    failing_updates: Mutex<HashSet<EventId>>,
    fail_listing: AtomicBool,
}

impl FlakyEventRepository {
    fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            status_writes: AtomicUsize::new(0),
            failing_updates: Mutex::new(HashSet::new()),
            fail_listing: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventRepository for FlakyEventRepository {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.inner.ensure_schema().await
    }

    async fn insert_event(&self, event: &Event) -> anyhow::Result<()> {
        self.inner.insert_event(event).await
    }

    async fn fetch_event(&self, id: EventId) -> anyhow::Result<Option<Event>> {
        self.inner.fetch_event(id).await
    }

    async fn list_events(&self, status: Option<EventStatus>) -> anyhow::Result<Vec<Event>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(anyhow!("event store unavailable"));
        }
        self.inner.list_events(status).await
    }

    async fn update_status(&self, id: EventId, status: EventStatus) -> anyhow::Result<bool> {
        if self.failing_updates.lock().expect("lock").contains(&id) {
            return Err(anyhow!("write rejected for {}", id));
        }
        let changed = self.inner.update_status(id, status).await?;
        if changed {
            self.status_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(changed)
    }

    async fn update_event(&self, event: &Event) -> anyhow::Result<bool> {
        self.inner.update_event(event).await
    }

    async fn delete_event(&self, id: EventId) -> anyhow::Result<bool> {
        self.inner.delete_event(id).await
    }

    async fn add_registration(
        &self,
        id: EventId,
        volunteer_id: VolunteerId,
    ) -> anyhow::Result<RegistrationOutcome> {
        self.inner.add_registration(id, volunteer_id).await
    }

    async fn remove_registration(&self, id: EventId, volunteer_id: VolunteerId) -> anyhow::Result<bool> {
        self.inner.remove_registration(id, volunteer_id).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.inner.ping().await
    }
}

pub(crate) struct TestHarness {
    pub(crate) state: AppState,
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) notifier: Arc<RecordingNotifier>,
    events: Arc<FlakyEventRepository>,
}

impl TestHarness {
    pub(crate) async fn new() -> Self {
        Self::with_coefficients(&[]).await
    }

    pub(crate) async fn with_coefficients(entries: &[WasteCoefficient]) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let events = Arc::new(FlakyEventRepository::new(store.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let coefficients_path = std::env::temp_dir()
            .join(format!("shoreline-coefficients-{}.yaml", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let config = RuntimeConfig {
            coefficients_path,
            public_base_url: "https://shore.test".to_string(),
            ..RuntimeConfig::default()
        };
        let health = Arc::new(DefaultHealthService::new(events.clone(), notifier.clone()));

        let state = AppState {
            config,
            event_repo: events.clone(),
            waste_repo: store.clone(),
            impact_repo: store.clone(),
            volunteer_repo: store.clone(),
            coefficient_repo: Arc::new(CoefficientFileRepository::new()),
            notifier: notifier.clone(),
            health,
            coefficients: Arc::new(RwLock::new(CoefficientTable::from_entries(entries))),
            metrics: Arc::new(Metrics::default()),
            job_status: Arc::new(RwLock::new(JobStatus::default())),
            job_gates: Arc::new(JobGates::default()),
        };
        Self {
            state,
            store,
            notifier,
            events,
        }
    }

    pub(crate) async fn event(&self, id: EventId) -> Event {
        self.store
            .fetch_event(id)
            .await
            .expect("fetch event")
            .expect("event exists")
    }

    pub(crate) async fn status_of(&self, id: EventId) -> EventStatus {
        self.event(id).await.status
    }

    pub(crate) fn status_writes(&self) -> usize {
        self.events.status_writes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_status_updates_for(&self, id: EventId) {
        self.events.failing_updates.lock().expect("lock").insert(id);
    }

    pub(crate) fn fail_event_listing(&self) {
        self.events.fail_listing.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn record_waste_by(&self, event_id: EventId, volunteer_id: VolunteerId, weight: f64) {
        let record = waste_record(event_id, Some(volunteer_id), "plastic", "bag", weight);
        self.store.insert_records(&[record]).await.expect("insert waste");
    }
}

fn waste_record(
    event_id: EventId,
    volunteer_id: Option<VolunteerId>,
    category: &str,
    waste_type: &str,
    weight: f64,
) -> WasteRecord {
    WasteRecord {
        id: WasteRecordId::new(),
        event_id,
        volunteer_id,
        category: category.to_string(),
        waste_type: waste_type.to_string(),
        weight,
        bag_count: 1,
        collected_at: at(6, 0),
    }
}

pub(crate) async fn seed_event(
    harness: &TestHarness,
    start_time: &str,
    end_time: &str,
    status: EventStatus,
) -> EventId {
    seed_event_on(harness, test_day(), start_time, end_time, status).await
}

/// Seeds an event with the stored status as given. Registration closes an hour before start.
pub(crate) async fn seed_event_on(
    harness: &TestHarness,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    status: EventStatus,
) -> EventId {
    let offset = harness.state.config.event_offset();
    let registration_deadline = EventWindow::resolve(date, start_time, end_time, offset)
        .map(|window| window.start - Duration::hours(1))
        .unwrap_or_else(|_| Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight")));
    let event = Event {
        id: EventId::new(),
        name: format!("Cleanup {}", start_time),
        date_of_event: date,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        registration_deadline,
        beach_name: "North Shore".to_string(),
        beach_address: String::new(),
        beach_location: None,
        description: String::new(),
        organizer_id: None,
        status,
        volunteer_register_count: 0,
        registered_volunteers: Vec::new(),
        created_at: at(0, 0),
    };
    harness.store.insert_event(&event).await.expect("insert event");
    event.id
}

pub(crate) async fn seed_waste(
    harness: &TestHarness,
    event_id: EventId,
    category: &str,
    waste_type: &str,
    weight: f64,
) {
    let record = waste_record(event_id, None, category, waste_type, weight);
    harness.store.insert_records(&[record]).await.expect("insert waste");
}

pub(crate) async fn seed_volunteer(harness: &TestHarness, email: &str) -> VolunteerId {
    let volunteer = Volunteer {
        id: VolunteerId::new(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        waste_collected: 0.0,
        reward_points: 0,
        created_at: at(0, 0),
    };
    harness
        .store
        .insert_volunteer(&volunteer)
        .await
        .expect("insert volunteer");
    volunteer.id
}
