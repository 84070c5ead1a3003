use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use backend_application::{AppState, JobGates, Metrics};
use backend_domain::ports::{
    CoefficientRepository, EventRepository, ImpactRepository, VolunteerRepository,
    WasteRepository,
};
use backend_domain::{CoefficientTable, JobStatus, StoreBackend};
use backend_infrastructure::{
    AppConfig, CoefficientFileRepository, DefaultHealthService, InMemoryStore, PostgresStore,
    WebhookNotificationDispatcher,
};

struct Stores {
    events: Arc<dyn EventRepository>,
    waste: Arc<dyn WasteRepository>,
    impact: Arc<dyn ImpactRepository>,
    volunteers: Arc<dyn VolunteerRepository>,
}

impl Stores {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EventRepository + WasteRepository + ImpactRepository + VolunteerRepository + 'static,
    {
        Self {
            events: store.clone(),
            waste: store.clone(),
            impact: store.clone(),
            volunteers: store,
        }
    }
}

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config()?;

        let stores = match db_config.backend {
            StoreBackend::Postgres => {
                let store = Arc::new(PostgresStore::connect(&db_config).await?);
                store.ensure_schema().await?;
                Stores::from_store(store)
            }
            StoreBackend::Memory => {
                info!("using in-memory store, data is lost on restart");
                Stores::from_store(Arc::new(InMemoryStore::new()))
            }
        };

        let coefficient_repo = Arc::new(CoefficientFileRepository::new());
        let coefficients = coefficient_repo
            .load_coefficients(&runtime_config.coefficients_path)
            .await
            .with_context(|| {
                format!(
                    "failed to load coefficients from {}",
                    runtime_config.coefficients_path
                )
            })?;
        info!(entries = coefficients.len(), "waste coefficients loaded");

        let notifier = Arc::new(WebhookNotificationDispatcher::new(&runtime_config)?);
        let health = Arc::new(DefaultHealthService::new(
            stores.events.clone(),
            notifier.clone(),
        ));

        let state = AppState {
            config: runtime_config,
            event_repo: stores.events,
            waste_repo: stores.waste,
            impact_repo: stores.impact,
            volunteer_repo: stores.volunteers,
            coefficient_repo,
            notifier,
            health,
            coefficients: Arc::new(RwLock::new(CoefficientTable::from_entries(&coefficients))),
            metrics: Arc::new(Metrics::default()),
            job_status: Arc::new(RwLock::new(JobStatus::default())),
            job_gates: Arc::new(JobGates::default()),
        };

        Ok(Self { state })
    }
}
