use std::sync::Arc;

use backend_domain::ports::{
    CoefficientRepository, EventRepository, HealthCheckService, ImpactRepository,
    NotificationDispatcher, VolunteerRepository, WasteRepository,
};
use backend_domain::{CoefficientTable, JobStatus, RuntimeConfig};
use tokio::sync::RwLock;

use crate::jobs::JobGates;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn EventRepository>,
    pub waste_repo: Arc<dyn WasteRepository>,
    pub impact_repo: Arc<dyn ImpactRepository>,
    pub volunteer_repo: Arc<dyn VolunteerRepository>,
    pub coefficient_repo: Arc<dyn CoefficientRepository>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub health: Arc<dyn HealthCheckService>,
    pub coefficients: Arc<RwLock<CoefficientTable>>,
    pub metrics: Arc<Metrics>,
    pub job_status: Arc<RwLock<JobStatus>>,
    pub job_gates: Arc<JobGates>,
}
