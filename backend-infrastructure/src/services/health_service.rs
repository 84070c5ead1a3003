use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::{EventRepository, HealthCheckService, NotificationDispatcher};

pub struct DefaultHealthService {
    event_repo: Arc<dyn EventRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl DefaultHealthService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            event_repo,
            notifier,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_store(&self) -> anyhow::Result<bool> {
        self.event_repo.ping().await.map(|_| true)
    }

    async fn check_notification_target(&self) -> anyhow::Result<bool> {
        self.notifier.check_target().await.map(|_| true)
    }
}
