use async_trait::async_trait;

use crate::entities::{NotificationDelivery, NotificationFact};

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Fire-and-forget; delivery failures are logged, never returned.
    fn dispatch(&self, fact: NotificationFact);
    async fn check_target(&self) -> anyhow::Result<()>;
    async fn recent_deliveries(&self, limit: usize) -> Vec<NotificationDelivery>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_store(&self) -> anyhow::Result<bool>;
    async fn check_notification_target(&self) -> anyhow::Result<bool>;
}
