use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{info, warn};

use backend_domain::ports::NotificationDispatcher;
use backend_domain::{NotificationDelivery, NotificationFact, RuntimeConfig};

const MAX_DELIVERIES: usize = 200;

/// Forwards notification facts as JSON to an optional webhook. Without one the
/// facts are only logged. Delivery runs off the caller's task.
pub struct WebhookNotificationDispatcher {
    client: Client,
    webhook_url: Option<String>,
    webhook_token: Option<String>,
    deliveries: Arc<Mutex<VecDeque<NotificationDelivery>>>,
}

impl WebhookNotificationDispatcher {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            webhook_url: config.notification_webhook_url.clone(),
            webhook_token: config.notification_webhook_token.clone(),
            deliveries: Arc::new(Mutex::new(VecDeque::new())),
        })
    }
}

fn push_delivery(deliveries: &Mutex<VecDeque<NotificationDelivery>>, delivery: NotificationDelivery) {
    let mut guard = deliveries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.len() >= MAX_DELIVERIES {
        guard.pop_front();
    }
    guard.push_back(delivery);
}

async fn post_fact(
    client: &Client,
    url: &str,
    token: Option<&str>,
    fact: &NotificationFact,
) -> Result<()> {
    let mut request = client.post(url).json(fact);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    request.send().await?.error_for_status()?;
    Ok(())
}

#[async_trait]
impl NotificationDispatcher for WebhookNotificationDispatcher {
    fn dispatch(&self, fact: NotificationFact) {
        info!(kind = fact.kind(), event_id = %fact.event_id(), "notification fact");
        let Some(url) = self.webhook_url.clone() else {
            push_delivery(
                &self.deliveries,
                NotificationDelivery {
                    kind: fact.kind().to_string(),
                    event_id: fact.event_id(),
                    delivered: false,
                    error: Some("no webhook configured".to_string()),
                    attempted_at: Utc::now(),
                },
            );
            return;
        };

        let client = self.client.clone();
        let token = self.webhook_token.clone();
        let deliveries = self.deliveries.clone();
        tokio::spawn(async move {
            let result = post_fact(&client, &url, token.as_deref(), &fact).await;
            if let Err(err) = &result {
                warn!(kind = fact.kind(), event_id = %fact.event_id(), "notification webhook failed: {}", err);
            }
            push_delivery(
                &deliveries,
                NotificationDelivery {
                    kind: fact.kind().to_string(),
                    event_id: fact.event_id(),
                    delivered: result.is_ok(),
                    error: result.err().map(|err| err.to_string()),
                    attempted_at: Utc::now(),
                },
            );
        });
    }

    async fn check_target(&self) -> Result<()> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or_else(|| anyhow!("notification webhook url not configured"))?;
        let response = self.client.head(url).send().await?;
        if response.status().is_server_error() {
            anyhow::bail!("notification webhook responded {}", response.status());
        }
        Ok(())
    }

    async fn recent_deliveries(&self, limit: usize) -> Vec<NotificationDelivery> {
        let guard = self.deliveries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.iter().rev().take(limit).cloned().collect()
    }
}
