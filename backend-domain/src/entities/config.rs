// Runtime configuration handed to the application layer

use chrono::{FixedOffset, Offset, Utc};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub public_base_url: String,
    pub coefficients_path: String,
    pub status_job_interval_seconds: u64,
    pub event_utc_offset_minutes: i32,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
    pub reminder_days_before_event: u32,
    pub reminder_days_after_event: u32,
    pub notification_webhook_url: Option<String>,
    pub notification_webhook_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    /// Offset used to interpret event dates and wall-clock times.
    pub fn event_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.event_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4180".to_string(),
            api_token: None,
            public_base_url: "http://127.0.0.1:4180".to_string(),
            coefficients_path: "./waste_coefficients.yaml".to_string(),
            status_job_interval_seconds: 600,
            event_utc_offset_minutes: 0,
            reminder_hour: 8,
            reminder_minute: 0,
            reminder_days_before_event: 3,
            reminder_days_after_event: 1,
            notification_webhook_url: None,
            notification_webhook_token: None,
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StoreBackend::Postgres),
            "memory" | "in-memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
}
