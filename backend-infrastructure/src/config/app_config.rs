use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;

use backend_domain::{DbConfig, RuntimeConfig, StoreBackend};

use super::validation::{validate_http_url, validate_postgres_url, validate_socket_addr};

pub const CONFIG_ENV: &str = "SHORELINE_CONFIG";

/// Where a loaded config came from. Reported by the caller once logging is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    #[default]
    Defaults,
    /// The path was given but no file exists there.
    Missing(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub store_backend: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub coefficients_path: String,
    pub public_base_url: String,
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
    pub log_dir: Option<String>,
    #[serde(skip)]
    pub source: ConfigSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            store_backend: "postgres".to_string(),
            database_url: "postgres://shoreline@127.0.0.1:5432/shoreline".to_string(),
            database_max_connections: 10,
            coefficients_path: runtime.coefficients_path,
            public_base_url: runtime.public_base_url,
            status_job_interval_seconds: runtime.status_job_interval_seconds,
            event_utc_offset_minutes: runtime.event_utc_offset_minutes,
            reminder_hour: runtime.reminder_hour,
            reminder_minute: runtime.reminder_minute,
            reminder_days_before_event: runtime.reminder_days_before_event,
            reminder_days_after_event: runtime.reminder_days_after_event,
            notification_webhook_url: None,
            notification_webhook_token: None,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
            log_dir: None,
            source: ConfigSource::Defaults,
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to `SHORELINE_CONFIG` and then `./config.toml`.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(ToString::to_string)
            .or_else(|| env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            let mut config = Self::from_toml_str(&content)?;
            config.source = ConfigSource::File(path.clone());
            config
        } else {
            AppConfig {
                source: ConfigSource::Missing(path.clone()),
                ..AppConfig::default()
            }
        };
        config.apply_env_overrides();
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.api_token = non_blank(self.api_token.take());
        self.notification_webhook_url = non_blank(self.notification_webhook_url.take());
        self.notification_webhook_token = non_blank(self.notification_webhook_token.take());
        self.log_dir = non_blank(self.log_dir.take());
        self.store_backend = self.store_backend.trim().to_lowercase();
        self.public_base_url = self.public_base_url.trim().trim_end_matches('/').to_string();
        if self.database_max_connections == 0 {
            self.database_max_connections = 1;
        }
    }

    pub fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.coefficients_path = resolve_path(base, &self.coefficients_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn store(&self) -> Result<StoreBackend> {
        StoreBackend::parse(&self.store_backend)
            .ok_or_else(|| anyhow!("unknown store_backend '{}'", self.store_backend))
    }

    pub fn validate(&self) -> Result<()> {
        validate_socket_addr("bind_addr", &self.bind_addr)?;
        validate_http_url("public_base_url", &self.public_base_url)?;
        if let Some(url) = &self.notification_webhook_url {
            validate_http_url("notification_webhook_url", url)?;
        }
        if self.store()? == StoreBackend::Postgres {
            validate_postgres_url(&self.database_url)?;
        }
        if self.coefficients_path.trim().is_empty() {
            return Err(anyhow!("coefficients_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.status_job_interval_seconds == 0 {
            return Err(anyhow!("status_job_interval_seconds must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.reminder_hour > 23 || self.reminder_minute > 59 {
            return Err(anyhow!("reminder_hour or reminder_minute out of range"));
        }
        if self.event_utc_offset_minutes.abs() >= 24 * 60 {
            return Err(anyhow!("event_utc_offset_minutes out of range"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            public_base_url: self.public_base_url.clone(),
            coefficients_path: self.coefficients_path.clone(),
            status_job_interval_seconds: self.status_job_interval_seconds,
            event_utc_offset_minutes: self.event_utc_offset_minutes,
            reminder_hour: self.reminder_hour,
            reminder_minute: self.reminder_minute,
            reminder_days_before_event: self.reminder_days_before_event,
            reminder_days_after_event: self.reminder_days_after_event,
            notification_webhook_url: self.notification_webhook_url.clone(),
            notification_webhook_token: self.notification_webhook_token.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> Result<DbConfig> {
        Ok(DbConfig {
            backend: self.store()?,
            database_url: self.database_url.clone(),
            max_connections: self.database_max_connections,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("SHORELINE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("SHORELINE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("SHORELINE_STORE_BACKEND") {
            self.store_backend = value;
        }
        if let Ok(value) = env::var("SHORELINE_DATABASE_URL") {
            self.database_url = value;
        }
        if let Ok(value) = env::var("SHORELINE_DATABASE_MAX_CONNECTIONS") {
            self.database_max_connections = value.parse().unwrap_or(self.database_max_connections);
        }
        if let Ok(value) = env::var("SHORELINE_COEFFICIENTS_PATH") {
            self.coefficients_path = value;
        }
        if let Ok(value) = env::var("SHORELINE_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("SHORELINE_STATUS_JOB_INTERVAL_SECONDS") {
            self.status_job_interval_seconds =
                value.parse().unwrap_or(self.status_job_interval_seconds);
        }
        if let Ok(value) = env::var("SHORELINE_EVENT_UTC_OFFSET_MINUTES") {
            self.event_utc_offset_minutes = value.parse().unwrap_or(self.event_utc_offset_minutes);
        }
        if let Ok(value) = env::var("SHORELINE_REMINDER_HOUR") {
            self.reminder_hour = value.parse().unwrap_or(self.reminder_hour);
        }
        if let Ok(value) = env::var("SHORELINE_REMINDER_MINUTE") {
            self.reminder_minute = value.parse().unwrap_or(self.reminder_minute);
        }
        if let Ok(value) = env::var("SHORELINE_REMINDER_DAYS_BEFORE_EVENT") {
            self.reminder_days_before_event =
                value.parse().unwrap_or(self.reminder_days_before_event);
        }
        if let Ok(value) = env::var("SHORELINE_REMINDER_DAYS_AFTER_EVENT") {
            self.reminder_days_after_event = value.parse().unwrap_or(self.reminder_days_after_event);
        }
        if let Ok(value) = env::var("SHORELINE_NOTIFICATION_WEBHOOK_URL") {
            self.notification_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("SHORELINE_NOTIFICATION_WEBHOOK_TOKEN") {
            self.notification_webhook_token = Some(value);
        }
        if let Ok(value) = env::var("SHORELINE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("SHORELINE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("SHORELINE_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
