// Background job status entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    StatusTransition,
    ImpactGeneration,
    Reminders,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::StatusTransition => "status_transition",
            JobKind::ImpactGeneration => "impact_generation",
            JobKind::Reminders => "reminders",
        }
    }

    /// Accepts the short names used by the ops trigger endpoint.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "status" | "status_transition" => Some(JobKind::StatusTransition),
            "impact" | "impact_generation" => Some(JobKind::ImpactGeneration),
            "reminders" | "reminder" => Some(JobKind::Reminders),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobProgress {
    pub running: bool,
    pub runs: u64,
    pub skipped: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_summary: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobStatus {
    pub status_transition: JobProgress,
    pub impact_generation: JobProgress,
    pub reminders: JobProgress,
}

impl JobStatus {
    pub fn progress_mut(&mut self, kind: JobKind) -> &mut JobProgress {
        match kind {
            JobKind::StatusTransition => &mut self.status_transition,
            JobKind::ImpactGeneration => &mut self.impact_generation,
            JobKind::Reminders => &mut self.reminders,
        }
    }
}
