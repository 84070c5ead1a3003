// Impact summary entity
// One derived aggregate per completed event, keyed by event id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::EventId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub category: String,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub event_id: EventId,
    pub total_weight: f64,
    pub participant_count: u32,
    pub co2_offset_estimate: f64,
    pub weight_by_category_and_type: Vec<CategoryWeight>,
    pub generated_at: DateTime<Utc>,
}

/// Result of a keyed insert. `AlreadyExists` is the idempotent path, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
}
