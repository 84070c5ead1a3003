// Waste ledger entities
// Records are append-only facts; nothing in the core updates or deletes them

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, VolunteerId, WasteKind, WasteRecordId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteRecord {
    pub id: WasteRecordId,
    pub event_id: EventId,
    pub volunteer_id: Option<VolunteerId>,
    pub category: String,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub weight: f64,
    pub bag_count: u32,
    pub collected_at: DateTime<Utc>,
}

impl WasteRecord {
    pub fn kind(&self) -> WasteKind {
        WasteKind::new(&self.category, &self.waste_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteSubmission {
    pub event_id: EventId,
    #[serde(default)]
    pub volunteer_id: Option<VolunteerId>,
    pub category: String,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub weight: f64,
    #[serde(default)]
    pub bag_count: u32,
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WasteBatchPayload {
    pub records: Vec<WasteSubmission>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WasteStats {
    pub total_weight: f64,
    pub by_type: BTreeMap<String, f64>,
    pub by_volunteer: BTreeMap<String, f64>,
    pub record_count: usize,
}
