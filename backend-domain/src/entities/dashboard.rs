// Read-only dashboard aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{CategoryWeight, Volunteer};
use crate::value_objects::{EventId, EventStatus, VolunteerId};

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub upcoming: u64,
    pub ongoing: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallDashboard {
    pub events: StatusCounts,
    pub total_events: u64,
    pub total_waste_weight: f64,
    pub total_co2_offset: f64,
    pub total_participants: u64,
    pub summarized_events: u64,
    pub weight_by_category_and_type: Vec<CategoryWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorTotal {
    pub volunteer_id: VolunteerId,
    pub name: String,
    pub total_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCollection {
    pub date: NaiveDate,
    pub total_weight: f64,
}

/// One event's view. Totals come from the impact summary once it exists,
/// otherwise from the live ledger with no CO2 figure yet.
#[derive(Debug, Clone, Serialize)]
pub struct EventDashboard {
    pub event_id: EventId,
    pub event_name: String,
    pub date_of_event: NaiveDate,
    pub beach_name: String,
    pub status: EventStatus,
    pub volunteer_register_count: u32,
    pub impact_finalized: bool,
    pub total_weight: f64,
    pub co2_offset_estimate: f64,
    pub record_count: usize,
    pub weight_by_category_and_type: Vec<CategoryWeight>,
    pub top_contributors: Vec<ContributorTotal>,
    pub daily_collection: Vec<DailyCollection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipationEntry {
    pub event_id: EventId,
    pub name: String,
    pub date_of_event: NaiveDate,
    pub beach_name: String,
    pub status: EventStatus,
    pub registered: bool,
    pub weight_collected: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolunteerDashboard {
    pub volunteer: Volunteer,
    pub level: u64,
    pub events_participated: usize,
    pub total_waste_collected: f64,
    pub co2_offset_from_events: f64,
    pub participation: Vec<ParticipationEntry>,
    pub weight_by_category_and_type: Vec<CategoryWeight>,
    pub daily_collection: Vec<DailyCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub volunteer_id: VolunteerId,
    pub name: String,
    pub reward_points: u64,
    pub waste_collected: f64,
    pub level: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

const POINTS_PER_LEVEL: u64 = 100;

/// Levels start at 1 and step every hundred reward points.
pub fn level_for(reward_points: u64) -> u64 {
    reward_points / POINTS_PER_LEVEL + 1
}
