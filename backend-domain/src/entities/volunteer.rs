// Volunteer directory entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::VolunteerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    pub email: String,
    pub waste_collected: f64,
    pub reward_points: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVolunteerRequest {
    pub name: String,
    pub email: String,
}

impl NewVolunteerRequest {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }
}
