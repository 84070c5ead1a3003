// Waste category/type pair, the grouping key for impact breakdowns and CO2 coefficients

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WasteKind {
    pub category: String,
    #[serde(rename = "type")]
    pub waste_type: String,
}

impl WasteKind {
    pub fn new(category: &str, waste_type: &str) -> Self {
        Self {
            category: normalize_label(category),
            waste_type: normalize_label(waste_type),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.category.is_empty() || self.waste_type.is_empty()
    }
}

impl fmt::Display for WasteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.waste_type)
    }
}

pub fn normalize_label(value: &str) -> String {
    value.trim().to_lowercase()
}
