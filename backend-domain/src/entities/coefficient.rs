// Waste coefficient reference data

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::WasteKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteCoefficient {
    pub category: String,
    pub subcategory: String,
    pub carbon_footprint_per_kg: f64,
}

impl WasteCoefficient {
    pub fn normalized(&self) -> Self {
        let kind = self.kind();
        Self {
            category: kind.category,
            subcategory: kind.waste_type,
            carbon_footprint_per_kg: self.carbon_footprint_per_kg,
        }
    }

    pub fn kind(&self) -> WasteKind {
        WasteKind::new(&self.category, &self.subcategory)
    }
}

/// Read-only lookup of kg CO2 per kg of collected waste.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: HashMap<WasteKind, f64>,
}

impl CoefficientTable {
    pub fn from_entries(entries: &[WasteCoefficient]) -> Self {
        let entries = entries
            .iter()
            .map(|entry| (entry.kind(), entry.carbon_footprint_per_kg))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, kind: &WasteKind) -> Option<f64> {
        self.entries.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_entries(&self) -> Vec<WasteCoefficient> {
        let mut out: Vec<WasteCoefficient> = self
            .entries
            .iter()
            .map(|(kind, value)| WasteCoefficient {
                category: kind.category.clone(),
                subcategory: kind.waste_type.clone(),
                carbon_footprint_per_kg: *value,
            })
            .collect();
        out.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.subcategory.cmp(&b.subcategory))
        });
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoefficientsPayload {
    pub coefficients: Vec<WasteCoefficient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_normalized_kind() {
        let table = CoefficientTable::from_entries(&[WasteCoefficient {
            category: "Plastic".to_string(),
            subcategory: "Bottle".to_string(),
            carbon_footprint_per_kg: 1.5,
        }]);
        assert_eq!(table.lookup(&WasteKind::new("plastic", "bottle")), Some(1.5));
        assert_eq!(table.lookup(&WasteKind::new("plastic", "bag")), None);
        assert_eq!(table.to_entries()[0].category, "plastic");
    }
}
