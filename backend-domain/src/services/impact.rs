// Impact aggregation: reduce an event's waste ledger into one summary

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entities::{CategoryWeight, CoefficientTable, ImpactSummary, WasteRecord};
use crate::utils::round2;
use crate::value_objects::{EventId, WasteKind};

/// Builds the summary for one event. Unknown waste kinds weigh in but add no CO2.
/// Weights are raw sums; only the CO2 estimate is rounded.
pub fn aggregate_impact(
    event_id: EventId,
    participant_count: u32,
    records: &[WasteRecord],
    coefficients: &CoefficientTable,
    generated_at: DateTime<Utc>,
) -> ImpactSummary {
    let mut groups: BTreeMap<WasteKind, f64> = BTreeMap::new();
    let mut total_weight = 0.0;
    for record in records {
        total_weight += record.weight;
        *groups.entry(record.kind()).or_insert(0.0) += record.weight;
    }

    let co2: f64 = groups
        .iter()
        .map(|(kind, weight)| weight * coefficients.lookup(kind).unwrap_or(0.0))
        .sum();

    let weight_by_category_and_type = groups
        .into_iter()
        .map(|(kind, weight)| CategoryWeight {
            category: kind.category,
            waste_type: kind.waste_type,
            weight,
        })
        .collect();

    ImpactSummary {
        event_id,
        total_weight,
        participant_count,
        co2_offset_estimate: round2(co2),
        weight_by_category_and_type,
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WasteCoefficient;
    use crate::value_objects::WasteRecordId;

    fn record(event_id: EventId, category: &str, waste_type: &str, weight: f64) -> WasteRecord {
        WasteRecord {
            id: WasteRecordId::new(),
            event_id,
            volunteer_id: None,
            category: category.to_string(),
            waste_type: waste_type.to_string(),
            weight,
            bag_count: 1,
            collected_at: Utc::now(),
        }
    }

    fn table() -> CoefficientTable {
        CoefficientTable::from_entries(&[WasteCoefficient {
            category: "plastic".to_string(),
            subcategory: "bottle".to_string(),
            carbon_footprint_per_kg: 1.5,
        }])
    }

    #[test]
    fn merges_same_kind_and_applies_coefficient() {
        let event_id = EventId::new();
        let records = vec![
            record(event_id, "plastic", "bottle", 2.0),
            record(event_id, "plastic", "bottle", 3.0),
        ];
        let summary = aggregate_impact(event_id, 4, &records, &table(), Utc::now());
        assert_eq!(summary.total_weight, 5.0);
        assert_eq!(summary.participant_count, 4);
        assert_eq!(summary.co2_offset_estimate, 7.5);
        assert_eq!(
            summary.weight_by_category_and_type,
            vec![CategoryWeight {
                category: "plastic".to_string(),
                waste_type: "bottle".to_string(),
                weight: 5.0,
            }]
        );
    }

    #[test]
    fn empty_ledger_yields_zero_summary() {
        let event_id = EventId::new();
        let summary = aggregate_impact(event_id, 0, &[], &table(), Utc::now());
        assert_eq!(summary.total_weight, 0.0);
        assert_eq!(summary.co2_offset_estimate, 0.0);
        assert!(summary.weight_by_category_and_type.is_empty());
    }

    #[test]
    fn unknown_kind_counts_weight_but_not_co2() {
        let event_id = EventId::new();
        let records = vec![
            record(event_id, "plastic", "bottle", 2.0),
            record(event_id, "fishing", "net", 4.25),
        ];
        let summary = aggregate_impact(event_id, 1, &records, &table(), Utc::now());
        assert_eq!(summary.total_weight, 6.25);
        assert_eq!(summary.co2_offset_estimate, 3.0);
        assert_eq!(summary.weight_by_category_and_type.len(), 2);
        assert_eq!(summary.weight_by_category_and_type[0].category, "fishing");
    }

    #[test]
    fn labels_are_grouped_case_insensitively() {
        let event_id = EventId::new();
        let records = vec![
            record(event_id, "Plastic", "Bottle", 1.0),
            record(event_id, "plastic ", "bottle", 1.0),
        ];
        let summary = aggregate_impact(event_id, 0, &records, &table(), Utc::now());
        assert_eq!(summary.weight_by_category_and_type.len(), 1);
        assert_eq!(summary.co2_offset_estimate, 3.0);
    }

    #[test]
    fn sub_cent_weights_still_count() {
        let event_id = EventId::new();
        let records = vec![
            record(event_id, "plastic", "cap", 0.004),
            record(event_id, "plastic", "cap", 0.004),
            record(event_id, "plastic", "cap", 0.004),
        ];
        let summary = aggregate_impact(event_id, 0, &records, &table(), Utc::now());
        assert!((summary.total_weight - 0.012).abs() < 1e-9);
        assert_eq!(summary.weight_by_category_and_type.len(), 1);
        assert!((summary.weight_by_category_and_type[0].weight - 0.012).abs() < 1e-9);
        assert_eq!(summary.co2_offset_estimate, 0.0);
    }

    #[test]
    fn co2_is_rounded_to_cents() {
        let event_id = EventId::new();
        let table = CoefficientTable::from_entries(&[WasteCoefficient {
            category: "glass".to_string(),
            subcategory: "jar".to_string(),
            carbon_footprint_per_kg: 0.333,
        }]);
        let records = vec![record(event_id, "glass", "jar", 1.0)];
        let summary = aggregate_impact(event_id, 0, &records, &table, Utc::now());
        assert_eq!(summary.co2_offset_estimate, 0.33);
    }
}
