use std::collections::{BTreeMap, HashMap};

use chrono::{FixedOffset, NaiveDate};

use backend_domain::{
    level_for, round2, CategoryWeight, ContributorTotal, DailyCollection, EventDashboard, EventId,
    EventStatus, OverallDashboard, ParticipationEntry, StatusCounts, VolunteerDashboard,
    VolunteerId, WasteKind, WasteRecord,
};

use crate::{AppError, AppState};

const TOP_CONTRIBUTORS: usize = 3;

/// Totals across all events. Weights come from the live ledger; CO2 and
/// participants only from events that already have a summary.
pub async fn overall(state: &AppState) -> Result<OverallDashboard, AppError> {
    let events = state.event_repo.list_events(None).await?;
    let mut counts = StatusCounts::default();
    for event in &events {
        match event.status {
            EventStatus::Upcoming => counts.upcoming += 1,
            EventStatus::Ongoing => counts.ongoing += 1,
            EventStatus::Completed => counts.completed += 1,
        }
    }

    let mut breakdown = state.waste_repo.totals_by_kind().await?;
    breakdown.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.waste_type.cmp(&b.waste_type))
    });
    let total_waste_weight = breakdown.iter().map(|group| group.weight).sum::<f64>();
    for group in &mut breakdown {
        group.weight = round2(group.weight);
    }

    let summaries = state.impact_repo.list_summaries().await?;
    let total_co2_offset = summaries.iter().map(|s| s.co2_offset_estimate).sum::<f64>();
    let total_participants = summaries.iter().map(|s| u64::from(s.participant_count)).sum();

    Ok(OverallDashboard {
        events: counts,
        total_events: events.len() as u64,
        total_waste_weight: round2(total_waste_weight),
        total_co2_offset: round2(total_co2_offset),
        total_participants,
        summarized_events: summaries.len() as u64,
        weight_by_category_and_type: breakdown,
    })
}

pub async fn event_dashboard(state: &AppState, event_id: EventId) -> Result<EventDashboard, AppError> {
    let event = state
        .event_repo
        .fetch_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?;
    let records = state.waste_repo.fetch_by_event(event_id).await?;
    let summary = state.impact_repo.fetch_summary(event_id).await?;

    let (total_weight, co2_offset_estimate, breakdown) = match &summary {
        Some(summary) => (
            summary.total_weight,
            summary.co2_offset_estimate,
            summary.weight_by_category_and_type.clone(),
        ),
        None => (
            records.iter().map(|record| record.weight).sum(),
            0.0,
            weight_by_kind(&records),
        ),
    };

    let mut by_volunteer: HashMap<VolunteerId, f64> = HashMap::new();
    for record in &records {
        if let Some(volunteer_id) = record.volunteer_id {
            *by_volunteer.entry(volunteer_id).or_insert(0.0) += record.weight;
        }
    }
    let ids: Vec<VolunteerId> = by_volunteer.keys().copied().collect();
    let names: HashMap<VolunteerId, String> = state
        .volunteer_repo
        .fetch_volunteers(&ids)
        .await?
        .into_iter()
        .map(|volunteer| (volunteer.id, volunteer.name))
        .collect();
    let mut contributors: Vec<ContributorTotal> = by_volunteer
        .into_iter()
        .filter_map(|(volunteer_id, weight)| {
            names.get(&volunteer_id).map(|name| ContributorTotal {
                volunteer_id,
                name: name.clone(),
                total_weight: weight,
            })
        })
        .collect();
    contributors.sort_by(|a, b| {
        b.total_weight
            .total_cmp(&a.total_weight)
            .then_with(|| a.name.cmp(&b.name))
    });
    contributors.truncate(TOP_CONTRIBUTORS);
    for contributor in &mut contributors {
        contributor.total_weight = round2(contributor.total_weight);
    }

    Ok(EventDashboard {
        event_id,
        event_name: event.name,
        date_of_event: event.date_of_event,
        beach_name: event.beach_name,
        status: event.status,
        volunteer_register_count: event.volunteer_register_count,
        impact_finalized: summary.is_some(),
        total_weight: round2(total_weight),
        co2_offset_estimate: round2(co2_offset_estimate),
        record_count: records.len(),
        weight_by_category_and_type: rounded(breakdown),
        top_contributors: contributors,
        daily_collection: daily_collection(&records, state.config.event_offset()),
    })
}

/// A volunteer's history: every event they registered for or logged waste at,
/// newest first, plus the CO2 of those events' summaries.
pub async fn volunteer_dashboard(
    state: &AppState,
    volunteer_id: VolunteerId,
) -> Result<VolunteerDashboard, AppError> {
    let volunteer = state
        .volunteer_repo
        .fetch_volunteer(volunteer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("volunteer {}", volunteer_id)))?;
    let records = state.waste_repo.fetch_by_volunteer(volunteer_id).await?;

    let mut weight_by_event: HashMap<EventId, f64> = HashMap::new();
    for record in &records {
        *weight_by_event.entry(record.event_id).or_insert(0.0) += record.weight;
    }

    let mut events: Vec<_> = state
        .event_repo
        .list_events(None)
        .await?
        .into_iter()
        .filter(|event| event.is_registered(volunteer_id) || weight_by_event.contains_key(&event.id))
        .collect();
    events.sort_by(|a, b| {
        b.date_of_event
            .cmp(&a.date_of_event)
            .then_with(|| b.start_time.cmp(&a.start_time))
    });

    let co2_by_event: HashMap<EventId, f64> = state
        .impact_repo
        .list_summaries()
        .await?
        .into_iter()
        .map(|summary| (summary.event_id, summary.co2_offset_estimate))
        .collect();
    let co2_offset_from_events: f64 = events
        .iter()
        .filter_map(|event| co2_by_event.get(&event.id))
        .sum();

    let participation: Vec<ParticipationEntry> = events
        .into_iter()
        .map(|event| ParticipationEntry {
            registered: event.is_registered(volunteer_id),
            weight_collected: round2(weight_by_event.get(&event.id).copied().unwrap_or(0.0)),
            event_id: event.id,
            name: event.name,
            date_of_event: event.date_of_event,
            beach_name: event.beach_name,
            status: event.status,
        })
        .collect();

    Ok(VolunteerDashboard {
        level: level_for(volunteer.reward_points),
        events_participated: participation.len(),
        total_waste_collected: round2(records.iter().map(|record| record.weight).sum()),
        co2_offset_from_events: round2(co2_offset_from_events),
        participation,
        weight_by_category_and_type: rounded(weight_by_kind(&records)),
        daily_collection: daily_collection(&records, state.config.event_offset()),
        volunteer,
    })
}

fn weight_by_kind(records: &[WasteRecord]) -> Vec<CategoryWeight> {
    let mut groups: BTreeMap<WasteKind, f64> = BTreeMap::new();
    for record in records {
        *groups.entry(record.kind()).or_insert(0.0) += record.weight;
    }
    groups
        .into_iter()
        .map(|(kind, weight)| CategoryWeight {
            category: kind.category,
            waste_type: kind.waste_type,
            weight,
        })
        .collect()
}

fn rounded(mut groups: Vec<CategoryWeight>) -> Vec<CategoryWeight> {
    for group in &mut groups {
        group.weight = round2(group.weight);
    }
    groups
}

/// Buckets by the calendar day the record was collected, in event-local time.
fn daily_collection(records: &[WasteRecord], offset: FixedOffset) -> Vec<DailyCollection> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        let day = record.collected_at.with_timezone(&offset).date_naive();
        *days.entry(day).or_insert(0.0) += record.weight;
    }
    days.into_iter()
        .map(|(date, weight)| DailyCollection {
            date,
            total_weight: round2(weight),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::WasteCoefficient;

    use crate::jobs::finalize_completed_events;
    use backend_domain::ports::EventRepository;

    use crate::test_support::{at, seed_event, seed_volunteer, seed_waste, test_day, TestHarness};

    fn bag_coefficient() -> WasteCoefficient {
        WasteCoefficient {
            category: "plastic".to_string(),
            subcategory: "bag".to_string(),
            carbon_footprint_per_kg: 2.0,
        }
    }

    #[tokio::test]
    async fn combines_events_ledger_and_summaries() {
        let harness = TestHarness::with_coefficients(&[WasteCoefficient {
            category: "plastic".to_string(),
            subcategory: "bottle".to_string(),
            carbon_footprint_per_kg: 2.0,
        }])
        .await;
        let done = seed_event(&harness, "04:00", "05:00", EventStatus::Completed).await;
        seed_event(&harness, "09:00", "11:00", EventStatus::Upcoming).await;
        seed_waste(&harness, done, "plastic", "bottle", 1.25).await;
        seed_waste(&harness, done, "glass", "jar", 0.5).await;
        finalize_completed_events(&harness.state, at(6, 0))
            .await
            .expect("finalize");

        let dashboard = overall(&harness.state).await.expect("dashboard");
        assert_eq!(dashboard.total_events, 2);
        assert_eq!(dashboard.events.completed, 1);
        assert_eq!(dashboard.events.upcoming, 1);
        assert_eq!(dashboard.total_waste_weight, 1.75);
        assert_eq!(dashboard.total_co2_offset, 2.5);
        assert_eq!(dashboard.summarized_events, 1);
        assert_eq!(dashboard.weight_by_category_and_type[0].category, "glass");
    }

    #[tokio::test]
    async fn live_event_view_ranks_named_contributors() {
        let harness = TestHarness::new().await;
        let event_id = seed_event(&harness, "04:00", "12:00", EventStatus::Ongoing).await;
        let mut volunteers = Vec::new();
        for (email, weight) in [("ana@shore.test", 1.0), ("ben@shore.test", 3.0), ("cy@shore.test", 2.0), ("di@shore.test", 0.5)] {
            let id = seed_volunteer(&harness, email).await;
            harness.record_waste_by(event_id, id, weight).await;
            volunteers.push(id);
        }
        harness.record_waste_by(event_id, volunteers[0], 1.5).await;
        seed_waste(&harness, event_id, "glass", "jar", 9.0).await;

        let view = event_dashboard(&harness.state, event_id).await.expect("dashboard");
        assert!(!view.impact_finalized);
        assert_eq!(view.co2_offset_estimate, 0.0);
        assert_eq!(view.total_weight, 17.0);
        assert_eq!(view.record_count, 6);
        let names: Vec<&str> = view.top_contributors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ben", "ana", "cy"]);
        assert_eq!(view.top_contributors[1].total_weight, 2.5);
        assert_eq!(view.weight_by_category_and_type.len(), 2);
        assert_eq!(
            view.daily_collection,
            vec![DailyCollection {
                date: test_day(),
                total_weight: 17.0,
            }]
        );
    }

    #[tokio::test]
    async fn finalized_event_view_uses_summary() {
        let harness = TestHarness::with_coefficients(&[bag_coefficient()]).await;
        let event_id = seed_event(&harness, "04:00", "05:00", EventStatus::Completed).await;
        let volunteer = seed_volunteer(&harness, "ana@shore.test").await;
        harness.record_waste_by(event_id, volunteer, 1.25).await;
        finalize_completed_events(&harness.state, at(6, 0))
            .await
            .expect("finalize");

        let view = event_dashboard(&harness.state, event_id).await.expect("dashboard");
        assert!(view.impact_finalized);
        assert_eq!(view.total_weight, 1.25);
        assert_eq!(view.co2_offset_estimate, 2.5);

        let err = event_dashboard(&harness.state, EventId::new())
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn volunteer_view_covers_registrations_and_collections() {
        let harness = TestHarness::with_coefficients(&[bag_coefficient()]).await;
        let volunteer = seed_volunteer(&harness, "ana@shore.test").await;
        let done = seed_event(&harness, "04:00", "05:00", EventStatus::Completed).await;
        let next = seed_event(&harness, "09:00", "11:00", EventStatus::Upcoming).await;
        seed_event(&harness, "13:00", "14:00", EventStatus::Upcoming).await;
        harness.record_waste_by(done, volunteer, 2.0).await;
        harness
            .store
            .add_registration(next, volunteer)
            .await
            .expect("register");
        finalize_completed_events(&harness.state, at(6, 0))
            .await
            .expect("finalize");

        let view = volunteer_dashboard(&harness.state, volunteer)
            .await
            .expect("dashboard");
        assert_eq!(view.level, 1);
        assert_eq!(view.events_participated, 2);
        assert_eq!(view.participation[0].event_id, next);
        assert!(view.participation[0].registered);
        assert_eq!(view.participation[0].weight_collected, 0.0);
        assert_eq!(view.participation[1].weight_collected, 2.0);
        assert_eq!(view.total_waste_collected, 2.0);
        assert_eq!(view.co2_offset_from_events, 4.0);

        let err = volunteer_dashboard(&harness.state, VolunteerId::new())
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
