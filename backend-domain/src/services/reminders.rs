// Reminder selection for the daily notification pass

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

use crate::entities::Event;
use crate::services::lifecycle::EventWindow;
use crate::value_objects::EventStatus;

/// Upcoming events exactly `days_before` calendar days ahead of `today`.
pub fn wants_upcoming_reminder(event: &Event, today: NaiveDate, days_before: u32) -> bool {
    event.status == EventStatus::Upcoming
        && event.date_of_event == today + Duration::days(i64::from(days_before))
}

/// Ongoing events, plus events that ended within the last `days_after` days
/// (before the start of `today` in the event offset).
pub fn wants_waste_reminder(
    event: &Event,
    today: NaiveDate,
    days_after: u32,
    offset: FixedOffset,
) -> bool {
    match event.status {
        EventStatus::Ongoing => true,
        EventStatus::Completed => {
            let Ok(window) = EventWindow::for_event(event, offset) else {
                return false;
            };
            let Some(day_start) = start_of_day(today, offset) else {
                return false;
            };
            let lower = day_start - Duration::days(i64::from(days_after));
            window.end >= lower && window.end < day_start
        }
        EventStatus::Upcoming => false,
    }
}

fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)?
        .and_local_timezone(offset)
        .single()
        .map(|value| value.with_timezone(&Utc))
}
