// Event lifecycle: status is a pure function of the clock and the event window

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::entities::Event;
use crate::utils::parse_clock_time;
use crate::value_objects::EventStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    pub fn for_event(event: &Event, offset: FixedOffset) -> Result<Self> {
        Self::resolve(event.date_of_event, &event.start_time, &event.end_time, offset)
    }

    pub fn resolve(
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        offset: FixedOffset,
    ) -> Result<Self> {
        let start = combine(date, start_time, offset)?;
        let end = combine(date, end_time, offset)?;
        Ok(Self { start, end })
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        if now < self.start {
            EventStatus::Upcoming
        } else if now <= self.end {
            EventStatus::Ongoing
        } else {
            EventStatus::Completed
        }
    }
}

fn combine(date: NaiveDate, time: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let clock = parse_clock_time(time)?;
    offset
        .from_local_datetime(&date.and_time(clock))
        .single()
        .map(|value| value.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("ambiguous local time {} {}", date, time))
}

/// Status the event should hold at `now`, independent of what is stored.
pub fn resolve_status(event: &Event, now: DateTime<Utc>, offset: FixedOffset) -> Result<EventStatus> {
    Ok(EventWindow::for_event(event, offset)?.status_at(now))
}
