use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use backend_domain::ports::{
    EventRepository, ImpactRepository, VolunteerRepository, WasteRepository,
};
use backend_domain::{
    BeachLocation, CategoryWeight, DbConfig, Event, EventId, EventStatus, ImpactSummary,
    InsertOutcome, RegistrationOutcome, Volunteer, VolunteerId, WasteRecord,
};

const SCHEMA: [&str; 7] = [
    r#"
CREATE TABLE IF NOT EXISTS events (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    date_of_event DATE NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    registration_deadline TIMESTAMPTZ NOT NULL,
    beach_name TEXT NOT NULL,
    beach_address TEXT NOT NULL DEFAULT '',
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    description TEXT NOT NULL DEFAULT '',
    organizer_id TEXT,
    status TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS event_registrations (
    event_id UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE,
    volunteer_id UUID NOT NULL,
    registered_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (event_id, volunteer_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS waste_records (
    id UUID PRIMARY KEY,
    event_id UUID NOT NULL REFERENCES events(id),
    volunteer_id UUID,
    category TEXT NOT NULL,
    waste_type TEXT NOT NULL,
    weight DOUBLE PRECISION NOT NULL,
    bag_count INTEGER NOT NULL DEFAULT 0,
    collected_at TIMESTAMPTZ NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS waste_records_event_idx ON waste_records (event_id)",
    "CREATE INDEX IF NOT EXISTS waste_records_volunteer_idx ON waste_records (volunteer_id)",
    r#"
CREATE TABLE IF NOT EXISTS impact_summaries (
    event_id UUID PRIMARY KEY REFERENCES events(id),
    total_weight DOUBLE PRECISION NOT NULL,
    participant_count INTEGER NOT NULL,
    co2_offset_estimate DOUBLE PRECISION NOT NULL,
    weight_by_category_and_type JSONB NOT NULL,
    generated_at TIMESTAMPTZ NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS volunteers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    waste_collected DOUBLE PRECISION NOT NULL DEFAULT 0,
    reward_points BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
];

const EVENT_SELECT: &str = r#"
SELECT e.id, e.name, e.date_of_event, e.start_time, e.end_time, e.registration_deadline,
       e.beach_name, e.beach_address, e.latitude, e.longitude, e.description,
       e.organizer_id, e.status, e.created_at,
       COALESCE(
           array_agg(r.volunteer_id ORDER BY r.registered_at) FILTER (WHERE r.volunteer_id IS NOT NULL),
           '{}'
       ) AS registered
FROM events e
LEFT JOIN event_registrations r ON r.event_id = e.id
"#;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.database_url)
            .await?;
        info!(max_connections = config.max_connections, "connected to postgres");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn event_from_row(row: &PgRow) -> Result<Event> {
    let status: String = row.try_get("status")?;
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    let registered: Vec<Uuid> = row.try_get("registered")?;
    let registered_volunteers: Vec<VolunteerId> =
        registered.into_iter().map(VolunteerId::from).collect();
    let id: Uuid = row.try_get("id")?;
    let date_of_event: NaiveDate = row.try_get("date_of_event")?;
    let registration_deadline: DateTime<Utc> = row.try_get("registration_deadline")?;
    Ok(Event {
        id: EventId::from(id),
        name: row.try_get("name")?,
        date_of_event,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        registration_deadline,
        beach_name: row.try_get("beach_name")?,
        beach_address: row.try_get("beach_address")?,
        beach_location: latitude
            .zip(longitude)
            .map(|(latitude, longitude)| BeachLocation { latitude, longitude }),
        description: row.try_get("description")?,
        organizer_id: row.try_get("organizer_id")?,
        status: status.parse()?,
        volunteer_register_count: registered_volunteers.len() as u32,
        registered_volunteers,
        created_at: row.try_get("created_at")?,
    })
}

fn waste_from_row(row: &PgRow) -> Result<WasteRecord> {
    let id: Uuid = row.try_get("id")?;
    let event_id: Uuid = row.try_get("event_id")?;
    let volunteer_id: Option<Uuid> = row.try_get("volunteer_id")?;
    let bag_count: i32 = row.try_get("bag_count")?;
    Ok(WasteRecord {
        id: id.into(),
        event_id: event_id.into(),
        volunteer_id: volunteer_id.map(VolunteerId::from),
        category: row.try_get("category")?,
        waste_type: row.try_get("waste_type")?,
        weight: row.try_get("weight")?,
        bag_count: u32::try_from(bag_count).unwrap_or(0),
        collected_at: row.try_get("collected_at")?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<ImpactSummary> {
    let event_id: Uuid = row.try_get("event_id")?;
    let participant_count: i32 = row.try_get("participant_count")?;
    let breakdown: Json<Vec<CategoryWeight>> = row.try_get("weight_by_category_and_type")?;
    Ok(ImpactSummary {
        event_id: event_id.into(),
        total_weight: row.try_get("total_weight")?,
        participant_count: u32::try_from(participant_count).unwrap_or(0),
        co2_offset_estimate: row.try_get("co2_offset_estimate")?,
        weight_by_category_and_type: breakdown.0,
        generated_at: row.try_get("generated_at")?,
    })
}

fn volunteer_from_row(row: &PgRow) -> Result<Volunteer> {
    let id: Uuid = row.try_get("id")?;
    let reward_points: i64 = row.try_get("reward_points")?;
    Ok(Volunteer {
        id: id.into(),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        waste_collected: row.try_get("waste_collected")?,
        reward_points: u64::try_from(reward_points).unwrap_or(0),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl EventRepository for PostgresStore {
    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
INSERT INTO events (id, name, date_of_event, start_time, end_time, registration_deadline,
                    beach_name, beach_address, latitude, longitude, description,
                    organizer_id, status, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
"#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(event.date_of_event)
        .bind(&event.start_time)
        .bind(&event.end_time)
        .bind(event.registration_deadline)
        .bind(&event.beach_name)
        .bind(&event.beach_address)
        .bind(event.beach_location.map(|location| location.latitude))
        .bind(event.beach_location.map(|location| location.longitude))
        .bind(&event.description)
        .bind(&event.organizer_id)
        .bind(event.status.as_str())
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_event(&self, id: EventId) -> Result<Option<Event>> {
        let query = format!("{} WHERE e.id = $1 GROUP BY e.id", EVENT_SELECT);
        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let query = format!(
            "{} WHERE ($1::TEXT IS NULL OR e.status = $1) GROUP BY e.id ORDER BY e.created_at, e.id",
            EVENT_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(event_from_row).collect()
    }

    async fn update_status(&self, id: EventId, status: EventStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE events SET status = $2 WHERE id = $1 AND status <> $2")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_event(&self, event: &Event) -> Result<bool> {
        let result = sqlx::query(
            r#"
UPDATE events
SET name = $2, date_of_event = $3, start_time = $4, end_time = $5,
    registration_deadline = $6, beach_name = $7, beach_address = $8,
    latitude = $9, longitude = $10, description = $11, status = $12
WHERE id = $1
"#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(event.date_of_event)
        .bind(&event.start_time)
        .bind(&event.end_time)
        .bind(event.registration_deadline)
        .bind(&event.beach_name)
        .bind(&event.beach_address)
        .bind(event.beach_location.map(|location| location.latitude))
        .bind(event.beach_location.map(|location| location.longitude))
        .bind(&event.description)
        .bind(event.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool> {
        let result = sqlx::query(
            r#"
DELETE FROM events
WHERE id = $1
  AND NOT EXISTS (SELECT 1 FROM waste_records WHERE event_id = $1)
  AND NOT EXISTS (SELECT 1 FROM impact_summaries WHERE event_id = $1)
"#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_registration(
        &self,
        id: EventId,
        volunteer_id: VolunteerId,
    ) -> Result<RegistrationOutcome> {
        let result = sqlx::query(
            r#"
INSERT INTO event_registrations (event_id, volunteer_id)
SELECT $1, $2 WHERE EXISTS (SELECT 1 FROM events WHERE id = $1)
ON CONFLICT (event_id, volunteer_id) DO NOTHING
"#,
        )
        .bind(id.as_uuid())
        .bind(volunteer_id.as_uuid())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() > 0 {
            return Ok(RegistrationOutcome::Registered);
        }
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists {
            RegistrationOutcome::AlreadyRegistered
        } else {
            RegistrationOutcome::EventMissing
        })
    }

    async fn remove_registration(&self, id: EventId, volunteer_id: VolunteerId) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM event_registrations WHERE event_id = $1 AND volunteer_id = $2")
                .bind(id.as_uuid())
                .bind(volunteer_id.as_uuid())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl WasteRepository for PostgresStore {
    async fn insert_records(&self, records: &[WasteRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                r#"
INSERT INTO waste_records (id, event_id, volunteer_id, category, waste_type, weight, bag_count, collected_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#,
            )
            .bind(record.id.as_uuid())
            .bind(record.event_id.as_uuid())
            .bind(record.volunteer_id.map(|id| id.as_uuid()))
            .bind(&record.category)
            .bind(&record.waste_type)
            .bind(record.weight)
            .bind(i32::try_from(record.bag_count).map_err(|_| anyhow!("bag_count too large"))?)
            .bind(record.collected_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_by_event(&self, event_id: EventId) -> Result<Vec<WasteRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM waste_records WHERE event_id = $1 ORDER BY collected_at, id",
        )
        .bind(event_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(waste_from_row).collect()
    }

    async fn fetch_by_volunteer(&self, volunteer_id: VolunteerId) -> Result<Vec<WasteRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM waste_records WHERE volunteer_id = $1 ORDER BY collected_at, id",
        )
        .bind(volunteer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(waste_from_row).collect()
    }

    async fn has_submission(&self, event_id: EventId, volunteer_id: VolunteerId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM waste_records WHERE event_id = $1 AND volunteer_id = $2)",
        )
        .bind(event_id.as_uuid())
        .bind(volunteer_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn totals_by_kind(&self) -> Result<Vec<CategoryWeight>> {
        let rows = sqlx::query_as::<_, (String, String, f64)>(
            r#"
SELECT category, waste_type, SUM(weight)
FROM waste_records
GROUP BY category, waste_type
ORDER BY category, waste_type
"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(category, waste_type, weight)| CategoryWeight {
                category,
                waste_type,
                weight,
            })
            .collect())
    }
}

#[async_trait]
impl ImpactRepository for PostgresStore {
    async fn insert_if_absent(&self, summary: &ImpactSummary) -> Result<InsertOutcome> {
        let participant_count = i32::try_from(summary.participant_count)
            .map_err(|_| anyhow!("participant_count too large"))?;
        let result = sqlx::query(
            r#"
INSERT INTO impact_summaries (event_id, total_weight, participant_count, co2_offset_estimate,
                              weight_by_category_and_type, generated_at)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (event_id) DO NOTHING
"#,
        )
        .bind(summary.event_id.as_uuid())
        .bind(summary.total_weight)
        .bind(participant_count)
        .bind(summary.co2_offset_estimate)
        .bind(Json(&summary.weight_by_category_and_type))
        .bind(summary.generated_at)
        .execute(&self.pool)
        .await?;
        Ok(if result.rows_affected() > 0 {
            InsertOutcome::Created
        } else {
            InsertOutcome::AlreadyExists
        })
    }

    async fn fetch_summary(&self, event_id: EventId) -> Result<Option<ImpactSummary>> {
        let row = sqlx::query("SELECT * FROM impact_summaries WHERE event_id = $1")
            .bind(event_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(summary_from_row).transpose()
    }

    async fn list_summaries(&self) -> Result<Vec<ImpactSummary>> {
        let rows = sqlx::query("SELECT * FROM impact_summaries ORDER BY generated_at")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(summary_from_row).collect()
    }
}

#[async_trait]
impl VolunteerRepository for PostgresStore {
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
INSERT INTO volunteers (id, name, email, waste_collected, reward_points, created_at)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT DO NOTHING
"#,
        )
        .bind(volunteer.id.as_uuid())
        .bind(&volunteer.name)
        .bind(&volunteer.email)
        .bind(volunteer.waste_collected)
        .bind(i64::try_from(volunteer.reward_points).unwrap_or(i64::MAX))
        .bind(volunteer.created_at)
        .execute(&self.pool)
        .await?;
        Ok(if result.rows_affected() > 0 {
            InsertOutcome::Created
        } else {
            InsertOutcome::AlreadyExists
        })
    }

    async fn fetch_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>> {
        let row = sqlx::query("SELECT * FROM volunteers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(volunteer_from_row).transpose()
    }

    async fn fetch_volunteers(&self, ids: &[VolunteerId]) -> Result<Vec<Volunteer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(VolunteerId::as_uuid).collect();
        let rows = sqlx::query("SELECT * FROM volunteers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(volunteer_from_row).collect()
    }

    async fn top_by_points(&self, limit: usize) -> Result<Vec<Volunteer>> {
        let rows = sqlx::query(
            r#"
SELECT * FROM volunteers
ORDER BY reward_points DESC, waste_collected DESC, name, id
LIMIT $1
"#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(volunteer_from_row).collect()
    }

    async fn credit_collection(&self, id: VolunteerId, weight: f64, reward_points: u64) -> Result<bool> {
        let result = sqlx::query(
            r#"
UPDATE volunteers
SET waste_collected = waste_collected + $2,
    reward_points = reward_points + $3
WHERE id = $1
"#,
        )
        .bind(id.as_uuid())
        .bind(weight)
        .bind(i64::try_from(reward_points).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
