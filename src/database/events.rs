//! Event listing queries

use std::collections::HashMap;

use sqlx::{query_as, QueryBuilder, Sqlite};
use tracing::{instrument, warn};

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::event::{Event, EventLocation};

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    summary: Option<String>,
    details: Option<String>,
    access: Option<String>,
    requirements: String,
    free: bool,
    notes: Option<String>,
    source_url: Option<String>,
    image_url: Option<String>,
    created_at: i64,
}

impl EventRow {
    fn into_event(self, locations: Vec<EventLocation>) -> Event {
        let requirements = serde_json::from_str(&self.requirements).unwrap_or_else(|e| {
            warn!(event_id = self.id, error = %e, "Unreadable requirements list on event");
            Vec::new()
        });

        Event {
            id: self.id,
            title: self.title,
            summary: self.summary,
            details: self.details,
            access: self.access,
            requirements,
            free: self.free,
            notes: self.notes,
            source_url: self.source_url,
            image_url: self.image_url,
            locations,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventLocationRow {
    event_id: i64,
    name: String,
    address: Option<String>,
}

impl DatabaseManager {
    /// Published events, newest first, each with its venues
    #[instrument(skip(self), level = "debug")]
    pub async fn active_events(&self) -> AppResult<Vec<Event>> {
        let rows = query_as::<_, EventRow>(
            r#"
            SELECT id, title, summary, details, access, requirements, free,
                   notes, source_url, image_url, created_at
            FROM events
            WHERE active = TRUE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT event_id, name, address FROM event_locations WHERE event_id IN (");
        let mut separated = builder.separated(", ");
        for row in &rows {
            separated.push_bind(row.id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let locations = builder
            .build_query_as::<EventLocationRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Query)?;

        let mut by_event: HashMap<i64, Vec<EventLocation>> = HashMap::new();
        for location in locations {
            by_event.entry(location.event_id).or_default().push(EventLocation {
                name: location.name,
                address: location.address,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let locations = by_event.remove(&row.id).unwrap_or_default();
                row.into_event(locations)
            })
            .collect())
    }
}
