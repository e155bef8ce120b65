//! 24-hour vet directory queries

use sqlx::query_as;
use tracing::instrument;

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::vet::Vet;

#[derive(Debug, sqlx::FromRow)]
struct VetRow {
    id: i64,
    name: String,
    address: String,
    phone: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    link: Option<String>,
    image_url: Option<String>,
}

impl From<VetRow> for Vet {
    fn from(row: VetRow) -> Self {
        Vet {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            lat: row.lat,
            lng: row.lng,
            link: row.link,
            image_url: row.image_url,
        }
    }
}

impl DatabaseManager {
    /// Clinics currently listed, by name
    #[instrument(skip(self), level = "debug")]
    pub async fn active_vets(&self) -> AppResult<Vec<Vet>> {
        let rows = query_as::<_, VetRow>(
            r#"
            SELECT id, name, address, phone, lat, lng, link, image_url
            FROM vets
            WHERE active = TRUE
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(rows.into_iter().map(Vet::from).collect())
    }
}
