//! Pet queries

use chrono::{NaiveDate, Utc};
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::pet::{NewPet, Pet};

#[derive(Debug, sqlx::FromRow)]
struct PetRow {
    id: i64,
    owner_id: String,
    name: String,
    species: String,
    breed: String,
    birth_date: NaiveDate,
    weight_kg: f64,
    sex: String,
    color: String,
    health_status: Option<String>,
    photo_url: Option<String>,
    created_at: i64,
}

impl From<PetRow> for Pet {
    fn from(row: PetRow) -> Self {
        Pet {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            birth_date: row.birth_date,
            weight_kg: row.weight_kg,
            sex: row.sex,
            color: row.color,
            health_status: row.health_status,
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}

const PET_COLUMNS: &str = "id, owner_id, name, species, breed, birth_date, weight_kg, sex, color, \
                           health_status, photo_url, created_at";

impl DatabaseManager {
    /// Number of pets owned by a user
    #[instrument(skip(self), level = "debug")]
    pub async fn count_pets(&self, owner_id: &str) -> AppResult<u64> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM pets WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Query)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// All pets of a user, oldest first
    #[instrument(skip(self), level = "debug")]
    pub async fn pets_for_owner(&self, owner_id: &str) -> AppResult<Vec<Pet>> {
        let rows = query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE owner_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(rows.into_iter().map(Pet::from).collect())
    }

    /// A pet, only if it belongs to the given owner
    #[instrument(skip(self), level = "debug")]
    pub async fn pet(&self, owner_id: &str, pet_id: i64) -> AppResult<Option<Pet>> {
        let row = query_as::<_, PetRow>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = ? AND owner_id = ?"
        ))
        .bind(pet_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(row.map(Pet::from))
    }

    /// Insert a validated pet. The tier trigger may reject it with `LimitReached`.
    #[instrument(skip(self, pet), level = "debug")]
    pub async fn insert_pet(&self, owner_id: &str, pet: &NewPet) -> AppResult<Pet> {
        let (Some(birth_date), Some(weight_kg)) = (pet.birth_date, pet.weight_kg) else {
            return Err(AppError::validation("birth_date and weight_kg are required"));
        };
        let created_at = Utc::now().timestamp();

        let result = query(
            r#"
            INSERT INTO pets
                (owner_id, name, species, breed, birth_date, weight_kg, sex, color,
                 health_status, photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner_id)
        .bind(pet.name.trim())
        .bind(pet.species.trim())
        .bind(pet.breed.trim())
        .bind(birth_date)
        .bind(weight_kg)
        .bind(pet.sex.trim())
        .bind(pet.color.trim())
        .bind(pet.health_status.as_deref())
        .bind(pet.photo_url.as_deref())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(Pet {
            id: result.last_insert_rowid(),
            owner_id: owner_id.to_string(),
            name: pet.name.trim().to_string(),
            species: pet.species.trim().to_string(),
            breed: pet.breed.trim().to_string(),
            birth_date,
            weight_kg,
            sex: pet.sex.trim().to_string(),
            color: pet.color.trim().to_string(),
            health_status: pet.health_status.clone(),
            photo_url: pet.photo_url.clone(),
            created_at,
        })
    }
}
