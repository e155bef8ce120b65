//! Pet Model
//!
//! A pet belongs to exactly one owner. Its species drives the vaccine
//! catalogue offered for its documentation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name rendered in messages when a pet has no name
pub const UNNAMED_PET: &str = "tu mascota";

/// Pet registered by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,

    /// Owning user id, as issued by the authentication provider
    pub owner_id: String,

    pub name: String,

    /// Free-form species label, e.g. "Canino" or "Felino"
    pub species: String,

    pub breed: String,
    pub birth_date: NaiveDate,
    pub weight_kg: f64,
    pub sex: String,
    pub color: String,
    pub health_status: Option<String>,
    pub photo_url: Option<String>,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,
}

impl Pet {
    /// Name used in user-facing messages
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            UNNAMED_PET
        } else {
            trimmed
        }
    }

    /// Whether the species label denotes a cat
    pub fn is_feline(&self) -> bool {
        is_feline_species(&self.species)
    }
}

pub(crate) fn is_feline_species(species: &str) -> bool {
    species.to_lowercase().contains("fel")
}

/// Pet registration request. Absent fields deserialize empty and are
/// reported by `validate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: Option<NaiveDate>,
    pub weight_kg: Option<f64>,
    pub sex: String,
    pub color: String,
    pub health_status: Option<String>,
    pub photo_url: Option<String>,
}

impl NewPet {
    /// Check required fields before anything reaches the store
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", self.name.as_str()),
            ("species", self.species.as_str()),
            ("breed", self.breed.as_str()),
            ("sex", self.sex.as_str()),
            ("color", self.color.as_str()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .chain(self.birth_date.is_none().then_some("birth_date"))
            .chain(
                (!self.weight_kg.is_some_and(|w| w.is_finite() && w > 0.0)).then_some("weight_kg"),
            )
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}
