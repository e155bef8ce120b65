//! Medical record queries
//!
//! Rows keep one nullable column per kind-specific field. They are mapped
//! into [`Treatment`] here; a row whose identifying column is missing for
//! its kind is reported as a query error instead of leaking partial data.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::medical_record::{
    AlertStatus, MedicalRecord, RecordFields, RecordKind, Treatment,
};

#[derive(Debug, sqlx::FromRow)]
struct MedicalRecordRow {
    id: i64,
    pet_id: i64,
    user_id: String,
    kind: String,
    vaccine: Option<String>,
    product: Option<String>,
    antiparasitic: Option<String>,
    presentation: Option<String>,
    applied_on: Option<NaiveDate>,
    expires_on: Option<NaiveDate>,
    alert: String,
    photo_url: Option<String>,
    created_at: i64,
}

fn decode_error(message: String) -> AppError {
    AppError::Query(sqlx::Error::Decode(message.into()))
}

impl TryFrom<MedicalRecordRow> for MedicalRecord {
    type Error = AppError;

    fn try_from(row: MedicalRecordRow) -> Result<Self, Self::Error> {
        let kind = RecordKind::from_str(&row.kind)
            .map_err(|_| decode_error(format!("unknown record kind '{}'", row.kind)))?;
        let missing = |field: &str| decode_error(format!("record {} has no {field}", row.id));

        let treatment = match kind {
            RecordKind::Vaccine => Treatment::Vaccine {
                vaccine: row.vaccine.ok_or_else(|| missing("vaccine"))?,
            },
            RecordKind::Topical => Treatment::Topical {
                product: row.product.ok_or_else(|| missing("product"))?,
                presentation: row.presentation,
            },
            RecordKind::Deworming => Treatment::Deworming {
                antiparasitic: row.antiparasitic.ok_or_else(|| missing("antiparasitic"))?,
                presentation: row.presentation.unwrap_or_default(),
            },
        };

        Ok(MedicalRecord {
            id: row.id,
            pet_id: row.pet_id,
            user_id: row.user_id,
            treatment,
            applied_on: row.applied_on,
            expires_on: row.expires_on,
            alert: AlertStatus::from_str(&row.alert).unwrap_or_default(),
            photo_url: row.photo_url,
            created_at: row.created_at,
        })
    }
}

/// Kind-specific columns of a treatment: (vaccine, product, antiparasitic, presentation)
fn treatment_columns(
    treatment: &Treatment,
) -> (Option<&str>, Option<&str>, Option<&str>, Option<&str>) {
    match treatment {
        Treatment::Vaccine { vaccine } => (Some(vaccine), None, None, None),
        Treatment::Topical {
            product,
            presentation,
        } => (None, Some(product), None, presentation.as_deref()),
        Treatment::Deworming {
            antiparasitic,
            presentation,
        } => (None, None, Some(antiparasitic), Some(presentation)),
    }
}

const RECORD_COLUMNS: &str = "id, pet_id, user_id, kind, vaccine, product, antiparasitic, \
                              presentation, applied_on, expires_on, alert, photo_url, created_at";

impl DatabaseManager {
    /// Number of records attached to one pet of a user
    #[instrument(skip(self), level = "debug")]
    pub async fn count_records(&self, user_id: &str, pet_id: i64) -> AppResult<u64> {
        let count: i64 =
            query_scalar("SELECT COUNT(*) FROM medical_records WHERE user_id = ? AND pet_id = ?")
                .bind(user_id)
                .bind(pet_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Query)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Records of a pet, newest first
    #[instrument(skip(self), level = "debug")]
    pub async fn records_for_pet(&self, user_id: &str, pet_id: i64) -> AppResult<Vec<MedicalRecord>> {
        let rows = query_as::<_, MedicalRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM medical_records WHERE user_id = ? AND pet_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        rows.into_iter().map(MedicalRecord::try_from).collect()
    }

    /// Records of a pet of one kind, newest first
    #[instrument(skip(self), level = "debug")]
    pub async fn records_of_kind(
        &self,
        user_id: &str,
        pet_id: i64,
        kind: RecordKind,
    ) -> AppResult<Vec<MedicalRecord>> {
        let rows = query_as::<_, MedicalRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM medical_records \
             WHERE user_id = ? AND pet_id = ? AND kind = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .bind(pet_id)
        .bind(kind.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        rows.into_iter().map(MedicalRecord::try_from).collect()
    }

    /// A record, only if it belongs to the given user
    #[instrument(skip(self), level = "debug")]
    pub async fn record(&self, user_id: &str, record_id: i64) -> AppResult<Option<MedicalRecord>> {
        let row = query_as::<_, MedicalRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM medical_records WHERE id = ? AND user_id = ?"
        ))
        .bind(record_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Query)?;

        row.map(MedicalRecord::try_from).transpose()
    }

    /// Insert a validated record. The tier trigger may reject it with `LimitReached`.
    #[instrument(skip(self, fields), level = "debug")]
    pub async fn insert_record(
        &self,
        user_id: &str,
        pet_id: i64,
        fields: &RecordFields,
    ) -> AppResult<MedicalRecord> {
        let created_at = Utc::now().timestamp();
        let (vaccine, product, antiparasitic, presentation) = treatment_columns(&fields.treatment);

        let result = query(
            r#"
            INSERT INTO medical_records
                (user_id, pet_id, kind, vaccine, product, antiparasitic, presentation,
                 applied_on, expires_on, alert, photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(pet_id)
        .bind(fields.treatment.kind().to_string())
        .bind(vaccine)
        .bind(product)
        .bind(antiparasitic)
        .bind(presentation)
        .bind(fields.applied_on)
        .bind(fields.expires_on)
        .bind(fields.alert.to_string())
        .bind(fields.photo_url.as_deref())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(MedicalRecord {
            id: result.last_insert_rowid(),
            pet_id,
            user_id: user_id.to_string(),
            treatment: fields.treatment.clone(),
            applied_on: Some(fields.applied_on),
            expires_on: Some(fields.expires_on),
            alert: fields.alert,
            photo_url: fields.photo_url.clone(),
            created_at,
        })
    }

    /// Overwrite the editable fields of a record. Returns false when no row matched.
    #[instrument(skip(self, fields), level = "debug")]
    pub async fn update_record(
        &self,
        user_id: &str,
        record_id: i64,
        fields: &RecordFields,
    ) -> AppResult<bool> {
        let (vaccine, product, antiparasitic, presentation) = treatment_columns(&fields.treatment);

        let result = query(
            r#"
            UPDATE medical_records
            SET kind = ?, vaccine = ?, product = ?, antiparasitic = ?, presentation = ?,
                applied_on = ?, expires_on = ?, alert = ?, photo_url = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(fields.treatment.kind().to_string())
        .bind(vaccine)
        .bind(product)
        .bind(antiparasitic)
        .bind(presentation)
        .bind(fields.applied_on)
        .bind(fields.expires_on)
        .bind(fields.alert.to_string())
        .bind(fields.photo_url.as_deref())
        .bind(record_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a record of a user. Returns false when no row matched.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_record(&self, user_id: &str, record_id: i64) -> AppResult<bool> {
        let result = query("DELETE FROM medical_records WHERE id = ? AND user_id = ?")
            .bind(record_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::write)?;

        Ok(result.rows_affected() > 0)
    }
}
