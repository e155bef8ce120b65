//! Membership queries: users' plan codes and the tier reference table.

use chrono::Utc;
use sqlx::{query, query_as, query_scalar};
use tracing::{instrument, warn};

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::membership::{Limit, MembershipTier, TierLimits};

#[derive(Debug, sqlx::FromRow)]
struct MembershipTierRow {
    code: String,
    title: String,
    price_label: String,
    monthly_price: f64,
    benefits: String,
    button_text: String,
    featured: bool,
    active: bool,
    max_pets: Option<i64>,
    documentation_slots: Option<i64>,
}

impl From<MembershipTierRow> for MembershipTier {
    fn from(row: MembershipTierRow) -> Self {
        let benefits = serde_json::from_str(&row.benefits).unwrap_or_else(|e| {
            warn!(code = %row.code, error = %e, "Unreadable benefits list on membership tier");
            Vec::new()
        });

        MembershipTier {
            code: row.code,
            title: row.title,
            price_label: row.price_label,
            monthly_price: row.monthly_price,
            benefits,
            button_text: row.button_text,
            featured: row.featured,
            active: row.active,
            limits: TierLimits {
                max_pets: Limit::from_column(row.max_pets),
                documentation_slots: Limit::from_column(row.documentation_slots),
            },
        }
    }
}

const TIER_COLUMNS: &str = "code, title, price_label, monthly_price, benefits, button_text, \
                            featured, active, max_pets, documentation_slots";

impl DatabaseManager {
    /// Raw plan code stored for a user, if the user row exists
    #[instrument(skip(self), level = "debug")]
    pub async fn user_membership_code(&self, user_id: &str) -> AppResult<Option<String>> {
        let code: Option<Option<String>> =
            query_scalar("SELECT membership_code FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Query)?;

        Ok(code.flatten())
    }

    /// Set a user's plan code, creating the user row when needed
    #[instrument(skip(self), level = "debug")]
    pub async fn set_user_membership_code(&self, user_id: &str, code: &str) -> AppResult<()> {
        query(
            r#"
            INSERT INTO users (id, membership_code, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET membership_code = excluded.membership_code
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(())
    }

    /// Tier by code, regardless of whether it is still on sale
    #[instrument(skip(self), level = "debug")]
    pub async fn membership_tier(&self, code: &str) -> AppResult<Option<MembershipTier>> {
        let row = query_as::<_, MembershipTierRow>(&format!(
            "SELECT {TIER_COLUMNS} FROM membership_tiers WHERE code = ?"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(row.map(MembershipTier::from))
    }

    /// Plans currently on sale, cheapest first
    #[instrument(skip(self), level = "debug")]
    pub async fn active_membership_tiers(&self) -> AppResult<Vec<MembershipTier>> {
        let rows = query_as::<_, MembershipTierRow>(&format!(
            "SELECT {TIER_COLUMNS} FROM membership_tiers WHERE active = TRUE \
             ORDER BY monthly_price ASC, code ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(rows.into_iter().map(MembershipTier::from).collect())
    }

    /// Change the limits of a tier
    #[instrument(skip(self), level = "debug")]
    pub async fn update_tier_limits(&self, code: &str, limits: TierLimits) -> AppResult<bool> {
        let result = query(
            "UPDATE membership_tiers SET max_pets = ?, documentation_slots = ? WHERE code = ?",
        )
        .bind(limits.max_pets.to_column())
        .bind(limits.documentation_slots.to_column())
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(result.rows_affected() > 0)
    }
}
