//! Membership Service
//!
//! Plan listing and the checkout flow. Payments are simulated: a checkout
//! creates a pending subscription with the `demo` provider, and confirming
//! it switches the user's tier, which the quota rules pick up immediately.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::logging::log_membership_change;
use crate::models::membership::{normalize_tier_code, MembershipTier};
use crate::models::subscription::{Subscription, SubscriptionStatus};

/// Payment provider recorded on simulated checkouts
pub const DEMO_PROVIDER: &str = "demo";

#[derive(Debug, Clone)]
pub struct MembershipService {
    database_manager: Arc<DatabaseManager>,
}

impl MembershipService {
    pub fn new(database_manager: Arc<DatabaseManager>) -> Self {
        Self { database_manager }
    }

    /// Plans on sale, cheapest first
    #[instrument(skip(self))]
    pub async fn active_plans(&self) -> AppResult<Vec<MembershipTier>> {
        self.database_manager.active_membership_tiers().await
    }

    /// A plan that can currently be purchased
    #[instrument(skip(self))]
    pub async fn plan(&self, code: &str) -> AppResult<MembershipTier> {
        let code = normalize_tier_code(Some(code));
        self.database_manager
            .membership_tier(&code)
            .await?
            .filter(|tier| tier.active)
            .ok_or_else(|| AppError::not_found("Plan"))
    }

    /// Open a pending subscription for a plan
    #[instrument(skip(self))]
    pub async fn start_checkout(&self, user_id: &str, code: &str) -> AppResult<Subscription> {
        if code.trim().is_empty() {
            return Err(AppError::validation("membership_code is required"));
        }
        let plan = self.plan(code).await?;
        let external_id = format!("{DEMO_PROVIDER}_{}", Uuid::new_v4().simple());

        self.database_manager
            .insert_subscription(user_id, &plan.code, DEMO_PROVIDER, &external_id)
            .await
    }

    /// Move the user to the subscription's plan and activate it.
    /// Both writes are applied on every call, tier first, so a confirm that
    /// failed halfway completes when retried.
    #[instrument(skip(self))]
    pub async fn confirm_checkout(&self, user_id: &str, subscription_id: i64) -> AppResult<Subscription> {
        let subscription = self
            .database_manager
            .subscription(user_id, subscription_id)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription"))?;

        self.database_manager
            .set_user_membership_code(user_id, &subscription.membership_code)
            .await?;

        if subscription.status != SubscriptionStatus::Active {
            self.database_manager
                .set_subscription_status(subscription.id, SubscriptionStatus::Active)
                .await?;
            log_membership_change(user_id, &subscription.membership_code, subscription.id);
        }

        Ok(Subscription {
            status: SubscriptionStatus::Active,
            ..subscription
        })
    }
}
