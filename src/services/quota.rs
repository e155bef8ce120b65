//! Quota Service
//!
//! Decides whether a user may create another pet or medical record under
//! their membership tier. The check here is advisory; the store's triggers
//! are the authoritative guard and reject over-limit inserts on their own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::database::DatabaseManager;
use crate::error::AppResult;
use crate::logging::{log_quota_decision, log_tier_fallback};
use crate::models::membership::{normalize_tier_code, Limit, ResourceClass, TierLimits};

/// Whether one more resource fits under `limit` given `current_count` existing ones
pub fn can_create(limit: Limit, current_count: u64) -> bool {
    match limit {
        Limit::Unlimited => true,
        Limit::Finite(max) => current_count < u64::from(max),
    }
}

/// Limits in force for a user, with the tier they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLimits {
    /// Normalized tier code of the user
    pub tier_code: String,

    pub limits: TierLimits,

    /// True when the tier could not be resolved and freemium limits apply
    pub fallback: bool,
}

/// Result of a quota evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub resource: ResourceClass,
    pub tier_code: String,
    pub limit: Limit,

    /// Resources already counted in the scope (per user for pets, per pet for records)
    pub current: u64,

    pub allowed: bool,
}

impl QuotaDecision {
    /// Evaluate `can_create` and keep the inputs alongside the answer
    pub fn evaluate(resource: ResourceClass, tier_code: &str, limit: Limit, current: u64) -> Self {
        Self {
            resource,
            tier_code: tier_code.to_string(),
            limit,
            current,
            allowed: can_create(limit, current),
        }
    }

    /// Resources that can still be created, `None` when unlimited
    pub fn remaining(&self) -> Option<u64> {
        match self.limit {
            Limit::Unlimited => None,
            Limit::Finite(max) => Some(u64::from(max).saturating_sub(self.current)),
        }
    }
}

/// Quota evaluation backed by the store
#[derive(Debug, Clone)]
pub struct QuotaService {
    database_manager: Arc<DatabaseManager>,
}

impl QuotaService {
    pub fn new(database_manager: Arc<DatabaseManager>) -> Self {
        Self { database_manager }
    }

    /// Resolve a user's tier limits.
    ///
    /// Never fails: a failed lookup or an unknown tier yields the freemium
    /// limits rather than letting the caller through unchecked.
    #[instrument(skip(self))]
    pub async fn limits_for_user(&self, user_id: &str) -> ResolvedLimits {
        let stored_code = match self.database_manager.user_membership_code(user_id).await {
            Ok(code) => code,
            Err(e) => {
                log_tier_fallback(user_id, "unknown", &e.to_string());
                return Self::freemium_fallback();
            }
        };
        let tier_code = normalize_tier_code(stored_code.as_deref());

        match self.database_manager.membership_tier(&tier_code).await {
            Ok(Some(tier)) => ResolvedLimits {
                tier_code,
                limits: tier.limits,
                fallback: false,
            },
            Ok(None) => {
                log_tier_fallback(user_id, &tier_code, "tier not found");
                Self::freemium_fallback()
            }
            Err(e) => {
                log_tier_fallback(user_id, &tier_code, &e.to_string());
                Self::freemium_fallback()
            }
        }
    }

    fn freemium_fallback() -> ResolvedLimits {
        ResolvedLimits {
            tier_code: normalize_tier_code(None),
            limits: TierLimits::FREEMIUM,
            fallback: true,
        }
    }

    /// Evaluate the pet quota of a user against a fresh count
    #[instrument(skip(self))]
    pub async fn check_pets(&self, user_id: &str) -> AppResult<QuotaDecision> {
        let resolved = self.limits_for_user(user_id).await;
        let current = self.database_manager.count_pets(user_id).await?;
        Ok(self.decide(user_id, &resolved, ResourceClass::Pet, current))
    }

    /// Evaluate the documentation quota of one pet against a fresh count
    #[instrument(skip(self))]
    pub async fn check_documentation(&self, user_id: &str, pet_id: i64) -> AppResult<QuotaDecision> {
        let resolved = self.limits_for_user(user_id).await;
        let current = self.database_manager.count_records(user_id, pet_id).await?;
        Ok(self.decide(user_id, &resolved, ResourceClass::DocumentationSlot, current))
    }

    fn decide(
        &self,
        user_id: &str,
        resolved: &ResolvedLimits,
        resource: ResourceClass,
        current: u64,
    ) -> QuotaDecision {
        let limit = resolved.limits.limit_for(resource);
        let decision = QuotaDecision::evaluate(resource, &resolved.tier_code, limit, current);
        log_quota_decision(
            user_id,
            &resolved.tier_code,
            resource,
            limit,
            current,
            decision.allowed,
        );
        decision
    }
}
