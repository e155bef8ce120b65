//! Subscription Model
//!
//! Plan purchases started from the checkout flow.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum SubscriptionStatus {
    #[strum(serialize = "pendiente")]
    #[serde(rename = "pendiente")]
    Pending,
    #[strum(serialize = "activa")]
    #[serde(rename = "activa")]
    Active,
}

/// Plan purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: String,
    pub membership_code: String,
    pub status: SubscriptionStatus,

    /// Payment provider name
    pub provider: String,

    /// Provider-side reference
    pub external_id: String,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,
}
