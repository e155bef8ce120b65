//! Membership Model
//!
//! Membership tiers and the resource limits they grant. Tiers are read-only
//! reference data for the quota rules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Tier code used whenever a user has no plan or the plan cannot be resolved
pub const DEFAULT_TIER_CODE: &str = "freemium";

/// Class of resource counted against a tier limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceClass {
    /// Pets owned by one user
    Pet,
    /// Medical records attached to one pet
    DocumentationSlot,
}

/// Maximum number of resources a tier allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Limit {
    Finite(u32),
    Unlimited,
}

impl Limit {
    /// Build a limit from a nullable store column; NULL means unlimited.
    /// Negative values are clamped to zero.
    pub fn from_column(value: Option<i64>) -> Self {
        match value {
            None => Limit::Unlimited,
            Some(max) => Limit::Finite(u32::try_from(max.max(0)).unwrap_or(u32::MAX)),
        }
    }

    /// Column representation of this limit
    pub fn to_column(self) -> Option<i64> {
        match self {
            Limit::Finite(max) => Some(i64::from(max)),
            Limit::Unlimited => None,
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, Limit::Unlimited)
    }
}

impl From<Option<u32>> for Limit {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Limit::Unlimited, Limit::Finite)
    }
}

impl From<Limit> for Option<u32> {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Finite(max) => Some(max),
            Limit::Unlimited => None,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Finite(max) => write!(f, "{max}"),
            Limit::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Limits configured on a membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Pets per user
    pub max_pets: Limit,

    /// Medical records per pet
    pub documentation_slots: Limit,
}

impl TierLimits {
    /// Most conservative limits, applied when the tier cannot be resolved
    pub const FREEMIUM: TierLimits = TierLimits {
        max_pets: Limit::Finite(1),
        documentation_slots: Limit::Finite(3),
    };

    /// Limit that applies to the given resource class
    pub fn limit_for(&self, resource: ResourceClass) -> Limit {
        match resource {
            ResourceClass::Pet => self.max_pets,
            ResourceClass::DocumentationSlot => self.documentation_slots,
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self::FREEMIUM
    }
}

/// Membership tier (plan) offered to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipTier {
    /// Tier code, e.g. "freemium", "premium", "plus"
    pub code: String,

    /// Display title
    pub title: String,

    /// Human readable price, e.g. "$4.990 / mes"
    pub price_label: String,

    /// Monthly price used to order plans
    pub monthly_price: f64,

    /// Benefit bullet points
    pub benefits: Vec<String>,

    /// Call to action text for the plan card
    pub button_text: String,

    /// Whether the plan is highlighted
    pub featured: bool,

    /// Whether the plan can currently be purchased
    pub active: bool,

    /// Resource limits granted by this plan
    pub limits: TierLimits,
}

/// Normalize a stored tier code: trimmed, lower-cased, defaulting to freemium
pub fn normalize_tier_code(code: Option<&str>) -> String {
    let normalized = code.map(|c| c.trim().to_lowercase()).unwrap_or_default();
    if normalized.is_empty() {
        DEFAULT_TIER_CODE.to_string()
    } else {
        normalized
    }
}
