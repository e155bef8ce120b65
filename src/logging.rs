//! Logging configuration for the pet care backend
//!
//! Structured logging setup plus helpers for the rule engine's events.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::models::membership::{Limit, ResourceClass};

/// Output format of the log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for production log shipping
    Json,
    /// Compact human readable lines
    Console,
}

impl LogFormat {
    /// JSON in production, console everywhere else
    pub fn for_environment(environment: &str) -> Self {
        if environment == "production" {
            LogFormat::Json
        } else {
            LogFormat::Console
        }
    }
}

/// Initialize the application logging system.
///
/// `RUST_LOG` wins over `log_level` when set. Calling this twice is harmless;
/// the second subscriber is ignored.
pub fn init_logging(log_level: &str, format: LogFormat) {
    let default_filter = format!("petcare={log_level},tower_http={log_level},axum::rejection=trace");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    let console_layer = (format == LogFormat::Console).then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_ansi(true)
    });

    let initialized = Registry::default()
        .with(env_filter)
        .with(json_layer)
        .with(console_layer)
        .try_init();

    if initialized.is_ok() {
        tracing::info!(format = ?format, "Logging system initialized");
    }
}

/// Log application startup
pub fn log_startup() {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Pet care backend starting up"
    );
}

/// Log a quota evaluation
pub fn log_quota_decision(
    user_id: &str,
    tier_code: &str,
    resource: ResourceClass,
    limit: Limit,
    current: u64,
    allowed: bool,
) {
    if allowed {
        tracing::debug!(
            user_id = %user_id,
            tier = %tier_code,
            resource = %resource,
            limit = %limit,
            current,
            "Quota allows creation"
        );
    } else {
        tracing::info!(
            user_id = %user_id,
            tier = %tier_code,
            resource = %resource,
            limit = %limit,
            current,
            "Quota limit reached"
        );
    }
}

/// Log a tier lookup that fell back to the freemium limits
pub fn log_tier_fallback(user_id: &str, tier_code: &str, reason: &str) {
    tracing::warn!(
        user_id = %user_id,
        tier = %tier_code,
        reason = %reason,
        "Falling back to freemium limits"
    );
}

/// Log a record rejected because an equivalent one exists
pub fn log_duplicate_rejected(user_id: &str, pet_id: i64, kind: &str, identifier: &str) {
    tracing::info!(
        user_id = %user_id,
        pet_id,
        kind = %kind,
        identifier = %identifier,
        "Duplicate medical record rejected"
    );
}

/// Log the outcome of one notifier run
pub fn log_notifications_generated(user_id: &str, pet_id: i64, planned: usize, inserted: usize) {
    tracing::debug!(
        user_id = %user_id,
        pet_id,
        planned,
        inserted,
        "Expiry notifications generated"
    );
}

/// Log a notifier failure that was swallowed
pub fn log_notification_failure(user_id: &str, record_id: i64, error: &str) {
    tracing::warn!(
        user_id = %user_id,
        record_id,
        error = %error,
        "Expiry notification could not be stored"
    );
}

/// Log a membership change
pub fn log_membership_change(user_id: &str, membership_code: &str, subscription_id: i64) {
    tracing::info!(
        user_id = %user_id,
        membership = %membership_code,
        subscription_id,
        "Membership activated"
    );
}
