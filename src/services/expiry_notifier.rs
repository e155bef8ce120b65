//! Expiry Notifier
//!
//! Raises an alert when a medical record is exactly 7, 1 or 0 calendar days
//! from expiring. Planning is pure; [`ExpiryNotifier::generate`] stores the
//! planned alerts and never fails the surrounding request.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use crate::database::DatabaseManager;
use crate::logging::{log_notification_failure, log_notifications_generated};
use crate::models::medical_record::MedicalRecord;
use crate::models::notification::{is_threshold_day, NewNotification, NotificationKey};
use crate::models::pet::Pet;

/// Alert text for a treatment `days` away from expiring
pub fn expiry_message(days: i64, treatment: &str, pet_name: &str) -> String {
    match days {
        0 => format!("¡Hoy vence {treatment} de {pet_name}!"),
        1 => format!("Falta 1 día para que venza {treatment} de {pet_name}"),
        n => format!("Falta {n} días para que venza {treatment} de {pet_name}"),
    }
}

/// Whole days from `today` until `expires_on`; negative once expired
pub fn days_until(expires_on: NaiveDate, today: NaiveDate) -> i64 {
    (expires_on - today).num_days()
}

/// Alerts due `today` for the given records.
///
/// Records without an expiration date, or not on a threshold day, are skipped.
pub fn plan_notifications(
    records: &[MedicalRecord],
    pet_name: &str,
    user_id: &str,
    today: NaiveDate,
) -> Vec<NewNotification> {
    records
        .iter()
        .filter_map(|record| {
            let days = days_until(record.expires_on?, today);
            is_threshold_day(days).then(|| NewNotification {
                key: NotificationKey {
                    record_id: record.id,
                    user_id: user_id.to_string(),
                    threshold_days: days,
                    alert_date: today,
                },
                message: expiry_message(days, record.treatment.identifier(), pet_name),
            })
        })
        .collect()
}

/// Outcome of one notifier run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Alerts due today
    pub planned: usize,

    /// Alerts newly stored
    pub inserted: usize,

    /// Alerts that could not be checked or stored
    pub failed: usize,
}

/// Stores planned expiry alerts
#[derive(Debug, Clone)]
pub struct ExpiryNotifier {
    database_manager: Arc<DatabaseManager>,
}

impl ExpiryNotifier {
    pub fn new(database_manager: Arc<DatabaseManager>) -> Self {
        Self { database_manager }
    }

    /// Insert the alerts due `today` that do not exist yet.
    ///
    /// Running twice on the same day inserts nothing the second time.
    /// Failures are logged and counted, never returned.
    #[instrument(skip(self, records, pet), fields(pet_id = pet.id, records = records.len()))]
    pub async fn generate(
        &self,
        records: &[MedicalRecord],
        pet: &Pet,
        user_id: &str,
        today: NaiveDate,
    ) -> GenerationReport {
        let planned = plan_notifications(records, pet.display_name(), user_id, today);
        let mut report = GenerationReport {
            planned: planned.len(),
            ..GenerationReport::default()
        };

        for notification in &planned {
            let record_id = notification.key.record_id;

            match self.database_manager.find_notification(notification).await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    log_notification_failure(user_id, record_id, &e.to_string());
                    report.failed += 1;
                    continue;
                }
            }

            match self.database_manager.insert_notification(notification).await {
                Ok(true) => report.inserted += 1,
                Ok(false) => {}
                Err(e) => {
                    log_notification_failure(user_id, record_id, &e.to_string());
                    report.failed += 1;
                }
            }
        }

        log_notifications_generated(user_id, pet.id, report.planned, report.inserted);
        report
    }
}
