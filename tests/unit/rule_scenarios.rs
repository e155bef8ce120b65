//! Worked examples of the three rules

use chrono::{Duration, NaiveDate};
use petcare::models::{AlertStatus, Limit, MedicalRecord, Treatment};
use petcare::services::can_create;
use petcare::services::duplicate_guard::{is_duplicate, Candidate};
use petcare::services::expiry_notifier::plan_notifications;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
}

fn vaccine_record(id: i64, pet_id: i64, name: &str, expires_in: Option<i64>) -> MedicalRecord {
    MedicalRecord {
        id,
        pet_id,
        user_id: "owner-1".to_string(),
        treatment: Treatment::Vaccine {
            vaccine: name.to_string(),
        },
        applied_on: None,
        expires_on: expires_in.map(|d| today() + Duration::days(d)),
        alert: AlertStatus::Active,
        photo_url: None,
        created_at: 0,
    }
}

#[test]
fn scenario_a_single_pet_plan_is_full() {
    assert!(!can_create(Limit::Finite(1), 1));
}

#[test]
fn scenario_b_unlimited_documentation() {
    assert!(can_create(Limit::Unlimited, 1000));
}

#[test]
fn scenario_c_duplicates_are_per_pet() {
    let existing = vec![vaccine_record(1, 5, "Antirrábica", None)];
    let candidate = Treatment::Vaccine {
        vaccine: "Antirrábica".to_string(),
    };
    assert!(is_duplicate(&existing, &Candidate::new(5, &candidate)));
    assert!(!is_duplicate(&existing, &Candidate::new(6, &candidate)));
}

#[test]
fn scenario_d_seven_days_left() {
    let records = vec![vaccine_record(1, 5, "Antirrábica", Some(7))];
    let planned = plan_notifications(&records, "Luna", "owner-1", today());
    assert_eq!(planned.len(), 1);
    assert!(planned[0].message.contains("Falta 7"));
    assert_eq!(planned[0].key.threshold_days, 7);
    assert_eq!(planned[0].key.record_id, 1);

    // Same inputs, same identity: storage can deduplicate on the key
    let again = plan_notifications(&records, "Luna", "owner-1", today());
    assert_eq!(again, planned);
}

#[test]
fn scenario_e_expired_yesterday() {
    let records = vec![vaccine_record(1, 5, "Antirrábica", Some(-1))];
    assert!(plan_notifications(&records, "Luna", "owner-1", today()).is_empty());
}

#[test]
fn unnamed_pet_wording() {
    let records = vec![vaccine_record(1, 5, "Antirrábica", Some(0))];
    let planned = plan_notifications(&records, "tu mascota", "owner-1", today());
    assert_eq!(planned[0].message, "¡Hoy vence Antirrábica de tu mascota!");
}
