//! Rule properties checked over ranges of inputs

use chrono::{Duration, NaiveDate};
use petcare::models::{AlertStatus, Limit, MedicalRecord, Treatment};
use petcare::services::can_create;
use petcare::services::duplicate_guard::{is_duplicate, Candidate};
use petcare::services::expiry_notifier::plan_notifications;

fn record(id: i64, treatment: Treatment, expires_on: Option<NaiveDate>) -> MedicalRecord {
    MedicalRecord {
        id,
        pet_id: 1,
        user_id: "owner-1".to_string(),
        treatment,
        applied_on: None,
        expires_on,
        alert: AlertStatus::Active,
        photo_url: None,
        created_at: 0,
    }
}

#[test]
fn finite_limit_allows_iff_below() {
    for limit in 0..20u32 {
        for current in 0..25u64 {
            assert_eq!(
                can_create(Limit::Finite(limit), current),
                current < u64::from(limit),
                "limit {limit}, current {current}"
            );
        }
    }
}

#[test]
fn unlimited_always_allows() {
    for current in [0, 1, 7, 1_000, u64::MAX] {
        assert!(can_create(Limit::Unlimited, current));
    }
}

#[test]
fn duplicate_iff_same_kind_and_identifier() {
    let names = ["Antirrábica", "antirrábica", "Vacuna Séxtuple", "Frontline"];
    let kinds = |name: &str| {
        vec![
            Treatment::Vaccine {
                vaccine: name.to_string(),
            },
            Treatment::Topical {
                product: name.to_string(),
                presentation: None,
            },
            Treatment::Deworming {
                antiparasitic: name.to_string(),
                presentation: "Comprimido".to_string(),
            },
        ]
    };

    for existing_name in names {
        for (i, existing_treatment) in kinds(existing_name).into_iter().enumerate() {
            let existing = vec![record(1, existing_treatment.clone(), None)];
            for candidate_name in names {
                for (j, candidate) in kinds(candidate_name).into_iter().enumerate() {
                    let expected = i == j && existing_name == candidate_name;
                    assert_eq!(
                        is_duplicate(&existing, &Candidate::new(1, &candidate)),
                        expected,
                        "{existing_treatment:?} vs {candidate:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn alerts_only_on_threshold_days() {
    let today = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();
    for offset in -30..=30i64 {
        let records = vec![record(
            1,
            Treatment::Vaccine {
                vaccine: "Antirrábica".to_string(),
            },
            Some(today + Duration::days(offset)),
        )];
        let planned = plan_notifications(&records, "Luna", "owner-1", today);
        let expected = matches!(offset, 7 | 1 | 0);
        assert_eq!(planned.len(), usize::from(expected), "offset {offset}");
        if expected {
            assert_eq!(planned[0].key.threshold_days, offset);
            assert_eq!(planned[0].key.alert_date, today);
        }
    }
}

#[test]
fn records_without_expiration_are_skipped() {
    let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
    let records = vec![record(
        1,
        Treatment::Vaccine {
            vaccine: "Antirrábica".to_string(),
        },
        None,
    )];
    assert!(plan_notifications(&records, "Luna", "owner-1", today).is_empty());
}
