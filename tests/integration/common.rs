//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use petcare::api::AppServices;
use petcare::models::{MedicalRecord, NewPet, Pet, RecordDraft, RecordKind};
use petcare::services::MockTimeProvider;
use petcare::DatabaseManager;

pub const OWNER: &str = "owner-1";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub struct TestContext {
    pub db: Arc<DatabaseManager>,
    pub clock: Arc<MockTimeProvider>,
    pub services: AppServices,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = Arc::new(DatabaseManager::in_memory().await.unwrap());
        let clock = Arc::new(MockTimeProvider::at_date(today()));
        let services = AppServices::new(db.clone(), clock.clone(), Tz::UTC);
        Self { db, clock, services }
    }

    pub async fn with_plan(code: &str) -> Self {
        let context = Self::new().await;
        context.db.set_user_membership_code(OWNER, code).await.unwrap();
        context
    }

    pub async fn add_pet(&self, name: &str, species: &str) -> Pet {
        self.services
            .pets
            .create_pet(OWNER, new_pet(name, species))
            .await
            .unwrap()
    }

    pub async fn add_vaccine(&self, pet_id: i64, vaccine: &str, expires_in: i64) -> MedicalRecord {
        self.services
            .documentation
            .create_record(OWNER, pet_id, vaccine_draft(vaccine, expires_in))
            .await
            .unwrap()
    }
}

pub fn new_pet(name: &str, species: &str) -> NewPet {
    NewPet {
        name: name.to_string(),
        species: species.to_string(),
        breed: "Mestizo".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2021, 3, 14),
        weight_kg: Some(8.5),
        sex: "Hembra".to_string(),
        color: "Atigrado".to_string(),
        health_status: None,
        photo_url: None,
    }
}

pub fn vaccine_draft(vaccine: &str, expires_in: i64) -> RecordDraft {
    RecordDraft {
        kind: RecordKind::Vaccine,
        vaccine: Some(vaccine.to_string()),
        product: None,
        antiparasitic: None,
        presentation: None,
        applied_on: Some(days_from_today(expires_in - 365)),
        expires_on: Some(days_from_today(expires_in)),
        alert: None,
        photo_url: None,
    }
}

pub fn topical_draft(product: &str, expires_in: i64) -> RecordDraft {
    RecordDraft {
        kind: RecordKind::Topical,
        vaccine: None,
        product: Some(product.to_string()),
        ..vaccine_draft("", expires_in)
    }
}
