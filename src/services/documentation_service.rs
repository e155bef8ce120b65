//! Documentation Service
//!
//! Medical records of a pet: loading (which also raises expiry alerts),
//! creation under the documentation quota and the duplicate guard, edits,
//! deletion and the vaccine catalogue offered for new records.

use std::collections::HashSet;
use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{info, instrument};

use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::logging::log_duplicate_rejected;
use crate::models::medical_record::{MedicalRecord, RecordDraft, RecordKind};
use crate::models::membership::ResourceClass;
use crate::models::pet::{is_feline_species, Pet};
use crate::services::duplicate_guard::{find_duplicate, Candidate};
use crate::services::expiry_notifier::{ExpiryNotifier, GenerationReport};
use crate::services::quota::{QuotaDecision, QuotaService};
use crate::services::time_provider::TimeProvider;

const FELINE_VACCINES: [&str; 3] = ["Triple Felina", "Leucemia Felina (FeLV)", "Antirrábica"];
const CANINE_VACCINES: [&str; 3] = [
    "Vacuna Séxtuple",
    "Antirrábica",
    "Bordetella (Tos de las perreras)",
];

/// Vaccines offered for a species
pub fn vaccine_catalogue(species: &str) -> &'static [&'static str] {
    if is_feline_species(species) {
        &FELINE_VACCINES
    } else {
        &CANINE_VACCINES
    }
}

/// Records of a pet split by kind, each newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordsByKind {
    pub vaccines: Vec<MedicalRecord>,
    pub topicals: Vec<MedicalRecord>,
    pub dewormings: Vec<MedicalRecord>,
}

impl RecordsByKind {
    pub fn group(records: Vec<MedicalRecord>) -> Self {
        let mut grouped = Self::default();
        for record in records {
            match record.kind() {
                RecordKind::Vaccine => grouped.vaccines.push(record),
                RecordKind::Topical => grouped.topicals.push(record),
                RecordKind::Deworming => grouped.dewormings.push(record),
            }
        }
        grouped
    }

    pub fn of_kind(&self, kind: RecordKind) -> &[MedicalRecord] {
        match kind {
            RecordKind::Vaccine => &self.vaccines,
            RecordKind::Topical => &self.topicals,
            RecordKind::Deworming => &self.dewormings,
        }
    }
}

/// What can still be added to a pet's documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationOptions {
    /// Catalogue vaccines not yet recorded for the pet
    pub vaccines: Vec<String>,

    /// Every catalogue vaccine is already recorded
    pub vaccine_locked: bool,

    /// A topical treatment is already recorded
    pub topical_locked: bool,

    /// A deworming is already recorded
    pub deworming_locked: bool,
}

impl DocumentationOptions {
    pub fn for_pet(species: &str, records: &RecordsByKind) -> Self {
        let used: HashSet<&str> = records
            .vaccines
            .iter()
            .map(|r| r.treatment.identifier().trim())
            .collect();
        let vaccines: Vec<String> = vaccine_catalogue(species)
            .iter()
            .filter(|v| !used.contains(*v))
            .map(ToString::to_string)
            .collect();

        Self {
            vaccine_locked: vaccines.is_empty(),
            vaccines,
            topical_locked: !records.topicals.is_empty(),
            deworming_locked: !records.dewormings.is_empty(),
        }
    }
}

/// A pet's documentation as loaded for display
#[derive(Debug, Clone, Serialize)]
pub struct DocumentationView {
    pub pet: Pet,
    pub records: RecordsByKind,
    pub quota: QuotaDecision,
    pub notifications: GenerationReport,
}

#[derive(Clone)]
pub struct DocumentationService {
    database_manager: Arc<DatabaseManager>,
    quota: QuotaService,
    notifier: ExpiryNotifier,
    time_provider: Arc<dyn TimeProvider>,
    timezone: Tz,
}

impl std::fmt::Debug for DocumentationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentationService")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl DocumentationService {
    pub fn new(
        database_manager: Arc<DatabaseManager>,
        quota: QuotaService,
        notifier: ExpiryNotifier,
        time_provider: Arc<dyn TimeProvider>,
        timezone: Tz,
    ) -> Self {
        Self {
            database_manager,
            quota,
            notifier,
            time_provider,
            timezone,
        }
    }

    async fn owned_pet(&self, user_id: &str, pet_id: i64) -> AppResult<Pet> {
        self.database_manager
            .pet(user_id, pet_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pet"))
    }

    /// Load a pet's records and raise any expiry alerts due today
    #[instrument(skip(self))]
    pub async fn load_for_pet(&self, user_id: &str, pet_id: i64) -> AppResult<DocumentationView> {
        let pet = self.owned_pet(user_id, pet_id).await?;
        let records = self.database_manager.records_for_pet(user_id, pet_id).await?;

        let today = self.time_provider.today_in(self.timezone);
        let notifications = self.notifier.generate(&records, &pet, user_id, today).await;
        let quota = self.quota.check_documentation(user_id, pet_id).await?;

        Ok(DocumentationView {
            pet,
            records: RecordsByKind::group(records),
            quota,
            notifications,
        })
    }

    /// Add a record to a pet
    #[instrument(skip(self, draft), fields(kind = %draft.kind))]
    pub async fn create_record(
        &self,
        user_id: &str,
        pet_id: i64,
        draft: RecordDraft,
    ) -> AppResult<MedicalRecord> {
        let fields = draft.validate()?;
        self.owned_pet(user_id, pet_id).await?;

        let decision = self.quota.check_documentation(user_id, pet_id).await?;
        if !decision.allowed {
            return Err(AppError::limit_reached(ResourceClass::DocumentationSlot));
        }

        let existing = self
            .database_manager
            .records_of_kind(user_id, pet_id, fields.treatment.kind())
            .await?;
        let candidate = Candidate::new(pet_id, &fields.treatment);
        if find_duplicate(&existing, &candidate).is_some() {
            return Err(self.duplicate(user_id, pet_id, &candidate));
        }

        let record = self
            .database_manager
            .insert_record(user_id, pet_id, &fields)
            .await?;
        info!(user_id = %user_id, pet_id, record_id = record.id, "Medical record created");
        Ok(record)
    }

    /// Replace the contents of an existing record
    #[instrument(skip(self, draft), fields(kind = %draft.kind))]
    pub async fn update_record(
        &self,
        user_id: &str,
        record_id: i64,
        draft: RecordDraft,
    ) -> AppResult<MedicalRecord> {
        let fields = draft.validate()?;
        let current = self
            .database_manager
            .record(user_id, record_id)
            .await?
            .ok_or_else(|| AppError::not_found("Medical record"))?;

        let existing = self
            .database_manager
            .records_of_kind(user_id, current.pet_id, fields.treatment.kind())
            .await?;
        let candidate = Candidate::new(current.pet_id, &fields.treatment).replacing(record_id);
        if find_duplicate(&existing, &candidate).is_some() {
            return Err(self.duplicate(user_id, current.pet_id, &candidate));
        }

        if !self
            .database_manager
            .update_record(user_id, record_id, &fields)
            .await?
        {
            return Err(AppError::not_found("Medical record"));
        }

        Ok(MedicalRecord {
            treatment: fields.treatment,
            applied_on: Some(fields.applied_on),
            expires_on: Some(fields.expires_on),
            alert: fields.alert,
            photo_url: fields.photo_url,
            ..current
        })
    }

    /// Remove a record; its alerts go with it
    #[instrument(skip(self))]
    pub async fn delete_record(&self, user_id: &str, record_id: i64) -> AppResult<()> {
        if self.database_manager.delete_record(user_id, record_id).await? {
            info!(user_id = %user_id, record_id, "Medical record deleted");
            Ok(())
        } else {
            Err(AppError::not_found("Medical record"))
        }
    }

    /// Vaccines still available for a pet and which kinds are locked
    #[instrument(skip(self))]
    pub async fn vaccine_options(&self, user_id: &str, pet_id: i64) -> AppResult<DocumentationOptions> {
        let pet = self.owned_pet(user_id, pet_id).await?;
        let records = self.database_manager.records_for_pet(user_id, pet_id).await?;
        Ok(DocumentationOptions::for_pet(
            &pet.species,
            &RecordsByKind::group(records),
        ))
    }

    fn duplicate(&self, user_id: &str, pet_id: i64, candidate: &Candidate<'_>) -> AppError {
        let kind = candidate.treatment.kind();
        let identifier = candidate.treatment.identifier();
        log_duplicate_rejected(user_id, pet_id, &kind.to_string(), identifier);
        AppError::Duplicate(format!(
            "{identifier} ({kind}) is already recorded for this pet; edit the existing record to change its dates"
        ))
    }
}
