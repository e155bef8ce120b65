//! Duplicate Guard
//!
//! A pet may hold only one record per kind and identifying field. The check
//! runs before writes; it is not a stored constraint.

use crate::models::medical_record::{MedicalRecord, Treatment};

/// Proposed record to compare against what a pet already has
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub pet_id: i64,
    pub treatment: &'a Treatment,

    /// Record being edited, skipped during the comparison
    pub replacing: Option<i64>,
}

impl<'a> Candidate<'a> {
    pub fn new(pet_id: i64, treatment: &'a Treatment) -> Self {
        Self {
            pet_id,
            treatment,
            replacing: None,
        }
    }

    pub fn replacing(mut self, record_id: i64) -> Self {
        self.replacing = Some(record_id);
        self
    }
}

/// Existing record equivalent to the candidate, if any.
///
/// Records match on pet, kind and exact identifier (case-sensitive). Dates,
/// presentation and alert status are ignored.
pub fn find_duplicate<'r>(
    existing: &'r [MedicalRecord],
    candidate: &Candidate<'_>,
) -> Option<&'r MedicalRecord> {
    existing.iter().find(|record| {
        record.pet_id == candidate.pet_id
            && Some(record.id) != candidate.replacing
            && record.kind() == candidate.treatment.kind()
            && record.treatment.identifier() == candidate.treatment.identifier()
    })
}

/// Whether the candidate duplicates one of the existing records
pub fn is_duplicate(existing: &[MedicalRecord], candidate: &Candidate<'_>) -> bool {
    find_duplicate(existing, candidate).is_some()
}
