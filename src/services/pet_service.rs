//! Pet Service
//!
//! Pet registration under the owner's pet quota.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::membership::ResourceClass;
use crate::models::pet::{NewPet, Pet};
use crate::services::quota::{QuotaDecision, QuotaService};

#[derive(Debug, Clone)]
pub struct PetService {
    database_manager: Arc<DatabaseManager>,
    quota: QuotaService,
}

impl PetService {
    pub fn new(database_manager: Arc<DatabaseManager>, quota: QuotaService) -> Self {
        Self {
            database_manager,
            quota,
        }
    }

    /// Pets of a user
    #[instrument(skip(self))]
    pub async fn list_pets(&self, user_id: &str) -> AppResult<Vec<Pet>> {
        self.database_manager.pets_for_owner(user_id).await
    }

    /// A pet of the user, or `NotFound`
    #[instrument(skip(self))]
    pub async fn get_pet(&self, user_id: &str, pet_id: i64) -> AppResult<Pet> {
        self.database_manager
            .pet(user_id, pet_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pet"))
    }

    /// Current pet quota of a user
    pub async fn pet_quota(&self, user_id: &str) -> AppResult<QuotaDecision> {
        self.quota.check_pets(user_id).await
    }

    /// Register a pet.
    ///
    /// Validation happens before any query. The quota is re-checked against a
    /// fresh count; an insert racing past it is still stopped by the store.
    #[instrument(skip(self, new_pet))]
    pub async fn create_pet(&self, user_id: &str, new_pet: NewPet) -> AppResult<Pet> {
        new_pet.validate()?;

        let decision = self.quota.check_pets(user_id).await?;
        if !decision.allowed {
            return Err(AppError::limit_reached(ResourceClass::Pet));
        }

        let pet = self.database_manager.insert_pet(user_id, &new_pet).await?;
        info!(user_id = %user_id, pet_id = pet.id, "Pet registered");
        Ok(pet)
    }
}
