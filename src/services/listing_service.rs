//! Listing Service
//!
//! Read-only directories shared by every user: 24-hour vets and events.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::database::DatabaseManager;
use crate::error::AppResult;
use crate::models::event::Event;
use crate::models::vet::Vet;

#[derive(Debug, Clone)]
pub struct ListingService {
    database_manager: Arc<DatabaseManager>,
}

impl ListingService {
    pub fn new(database_manager: Arc<DatabaseManager>) -> Self {
        Self { database_manager }
    }

    /// Listed clinics in name order
    #[instrument(skip(self))]
    pub async fn vets(&self) -> AppResult<Vec<Vet>> {
        let vets = self.database_manager.active_vets().await?;
        debug!(count = vets.len(), "Loaded vet directory");
        Ok(vets)
    }

    /// Published events, newest first, with their venues
    #[instrument(skip(self))]
    pub async fn events(&self) -> AppResult<Vec<Event>> {
        let events = self.database_manager.active_events().await?;
        debug!(count = events.len(), "Loaded events");
        Ok(events)
    }
}
