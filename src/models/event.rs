//! Event Model
//!
//! Community events (adoption fairs, vaccination days) and the places where
//! they happen.

use serde::{Deserialize, Serialize};

/// One venue of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLocation {
    pub name: String,
    pub address: Option<String>,
}

/// Published event with its venues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub details: Option<String>,

    /// How to get in (registration, walk-in)
    pub access: Option<String>,

    /// What to bring, one item per entry
    pub requirements: Vec<String>,

    /// No charge to attend
    pub free: bool,

    pub notes: Option<String>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,

    /// Venues in the order they were added
    pub locations: Vec<EventLocation>,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,
}
