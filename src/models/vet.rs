//! Veterinary Clinic Model
//!
//! Clinics open around the clock, listed for every user.

use serde::{Deserialize, Serialize};

/// 24-hour veterinary clinic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vet {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,

    /// Map position, when known
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    /// External page (maps or the clinic's site)
    pub link: Option<String>,
    pub image_url: Option<String>,
}
