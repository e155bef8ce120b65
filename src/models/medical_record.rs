//! Medical Record Model
//!
//! Vaccines, topical treatments and dewormings attached to a pet. Stored rows
//! carry one nullable column per kind-specific field; they are mapped into the
//! tagged [`Treatment`] here so no caller has to probe optional fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::AppError;

/// Kind of medical record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum RecordKind {
    #[serde(rename = "vacuna")]
    #[strum(serialize = "vacuna")]
    Vaccine,
    #[serde(rename = "pipeta")]
    #[strum(serialize = "pipeta")]
    Topical,
    #[serde(rename = "desparasitacion")]
    #[strum(serialize = "desparasitacion")]
    Deworming,
}

/// Alert switch on a record; inactive records never surface in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
pub enum AlertStatus {
    #[default]
    #[serde(rename = "Activo")]
    #[strum(serialize = "Activo")]
    Active,
    #[serde(rename = "Inactivo")]
    #[strum(serialize = "Inactivo")]
    Inactive,
}

/// What was applied, with the field that identifies it for its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Treatment {
    #[serde(rename = "vacuna")]
    Vaccine { vaccine: String },
    #[serde(rename = "pipeta")]
    Topical {
        product: String,
        presentation: Option<String>,
    },
    #[serde(rename = "desparasitacion")]
    Deworming {
        antiparasitic: String,
        presentation: String,
    },
}

impl Treatment {
    pub fn kind(&self) -> RecordKind {
        match self {
            Treatment::Vaccine { .. } => RecordKind::Vaccine,
            Treatment::Topical { .. } => RecordKind::Topical,
            Treatment::Deworming { .. } => RecordKind::Deworming,
        }
    }

    /// Kind-specific identifying field: vaccine name, product or antiparasitic.
    /// Also used as the treatment's display name.
    pub fn identifier(&self) -> &str {
        match self {
            Treatment::Vaccine { vaccine } => vaccine,
            Treatment::Topical { product, .. } => product,
            Treatment::Deworming { antiparasitic, .. } => antiparasitic,
        }
    }

    pub fn presentation(&self) -> Option<&str> {
        match self {
            Treatment::Vaccine { .. } => None,
            Treatment::Topical { presentation, .. } => presentation.as_deref(),
            Treatment::Deworming { presentation, .. } => Some(presentation),
        }
    }
}

/// Medical record belonging to one pet and one owning user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub pet_id: i64,
    pub user_id: String,

    #[serde(flatten)]
    pub treatment: Treatment,

    pub applied_on: Option<NaiveDate>,

    /// Expiration date; records without one never produce alerts
    pub expires_on: Option<NaiveDate>,

    pub alert: AlertStatus,
    pub photo_url: Option<String>,

    /// Creation timestamp (Unix timestamp)
    pub created_at: i64,
}

impl MedicalRecord {
    pub fn kind(&self) -> RecordKind {
        self.treatment.kind()
    }
}

/// Record values as submitted by the owner, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDraft {
    pub kind: RecordKind,
    #[serde(default)]
    pub vaccine: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub antiparasitic: Option<String>,
    #[serde(default)]
    pub presentation: Option<String>,
    #[serde(default)]
    pub applied_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub alert: Option<AlertStatus>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Validated record values ready to be written for a pet
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub treatment: Treatment,
    pub applied_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub alert: AlertStatus,
    pub photo_url: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl RecordDraft {
    /// Check required fields and build the tagged treatment
    pub fn validate(&self) -> Result<RecordFields, AppError> {
        let mut missing = Vec::new();

        if self.applied_on.is_none() {
            missing.push("applied_on");
        }
        if self.expires_on.is_none() {
            missing.push("expires_on");
        }

        let presentation = non_blank(self.presentation.as_ref());
        let treatment = match self.kind {
            RecordKind::Vaccine => {
                non_blank(self.vaccine.as_ref()).map(|vaccine| Treatment::Vaccine { vaccine })
            }
            RecordKind::Topical => non_blank(self.product.as_ref()).map(|product| {
                Treatment::Topical {
                    product,
                    presentation: presentation.clone(),
                }
            }),
            RecordKind::Deworming => {
                if presentation.is_none() {
                    missing.push("presentation");
                }
                non_blank(self.antiparasitic.as_ref()).zip(presentation.clone()).map(
                    |(antiparasitic, presentation)| Treatment::Deworming {
                        antiparasitic,
                        presentation,
                    },
                )
            }
        };

        if treatment.is_none() {
            missing.push(match self.kind {
                RecordKind::Vaccine => "vaccine",
                RecordKind::Topical => "product",
                RecordKind::Deworming if non_blank(self.antiparasitic.as_ref()).is_none() => {
                    "antiparasitic"
                }
                RecordKind::Deworming => "presentation",
            });
        }
        missing.dedup();

        match (treatment, self.applied_on, self.expires_on) {
            (Some(treatment), Some(applied_on), Some(expires_on)) if missing.is_empty() => {
                if expires_on < applied_on {
                    return Err(AppError::validation(
                        "expires_on must not be earlier than applied_on",
                    ));
                }
                Ok(RecordFields {
                    treatment,
                    applied_on,
                    expires_on,
                    alert: self.alert.unwrap_or_default(),
                    photo_url: non_blank(self.photo_url.as_ref()),
                })
            }
            _ => Err(AppError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}
