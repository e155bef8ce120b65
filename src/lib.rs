//! Pet care backend
//!
//! Membership quotas, medical documentation with duplicate protection and
//! expiry alerts, served over a JSON HTTP API on top of SQLite.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Config;
pub use database::DatabaseManager;
pub use error::{AppError, AppResult, WriteError};
