//! Unit tests for the quota, duplicate and expiry rules
//!
//! Pure functions only; no database.

mod rule_properties;
mod rule_scenarios;
