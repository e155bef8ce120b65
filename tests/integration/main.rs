//! Integration tests
//!
//! Services and HTTP endpoints running against an in-memory SQLite
//! database with a pinned clock.

mod api_tests;
mod common;
mod documentation_tests;
mod membership_tests;
