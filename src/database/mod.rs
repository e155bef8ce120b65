//! Database layer
//!
//! SQLite persistence through SQLx. Each table family adds its queries to
//! [`DatabaseManager`] in its own module.

pub mod connection;
mod documentation;
mod events;
mod memberships;
mod notifications;
mod pets;
mod subscriptions;
mod vets;

pub use connection::DatabaseManager;
