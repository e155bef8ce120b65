//! Services module for the pet care backend
//!
//! Contains the quota, duplicate and expiry rules, the services built on
//! them and the public listings.

pub mod documentation_service;
pub mod duplicate_guard;
pub mod expiry_notifier;
pub mod listing_service;
pub mod membership_service;
pub mod notification_service;
pub mod pet_service;
pub mod quota;
pub mod time_provider;

// Re-export commonly used services
pub use documentation_service::{DocumentationOptions, DocumentationService, DocumentationView, RecordsByKind};
pub use expiry_notifier::{ExpiryNotifier, GenerationReport};
pub use listing_service::ListingService;
pub use membership_service::MembershipService;
pub use notification_service::NotificationService;
pub use pet_service::PetService;
pub use quota::{can_create, QuotaDecision, QuotaService};
pub use time_provider::{MockTimeProvider, SystemTimeProvider, TimeProvider};
