//! Models module for the pet care backend
//!
//! Contains all data models and their validation logic.

pub mod event;
pub mod medical_record;
pub mod membership;
pub mod notification;
pub mod pet;
pub mod subscription;
pub mod vet;

// Re-export commonly used types
pub use event::{Event, EventLocation};
pub use medical_record::{AlertStatus, MedicalRecord, RecordDraft, RecordFields, RecordKind, Treatment};
pub use membership::{Limit, MembershipTier, ResourceClass, TierLimits};
pub use notification::{FeedItem, NewNotification, NotificationEntry, NotificationKey};
pub use pet::{NewPet, Pet};
pub use subscription::{Subscription, SubscriptionStatus};
pub use vet::Vet;
