//! Clinic Portal Core Library
//!
//! Backend core for a veterinary clinic's client portal: consent-document
//! tracking, per-pet medical-history intake with onboarding progress, and
//! the entity services behind the admin surfaces, all persisted through a
//! generic key-value store.
//!
//! # Architecture
//!
//! ```text
//!                    Route layer (external) → portal-api
//!                                │
//!            ┌───────────────────┼───────────────────────┐
//!            ▼                   ▼                       ▼
//!     ConsentTracker     OnboardingTracker       Repository<T> / services
//!     (catalog, status   (medical history,       (clients, pets, blog,
//!      projection,        8-step progress,        email batches, SEO,
//!      revocation)        completion policy)      analytics, search)
//!            │                   │                       │
//!            └───────────────────┼───────────────────────┘
//!                                ▼
//!                     Store (key-value contract)
//!                     get / set / del / sadd / srem / smembers
//! ```
//!
//! # Core behaviors
//!
//! - Consent status is a stateless projection over the catalog and the
//!   acceptance set, recomputed on every query and never cached.
//! - Saving a medical history marks the pet's onboarding fully complete;
//!   the policy lives in one method so it can be revisited in isolation.
//! - Identifier indexes are sets; reads that expand an index skip dangling
//!   members instead of failing.
//!
//! # Modules
//!
//! - [`store`]: key-value store adapter over embedded SQLite
//! - [`models`]: domain types (ConsentAcceptance, MedicalHistory, Pet, ...)
//! - [`consent`]: document catalog and acceptance tracking
//! - [`onboarding`]: intake documents and onboarding progress
//! - [`services`]: typed CRUD repository, email batches, analytics
//! - [`search`]: fuzzy client/pet lookup
//! - [`validate`]: field-level input validation

pub mod consent;
pub mod merge;
pub mod models;
pub mod onboarding;
pub mod search;
pub mod services;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use consent::{ConsentError, ConsentTracker};
pub use models::{
    ConsentAcceptance, ConsentDocument, ConsentStatus, MedicalHistory, OnboardingStatus,
};
pub use onboarding::{OnboardingError, OnboardingTracker};
pub use services::{Record, Repository, ServiceError};
pub use store::{Store, StoreError};
pub use validate::ValidationError;
