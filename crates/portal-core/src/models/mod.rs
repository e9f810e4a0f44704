//! Domain models for the clinic portal.

mod consent;
mod entities;
mod medical;
mod onboarding;

pub use consent::*;
pub use entities::*;
pub use medical::*;
pub use onboarding::*;

/// Current UTC timestamp as an RFC3339 string.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
