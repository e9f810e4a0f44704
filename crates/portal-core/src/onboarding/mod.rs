//! Medical-history intake and onboarding progress tracking.

mod tracker;

pub use tracker::*;

use thiserror::Error;

use crate::validate::ValidationError;

/// Onboarding tracker errors.
#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type OnboardingResult<T> = Result<T, OnboardingError>;
