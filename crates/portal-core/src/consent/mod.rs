//! Consent tracking: catalog of required documents, acceptance records,
//! and the derived pending-vs-accepted status.

mod catalog;
mod tracker;

pub use catalog::*;
pub use tracker::*;

use thiserror::Error;

use crate::validate::ValidationError;

/// Consent tracker errors.
#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ConsentResult<T> = Result<T, ConsentError>;
