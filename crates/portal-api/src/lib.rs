//! Clinic Portal API Layer
//!
//! Boundary between the (external) route layer and `portal-core`. Handlers
//! accept already-parsed parameters and an upstream-authenticated [`Caller`],
//! call into the core trackers and services, and return serde-serializable
//! payloads. Errors fold into [`ApiError`], which carries the HTTP-style
//! status code and a structured error body.
//!
//! # Handler groups
//!
//! - [`consent`]: submit / query / revoke consent
//! - [`medical`]: medical-history intake and onboarding progress
//! - [`entities`]: client, pet, appointment, health-record CRUD, contact form
//! - [`content`]: blog, email templates, SEO, redirects, analytics (staff)

pub mod consent;
pub mod content;
pub mod entities;
pub mod medical;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use portal_core::store::Store;
use portal_core::validate::{FieldIssue, ValidationError};
use portal_core::{ConsentError, OnboardingError, ServiceError, StoreError};

// =========================================================================
// Boundary Error Type
// =========================================================================

/// Boundary error, mapped to an HTTP-style status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status code equivalent for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Storage(_) => 500,
        }
    }

    /// Structured error payload for the response body.
    pub fn body(&self) -> ErrorBody {
        let details = match self {
            ApiError::Validation(err) => Some(err.issues.clone()),
            _ => None,
        };
        ErrorBody {
            error: match self {
                ApiError::Validation(_) => "validation_error",
                ApiError::Unauthorized(_) => "unauthorized",
                ApiError::NotFound(_) => "not_found",
                ApiError::Storage(_) => "storage_error",
            },
            message: self.to_string(),
            details,
        }
    }
}

/// JSON error payload: short machine tag, human-readable message, and
/// per-field detail for validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

impl From<ConsentError> for ApiError {
    fn from(e: ConsentError) -> Self {
        match e {
            ConsentError::Validation(err) => ApiError::Validation(err),
            ConsentError::NotFound(msg) => ApiError::NotFound(msg),
            ConsentError::Store(err) => ApiError::Storage(err.to_string()),
        }
    }
}

impl From<OnboardingError> for ApiError {
    fn from(e: OnboardingError) -> Self {
        match e {
            OnboardingError::Validation(err) => ApiError::Validation(err),
            OnboardingError::NotFound(msg) => ApiError::NotFound(msg),
            OnboardingError::Store(err) => ApiError::Storage(err.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(err) => ApiError::Validation(err),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Store(err) => ApiError::Storage(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ApiError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Caller Identity
// =========================================================================

/// Caller role, established by the (external) auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Staff,
}

/// An authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    /// The caller's own client id; absent for staff accounts
    pub client_id: Option<String>,
    pub role: Role,
}

impl Caller {
    /// A staff caller.
    pub fn staff() -> Self {
        Self {
            client_id: None,
            role: Role::Staff,
        }
    }

    /// A portal client caller.
    pub fn client(client_id: &str) -> Self {
        Self {
            client_id: Some(client_id.to_string()),
            role: Role::Client,
        }
    }
}

// =========================================================================
// Shared Response Shapes
// =========================================================================

/// Minimal success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub success: bool,
    pub message: String,
}

impl SimpleResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe portal API over the store.
pub struct PortalApi {
    store: Arc<Mutex<Store>>,
}

impl PortalApi {
    /// Open or create the backing store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let store = Store::open(path)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// In-memory portal (for testing).
    pub fn open_in_memory() -> ApiResult<Self> {
        let store = Store::open_in_memory()?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Lock the store for one handler invocation.
    pub(crate) fn store(&self) -> ApiResult<MutexGuard<'_, Store>> {
        Ok(self.store.lock()?)
    }

    /// Reject non-staff callers.
    pub(crate) fn ensure_staff(&self, caller: &Caller) -> ApiResult<()> {
        if caller.role == Role::Staff {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("staff access required".into()))
        }
    }

    /// Staff may act on any client; a client caller only on their own data.
    pub(crate) fn ensure_client_access(&self, caller: &Caller, client_id: &str) -> ApiResult<()> {
        match caller.role {
            Role::Staff => Ok(()),
            Role::Client if caller.client_id.as_deref() == Some(client_id) => Ok(()),
            Role::Client => Err(ApiError::Unauthorized(
                "cannot access another client's data".into(),
            )),
        }
    }
}
