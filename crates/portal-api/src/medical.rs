//! Medical-history and onboarding handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use portal_core::models::{MedicalHistory, OnboardingStatus};
use portal_core::OnboardingTracker;

use crate::{ApiError, ApiResult, Caller, PortalApi, SimpleResponse};

/// Response for `GET /onboarding?clientId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientOnboardingResponse {
    pub client_id: String,
    pub completed: bool,
    pub statuses: Vec<OnboardingStatus>,
}

impl PortalApi {
    /// `POST /medical-history` — upsert the intake document. Completes the
    /// pet's onboarding as a side effect.
    pub fn submit_medical_history(
        &self,
        caller: &Caller,
        history: MedicalHistory,
    ) -> ApiResult<SimpleResponse> {
        self.ensure_client_access(caller, &history.client_id)?;

        let store = self.store()?;
        OnboardingTracker::new(&store).save_medical_history(history)?;
        Ok(SimpleResponse::ok("Medical history saved"))
    }

    /// `GET /medical-history?petId` — the document, or 404.
    pub fn medical_history(&self, caller: &Caller, pet_id: &str) -> ApiResult<MedicalHistory> {
        let store = self.store()?;
        let history = OnboardingTracker::new(&store)
            .medical_history(pet_id)?
            .ok_or_else(|| ApiError::NotFound(format!("medical history for pet {}", pet_id)))?;

        self.ensure_client_access(caller, &history.client_id)?;
        Ok(history)
    }

    /// `PATCH /medical-history?petId` — shallow-merge partial update.
    pub fn update_medical_history(
        &self,
        caller: &Caller,
        pet_id: &str,
        partial: Value,
    ) -> ApiResult<MedicalHistory> {
        // Loading the document checks ownership before any write
        self.medical_history(caller, pet_id)?;

        let store = self.store()?;
        Ok(OnboardingTracker::new(&store).update_medical_history(pet_id, partial)?)
    }

    /// `POST /onboarding` — start (or restart) onboarding for a pet.
    pub fn start_onboarding(
        &self,
        caller: &Caller,
        client_id: &str,
        pet_id: &str,
    ) -> ApiResult<OnboardingStatus> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        Ok(OnboardingTracker::new(&store).create_status(client_id, pet_id)?)
    }

    /// `GET /onboarding?clientId&petId` — one pet's progress, or 404.
    pub fn onboarding_status(
        &self,
        caller: &Caller,
        client_id: &str,
        pet_id: &str,
    ) -> ApiResult<OnboardingStatus> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        OnboardingTracker::new(&store)
            .status(client_id, pet_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "onboarding status for client {} pet {}",
                    client_id, pet_id
                ))
            })
    }

    /// `PATCH /onboarding?clientId&petId` — merge step progress.
    pub fn update_onboarding(
        &self,
        caller: &Caller,
        client_id: &str,
        pet_id: &str,
        partial: Value,
    ) -> ApiResult<OnboardingStatus> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        Ok(OnboardingTracker::new(&store).update_status(client_id, pet_id, partial)?)
    }

    /// `GET /onboarding?clientId` — every registered pet's progress plus the
    /// client-level completion flag.
    pub fn client_onboarding(
        &self,
        caller: &Caller,
        client_id: &str,
    ) -> ApiResult<ClientOnboardingResponse> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        let tracker = OnboardingTracker::new(&store);
        Ok(ClientOnboardingResponse {
            client_id: client_id.to_string(),
            completed: tracker.has_completed_onboarding(client_id)?,
            statuses: tracker.client_statuses(client_id)?,
        })
    }
}
