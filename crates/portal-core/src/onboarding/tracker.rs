//! Onboarding and medical-history tracker.
//!
//! Keys:
//! - `medical-history:{pet_id}` — the one-per-pet intake document
//! - `onboarding:status:{client_id}:{pet_id}` — progress record
//! - `onboarding:index:{client_id}` — set of pet ids with onboarding started
//!
//! Saving a medical history marks the pet's onboarding fully complete. That
//! coupling is a product decision, kept in one place
//! (`complete_onboarding_on_history_save`) so it can be revisited without
//! touching storage code.

use serde_json::Value;

use crate::merge::apply_partial;
use crate::models::{now_rfc3339, MedicalHistory, OnboardingStatus};
use crate::store::Store;
use crate::validate::{validate_medical_history, validate_onboarding_status};

use super::{OnboardingError, OnboardingResult};

/// Onboarding tracker over the portal store.
pub struct OnboardingTracker<'a> {
    store: &'a Store,
}

impl<'a> OnboardingTracker<'a> {
    /// Create a new onboarding tracker.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Medical History
    // =========================================================================

    /// Upsert the pet's medical-history document.
    ///
    /// Later saves fully overwrite the document, except `completed_at`: an
    /// existing stamp is preserved, otherwise it is set to now. As a side
    /// effect the pet's onboarding is marked fully complete.
    pub fn save_medical_history(
        &self,
        mut history: MedicalHistory,
    ) -> OnboardingResult<MedicalHistory> {
        validate_medical_history(&history)?;

        let key = history_key(&history.pet_id);
        let existing: Option<MedicalHistory> = self.store.get_json(&key)?;
        history.completed_at = existing
            .and_then(|h| h.completed_at)
            .or_else(|| Some(now_rfc3339()));

        self.store.set_json(&key, &history)?;
        self.complete_onboarding_on_history_save(&history.client_id, &history.pet_id)?;
        Ok(history)
    }

    /// Point lookup; `Ok(None)` when the pet has no document.
    pub fn medical_history(&self, pet_id: &str) -> OnboardingResult<Option<MedicalHistory>> {
        Ok(self.store.get_json(&history_key(pet_id))?)
    }

    /// Shallow-merge a partial update into an existing document.
    pub fn update_medical_history(
        &self,
        pet_id: &str,
        partial: Value,
    ) -> OnboardingResult<MedicalHistory> {
        let key = history_key(pet_id);
        let existing: MedicalHistory = self
            .store
            .get_json(&key)?
            .ok_or_else(|| OnboardingError::NotFound(format!("no medical history for pet {}", pet_id)))?;

        let merged = apply_partial(&existing, partial)?;
        validate_medical_history(&merged)?;
        self.store.set_json(&key, &merged)?;
        Ok(merged)
    }

    // =========================================================================
    // Onboarding Status
    // =========================================================================

    /// Start onboarding for a (client, pet) pair.
    ///
    /// Registers the pet in the client's index (idempotent) and writes a
    /// fresh status record. Re-running overwrites the record and restarts
    /// progress.
    pub fn create_status(&self, client_id: &str, pet_id: &str) -> OnboardingResult<OnboardingStatus> {
        let status = OnboardingStatus::new(client_id.to_string(), pet_id.to_string());
        self.store.set_json(&status_key(client_id, pet_id), &status)?;
        self.store.sadd(&index_key(client_id), pet_id)?;
        Ok(status)
    }

    /// Point lookup; `Ok(None)` when no status exists.
    pub fn status(&self, client_id: &str, pet_id: &str) -> OnboardingResult<Option<OnboardingStatus>> {
        Ok(self.store.get_json(&status_key(client_id, pet_id))?)
    }

    /// Shallow-merge a partial update into an existing status.
    ///
    /// `completed` is re-derived from the merged step flags, so a partial
    /// cannot leave the record claiming completion with open steps.
    pub fn update_status(
        &self,
        client_id: &str,
        pet_id: &str,
        partial: Value,
    ) -> OnboardingResult<OnboardingStatus> {
        let key = status_key(client_id, pet_id);
        let existing: OnboardingStatus = self.store.get_json(&key)?.ok_or_else(|| {
            OnboardingError::NotFound(format!(
                "no onboarding status for client {} pet {}",
                client_id, pet_id
            ))
        })?;

        let mut merged: OnboardingStatus = apply_partial(&existing, partial)?;
        merged.reconcile();
        validate_onboarding_status(&merged)?;
        self.store.set_json(&key, &merged)?;
        Ok(merged)
    }

    /// Whether the client has finished onboarding every registered pet.
    ///
    /// A client with zero registered pets has NOT completed onboarding.
    /// Index entries without a backing status record count as incomplete.
    pub fn has_completed_onboarding(&self, client_id: &str) -> OnboardingResult<bool> {
        let pet_ids = self.store.smembers(&index_key(client_id))?;
        if pet_ids.is_empty() {
            return Ok(false);
        }

        for pet_id in &pet_ids {
            match self.status(client_id, pet_id)? {
                Some(status) if status.completed => continue,
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Status records for every registered pet, skipping index entries
    /// whose record is missing.
    pub fn client_statuses(&self, client_id: &str) -> OnboardingResult<Vec<OnboardingStatus>> {
        let pet_ids = self.store.smembers(&index_key(client_id))?;
        let mut statuses = Vec::new();
        for pet_id in &pet_ids {
            if let Some(status) = self.status(client_id, pet_id)? {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }

    /// Mark onboarding fully complete because a medical history was saved.
    ///
    /// Force-sets all 8 step flags, `current_step = 8`, and `completed`,
    /// regardless of prior partial state, creating the status record and
    /// index entry when absent. The single call site for the
    /// history-save-completes-onboarding policy.
    pub fn complete_onboarding_on_history_save(
        &self,
        client_id: &str,
        pet_id: &str,
    ) -> OnboardingResult<OnboardingStatus> {
        let mut status = self
            .status(client_id, pet_id)?
            .unwrap_or_else(|| OnboardingStatus::new(client_id.to_string(), pet_id.to_string()));

        status.mark_fully_complete();
        self.store.set_json(&status_key(client_id, pet_id), &status)?;
        self.store.sadd(&index_key(client_id), pet_id)?;
        Ok(status)
    }
}

fn history_key(pet_id: &str) -> String {
    format!("medical-history:{}", pet_id)
}

fn status_key(client_id: &str, pet_id: &str) -> String {
    format!("onboarding:status:{}:{}", client_id, pet_id)
}

fn index_key(client_id: &str) -> String {
    format!("onboarding:index:{}", client_id)
}
