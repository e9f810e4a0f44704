//! Onboarding progress models.
//!
//! One status record per (client, pet), tracking a fixed 8-step intake
//! workflow. Invariant: `completed` is true iff all 8 step flags are true.

use serde::{Deserialize, Serialize};

use super::now_rfc3339;

/// Number of steps in the intake workflow.
pub const TOTAL_ONBOARDING_STEPS: u8 = 8;

/// Per-step completion flags for the intake workflow.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSteps {
    pub basic_info: bool,
    pub current_health: bool,
    pub medical_history: bool,
    pub lifestyle: bool,
    pub previous_care: bool,
    pub insurance: bool,
    pub emergency: bool,
    pub additional: bool,
}

impl OnboardingSteps {
    /// All 8 flags set.
    pub fn all_set() -> Self {
        Self {
            basic_info: true,
            current_health: true,
            medical_history: true,
            lifestyle: true,
            previous_care: true,
            insurance: true,
            emergency: true,
            additional: true,
        }
    }

    /// Whether every step is complete.
    pub fn all_complete(&self) -> bool {
        self.basic_info
            && self.current_health
            && self.medical_history
            && self.lifestyle
            && self.previous_care
            && self.insurance
            && self.emergency
            && self.additional
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> u8 {
        [
            self.basic_info,
            self.current_health,
            self.medical_history,
            self.lifestyle,
            self.previous_care,
            self.insurance,
            self.emergency,
            self.additional,
        ]
        .iter()
        .filter(|flag| **flag)
        .count() as u8
    }
}

/// Onboarding progress for one (client, pet) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub client_id: String,
    pub pet_id: String,
    /// 0..=8
    pub current_step: u8,
    /// Fixed at 8
    pub total_steps: u8,
    pub completed: bool,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub steps: OnboardingSteps,
}

impl OnboardingStatus {
    /// Fresh status: all flags false, step 0.
    pub fn new(client_id: String, pet_id: String) -> Self {
        Self {
            client_id,
            pet_id,
            current_step: 0,
            total_steps: TOTAL_ONBOARDING_STEPS,
            completed: false,
            started_at: now_rfc3339(),
            completed_at: None,
            steps: OnboardingSteps::default(),
        }
    }

    /// Re-derive `completed` from the step flags, stamping `completed_at`
    /// on the transition to complete.
    pub fn reconcile(&mut self) {
        self.completed = self.steps.all_complete();
        if self.completed && self.completed_at.is_none() {
            self.completed_at = Some(now_rfc3339());
        }
    }

    /// Force the record into the fully-completed state.
    pub fn mark_fully_complete(&mut self) {
        self.steps = OnboardingSteps::all_set();
        self.current_step = TOTAL_ONBOARDING_STEPS;
        self.completed = true;
        if self.completed_at.is_none() {
            self.completed_at = Some(now_rfc3339());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_status_is_empty() {
        let status = OnboardingStatus::new("c1".into(), "p1".into());
        assert_eq!(status.current_step, 0);
        assert_eq!(status.total_steps, 8);
        assert!(!status.completed);
        assert!(status.completed_at.is_none());
        assert_eq!(status.steps.completed_count(), 0);
    }

    #[test]
    fn test_all_complete_requires_every_flag() {
        let mut steps = OnboardingSteps::all_set();
        assert!(steps.all_complete());
        assert_eq!(steps.completed_count(), 8);

        steps.insurance = false;
        assert!(!steps.all_complete());
        assert_eq!(steps.completed_count(), 7);
    }

    #[test]
    fn test_reconcile_derives_completed() {
        let mut status = OnboardingStatus::new("c1".into(), "p1".into());
        status.steps = OnboardingSteps::all_set();
        status.reconcile();

        assert!(status.completed);
        assert!(status.completed_at.is_some());

        // Unsetting a flag flips completed back, but completed_at is
        // historical and stays
        status.steps.additional = false;
        let stamped = status.completed_at.clone();
        status.reconcile();
        assert!(!status.completed);
        assert_eq!(status.completed_at, stamped);
    }

    #[test]
    fn test_mark_fully_complete_overrides_partial_state() {
        let mut status = OnboardingStatus::new("c1".into(), "p1".into());
        status.steps.basic_info = true;
        status.current_step = 2;

        status.mark_fully_complete();
        assert!(status.completed);
        assert_eq!(status.current_step, 8);
        assert!(status.steps.all_complete());
    }
}
