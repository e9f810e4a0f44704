//! Input validation for everything the portal persists.
//!
//! Validation runs at the service boundary, before any store write. Errors
//! carry per-field detail so the API layer can surface a structured 400
//! payload alongside the human-readable summary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Appointment, BlogPost, Client, ConsentAcceptance, ContactMessage, EmailTemplate,
    HealthRecord, MedicalHistory, OnboardingStatus, Pet, Redirect, SeoMetadata,
    SignatureMethod, TOTAL_ONBOARDING_STEPS,
};

/// A single failed field constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Validation failure with field-level detail.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// A validation error with one failed field.
    pub fn single(field: &str, message: &str) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: field.to_string(),
                message: message.to_string(),
            }],
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} ({})", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects field constraint failures.
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn new() -> Self {
        Self { issues: Vec::new() }
    }

    fn require(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.issues.push(FieldIssue {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
    }

    fn require_present(&mut self, field: &str, value: &str) {
        self.require(field, !value.trim().is_empty(), "must not be empty");
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Validate a consent acceptance against the document catalog.
pub fn validate_acceptance(acceptance: &ConsentAcceptance) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("clientId", &acceptance.client_id);
    checker.require_present("documentId", &acceptance.document_id);
    checker.require_present("documentVersion", &acceptance.document_version);
    checker.require(
        "acceptedAt",
        chrono::DateTime::parse_from_rfc3339(&acceptance.accepted_at).is_ok(),
        "must be an RFC3339 timestamp",
    );

    if let Some(pet_id) = &acceptance.pet_id {
        checker.require_present("petId", pet_id);
    }

    checker.require(
        "documentId",
        crate::consent::find_document(&acceptance.document_id).is_some(),
        "unknown consent document",
    );

    if let Some(signature) = &acceptance.signature {
        // A bare checkbox carries no payload; typed and digital must
        let needs_value = matches!(
            signature.method,
            SignatureMethod::TypedName | SignatureMethod::DigitalSignature
        );
        checker.require(
            "signature.value",
            !needs_value || !signature.value.trim().is_empty(),
            "required for typed-name and digital signatures",
        );
    }

    checker.finish()
}

/// Validate a medical-history document.
pub fn validate_medical_history(history: &MedicalHistory) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("petId", &history.pet_id);
    checker.require_present("clientId", &history.client_id);
    checker.require_present("emergencyContact.name", &history.emergency_contact.name);
    checker.require_present("emergencyContact.phone", &history.emergency_contact.phone);

    for (i, medication) in history.medications.iter().enumerate() {
        checker.require_present(&format!("medications[{}].name", i), &medication.name);
    }
    for (i, allergy) in history.allergies.iter().enumerate() {
        checker.require_present(&format!("allergies[{}].allergen", i), &allergy.allergen);
    }

    checker.finish()
}

/// Validate an onboarding status (used after partial merges).
pub fn validate_onboarding_status(status: &OnboardingStatus) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("clientId", &status.client_id);
    checker.require_present("petId", &status.pet_id);
    checker.require(
        "currentStep",
        status.current_step <= TOTAL_ONBOARDING_STEPS,
        "must be between 0 and 8",
    );
    checker.require(
        "totalSteps",
        status.total_steps == TOTAL_ONBOARDING_STEPS,
        "fixed at 8",
    );
    checker.finish()
}

pub fn validate_client(client: &Client) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("firstName", &client.first_name);
    checker.require_present("lastName", &client.last_name);
    checker.require("email", looks_like_email(&client.email), "not a valid email");
    checker.finish()
}

pub fn validate_pet(pet: &Pet) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("clientId", &pet.client_id);
    checker.require_present("name", &pet.name);
    checker.require_present("species", &pet.species);
    checker.require(
        "weightKg",
        pet.weight_kg.map_or(true, |w| w > 0.0),
        "must be positive",
    );
    checker.finish()
}

pub fn validate_appointment(appointment: &Appointment) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("clientId", &appointment.client_id);
    checker.require_present("petId", &appointment.pet_id);
    checker.require_present("reason", &appointment.reason);
    checker.require(
        "scheduledAt",
        chrono::DateTime::parse_from_rfc3339(&appointment.scheduled_at).is_ok(),
        "must be an RFC3339 timestamp",
    );
    checker.finish()
}

pub fn validate_health_record(record: &HealthRecord) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("petId", &record.pet_id);
    checker.require_present("summary", &record.summary);
    checker.finish()
}

pub fn validate_blog_post(post: &BlogPost) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("slug", &post.slug);
    checker.require_present("title", &post.title);
    checker.require_present("locale", &post.locale);
    checker.require(
        "slug",
        post.slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
        "lowercase letters, digits, and hyphens only",
    );
    checker.finish()
}

pub fn validate_email_template(template: &EmailTemplate) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("name", &template.name);
    checker.require_present("subject", &template.subject);
    checker.require_present("body", &template.body);
    checker.finish()
}

pub fn validate_seo_metadata(seo: &SeoMetadata) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require("path", seo.path.starts_with('/'), "must start with '/'");
    checker.require_present("title", &seo.title);
    checker.require_present("locale", &seo.locale);
    checker.finish()
}

pub fn validate_redirect(redirect: &Redirect) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require(
        "fromPath",
        redirect.from_path.starts_with('/'),
        "must start with '/'",
    );
    checker.require(
        "toPath",
        redirect.to_path.starts_with('/'),
        "must start with '/'",
    );
    checker.require(
        "toPath",
        redirect.from_path != redirect.to_path,
        "must differ from fromPath",
    );
    checker.finish()
}

pub fn validate_contact_message(message: &ContactMessage) -> Result<(), ValidationError> {
    let mut checker = Checker::new();
    checker.require_present("name", &message.name);
    checker.require("email", looks_like_email(&message.email), "not a valid email");
    checker.require_present("message", &message.message);
    checker.finish()
}
