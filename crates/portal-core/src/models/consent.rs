//! Consent document and acceptance models.
//!
//! Documents are immutable reference data from the catalog; acceptances are
//! append-only records owned by the client. Status is a derived view,
//! recomputed on every query and never stored.

use serde::{Deserialize, Serialize};

use super::now_rfc3339;

/// The kinds of consent document the clinic tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    TreatmentAuthorization,
    AnesthesiaConsent,
    SurgeryConsent,
    EuthanasiaConsent,
    PrivacyPolicy,
    TermsOfService,
    DataProcessing,
    FinancialAgreement,
}

/// Legal/medical/data/financial grouping for display and reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    Legal,
    Medical,
    Data,
    Financial,
}

/// Whether a document applies at client level or per pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsentScope {
    Client,
    Pet,
}

/// A versioned consent document from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDocument {
    /// Stable document identifier (e.g., "privacy-policy")
    pub id: String,
    pub doc_type: DocumentType,
    /// Version string (e.g., "2.1")
    pub version: String,
    pub title: String,
    /// Full document text
    pub content: String,
    /// Date this version took effect
    pub effective_date: String,
    /// Whether acceptance is required before treatment
    pub required: bool,
    pub category: ConsentCategory,
    pub scope: ConsentScope,
}

/// How a client signed off on a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureMethod {
    Checkbox,
    TypedName,
    DigitalSignature,
}

/// Signature evidence attached to an acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSignature {
    pub method: SignatureMethod,
    /// Signature payload: typed name or signature data; empty for checkbox
    pub value: String,
    pub signed_at: String,
}

/// A timestamped record that a client accepted a specific document version.
///
/// Created once per acceptance event and never mutated. Multiple acceptances
/// of the same document/version may coexist; the latest `accepted_at` wins
/// at read time. Revocation removes the record from the retrievable set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentAcceptance {
    pub id: String,
    pub client_id: String,
    /// Present for pet-scoped consents; absent for client-level ones
    pub pet_id: Option<String>,
    pub document_id: String,
    pub document_type: DocumentType,
    /// Version accepted, kept for audit. Satisfaction matches by
    /// `document_id` only.
    pub document_version: String,
    pub accepted_at: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub signature: Option<ConsentSignature>,
    /// SHA-256 of the acceptance payload, stamped at save time
    pub content_hash: Option<String>,
}

impl ConsentAcceptance {
    /// Create a new acceptance for a catalog document.
    pub fn new(client_id: String, document: &ConsentDocument) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            pet_id: None,
            document_id: document.id.clone(),
            document_type: document.doc_type,
            document_version: document.version.clone(),
            accepted_at: now_rfc3339(),
            ip_address: None,
            user_agent: None,
            signature: None,
            content_hash: None,
        }
    }

    /// Whether this acceptance falls within the given query scope.
    ///
    /// Client-level acceptances are visible from any scope for the client;
    /// pet-scoped acceptances only match their own pet.
    pub fn in_scope(&self, pet_id: Option<&str>) -> bool {
        match (&self.pet_id, pet_id) {
            (None, _) => true,
            (Some(own), Some(query)) => own == query,
            (Some(_), None) => false,
        }
    }
}

/// Derived consent state for a client (optionally scoped to a pet).
///
/// Never persisted: recomputed from the catalog and the acceptance set on
/// every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatus {
    pub client_id: String,
    pub pet_id: Option<String>,
    /// Required documents applicable to this scope
    pub required: Vec<ConsentDocument>,
    /// Latest acceptance per required document, where one exists
    pub accepted: Vec<ConsentAcceptance>,
    /// Required documents with no acceptance on file
    pub pending: Vec<ConsentDocument>,
    pub all_required_accepted: bool,
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> ConsentDocument {
        ConsentDocument {
            id: "privacy-policy".into(),
            doc_type: DocumentType::PrivacyPolicy,
            version: "2.1".into(),
            title: "Privacy Policy".into(),
            content: "...".into(),
            effective_date: "2025-01-01".into(),
            required: true,
            category: ConsentCategory::Legal,
            scope: ConsentScope::Client,
        }
    }

    #[test]
    fn test_new_acceptance_carries_document_fields() {
        let doc = sample_document();
        let acceptance = ConsentAcceptance::new("c1".into(), &doc);

        assert_eq!(acceptance.client_id, "c1");
        assert_eq!(acceptance.document_id, "privacy-policy");
        assert_eq!(acceptance.document_version, "2.1");
        assert_eq!(acceptance.document_type, DocumentType::PrivacyPolicy);
        assert!(acceptance.pet_id.is_none());
        assert_eq!(acceptance.id.len(), 36); // UUID format
    }

    #[test]
    fn test_scope_filtering() {
        let doc = sample_document();
        let mut client_level = ConsentAcceptance::new("c1".into(), &doc);
        client_level.pet_id = None;

        let mut pet_level = ConsentAcceptance::new("c1".into(), &doc);
        pet_level.pet_id = Some("p1".into());

        // Client-level acceptances are visible from any scope
        assert!(client_level.in_scope(None));
        assert!(client_level.in_scope(Some("p1")));

        // Pet-level acceptances only match their own pet
        assert!(pet_level.in_scope(Some("p1")));
        assert!(!pet_level.in_scope(Some("p2")));
        assert!(!pet_level.in_scope(None));
    }

    #[test]
    fn test_document_type_wire_format() {
        let json = serde_json::to_string(&DocumentType::TreatmentAuthorization).unwrap();
        assert_eq!(json, r#""treatment-authorization""#);
    }
}
