//! Static catalog of consent documents.
//!
//! Immutable reference data: the clinic's current document set with their
//! versions, scopes, and required flags. Document text is abbreviated here;
//! the rendered site serves the full localized copies.

use crate::models::{ConsentCategory, ConsentDocument, ConsentScope, DocumentType};

/// The full document catalog.
pub fn consent_catalog() -> Vec<ConsentDocument> {
    vec![
        document(
            "treatment-authorization",
            DocumentType::TreatmentAuthorization,
            "1.3",
            "General Treatment Authorization",
            "2025-03-01",
            true,
            ConsentCategory::Medical,
            ConsentScope::Pet,
        ),
        document(
            "anesthesia-consent",
            DocumentType::AnesthesiaConsent,
            "1.1",
            "Anesthesia Consent",
            "2024-11-15",
            false,
            ConsentCategory::Medical,
            ConsentScope::Pet,
        ),
        document(
            "surgery-consent",
            DocumentType::SurgeryConsent,
            "1.2",
            "Surgical Procedure Consent",
            "2024-11-15",
            false,
            ConsentCategory::Medical,
            ConsentScope::Pet,
        ),
        document(
            "euthanasia-consent",
            DocumentType::EuthanasiaConsent,
            "1.0",
            "Euthanasia Authorization",
            "2023-06-01",
            false,
            ConsentCategory::Medical,
            ConsentScope::Pet,
        ),
        document(
            "privacy-policy",
            DocumentType::PrivacyPolicy,
            "2.1",
            "Privacy Policy",
            "2025-01-01",
            true,
            ConsentCategory::Legal,
            ConsentScope::Client,
        ),
        document(
            "terms-of-service",
            DocumentType::TermsOfService,
            "2.0",
            "Terms of Service",
            "2025-01-01",
            true,
            ConsentCategory::Legal,
            ConsentScope::Client,
        ),
        document(
            "data-processing",
            DocumentType::DataProcessing,
            "1.4",
            "Data Processing Agreement",
            "2025-05-20",
            true,
            ConsentCategory::Data,
            ConsentScope::Client,
        ),
        document(
            "financial-agreement",
            DocumentType::FinancialAgreement,
            "1.0",
            "Financial Responsibility Agreement",
            "2024-02-01",
            true,
            ConsentCategory::Financial,
            ConsentScope::Client,
        ),
    ]
}

/// Required documents applicable to a scope.
///
/// Client-scoped required documents always apply; pet-scoped ones apply
/// only when the query names a pet.
pub fn required_documents(include_pet_scope: bool) -> Vec<ConsentDocument> {
    consent_catalog()
        .into_iter()
        .filter(|doc| doc.required)
        .filter(|doc| include_pet_scope || doc.scope == ConsentScope::Client)
        .collect()
}

/// Look up a catalog document by id.
pub fn find_document(id: &str) -> Option<ConsentDocument> {
    consent_catalog().into_iter().find(|doc| doc.id == id)
}

#[allow(clippy::too_many_arguments)]
fn document(
    id: &str,
    doc_type: DocumentType,
    version: &str,
    title: &str,
    effective_date: &str,
    required: bool,
    category: ConsentCategory,
    scope: ConsentScope,
) -> ConsentDocument {
    ConsentDocument {
        id: id.to_string(),
        doc_type,
        version: version.to_string(),
        title: title.to_string(),
        content: format!("{} (v{})", title, version),
        effective_date: effective_date.to_string(),
        required,
        category,
        scope,
    }
}
