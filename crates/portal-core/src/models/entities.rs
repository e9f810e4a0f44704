//! Portal entity models: clients, pets, appointments, health records, and
//! the content/admin records (blog posts, email templates, SEO metadata,
//! redirects, contact messages).

use serde::{Deserialize, Serialize};

use super::now_rfc3339;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A clinic client (pet owner).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Preferred locale for portal content and email
    pub locale: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Client {
    pub fn new(first_name: String, last_name: String, email: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            first_name,
            last_name,
            email,
            phone: None,
            address: None,
            locale: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A pet belonging to exactly one client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub client_id: String,
    pub name: String,
    /// e.g., "canine", "feline"
    pub species: String,
    pub breed: Option<String>,
    pub date_of_birth: Option<String>,
    pub weight_kg: Option<f64>,
    pub microchip_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Pet {
    pub fn new(client_id: String, name: String, species: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            client_id,
            name,
            species,
            breed: None,
            date_of_birth: None,
            weight_kg: None,
            microchip_id: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Appointment lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
}

/// A scheduled or requested visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub pet_id: String,
    /// Requested or confirmed time, RFC3339
    pub scheduled_at: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    pub fn new(client_id: String, pet_id: String, scheduled_at: String, reason: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            client_id,
            pet_id,
            scheduled_at,
            reason,
            status: AppointmentStatus::Requested,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Kind of clinical record attached to a pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HealthRecordKind {
    Exam,
    Vaccination,
    LabResult,
    Prescription,
    Note,
}

/// A clinical record entry for a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub pet_id: String,
    pub kind: HealthRecordKind,
    pub summary: String,
    pub details: Option<String>,
    /// When the clinical event happened (not when the row was written)
    pub recorded_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl HealthRecord {
    pub fn new(pet_id: String, kind: HealthRecordKind, summary: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            pet_id,
            kind,
            summary,
            details: None,
            recorded_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Blog post publication state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// A marketing-site blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub locale: String,
    pub status: PostStatus,
    pub published_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BlogPost {
    pub fn new(slug: String, title: String, body: String, locale: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            slug,
            title,
            body,
            locale,
            status: PostStatus::Draft,
            published_at: None,
            tags: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A reusable email template with `{{placeholder}}` substitution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl EmailTemplate {
    pub fn new(name: String, subject: String, body: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            name,
            subject,
            body,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Per-path SEO metadata for the marketing site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub id: String,
    pub path: String,
    pub title: String,
    pub description: String,
    pub locale: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SeoMetadata {
    pub fn new(path: String, title: String, description: String, locale: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            path,
            title,
            description,
            locale,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A URL redirect rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub id: String,
    pub from_path: String,
    pub to_path: String,
    pub permanent: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Redirect {
    pub fn new(from_path: String, to_path: String, permanent: bool) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            from_path,
            to_path,
            permanent,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub locale: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ContactMessage {
    pub fn new(name: String, email: String, message: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            name,
            email,
            subject: None,
            message,
            locale: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
