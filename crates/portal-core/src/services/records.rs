//! `Record` implementations for the portal entities.

use crate::models::{
    now_rfc3339, Appointment, BlogPost, Client, ContactMessage, EmailTemplate, HealthRecord,
    Pet, Redirect, SeoMetadata,
};
use crate::validate;
use crate::validate::ValidationError;

use super::Record;

macro_rules! impl_record {
    ($type:ty, $prefix:literal, $validator:path) => {
        impl Record for $type {
            const KEY_PREFIX: &'static str = $prefix;

            fn id(&self) -> &str {
                &self.id
            }

            fn touch(&mut self) {
                self.updated_at = now_rfc3339();
            }

            fn validate(&self) -> Result<(), ValidationError> {
                $validator(self)
            }
        }
    };
}

impl_record!(Client, "client", validate::validate_client);
impl_record!(Pet, "pet", validate::validate_pet);
impl_record!(Appointment, "appointment", validate::validate_appointment);
impl_record!(HealthRecord, "health-record", validate::validate_health_record);
impl_record!(BlogPost, "blog-post", validate::validate_blog_post);
impl_record!(EmailTemplate, "email-template", validate::validate_email_template);
impl_record!(SeoMetadata, "seo", validate::validate_seo_metadata);
impl_record!(Redirect, "redirect", validate::validate_redirect);
impl_record!(ContactMessage, "contact-message", validate::validate_contact_message);
