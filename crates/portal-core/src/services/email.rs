//! Email template rendering and bulk-send batch building.
//!
//! The portal never sends mail itself; delivery transport is external. This
//! module renders templates and assembles the outbound batch the delivery
//! side consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{now_rfc3339, Client, EmailTemplate};
use crate::store::Store;

use super::{Repository, ServiceError, ServiceResult};

/// A rendered email ready for the delivery transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEmail {
    pub client_id: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A batch of rendered emails for one template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailBatch {
    pub template_id: String,
    pub created_at: String,
    pub messages: Vec<OutboundEmail>,
}

/// Builds bulk-send batches from stored templates and client records.
pub struct BulkMailer<'a> {
    store: &'a Store,
}

impl<'a> BulkMailer<'a> {
    /// Create a new bulk mailer.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Render a template for each addressee and assemble the batch.
    ///
    /// Client ids without a backing record are skipped rather than failing
    /// the batch (same lenient-read policy as index expansion).
    pub fn build_batch(
        &self,
        template_id: &str,
        client_ids: &[String],
    ) -> ServiceResult<EmailBatch> {
        let templates = Repository::<EmailTemplate>::new(self.store);
        let template = templates
            .get(template_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("email template {}", template_id)))?;

        let clients = Repository::<Client>::new(self.store);
        let mut messages = Vec::new();
        for client_id in client_ids {
            let Some(client) = clients.get(client_id)? else {
                continue;
            };
            let vars = client_vars(&client);
            messages.push(OutboundEmail {
                client_id: client.id.clone(),
                to: client.email.clone(),
                subject: render(&template.subject, &vars),
                body: render(&template.body, &vars),
            });
        }

        Ok(EmailBatch {
            template_id: template_id.to_string(),
            created_at: now_rfc3339(),
            messages,
        })
    }
}

/// Substitute `{{name}}` placeholders. Unknown placeholders are left as-is
/// so a typo in a template is visible in the preview instead of silently
/// rendering empty.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{{{}}}}}", name), value);
    }
    rendered
}

fn client_vars(client: &Client) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("firstName".to_string(), client.first_name.clone());
    vars.insert("lastName".to_string(), client.last_name.clone());
    vars.insert("fullName".to_string(), client.full_name());
    vars.insert("email".to_string(), client.email.clone());
    vars
}
