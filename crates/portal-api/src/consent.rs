//! Consent handlers: submit, query, revoke.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use portal_core::models::{ConsentAcceptance, ConsentStatus};
use portal_core::ConsentTracker;
use portal_core::ValidationError;

use crate::{ApiError, ApiResult, Caller, PortalApi, SimpleResponse};

/// Response for `POST /consent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSubmitResponse {
    pub success: bool,
    pub message: String,
    pub all_required_accepted: bool,
}

/// What a `GET /consent` call is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAction {
    Status,
    History,
    Check,
    Latest,
}

impl FromStr for ConsentAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(ConsentAction::Status),
            "history" => Ok(ConsentAction::History),
            "check" => Ok(ConsentAction::Check),
            "latest" => Ok(ConsentAction::Latest),
            _ => Err(ValidationError::single(
                "action",
                "expected status, history, check, or latest",
            )
            .into()),
        }
    }
}

/// Response for `GET /consent`, shaped by the requested action.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConsentQueryResponse {
    Status(ConsentStatus),
    History(Vec<ConsentAcceptance>),
    Check { accepted: bool },
    Latest(Box<ConsentAcceptance>),
}

impl PortalApi {
    /// `POST /consent` — record an acceptance and report overall standing.
    pub fn submit_consent(
        &self,
        caller: &Caller,
        acceptance: ConsentAcceptance,
    ) -> ApiResult<ConsentSubmitResponse> {
        self.ensure_client_access(caller, &acceptance.client_id)?;

        let store = self.store()?;
        let tracker = ConsentTracker::new(&store);
        let client_id = acceptance.client_id.clone();
        let pet_id = acceptance.pet_id.clone();
        tracker.save_acceptance(acceptance)?;

        let all_required_accepted =
            tracker.has_accepted_required(&client_id, pet_id.as_deref())?;
        Ok(ConsentSubmitResponse {
            success: true,
            message: "Consent recorded".into(),
            all_required_accepted,
        })
    }

    /// `GET /consent` — status, history, boolean check, or latest acceptance.
    pub fn consent_query(
        &self,
        caller: &Caller,
        client_id: &str,
        pet_id: Option<&str>,
        action: ConsentAction,
        document_id: Option<&str>,
    ) -> ApiResult<ConsentQueryResponse> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        let tracker = ConsentTracker::new(&store);
        match action {
            ConsentAction::Status => Ok(ConsentQueryResponse::Status(
                tracker.status(client_id, pet_id)?,
            )),
            ConsentAction::History => Ok(ConsentQueryResponse::History(
                tracker.history(client_id, pet_id)?,
            )),
            ConsentAction::Check => Ok(ConsentQueryResponse::Check {
                accepted: tracker.has_accepted_required(client_id, pet_id)?,
            }),
            ConsentAction::Latest => {
                let document_id = document_id.ok_or_else(|| {
                    ValidationError::single("documentId", "required for action=latest")
                })?;
                Ok(ConsentQueryResponse::Latest(Box::new(
                    tracker.latest_acceptance(client_id, document_id, pet_id)?,
                )))
            }
        }
    }

    /// `DELETE /consent` — revoke a document's acceptances.
    pub fn revoke_consent(
        &self,
        caller: &Caller,
        client_id: &str,
        document_id: &str,
        pet_id: Option<&str>,
    ) -> ApiResult<SimpleResponse> {
        self.ensure_client_access(caller, client_id)?;

        let store = self.store()?;
        ConsentTracker::new(&store).revoke(client_id, document_id, pet_id)?;
        Ok(SimpleResponse::ok("Consent revoked"))
    }
}
