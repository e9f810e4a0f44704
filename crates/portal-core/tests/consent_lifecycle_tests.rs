//! End-to-end consent lifecycle scenarios.

use anyhow::Result;

use portal_core::consent::{consent_catalog, find_document, ConsentTracker};
use portal_core::models::{
    ConsentAcceptance, ConsentScope, ConsentSignature, SignatureMethod,
};
use portal_core::store::Store;

fn accept_all_required(tracker: &ConsentTracker, client_id: &str, pet_id: &str) {
    for document in consent_catalog().iter().filter(|d| d.required) {
        let mut acceptance = ConsentAcceptance::new(client_id.into(), document);
        if document.scope == ConsentScope::Pet {
            acceptance.pet_id = Some(pet_id.into());
        }
        tracker.save_acceptance(acceptance).unwrap();
    }
}

#[test]
fn fresh_client_has_everything_pending() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    let status = tracker.status("c1", Some("p1"))?;
    assert!(!status.all_required_accepted);
    assert_eq!(status.pending.len(), status.required.len());
    assert_eq!(status.pending.len(), 5); // 4 client-level + 1 pet-level
    Ok(())
}

#[test]
fn accepting_every_required_document_clears_pending() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    accept_all_required(&tracker, "c1", "p1");

    let status = tracker.status("c1", Some("p1"))?;
    assert!(status.all_required_accepted);
    assert!(status.pending.is_empty());
    assert_eq!(status.accepted.len(), 5);
    Ok(())
}

#[test]
fn revocation_reopens_exactly_one_document() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    accept_all_required(&tracker, "c1", "p1");
    tracker.revoke("c1", "data-processing", None)?;

    let status = tracker.status("c1", Some("p1"))?;
    assert!(!status.all_required_accepted);
    assert_eq!(status.pending.len(), 1);
    assert_eq!(status.pending[0].id, "data-processing");

    // Re-accepting closes the gap again
    let document = find_document("data-processing").unwrap();
    tracker.save_acceptance(ConsentAcceptance::new("c1".into(), &document))?;
    assert!(tracker.has_accepted_required("c1", Some("p1"))?);
    Ok(())
}

#[test]
fn signature_and_request_metadata_survive_round_trip() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    let document = find_document("treatment-authorization").unwrap();
    let mut acceptance = ConsentAcceptance::new("c1".into(), &document);
    acceptance.pet_id = Some("p1".into());
    acceptance.ip_address = Some("203.0.113.9".into());
    acceptance.user_agent = Some("Mozilla/5.0".into());
    acceptance.signature = Some(ConsentSignature {
        method: SignatureMethod::TypedName,
        value: "Dana Reyes".into(),
        signed_at: acceptance.accepted_at.clone(),
    });
    tracker.save_acceptance(acceptance)?;

    let latest = tracker.latest_acceptance("c1", "treatment-authorization", Some("p1"))?;
    assert_eq!(latest.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(
        latest.signature.as_ref().map(|s| s.method),
        Some(SignatureMethod::TypedName)
    );
    assert!(latest.content_hash.is_some());
    Ok(())
}

#[test]
fn clients_acceptances_are_isolated() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    accept_all_required(&tracker, "c1", "p1");

    assert!(tracker.has_accepted_required("c1", Some("p1"))?);
    assert!(!tracker.has_accepted_required("c2", Some("p9"))?);
    assert!(tracker.history("c2", None)?.is_empty());
    Ok(())
}

#[test]
fn pet_level_acceptance_does_not_leak_to_sibling_pet() -> Result<()> {
    let store = Store::open_in_memory()?;
    let tracker = ConsentTracker::new(&store);

    accept_all_required(&tracker, "c1", "p1");

    // p1 is covered; p2 still needs the pet-scoped treatment authorization
    assert!(tracker.has_accepted_required("c1", Some("p1"))?);
    let status = tracker.status("c1", Some("p2"))?;
    assert!(!status.all_required_accepted);
    assert_eq!(status.pending[0].id, "treatment-authorization");
    Ok(())
}
