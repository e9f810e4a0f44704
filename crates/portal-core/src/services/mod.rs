//! Entity services: typed CRUD over the key-value store, plus the email
//! bulk-send builder and traffic analytics.

mod analytics;
mod email;
mod records;

pub use analytics::*;
pub use email::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use thiserror::Error;

use crate::merge::apply_partial;
use crate::store::Store;
use crate::validate::ValidationError;

/// Entity service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A persistable portal entity.
///
/// Records live at `{KEY_PREFIX}:{id}` with an id index set at
/// `{KEY_PREFIX}:index`.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KEY_PREFIX: &'static str;

    fn id(&self) -> &str;

    /// Refresh `updated_at`.
    fn touch(&mut self);

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Typed CRUD repository for one record type.
pub struct Repository<'a, T: Record> {
    store: &'a Store,
    _record: PhantomData<T>,
}

impl<'a, T: Record> Repository<'a, T> {
    /// Create a repository over the store.
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn key(id: &str) -> String {
        format!("{}:{}", T::KEY_PREFIX, id)
    }

    fn index_key() -> String {
        format!("{}:index", T::KEY_PREFIX)
    }

    /// Validate and persist a new record, registering it in the index.
    pub fn create(&self, record: T) -> ServiceResult<T> {
        record.validate()?;
        self.store.set_json(&Self::key(record.id()), &record)?;
        self.store.sadd(&Self::index_key(), record.id())?;
        Ok(record)
    }

    /// Point lookup.
    pub fn get(&self, id: &str) -> ServiceResult<Option<T>> {
        Ok(self.store.get_json(&Self::key(id))?)
    }

    /// All records in the index, skipping dangling index entries.
    pub fn list(&self) -> ServiceResult<Vec<T>> {
        let ids = self.store.smembers(&Self::index_key())?;
        let mut records = Vec::new();
        for id in &ids {
            if let Some(record) = self.get(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Shallow-merge a partial update into an existing record.
    pub fn update(&self, id: &str, partial: Value) -> ServiceResult<T> {
        let existing = self
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {}", T::KEY_PREFIX, id)))?;

        let mut merged: T = apply_partial(&existing, partial)?;
        if merged.id() != id {
            return Err(ValidationError::single("id", "id is immutable").into());
        }
        merged.touch();
        merged.validate()?;
        self.store.set_json(&Self::key(id), &merged)?;
        Ok(merged)
    }

    /// Delete a record and its index entry.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.store.del(&Self::key(id))? {
            return Err(ServiceError::NotFound(format!("{} {}", T::KEY_PREFIX, id)));
        }
        self.store.srem(&Self::index_key(), id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Pet};
    use serde_json::json;

    fn setup_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn sample_client() -> Client {
        Client::new("Dana".into(), "Reyes".into(), "dana@example.com".into())
    }

    #[test]
    fn test_create_and_get() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);

        let created = clients.create(sample_client()).unwrap();
        let loaded = clients.get(&created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);

        let mut bad = sample_client();
        bad.email = "nope".into();
        assert!(matches!(
            clients.create(bad),
            Err(ServiceError::Validation(_))
        ));
        assert!(clients.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_merges_and_touches() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        let created = clients.create(sample_client()).unwrap();

        let updated = clients
            .update(&created.id, json!({"phone": "555-0101"}))
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));
        assert_eq!(updated.first_name, "Dana");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        let result = clients.update("nope", json!({"phone": "x"}));
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_update_cannot_change_id() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        let created = clients.create(sample_client()).unwrap();

        let result = clients.update(&created.id, json!({"id": "hijacked"}));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_delete_removes_record_and_index() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        let created = clients.create(sample_client()).unwrap();

        clients.delete(&created.id).unwrap();
        assert!(clients.get(&created.id).unwrap().is_none());
        assert!(clients.list().unwrap().is_empty());

        assert!(matches!(
            clients.delete(&created.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_skips_dangling_index_entries() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        clients.create(sample_client()).unwrap();

        store.sadd("client:index", "ghost").unwrap();
        let listed = clients.list().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_separate_prefixes_do_not_collide() {
        let store = setup_store();
        let clients = Repository::<Client>::new(&store);
        let pets = Repository::<Pet>::new(&store);

        let client = clients.create(sample_client()).unwrap();
        pets.create(Pet::new(client.id.clone(), "Luna".into(), "feline".into()))
            .unwrap();

        assert_eq!(clients.list().unwrap().len(), 1);
        assert_eq!(pets.list().unwrap().len(), 1);
    }
}
