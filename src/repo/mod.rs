//! Collection repositories.
//!
//! [`Repository`] owns one homogeneous collection kept in lock-step with its
//! blob key: load on init, full-collection rewrite on every mutation. The
//! typed wrappers in this module's submodules add validation, referential
//! checks, and relationship queries; they are the only write path, since
//! the generic mutation methods are crate-private.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Role;
use crate::policy::{self, ResourceKind};
use crate::store::SharedBlobStore;

mod components;
mod jobs;
mod ships;
mod users;

pub use components::ComponentRepository;
pub use jobs::JobRepository;
pub use ships::ShipRepository;
pub use users::UserRepository;

/// A record that can live in a [`Repository`].
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + 'static {
    /// The collection this entity belongs to; names the blob key and the
    /// policy resource.
    const RESOURCE: ResourceKind;

    fn id(&self) -> Uuid;

    /// Bump the record's `updated_at`.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Generic in-memory collection synchronized with one blob key.
pub struct Repository<T: Entity> {
    store: SharedBlobStore,
    records: Arc<Mutex<Vec<T>>>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            records: self.records.clone(),
        }
    }
}

impl<T: Entity> Repository<T> {
    /// Load the collection from the blob store.
    ///
    /// An absent key, or a stored value that no longer matches the record
    /// shape, seeds an empty collection and persists it once.
    pub fn load(store: SharedBlobStore) -> Result<Self, StoreError> {
        Self::load_with(store, Vec::new)
    }

    /// Like [`Repository::load`], but seeds `seed()` instead of an empty
    /// collection on first run.
    pub fn load_with(
        store: SharedBlobStore,
        seed: impl FnOnce() -> Vec<T>,
    ) -> Result<Self, StoreError> {
        let key = T::RESOURCE.blob_key();
        let records = match store.get(key)? {
            Some(value) => match serde_json::from_value::<Vec<T>>(value) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("{} collection is malformed, reseeding: {}", T::RESOURCE, e);
                    let seeded = seed();
                    persist_to(&store, key, &seeded)?;
                    seeded
                }
            },
            None => {
                let seeded = seed();
                persist_to(&store, key, &seeded)?;
                seeded
            }
        };

        Ok(Self {
            store,
            records: Arc::new(Mutex::new(records)),
        })
    }

    /// Snapshot of the full collection, in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.records.lock().expect("collection lock poisoned").clone()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<T> {
        self.records
            .lock()
            .expect("collection lock poisoned")
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.records.lock().expect("collection lock poisoned").len()
    }

    /// Fail with [`StoreError::Permission`] unless `actor` may write this
    /// collection. Typed repositories call this before validating, so a
    /// rejected write never gets as far as the snapshot.
    pub(crate) fn guard(&self, actor: Role) -> Result<(), StoreError> {
        if policy::can_write(actor, T::RESOURCE) {
            Ok(())
        } else {
            Err(StoreError::Permission {
                role: actor,
                resource: T::RESOURCE,
            })
        }
    }

    /// Append a fully-built record and persist the collection.
    ///
    /// On persist failure the record is already in the snapshot; the caller
    /// sees [`StoreError::Persistence`] and may retry the persist.
    pub(crate) fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.records.lock().expect("collection lock poisoned");
        records.push(record.clone());
        self.persist(&records)?;
        Ok(record)
    }

    /// Apply `apply` to the record with `id`, bump `updated_at`, persist.
    /// Fails with [`StoreError::NotFound`], before any persist call, if the
    /// id is absent.
    pub(crate) fn modify(
        &self,
        kind: &'static str,
        id: Uuid,
        apply: impl FnOnce(&mut T),
    ) -> Result<T, StoreError> {
        let mut records = self.records.lock().expect("collection lock poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::not_found(kind, id))?;

        apply(record);
        record.touch(Utc::now());
        let updated = record.clone();

        self.persist(&records)?;
        Ok(updated)
    }

    /// Remove by id if present. Idempotent: removing an absent id is a no-op,
    /// not an error. Persists either way.
    pub(crate) fn remove_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("collection lock poisoned");
        records.retain(|r| r.id() != id);
        self.persist(&records)
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        persist_to(&self.store, T::RESOURCE.blob_key(), records)
    }
}

fn persist_to<T: Serialize>(
    store: &SharedBlobStore,
    key: &str,
    records: &[T],
) -> Result<(), StoreError> {
    let value =
        serde_json::to_value(records).map_err(|e| StoreError::Persistence(e.to_string()))?;
    store.set(key, &value)
}
