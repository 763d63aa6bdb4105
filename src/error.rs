use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;
use crate::policy::ResourceKind;

/// Everything the repository layer can fail with.
///
/// Repositories authorize, then validate, then mutate, so by the time a
/// write touches the in-memory snapshot, only [`StoreError::Persistence`]
/// remains possible. A persistence failure leaves the snapshot updated and
/// the blob store behind; callers may retry the persist, not the mutation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A write referenced a record that does not exist.
    #[error("referential integrity violated: {0}")]
    Referential(String),

    /// Lookup or update against an id that is not in the collection.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// The acting role is not permitted to mutate this collection.
    #[error("role {role} may not modify {resource}")]
    Permission { role: Role, resource: ResourceKind },

    /// The blob store failed to read or write a collection.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}
