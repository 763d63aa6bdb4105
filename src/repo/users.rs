use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{CreateUserInput, Role, UpdateUserInput, User, UserSummary};
use crate::policy::ResourceKind;
use crate::store::SharedBlobStore;

use super::{Entity, Repository};

impl Entity for User {
    const RESOURCE: ResourceKind = ResourceKind::Users;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: chrono::DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Typed access to the user collection.
///
/// First run seeds one account per role with documented demo credentials
/// (`admin@fleet.local` / `admin123` and friends) so role-gated writes work
/// out of the box. Emails are unique across the collection.
#[derive(Clone)]
pub struct UserRepository {
    inner: Repository<User>,
}

impl UserRepository {
    pub fn load(store: SharedBlobStore) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Repository::load_with(store, default_users)?,
        })
    }

    pub fn list(&self) -> Vec<User> {
        self.inner.list()
    }

    /// Hash-free projection for consumers.
    pub fn summaries(&self) -> Vec<UserSummary> {
        self.list().into_iter().map(Into::into).collect()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.inner.find_by_id(id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.list().into_iter().find(|u| u.email == email)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Credential check. Returns the matching user. Unknown email and wrong
    /// password both come back as `None`.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.find_by_email(email)
            .filter(|u| u.password_hash == hash_password(password))
    }

    pub fn add(&self, actor: Role, input: CreateUserInput) -> Result<User, StoreError> {
        self.inner.guard(actor)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        if input.name.trim().is_empty() {
            return Err(StoreError::Validation("name must not be empty".into()));
        }
        if self.find_by_email(&input.email).is_some() {
            return Err(StoreError::Validation(format!(
                "email {} is already registered",
                input.email
            )));
        }

        let now = Utc::now();
        self.inner.insert(User {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: hash_password(&input.password),
            name: input.name,
            role: input.role,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&self, actor: Role, id: Uuid, patch: UpdateUserInput) -> Result<User, StoreError> {
        self.inner.guard(actor)?;
        if let Some(email) = &patch.email {
            validate_email(email)?;
            if self.find_by_email(email).is_some_and(|u| u.id != id) {
                return Err(StoreError::Validation(format!(
                    "email {} is already registered",
                    email
                )));
            }
        }
        if let Some(password) = &patch.password {
            validate_password(password)?;
        }

        self.inner.modify("user", id, |user| {
            if let Some(email) = patch.email {
                user.email = email;
            }
            if let Some(password) = patch.password {
                user.password_hash = hash_password(&password);
            }
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
        })
    }

    pub fn remove(&self, actor: Role, id: Uuid) -> Result<(), StoreError> {
        self.inner.guard(actor)?;
        self.inner.remove_by_id(id)
    }
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn validate_email(email: &str) -> Result<(), StoreError> {
    // Same shape the original UI enforced: local@domain.tld, no whitespace.
    let mut parts = email.split('@');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None)
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
    );
    if well_formed {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "{:?} is not a valid email address",
            email
        )))
    }
}

fn validate_password(password: &str) -> Result<(), StoreError> {
    if password.len() < 6 {
        return Err(StoreError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// The documented first-run account set, one per role.
fn default_users() -> Vec<User> {
    let now = Utc::now();
    [
        ("Admin User", "admin@fleet.local", "admin123", Role::Admin),
        (
            "Engineer User",
            "engineer@fleet.local",
            "engine123",
            Role::Engineer,
        ),
        (
            "Inspector User",
            "inspector@fleet.local",
            "inspect123",
            Role::Inspector,
        ),
        ("Viewer User", "viewer@fleet.local", "viewer123", Role::Viewer),
    ]
    .into_iter()
    .map(|(name, email, password, role)| User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: hash_password(password),
        name: name.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_stable_hex_sha256() {
        assert_eq!(hash_password("admin123").len(), 64);
        assert_eq!(hash_password("admin123"), hash_password("admin123"));
        assert_ne!(hash_password("admin123"), hash_password("admin124"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("admin@fleet.local").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@fleet.local").is_err());
        assert!(validate_email("spaces in@fleet.local").is_err());
        assert!(validate_email("nodot@fleet").is_err());
    }
}
