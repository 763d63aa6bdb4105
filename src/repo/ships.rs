use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{CreateShipInput, Role, Ship, ShipStatus, UpdateShipInput};
use crate::policy::ResourceKind;
use crate::store::SharedBlobStore;

use super::{Entity, Repository};

impl Entity for Ship {
    const RESOURCE: ResourceKind = ResourceKind::Ships;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: chrono::DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Typed access to the ship collection.
#[derive(Clone)]
pub struct ShipRepository {
    inner: Repository<Ship>,
}

impl ShipRepository {
    pub fn load(store: SharedBlobStore) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Repository::load(store)?,
        })
    }

    pub fn list(&self) -> Vec<Ship> {
        self.inner.list()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Ship> {
        self.inner.find_by_id(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn by_status(&self, status: ShipStatus) -> Vec<Ship> {
        self.list()
            .into_iter()
            .filter(|s| s.status == status)
            .collect()
    }

    pub fn add(&self, actor: Role, input: CreateShipInput) -> Result<Ship, StoreError> {
        self.inner.guard(actor)?;
        validate_name(&input.name)?;
        validate_imo(&input.imo_number)?;
        if input.flag.trim().is_empty() {
            return Err(StoreError::Validation("flag must not be empty".into()));
        }

        let now = Utc::now();
        self.inner.insert(Ship {
            id: Uuid::new_v4(),
            name: input.name,
            imo_number: input.imo_number,
            flag: input.flag,
            status: input.status.unwrap_or(ShipStatus::Active),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&self, actor: Role, id: Uuid, patch: UpdateShipInput) -> Result<Ship, StoreError> {
        self.inner.guard(actor)?;
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(imo) = &patch.imo_number {
            validate_imo(imo)?;
        }
        if let Some(flag) = &patch.flag {
            if flag.trim().is_empty() {
                return Err(StoreError::Validation("flag must not be empty".into()));
            }
        }

        self.inner.modify("ship", id, |ship| {
            if let Some(name) = patch.name {
                ship.name = name;
            }
            if let Some(imo) = patch.imo_number {
                ship.imo_number = imo;
            }
            if let Some(flag) = patch.flag {
                ship.flag = flag;
            }
            if let Some(status) = patch.status {
                ship.status = status;
            }
        })
    }

    /// Remove a ship. Does **not** cascade to components or jobs; their
    /// records survive as orphans that relationship queries skip.
    pub fn remove(&self, actor: Role, id: Uuid) -> Result<(), StoreError> {
        self.inner.guard(actor)?;
        self.inner.remove_by_id(id)
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().len() < 2 {
        return Err(StoreError::Validation(
            "ship name must be at least 2 characters".into(),
        ));
    }
    Ok(())
}

/// IMO registration numbers are exactly seven ASCII digits.
fn validate_imo(imo: &str) -> Result<(), StoreError> {
    if imo.len() == 7 && imo.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "imo_number must be exactly 7 digits, got {:?}",
            imo
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_imo;

    #[test]
    fn imo_accepts_seven_digits() {
        assert!(validate_imo("9811000").is_ok());
    }

    #[test]
    fn imo_rejects_wrong_length_and_non_digits() {
        assert!(validate_imo("981100").is_err());
        assert!(validate_imo("98110001").is_err());
        assert!(validate_imo("981100a").is_err());
        assert!(validate_imo("IMO9811000").is_err());
    }
}
