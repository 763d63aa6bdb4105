use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Component, CreateComponentInput, Role, UpdateComponentInput};
use crate::policy::ResourceKind;
use crate::store::SharedBlobStore;

use super::{Entity, Repository, ShipRepository};

impl Entity for Component {
    const RESOURCE: ResourceKind = ResourceKind::Components;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: chrono::DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Typed access to the component collection.
///
/// Holds a handle to the ship repository so every write can check that the
/// referenced ship exists at call time.
#[derive(Clone)]
pub struct ComponentRepository {
    inner: Repository<Component>,
    ships: ShipRepository,
}

impl ComponentRepository {
    pub fn load(store: SharedBlobStore, ships: ShipRepository) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Repository::load(store)?,
            ships,
        })
    }

    pub fn list(&self) -> Vec<Component> {
        self.inner.list()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Component> {
        self.inner.find_by_id(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn by_ship(&self, ship_id: Uuid) -> Vec<Component> {
        self.list()
            .into_iter()
            .filter(|c| c.ship_id == ship_id)
            .collect()
    }

    pub fn add(&self, actor: Role, input: CreateComponentInput) -> Result<Component, StoreError> {
        self.inner.guard(actor)?;
        validate_name(&input.name)?;
        validate_serial(&input.serial_number)?;
        self.require_ship(input.ship_id)?;

        let now = Utc::now();
        self.inner.insert(Component {
            id: Uuid::new_v4(),
            ship_id: input.ship_id,
            name: input.name,
            serial_number: input.serial_number,
            install_date: input.install_date,
            last_maintenance_date: input.last_maintenance_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(
        &self,
        actor: Role,
        id: Uuid,
        patch: UpdateComponentInput,
    ) -> Result<Component, StoreError> {
        self.inner.guard(actor)?;
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(serial) = &patch.serial_number {
            validate_serial(serial)?;
        }
        if let Some(ship_id) = patch.ship_id {
            self.require_ship(ship_id)?;
        }

        self.inner.modify("component", id, |component| {
            if let Some(ship_id) = patch.ship_id {
                component.ship_id = ship_id;
            }
            if let Some(name) = patch.name {
                component.name = name;
            }
            if let Some(serial) = patch.serial_number {
                component.serial_number = serial;
            }
            if let Some(date) = patch.install_date {
                component.install_date = date;
            }
            if let Some(date) = patch.last_maintenance_date {
                component.last_maintenance_date = date;
            }
        })
    }

    pub fn remove(&self, actor: Role, id: Uuid) -> Result<(), StoreError> {
        self.inner.guard(actor)?;
        self.inner.remove_by_id(id)
    }

    fn require_ship(&self, ship_id: Uuid) -> Result<(), StoreError> {
        if self.ships.find_by_id(ship_id).is_none() {
            return Err(StoreError::Referential(format!(
                "ship {} does not exist",
                ship_id
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().len() < 2 {
        return Err(StoreError::Validation(
            "component name must be at least 2 characters".into(),
        ));
    }
    Ok(())
}

/// Serial numbers: uppercase letters, digits, and hyphens, e.g. `ME-1234`.
fn validate_serial(serial: &str) -> Result<(), StoreError> {
    let well_formed = !serial.is_empty()
        && serial
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-');
    if well_formed {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "serial_number may only contain uppercase letters, digits, and hyphens, got {:?}",
            serial
        )))
    }
}
