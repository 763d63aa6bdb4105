use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::error::StoreError;
use crate::models::{CreateComponentInput, CreateJobInput, CreateShipInput, JobPriority, Role, ShipStatus};
use crate::repo::{ComponentRepository, JobRepository, ShipRepository, UserRepository};
use crate::store::{MemoryBlobStore, SharedBlobStore, SqliteBlobStore};

/// The full entity store: one repository per collection over a shared blob
/// store. This is the composition root: consumers receive `Fleet` (or the
/// individual repositories) explicitly, never through ambient global state.
#[derive(Clone)]
pub struct Fleet {
    pub users: UserRepository,
    pub ships: ShipRepository,
    pub components: ComponentRepository,
    pub jobs: JobRepository,
}

impl Fleet {
    pub fn open(store: SharedBlobStore) -> Result<Self, StoreError> {
        let users = UserRepository::load(store.clone())?;
        let ships = ShipRepository::load(store.clone())?;
        let components = ComponentRepository::load(store.clone(), ships.clone())?;
        let jobs = JobRepository::load(store, ships.clone(), components.clone(), users.clone())?;
        Ok(Self {
            users,
            ships,
            components,
            jobs,
        })
    }

    /// Open against the SQLite blob store at the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Arc::new(SqliteBlobStore::open_default()?))
    }

    /// Open against a throwaway in-memory store.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::open(Arc::new(MemoryBlobStore::new()))
    }

    /// Insert the demo fleet (two ships, two components, one open inspection
    /// job) unless ships already exist. Returns whether anything was seeded.
    pub fn seed_demo(&self) -> Result<bool, StoreError> {
        if self.ships.count() > 0 {
            return Ok(false);
        }

        let ever_given = self.ships.add(
            Role::Admin,
            CreateShipInput {
                name: "Ever Given".into(),
                imo_number: "9811000".into(),
                flag: "Panama".into(),
                status: Some(ShipStatus::Active),
            },
        )?;
        let maersk_alabama = self.ships.add(
            Role::Admin,
            CreateShipInput {
                name: "Maersk Alabama".into(),
                imo_number: "9164263".into(),
                flag: "USA".into(),
                status: Some(ShipStatus::UnderMaintenance),
            },
        )?;

        let today = Utc::now().date_naive();
        let main_engine = self.components.add(
            Role::Admin,
            CreateComponentInput {
                ship_id: ever_given.id,
                name: "Main Engine".into(),
                serial_number: "ME-1234".into(),
                install_date: date_or_today(2020, 1, 10, today),
                last_maintenance_date: today - Duration::days(45),
            },
        )?;
        self.components.add(
            Role::Admin,
            CreateComponentInput {
                ship_id: maersk_alabama.id,
                name: "Radar".into(),
                serial_number: "RAD-5678".into(),
                install_date: date_or_today(2021, 7, 18, today),
                last_maintenance_date: today - Duration::days(10),
            },
        )?;

        let engineer = self
            .users
            .find_by_email("engineer@fleet.local")
            .map(|u| u.id);
        self.jobs.add(
            Role::Admin,
            CreateJobInput {
                ship_id: ever_given.id,
                component_id: main_engine.id,
                job_type: "Inspection".into(),
                priority: JobPriority::High,
                status: None,
                assigned_engineer_id: engineer,
                scheduled_date: Utc::now() + Duration::days(5),
                description: Some("Routine engine inspection".into()),
            },
        )?;

        tracing::info!("seeded demo fleet");
        Ok(true)
    }
}

fn date_or_today(year: i32, month: u32, day: u32, today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
}
