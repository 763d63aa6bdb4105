use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{CreateJobInput, Job, JobPriority, JobStatus, Role, UpdateJobInput};
use crate::policy::ResourceKind;
use crate::store::SharedBlobStore;

use super::{ComponentRepository, Entity, Repository, ShipRepository, UserRepository};

impl Entity for Job {
    const RESOURCE: ResourceKind = ResourceKind::Jobs;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: chrono::DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Typed access to the job collection.
///
/// Writes verify the ship and component exist and agree with each other
/// (the component must be installed on the job's ship). The assigned
/// engineer is advisory only: a dangling id is logged and accepted.
#[derive(Clone)]
pub struct JobRepository {
    inner: Repository<Job>,
    ships: ShipRepository,
    components: ComponentRepository,
    users: UserRepository,
}

impl JobRepository {
    pub fn load(
        store: SharedBlobStore,
        ships: ShipRepository,
        components: ComponentRepository,
        users: UserRepository,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Repository::load(store)?,
            ships,
            components,
            users,
        })
    }

    pub fn list(&self) -> Vec<Job> {
        self.inner.list()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Job> {
        self.inner.find_by_id(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn by_ship(&self, ship_id: Uuid) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.ship_id == ship_id)
            .collect()
    }

    pub fn by_component(&self, component_id: Uuid) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.component_id == component_id)
            .collect()
    }

    pub fn by_status(&self, status: JobStatus) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.status == status)
            .collect()
    }

    pub fn by_priority(&self, priority: JobPriority) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.priority == priority)
            .collect()
    }

    pub fn by_engineer(&self, engineer_id: Uuid) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.assigned_engineer_id == Some(engineer_id))
            .collect()
    }

    /// Jobs scheduled on the given calendar day, independent of time of day.
    pub fn by_scheduled_date(&self, date: NaiveDate) -> Vec<Job> {
        self.list()
            .into_iter()
            .filter(|j| j.scheduled_date.date_naive() == date)
            .collect()
    }

    pub fn add(&self, actor: Role, input: CreateJobInput) -> Result<Job, StoreError> {
        self.inner.guard(actor)?;
        validate_type(&input.job_type)?;
        self.require_refs(input.ship_id, input.component_id)?;
        self.note_engineer(input.assigned_engineer_id);

        let now = Utc::now();
        self.inner.insert(Job {
            id: Uuid::new_v4(),
            ship_id: input.ship_id,
            component_id: input.component_id,
            job_type: input.job_type,
            priority: input.priority,
            status: input.status.unwrap_or(JobStatus::Open),
            assigned_engineer_id: input.assigned_engineer_id,
            scheduled_date: input.scheduled_date,
            description: input.description,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&self, actor: Role, id: Uuid, patch: UpdateJobInput) -> Result<Job, StoreError> {
        self.inner.guard(actor)?;
        if let Some(job_type) = &patch.job_type {
            validate_type(job_type)?;
        }

        // Referential checks run against the record as it will be after the
        // patch, so re-homing either foreign key keeps the pair consistent.
        if patch.ship_id.is_some() || patch.component_id.is_some() {
            let existing = self
                .inner
                .find_by_id(id)
                .ok_or(StoreError::not_found("job", id))?;
            let ship_id = patch.ship_id.unwrap_or(existing.ship_id);
            let component_id = patch.component_id.unwrap_or(existing.component_id);
            self.require_refs(ship_id, component_id)?;
        }
        if patch.assigned_engineer_id.is_some() {
            self.note_engineer(patch.assigned_engineer_id);
        }

        self.inner.modify("job", id, |job| {
            if let Some(ship_id) = patch.ship_id {
                job.ship_id = ship_id;
            }
            if let Some(component_id) = patch.component_id {
                job.component_id = component_id;
            }
            if let Some(job_type) = patch.job_type {
                job.job_type = job_type;
            }
            if let Some(priority) = patch.priority {
                job.priority = priority;
            }
            if let Some(status) = patch.status {
                job.status = status;
            }
            if let Some(engineer) = patch.assigned_engineer_id {
                job.assigned_engineer_id = Some(engineer);
            }
            if let Some(date) = patch.scheduled_date {
                job.scheduled_date = date;
            }
            if let Some(description) = patch.description {
                job.description = Some(description);
            }
        })
    }

    /// `update` restricted to the status field.
    pub fn set_status(&self, actor: Role, id: Uuid, status: JobStatus) -> Result<Job, StoreError> {
        self.inner.guard(actor)?;
        self.inner.modify("job", id, |job| job.status = status)
    }

    pub fn remove(&self, actor: Role, id: Uuid) -> Result<(), StoreError> {
        self.inner.guard(actor)?;
        self.inner.remove_by_id(id)
    }

    fn require_refs(&self, ship_id: Uuid, component_id: Uuid) -> Result<(), StoreError> {
        if self.ships.find_by_id(ship_id).is_none() {
            return Err(StoreError::Referential(format!(
                "ship {} does not exist",
                ship_id
            )));
        }
        let component = self.components.find_by_id(component_id).ok_or_else(|| {
            StoreError::Referential(format!("component {} does not exist", component_id))
        })?;
        if component.ship_id != ship_id {
            return Err(StoreError::Referential(format!(
                "component {} is installed on ship {}, not ship {}",
                component_id, component.ship_id, ship_id
            )));
        }
        Ok(())
    }

    fn note_engineer(&self, engineer_id: Option<Uuid>) {
        if let Some(engineer_id) = engineer_id {
            if self.users.find_by_id(engineer_id).is_none() {
                tracing::warn!("job assigned to unknown engineer {}", engineer_id);
            }
        }
    }
}

fn validate_type(job_type: &str) -> Result<(), StoreError> {
    if job_type.trim().is_empty() {
        return Err(StoreError::Validation("job type must not be empty".into()));
    }
    Ok(())
}
