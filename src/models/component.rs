use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical system installed on a ship, subject to periodic maintenance.
///
/// Every component belongs to exactly one ship; the referenced ship must
/// exist when the component is created or re-homed. Install and maintenance
/// dates are calendar dates; time of day carries no meaning for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub ship_id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub install_date: NaiveDate,
    /// Date maintenance was last performed. Drives the overdue-component view.
    pub last_maintenance_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for installing a new component on a ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponentInput {
    pub ship_id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub install_date: NaiveDate,
    pub last_maintenance_date: NaiveDate,
}

/// Input for updating an existing component. All fields are optional for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComponentInput {
    /// Move the component to a different ship.
    pub ship_id: Option<Uuid>,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub last_maintenance_date: Option<NaiveDate>,
}
