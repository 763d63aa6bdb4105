use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vessel record, root of the component/job hierarchy.
///
/// Ships are identified operationally by their IMO number, a seven-digit
/// registration that stays with the hull for its lifetime. Deleting a ship
/// does **not** cascade to its components or jobs; dependents become
/// orphans that relationship queries silently skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: Uuid,
    pub name: String,
    /// Seven-digit IMO registration number.
    pub imo_number: String,
    /// Flag state the vessel is registered under.
    pub flag: String,
    pub status: ShipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The operational status of a ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipStatus {
    Active,
    UnderMaintenance,
    Inactive,
}

impl ShipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::UnderMaintenance => "under_maintenance",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "under_maintenance" => Some(Self::UnderMaintenance),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Input for registering a new ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShipInput {
    pub name: String,
    pub imo_number: String,
    pub flag: String,
    /// Initial status. Defaults to `Active` if not specified.
    pub status: Option<ShipStatus>,
}

/// Input for updating an existing ship. All fields are optional for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShipInput {
    pub name: Option<String>,
    pub imo_number: Option<String>,
    pub flag: Option<String>,
    pub status: Option<ShipStatus>,
}
