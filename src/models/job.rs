use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled or completed maintenance task against one component.
///
/// Jobs carry both the component and its ship: the pair must be mutually
/// consistent (the referenced component is installed on the referenced ship),
/// which the job repository enforces at write time. The assigned engineer is
/// advisory: a dangling engineer id is accepted and logged, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub ship_id: Uuid,
    pub component_id: Uuid,
    /// Kind of work, e.g. "Inspection" or "Overhaul". Free-form.
    #[serde(rename = "type")]
    pub job_type: String,
    pub priority: JobPriority,
    pub status: JobStatus,
    pub assigned_engineer_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How urgent a job is. Ordering matters: alerts sort High before Medium
/// before Low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    High,
    Medium,
    Low,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Sort rank, High first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// The lifecycle state of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Input for scheduling a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobInput {
    pub ship_id: Uuid,
    pub component_id: Uuid,
    #[serde(rename = "type")]
    pub job_type: String,
    pub priority: JobPriority,
    /// Initial status. Defaults to `Open` if not specified.
    pub status: Option<JobStatus>,
    pub assigned_engineer_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Input for updating an existing job. All fields are optional for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobInput {
    pub ship_id: Option<Uuid>,
    pub component_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub priority: Option<JobPriority>,
    pub status: Option<JobStatus>,
    pub assigned_engineer_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}
