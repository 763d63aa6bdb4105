//! Derived maintenance alerts.
//!
//! Alerts are never persisted: [`derive_alerts`] is a pure function of the
//! current collections and the current time, so every call recomputes the
//! same view from the same inputs. The two alert classes are **upcoming**
//! (a non-completed job due within the next seven days) and **overdue** (an
//! open job whose scheduled date has passed; always urgent, whatever the
//! job itself says).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Component, Job, JobPriority, JobStatus, Ship};

/// How many days ahead a job shows up as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Upcoming,
    Overdue,
}

/// One derived notification, presentation-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub job_id: Uuid,
    pub title: String,
    pub message: String,
    /// Linked names are best-effort: absent if the reference fails to resolve.
    pub ship: Option<String>,
    pub component: Option<String>,
    pub priority: JobPriority,
    /// Days until the scheduled date; only set on upcoming alerts.
    pub days_until: Option<i64>,
    /// Recency anchor used for ordering, taken from the job's `updated_at`.
    pub raised_at: DateTime<Utc>,
}

/// Derive the current alert list from the three collections.
///
/// Ordering: priority rank ascending (High first), then newest first.
pub fn derive_alerts(
    jobs: &[Job],
    ships: &[Ship],
    components: &[Component],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for job in jobs {
        if job.status == JobStatus::Completed {
            continue;
        }
        let days_until = days_until(job.scheduled_date, now);
        if days_until > 0 && days_until <= UPCOMING_WINDOW_DAYS {
            let ship = ship_name(ships, job.ship_id);
            alerts.push(Alert {
                kind: AlertKind::Upcoming,
                job_id: job.id,
                title: "Upcoming Maintenance".into(),
                message: format!(
                    "{} scheduled for {} in {} days",
                    job.job_type,
                    ship.as_deref().unwrap_or("Ship"),
                    days_until
                ),
                ship,
                component: component_name(components, job.component_id),
                priority: job.priority,
                days_until: Some(days_until),
                raised_at: job.updated_at,
            });
        }
    }

    for job in jobs {
        if job.status == JobStatus::Open && job.scheduled_date < now {
            let ship = ship_name(ships, job.ship_id);
            alerts.push(Alert {
                kind: AlertKind::Overdue,
                job_id: job.id,
                title: "Overdue Maintenance".into(),
                message: format!(
                    "{} for {} is overdue",
                    job.job_type,
                    ship.as_deref().unwrap_or("Ship")
                ),
                ship,
                component: component_name(components, job.component_id),
                // Overdue is always urgent.
                priority: JobPriority::High,
                days_until: None,
                raised_at: job.updated_at,
            });
        }
    }

    alerts.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(b.raised_at.cmp(&a.raised_at))
    });
    alerts
}

/// Whole days until `scheduled`, rounded up: a job due later today counts
/// as 0, tomorrow as 1.
fn days_until(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (scheduled - now).num_seconds() as f64;
    (seconds / 86_400.0).ceil() as i64
}

fn ship_name(ships: &[Ship], id: Uuid) -> Option<String> {
    ships.iter().find(|s| s.id == id).map(|s| s.name.clone())
}

fn component_name(components: &[Component], id: Uuid) -> Option<String> {
    components.iter().find(|c| c.id == id).map(|c| c.name.clone())
}
