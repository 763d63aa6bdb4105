//! Aggregate dashboard views.
//!
//! Like the alert engine, everything here is a pure function over snapshots
//! of the collections: no caching, no persistence, recomputed on demand.

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Component, Job, JobStatus, Ship, User};

/// Components go "maintenance overdue" this many days after their last
/// recorded maintenance, unless the caller asks for a different threshold.
pub const DEFAULT_OVERDUE_THRESHOLD_DAYS: i64 = 30;

/// Months covered by the default maintenance trend.
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiCounts {
    pub ship_count: usize,
    pub job_count: usize,
    pub component_count: usize,
    pub user_count: usize,
}

/// Job counts per status, zero-filled for statuses with no jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusBreakdown {
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl JobStatusBreakdown {
    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.completed
    }
}

/// One month of the maintenance trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month label, e.g. `"Mar"`. Deliberately carries no year: jobs are
    /// bucketed by month name alone, so a January two years back lands in
    /// the same bucket as last January. Preserved source behavior.
    pub month: String,
    pub completed: usize,
    pub in_progress: usize,
    pub open: usize,
}

pub fn kpi_counts(users: &[User], ships: &[Ship], components: &[Component], jobs: &[Job]) -> KpiCounts {
    KpiCounts {
        ship_count: ships.len(),
        job_count: jobs.len(),
        component_count: components.len(),
        user_count: users.len(),
    }
}

pub fn jobs_by_status(jobs: &[Job]) -> JobStatusBreakdown {
    let mut breakdown = JobStatusBreakdown {
        open: 0,
        in_progress: 0,
        completed: 0,
    };
    for job in jobs {
        match job.status {
            JobStatus::Open => breakdown.open += 1,
            JobStatus::InProgress => breakdown.in_progress += 1,
            JobStatus::Completed => breakdown.completed += 1,
        }
    }
    breakdown
}

/// Components whose last maintenance lies more than `threshold_days` before
/// `now`.
pub fn overdue_components(
    components: &[Component],
    now: DateTime<Utc>,
    threshold_days: i64,
) -> Vec<Component> {
    let today = now.date_naive();
    components
        .iter()
        .filter(|c| (today - c.last_maintenance_date).num_days() > threshold_days)
        .cloned()
        .collect()
}

/// Job counts per status for each of the trailing `months_back` calendar
/// months, oldest first and inclusive of the current month.
pub fn maintenance_trend(jobs: &[Job], now: DateTime<Utc>, months_back: u32) -> Vec<TrendPoint> {
    let mut trend = Vec::with_capacity(months_back as usize);
    for offset in (0..months_back).rev() {
        let Some(month_start) = now.checked_sub_months(Months::new(offset)) else {
            continue;
        };
        let label = month_name(month_start.month());

        let mut point = TrendPoint {
            month: label.to_string(),
            completed: 0,
            in_progress: 0,
            open: 0,
        };
        for job in jobs {
            if month_name(job.scheduled_date.month()) != label {
                continue;
            }
            match job.status {
                JobStatus::Completed => point.completed += 1,
                JobStatus::InProgress => point.in_progress += 1,
                JobStatus::Open => point.open += 1,
            }
        }
        trend.push(point);
    }
    trend
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_labels_cover_trailing_months_oldest_first() {
        let now = DateTime::parse_from_rfc3339("2026-08-07T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let trend = maintenance_trend(&[], now, 6);
        let labels: Vec<_> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(labels, vec!["Mar", "Apr", "May", "Jun", "Jul", "Aug"]);
    }

    #[test]
    fn trend_crossing_a_year_boundary_keeps_month_order() {
        let now = DateTime::parse_from_rfc3339("2026-02-15T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let trend = maintenance_trend(&[], now, 6);
        let labels: Vec<_> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(labels, vec!["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
    }
}
