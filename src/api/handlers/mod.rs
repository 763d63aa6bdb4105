use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::analytics;
use crate::error::StoreError;
use crate::fleet::Fleet;
use crate::models::*;
use crate::notify::{self, Alert};

// ============================================================
// Actor role
// ============================================================

/// The acting role, read from the `x-role` header.
///
/// There is no session handling here; authentication lives outside this
/// system, and the store only needs a role value to gate writes. A missing
/// header means read-only [`Role::Viewer`]; an unrecognized value is a
/// client error rather than a silent downgrade.
pub struct ActorRole(pub Role);

impl<S> FromRequestParts<S> for ActorRole
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get("x-role") {
            None => Ok(Self(Role::Viewer)),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(Role::from_str)
                .map(Self)
                .ok_or_else(|| {
                    (
                        StatusCode::BAD_REQUEST,
                        "x-role must be one of admin, engineer, inspector, viewer".to_string(),
                    )
                }),
        }
    }
}

// ============================================================
// Error Handling
// ============================================================

/// Map a store error onto a status code and client-safe message.
///
/// Persistence failures are logged server-side and sanitized; everything
/// else is a client-addressable condition and passes through verbatim.
fn error_response(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Referential(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Permission { .. } => StatusCode::FORBIDDEN,
        StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("persistence error: {}", e);
        (status, "Internal server error".to_string())
    } else {
        tracing::warn!("rejected request: {}", e);
        (status, e.to_string())
    }
}

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found", what))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Auth
// ============================================================

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(fleet): State<Fleet>,
    Json(input): Json<LoginInput>,
) -> Result<Json<UserSummary>, (StatusCode, String)> {
    fleet
        .users
        .authenticate(&input.email, &input.password)
        .map(|user| Json(user.into()))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ))
}

// ============================================================
// Users
// ============================================================

pub async fn list_users(State(fleet): State<Fleet>) -> Json<Vec<UserSummary>> {
    Json(fleet.users.summaries())
}

pub async fn get_user(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, (StatusCode, String)> {
    fleet
        .users
        .find_by_id(id)
        .map(|user| Json(user.into()))
        .ok_or_else(|| not_found("User"))
}

pub async fn create_user(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<UserSummary>), (StatusCode, String)> {
    fleet
        .users
        .add(actor, input)
        .map(|user| (StatusCode::CREATED, Json(user.into())))
        .map_err(error_response)
}

pub async fn update_user(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<UserSummary>, (StatusCode, String)> {
    fleet
        .users
        .update(actor, id, input)
        .map(|user| Json(user.into()))
        .map_err(error_response)
}

pub async fn delete_user(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    fleet
        .users
        .remove(actor, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

// ============================================================
// Ships
// ============================================================

pub async fn list_ships(State(fleet): State<Fleet>) -> Json<Vec<Ship>> {
    Json(fleet.ships.list())
}

pub async fn get_ship(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ship>, (StatusCode, String)> {
    fleet.ships.find_by_id(id).map(Json).ok_or_else(|| not_found("Ship"))
}

pub async fn create_ship(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Json(input): Json<CreateShipInput>,
) -> Result<(StatusCode, Json<Ship>), (StatusCode, String)> {
    fleet
        .ships
        .add(actor, input)
        .map(|ship| (StatusCode::CREATED, Json(ship)))
        .map_err(error_response)
}

pub async fn update_ship(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateShipInput>,
) -> Result<Json<Ship>, (StatusCode, String)> {
    fleet.ships.update(actor, id, input).map(Json).map_err(error_response)
}

pub async fn delete_ship(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    fleet
        .ships
        .remove(actor, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

pub async fn list_ship_components(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Json<Vec<Component>> {
    Json(fleet.components.by_ship(id))
}

pub async fn list_ship_jobs(State(fleet): State<Fleet>, Path(id): Path<Uuid>) -> Json<Vec<Job>> {
    Json(fleet.jobs.by_ship(id))
}

// ============================================================
// Components
// ============================================================

pub async fn list_components(State(fleet): State<Fleet>) -> Json<Vec<Component>> {
    Json(fleet.components.list())
}

pub async fn get_component(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Result<Json<Component>, (StatusCode, String)> {
    fleet
        .components
        .find_by_id(id)
        .map(Json)
        .ok_or_else(|| not_found("Component"))
}

pub async fn create_component(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Json(input): Json<CreateComponentInput>,
) -> Result<(StatusCode, Json<Component>), (StatusCode, String)> {
    fleet
        .components
        .add(actor, input)
        .map(|component| (StatusCode::CREATED, Json(component)))
        .map_err(error_response)
}

pub async fn update_component(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateComponentInput>,
) -> Result<Json<Component>, (StatusCode, String)> {
    fleet
        .components
        .update(actor, id, input)
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_component(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    fleet
        .components
        .remove(actor, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

pub async fn list_component_jobs(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Json<Vec<Job>> {
    Json(fleet.jobs.by_component(id))
}

// ============================================================
// Jobs
// ============================================================

/// Optional filters for the job list. Filters compose by intersection.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
    pub priority: Option<JobPriority>,
    pub engineer_id: Option<Uuid>,
    /// Calendar-day match on the scheduled date, e.g. `2026-08-07`.
    pub scheduled: Option<NaiveDate>,
}

pub async fn list_jobs(
    State(fleet): State<Fleet>,
    Query(query): Query<ListJobsQuery>,
) -> Json<Vec<Job>> {
    let mut jobs = fleet.jobs.list();
    if let Some(status) = query.status {
        jobs.retain(|j| j.status == status);
    }
    if let Some(priority) = query.priority {
        jobs.retain(|j| j.priority == priority);
    }
    if let Some(engineer_id) = query.engineer_id {
        jobs.retain(|j| j.assigned_engineer_id == Some(engineer_id));
    }
    if let Some(date) = query.scheduled {
        jobs.retain(|j| j.scheduled_date.date_naive() == date);
    }
    Json(jobs)
}

pub async fn get_job(
    State(fleet): State<Fleet>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, (StatusCode, String)> {
    fleet.jobs.find_by_id(id).map(Json).ok_or_else(|| not_found("Job"))
}

pub async fn create_job(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Json(input): Json<CreateJobInput>,
) -> Result<(StatusCode, Json<Job>), (StatusCode, String)> {
    fleet
        .jobs
        .add(actor, input)
        .map(|job| (StatusCode::CREATED, Json(job)))
        .map_err(error_response)
}

pub async fn update_job(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateJobInput>,
) -> Result<Json<Job>, (StatusCode, String)> {
    fleet.jobs.update(actor, id, input).map(Json).map_err(error_response)
}

#[derive(Debug, Deserialize)]
pub struct SetJobStatusInput {
    pub status: JobStatus,
}

pub async fn set_job_status(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
    Json(input): Json<SetJobStatusInput>,
) -> Result<Json<Job>, (StatusCode, String)> {
    fleet
        .jobs
        .set_status(actor, id, input.status)
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_job(
    State(fleet): State<Fleet>,
    ActorRole(actor): ActorRole,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    fleet
        .jobs
        .remove(actor, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

// ============================================================
// Derived views
// ============================================================

pub async fn list_notifications(State(fleet): State<Fleet>) -> Json<Vec<Alert>> {
    let alerts = notify::derive_alerts(
        &fleet.jobs.list(),
        &fleet.ships.list(),
        &fleet.components.list(),
        Utc::now(),
    );
    Json(alerts)
}

pub async fn dashboard_kpis(State(fleet): State<Fleet>) -> Json<analytics::KpiCounts> {
    Json(analytics::kpi_counts(
        &fleet.users.list(),
        &fleet.ships.list(),
        &fleet.components.list(),
        &fleet.jobs.list(),
    ))
}

pub async fn dashboard_jobs_by_status(
    State(fleet): State<Fleet>,
) -> Json<analytics::JobStatusBreakdown> {
    Json(analytics::jobs_by_status(&fleet.jobs.list()))
}

#[derive(Debug, Deserialize)]
pub struct OverdueComponentsQuery {
    pub threshold_days: Option<i64>,
}

pub async fn dashboard_overdue_components(
    State(fleet): State<Fleet>,
    Query(query): Query<OverdueComponentsQuery>,
) -> Json<Vec<Component>> {
    let threshold = query
        .threshold_days
        .unwrap_or(analytics::DEFAULT_OVERDUE_THRESHOLD_DAYS);
    Json(analytics::overdue_components(
        &fleet.components.list(),
        Utc::now(),
        threshold,
    ))
}

#[derive(Debug, Deserialize)]
pub struct MaintenanceTrendQuery {
    pub months: Option<u32>,
}

pub async fn dashboard_maintenance_trend(
    State(fleet): State<Fleet>,
    Query(query): Query<MaintenanceTrendQuery>,
) -> Json<Vec<analytics::TrendPoint>> {
    let months = query.months.unwrap_or(analytics::DEFAULT_TREND_MONTHS);
    Json(analytics::maintenance_trend(
        &fleet.jobs.list(),
        Utc::now(),
        months,
    ))
}
