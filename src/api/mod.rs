mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::fleet::Fleet;

pub use handlers::ActorRole;

pub fn create_router(fleet: Fleet) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/login", post(handlers::login))
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users", post(handlers::create_user))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}", put(handlers::update_user))
        .route("/users/{id}", delete(handlers::delete_user))
        // Ships
        .route("/ships", get(handlers::list_ships))
        .route("/ships", post(handlers::create_ship))
        .route("/ships/{id}", get(handlers::get_ship))
        .route("/ships/{id}", put(handlers::update_ship))
        .route("/ships/{id}", delete(handlers::delete_ship))
        .route("/ships/{id}/components", get(handlers::list_ship_components))
        .route("/ships/{id}/jobs", get(handlers::list_ship_jobs))
        // Components
        .route("/components", get(handlers::list_components))
        .route("/components", post(handlers::create_component))
        .route("/components/{id}", get(handlers::get_component))
        .route("/components/{id}", put(handlers::update_component))
        .route("/components/{id}", delete(handlers::delete_component))
        .route("/components/{id}/jobs", get(handlers::list_component_jobs))
        // Jobs
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs", post(handlers::create_job))
        .route("/jobs/{id}", get(handlers::get_job))
        .route("/jobs/{id}", put(handlers::update_job))
        .route("/jobs/{id}", delete(handlers::delete_job))
        .route("/jobs/{id}/status", put(handlers::set_job_status))
        // Derived views
        .route("/notifications", get(handlers::list_notifications))
        .route("/dashboard/kpis", get(handlers::dashboard_kpis))
        .route("/dashboard/jobs-by-status", get(handlers::dashboard_jobs_by_status))
        .route("/dashboard/overdue-components", get(handlers::dashboard_overdue_components))
        .route("/dashboard/maintenance-trend", get(handlers::dashboard_maintenance_trend))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(fleet)
}
