use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use drydock::api::create_router;
use drydock::fleet::Fleet;
use drydock::models::*;
use serde_json::Value;

fn setup() -> TestServer {
    let fleet = Fleet::open_memory().expect("Failed to open fleet");
    let app = create_router(fleet);
    TestServer::new(app).expect("Failed to create test server")
}

fn as_role(role: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-role"),
        HeaderValue::from_static(role),
    )
}

async fn create_test_ship(server: &TestServer) -> Ship {
    let (name, value) = as_role("engineer");
    server
        .post("/api/v1/ships")
        .add_header(name, value)
        .json(&CreateShipInput {
            name: "Ever Given".to_string(),
            imo_number: "9811000".to_string(),
            flag: "Panama".to_string(),
            status: Some(ShipStatus::Active),
        })
        .await
        .json::<Ship>()
}

async fn create_test_component(server: &TestServer, ship: &Ship, last_maintenance: NaiveDate) -> Component {
    let (name, value) = as_role("engineer");
    server
        .post("/api/v1/components")
        .add_header(name, value)
        .json(&CreateComponentInput {
            ship_id: ship.id,
            name: "Main Engine".to_string(),
            serial_number: "ME-1234".to_string(),
            install_date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
            last_maintenance_date: last_maintenance,
        })
        .await
        .json::<Component>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
    }
}

mod ships {
    use super::*;

    #[tokio::test]
    async fn engineer_creates_a_ship() {
        let server = setup();
        let ship = create_test_ship(&server).await;

        assert_eq!(ship.name, "Ever Given");
        assert_eq!(ship.imo_number, "9811000");

        let response = server.get(&format!("/api/v1/ships/{}", ship.id)).await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn viewer_cannot_create_a_ship() {
        let server = setup();
        let response = server
            .post("/api/v1/ships")
            .json(&CreateShipInput {
                name: "Ever Given".to_string(),
                imo_number: "9811000".to_string(),
                flag: "Panama".to_string(),
                status: None,
            })
            .await;

        // No x-role header means read-only viewer.
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_imo_is_a_client_error() {
        let server = setup();
        let (name, value) = as_role("engineer");
        let response = server
            .post("/api/v1/ships")
            .add_header(name, value)
            .json(&CreateShipInput {
                name: "Ever Given".to_string(),
                imo_number: "IMO9811000".to_string(),
                flag: "Panama".to_string(),
                status: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_role_header_is_rejected() {
        let server = setup();
        let response = server
            .post("/api/v1/ships")
            .add_header(
                HeaderName::from_static("x-role"),
                HeaderValue::from_static("captain"),
            )
            .json(&CreateShipInput {
                name: "Ever Given".to_string(),
                imo_number: "9811000".to_string(),
                flag: "Panama".to_string(),
                status: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_ship_is_404() {
        let server = setup();
        let response = server
            .get(&format!("/api/v1/ships/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_patches_and_delete_removes() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let (name, value) = as_role("admin");

        let updated = server
            .put(&format!("/api/v1/ships/{}", ship.id))
            .add_header(name.clone(), value.clone())
            .json(&UpdateShipInput {
                name: None,
                imo_number: None,
                flag: None,
                status: Some(ShipStatus::Inactive),
            })
            .await
            .json::<Ship>();
        assert_eq!(updated.status, ShipStatus::Inactive);
        assert_eq!(updated.name, "Ever Given");

        let response = server
            .delete(&format!("/api/v1/ships/{}", ship.id))
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.get(&format!("/api/v1/ships/{}", ship.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod components {
    use super::*;

    #[tokio::test]
    async fn dangling_ship_reference_is_unprocessable() {
        let server = setup();
        let (name, value) = as_role("engineer");
        let response = server
            .post("/api/v1/components")
            .add_header(name, value)
            .json(&CreateComponentInput {
                ship_id: uuid::Uuid::new_v4(),
                name: "Main Engine".to_string(),
                serial_number: "ME-1234".to_string(),
                install_date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
                last_maintenance_date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            })
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn listed_under_their_ship() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(10))
                .await;

        let listed = server
            .get(&format!("/api/v1/ships/{}/components", ship.id))
            .await
            .json::<Vec<Component>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, component.id);
    }
}

mod jobs {
    use super::*;

    async fn create_test_job(server: &TestServer, ship: &Ship, component: &Component) -> Job {
        let (name, value) = as_role("engineer");
        server
            .post("/api/v1/jobs")
            .add_header(name, value)
            .json(&CreateJobInput {
                ship_id: ship.id,
                component_id: component.id,
                job_type: "Inspection".to_string(),
                priority: JobPriority::High,
                status: None,
                assigned_engineer_id: None,
                scheduled_date: Utc::now() + Duration::days(3),
                description: None,
            })
            .await
            .json::<Job>()
    }

    #[tokio::test]
    async fn create_defaults_to_open_and_filters_by_status() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(10))
                .await;
        let job = create_test_job(&server, &ship, &component).await;
        assert_eq!(job.status, JobStatus::Open);

        let open = server
            .get("/api/v1/jobs?status=open")
            .await
            .json::<Vec<Job>>();
        assert_eq!(open.len(), 1);

        let completed = server
            .get("/api/v1/jobs?status=completed")
            .await
            .json::<Vec<Job>>();
        assert!(completed.is_empty());
    }

    #[tokio::test]
    async fn status_endpoint_flips_only_the_status() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(10))
                .await;
        let job = create_test_job(&server, &ship, &component).await;

        let (name, value) = as_role("engineer");
        let updated = server
            .put(&format!("/api/v1/jobs/{}/status", job.id))
            .add_header(name, value)
            .json(&serde_json::json!({ "status": "in_progress" }))
            .await
            .json::<Job>();

        assert_eq!(updated.status, JobStatus::InProgress);
        assert_eq!(updated.priority, job.priority);
    }

    #[tokio::test]
    async fn mismatched_ship_and_component_is_unprocessable() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(10))
                .await;

        let (name, value) = as_role("engineer");
        let other_ship = server
            .post("/api/v1/ships")
            .add_header(name.clone(), value.clone())
            .json(&CreateShipInput {
                name: "Maersk Alabama".to_string(),
                imo_number: "9164263".to_string(),
                flag: "USA".to_string(),
                status: None,
            })
            .await
            .json::<Ship>();

        let response = server
            .post("/api/v1/jobs")
            .add_header(name, value)
            .json(&CreateJobInput {
                ship_id: other_ship.id,
                component_id: component.id,
                job_type: "Inspection".to_string(),
                priority: JobPriority::High,
                status: None,
                assigned_engineer_id: None,
                scheduled_date: Utc::now() + Duration::days(3),
                description: None,
            })
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn seeded_admin_logs_in() {
        let server = setup();
        let user = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "email": "admin@fleet.local",
                "password": "admin123",
            }))
            .await
            .json::<UserSummary>();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let server = setup();
        let response = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "email": "admin@fleet.local",
                "password": "nope",
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_listing_never_exposes_password_hashes() {
        let server = setup();
        let users = server.get("/api/v1/users").await.json::<Value>();

        let users = users.as_array().expect("expected a user array");
        assert_eq!(users.len(), 4);
        for user in users {
            assert!(user.get("password_hash").is_none());
            assert!(user.get("email").is_some());
        }
    }

    #[tokio::test]
    async fn only_admin_creates_users() {
        let server = setup();
        let (name, value) = as_role("engineer");
        let response = server
            .post("/api/v1/users")
            .add_header(name, value)
            .json(&CreateUserInput {
                email: "new@fleet.local".to_string(),
                password: "secret99".to_string(),
                name: "New User".to_string(),
                role: Role::Viewer,
            })
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

mod derived_views {
    use super::*;
    use drydock::analytics::{JobStatusBreakdown, KpiCounts, TrendPoint};
    use drydock::notify::Alert;

    #[tokio::test]
    async fn overdue_job_surfaces_as_a_notification() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(40))
                .await;

        let (name, value) = as_role("engineer");
        server
            .post("/api/v1/jobs")
            .add_header(name, value)
            .json(&CreateJobInput {
                ship_id: ship.id,
                component_id: component.id,
                job_type: "Inspection".to_string(),
                priority: JobPriority::Medium,
                status: Some(JobStatus::Open),
                assigned_engineer_id: None,
                scheduled_date: Utc::now() - Duration::days(2),
                description: None,
            })
            .await;

        let alerts = server.get("/api/v1/notifications").await.json::<Vec<Alert>>();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].priority, JobPriority::High);
        assert_eq!(alerts[0].ship.as_deref(), Some("Ever Given"));
        assert_eq!(alerts[0].component.as_deref(), Some("Main Engine"));
    }

    #[tokio::test]
    async fn dashboard_reports_counts_and_overdue_components() {
        let server = setup();
        let ship = create_test_ship(&server).await;
        let component =
            create_test_component(&server, &ship, Utc::now().date_naive() - Duration::days(40))
                .await;

        let kpis = server.get("/api/v1/dashboard/kpis").await.json::<KpiCounts>();
        assert_eq!(kpis.ship_count, 1);
        assert_eq!(kpis.component_count, 1);
        assert_eq!(kpis.job_count, 0);
        assert_eq!(kpis.user_count, 4);

        let breakdown = server
            .get("/api/v1/dashboard/jobs-by-status")
            .await
            .json::<JobStatusBreakdown>();
        assert_eq!(breakdown.total(), 0);

        let overdue = server
            .get("/api/v1/dashboard/overdue-components")
            .await
            .json::<Vec<Component>>();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, component.id);

        let none_overdue = server
            .get("/api/v1/dashboard/overdue-components?threshold_days=60")
            .await
            .json::<Vec<Component>>();
        assert!(none_overdue.is_empty());
    }

    #[tokio::test]
    async fn maintenance_trend_spans_the_requested_months() {
        let server = setup();
        let trend = server
            .get("/api/v1/dashboard/maintenance-trend?months=3")
            .await
            .json::<Vec<TrendPoint>>();
        assert_eq!(trend.len(), 3);
    }
}
