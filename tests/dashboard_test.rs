use std::sync::Arc;

use siteboard::aggregate::{iso_date, today};
use siteboard::batch::{LoadState, Settlement};
use siteboard::client::ApiClient;
use siteboard::config::Config;
use siteboard::dashboards::driver::DriverDashboard;
use siteboard::dashboards::foreman::ForemanDashboard;
use siteboard::dashboards::guard::GuardDashboard;
use siteboard::dashboards::manager::ManagerDashboard;
use siteboard::dashboards::{self, Dashboard};
use siteboard::error::{Error, Locale};
use siteboard::permissions::PermissionSet;
use siteboard::records::Equipment;
use siteboard::roles::Role;
use siteboard::session::{Session, UserProfile};

const TOKEN: &str = "test-token";

fn client_for(server: &mockito::Server, role: Role) -> ApiClient {
    let config = Config {
        api_url: server.url(),
        ..Config::default()
    };
    let session = Session::new(
        TOKEN.to_string(),
        UserProfile {
            id: "u1".into(),
            username: "tester".into(),
            full_name: "Test User".into(),
            email: "tester@example.com".into(),
            role,
            company_id: None,
        },
        PermissionSet::for_role(role),
    );
    ApiClient::new(&config, &session).unwrap()
}

async fn json_mock(
    server: &mut mockito::Server,
    path: &str,
    body: &str,
) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn failing_mock(server: &mut mockito::Server, path: &str, detail: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"detail": "{}"}}"#, detail))
        .create_async()
        .await
}

#[tokio::test]
async fn test_foreman_best_effort_renders_remaining_sections() {
    let mut server = mockito::Server::new_async().await;
    let today = iso_date(today());

    let equipment = failing_mock(&mut server, "/api/equipment", "equipment store offline").await;
    let production = json_mock(
        &mut server,
        "/api/production",
        &format!(
            r#"[{{"id": "p1", "date": "{today}", "actual_qty": 40.0}},
                {{"id": "p2", "date": "2020-01-01", "actual_qty": 10.0}}]"#
        ),
    )
    .await;
    let attendance = json_mock(
        &mut server,
        "/api/attendance",
        &format!(
            r#"[{{"date": "{today}", "status": "present"}},
                {{"date": "{today}", "status": "present"}},
                {{"date": "{today}", "status": "absent"}}]"#
        ),
    )
    .await;

    let client = client_for(&server, Role::Foreman);
    let mut view =
        dashboards::mount(Arc::new(ForemanDashboard::default()), client, Locale::En).await;

    let state = view.settled().await;
    let summary = state.loaded().expect("best-effort view should load");

    assert!(summary.equipment.is_empty());
    assert_eq!(summary.active_equipment, 0);
    assert_eq!(summary.production_today_count(), 1);
    assert_eq!(summary.total_production, 50.0);
    assert_eq!(summary.attendance.rate_today, 67);
    assert_eq!(summary.unavailable, vec!["equipment"]);
    assert!(state.error().is_none());

    equipment.assert_async().await;
    production.assert_async().await;
    attendance.assert_async().await;
}

#[tokio::test]
async fn test_foreman_all_sections_failing_shows_banner() {
    let mut server = mockito::Server::new_async().await;
    let _m = failing_mock(&mut server, "/api/equipment", "down").await;
    let _m = server
        .mock("GET", "/api/production")
        .with_status(502)
        .create_async()
        .await;
    let _m = server
        .mock("GET", "/api/attendance")
        .with_status(502)
        .create_async()
        .await;

    let client = client_for(&server, Role::Foreman);
    let mut view =
        dashboards::mount(Arc::new(ForemanDashboard::default()), client, Locale::En).await;

    assert_eq!(view.settled().await, LoadState::Failed("down".to_string()));
}

#[tokio::test]
async fn test_driver_all_or_nothing_shows_only_banner() {
    let mut server = mockito::Server::new_async().await;
    let _m = json_mock(
        &mut server,
        "/api/employees/me",
        r#"{"full_name_ar": "سائق", "employee_number": "E-7", "base_salary": 4000}"#,
    )
    .await;
    let _m = json_mock(
        &mut server,
        "/api/salary-payments",
        r#"[{"month": 1, "year": 2025, "net_salary": 4000, "status": "paid"}]"#,
    )
    .await;
    let _m = failing_mock(&mut server, "/api/vehicles", "Vehicle registry unavailable").await;

    let client = client_for(&server, Role::Driver);
    let dashboard = Arc::new(DriverDashboard::default());
    assert_eq!(dashboard.settlement(), Settlement::AllOrNothing);

    let mut view = dashboards::mount(dashboard, client, Locale::En).await;
    let state = view.settled().await;

    assert!(state.loaded().is_none());
    assert_eq!(state.error(), Some("Vehicle registry unavailable"));
}

#[tokio::test]
async fn test_driver_without_detail_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/employees/me")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let _m = json_mock(&mut server, "/api/salary-payments", "[]").await;
    let _m = json_mock(&mut server, "/api/vehicles", "[]").await;

    let client = client_for(&server, Role::Driver);
    let mut view =
        dashboards::mount(Arc::new(DriverDashboard::default()), client, Locale::Ar).await;

    assert_eq!(view.settled().await.error(), Some("فشل تحميل بياناتك"));
}

#[tokio::test]
async fn test_driver_success() {
    let mut server = mockito::Server::new_async().await;
    let _m = json_mock(
        &mut server,
        "/api/employees/me",
        r#"{"full_name_ar": "سائق", "employee_number": "E-7", "base_salary": 4000, "currency": "SAR"}"#,
    )
    .await;
    let _m = json_mock(
        &mut server,
        "/api/salary-payments",
        r#"[{"month": 2, "year": 2025, "net_salary": 4100, "status": "pending"},
            {"month": 1, "year": 2025, "net_salary": 4000, "status": "paid"}]"#,
    )
    .await;
    let _m = json_mock(
        &mut server,
        "/api/vehicles",
        r#"[{"vehicle_number": "TR-12", "status": "active"}]"#,
    )
    .await;

    let client = client_for(&server, Role::Driver);
    let mut view =
        dashboards::mount(Arc::new(DriverDashboard::default()), client, Locale::En).await;
    let state = view.settled().await;
    let summary = state.loaded().unwrap();

    assert_eq!(summary.profile.as_ref().unwrap().employee_number, "E-7");
    assert_eq!(summary.total_paid, 4000.0);
    assert_eq!(summary.pending_payments, 1);
    assert_eq!(summary.vehicle.as_ref().unwrap().vehicle_number, "TR-12");
}

#[tokio::test]
async fn test_guard_without_profile_still_loads() {
    let mut server = mockito::Server::new_async().await;
    let _m = failing_mock(&mut server, "/api/employees/me", "Employee not found").await;
    let _m = json_mock(&mut server, "/api/attendance", r#"[{"date": "2020-01-01", "status": "present"}]"#)
        .await;

    let client = client_for(&server, Role::Guard);
    let mut view =
        dashboards::mount(Arc::new(GuardDashboard::default()), client, Locale::En).await;
    let state = view.settled().await;
    let summary = state.loaded().unwrap();

    assert!(summary.profile.is_none());
    assert_eq!(summary.records.len(), 1);
    assert_eq!(summary.attendance.rate_today, 0);
}

#[tokio::test]
async fn test_manager_guarded_fetches_do_not_fail_the_batch() {
    let mut server = mockito::Server::new_async().await;
    let _m = failing_mock(&mut server, "/api/projects", "no projects module").await;
    let _m = failing_mock(&mut server, "/api/employees", "no hr module").await;
    let _m = json_mock(&mut server, "/api/equipment", r#"[{"status": "active"}, {"status": "idle"}]"#).await;
    let _m = json_mock(&mut server, "/api/production", r#"[{"actual_qty": 12.5}]"#).await;

    let client = client_for(&server, Role::Manager);
    let mut view =
        dashboards::mount(Arc::new(ManagerDashboard::default()), client, Locale::En).await;
    let state = view.settled().await;
    let summary = state.loaded().unwrap();

    assert_eq!(summary.active_equipment, 1);
    assert_eq!(summary.equipment_total, 2);
    assert_eq!(summary.total_production, 12.5);
    assert_eq!(summary.unavailable, vec!["projects", "employees"]);
}

#[tokio::test]
async fn test_manager_required_fetch_fails_the_batch() {
    let mut server = mockito::Server::new_async().await;
    let _m = json_mock(&mut server, "/api/projects", "[]").await;
    let _m = json_mock(&mut server, "/api/employees", "[]").await;
    let _m = json_mock(&mut server, "/api/equipment", "[]").await;
    let _m = failing_mock(&mut server, "/api/production", "Production ledger locked").await;

    let client = client_for(&server, Role::Owner);
    let mut view =
        dashboards::mount(Arc::new(ManagerDashboard::default()), client, Locale::En).await;

    assert_eq!(view.settled().await.error(), Some("Production ledger locked"));
}

#[tokio::test]
async fn test_settlement_is_configurable_per_view() {
    let mut server = mockito::Server::new_async().await;
    let _m = json_mock(&mut server, "/api/employees/me", "{}").await;
    let _m = json_mock(&mut server, "/api/salary-payments", "[]").await;
    let _m = failing_mock(&mut server, "/api/vehicles", "down").await;

    let client = client_for(&server, Role::Driver);
    let dashboard = Arc::new(DriverDashboard::with_settlement(Settlement::BestEffort));
    let mut view = dashboards::mount(dashboard, client, Locale::En).await;
    let state = view.settled().await;
    let summary = state.loaded().unwrap();

    assert!(summary.vehicle.is_none());
    assert_eq!(summary.unavailable, vec!["vehicle"]);
}

#[tokio::test]
async fn test_reload_fetches_a_fresh_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let first = json_mock(&mut server, "/api/attendance", "[]").await;
    let _m = json_mock(&mut server, "/api/employees/me", "{}").await;

    let client = client_for(&server, Role::Guard);
    let dashboard = Arc::new(GuardDashboard::default());
    let mut view = dashboards::mount(Arc::clone(&dashboard), client.clone(), Locale::En).await;
    assert!(view.settled().await.loaded().unwrap().records.is_empty());

    first.remove_async().await;
    let _m = json_mock(&mut server, "/api/attendance", r#"[{"employee_name": "Omar"}]"#).await;

    dashboards::reload(&mut view, dashboard, client).await;
    let state = view.settled().await;
    assert_eq!(state.loaded().unwrap().records[0].employee_name, "Omar");
}

#[tokio::test]
async fn test_null_hours_count_toward_attendance() {
    let mut server = mockito::Server::new_async().await;
    let today = iso_date(today());

    let _m = json_mock(&mut server, "/api/equipment", "[]").await;
    let _m = json_mock(&mut server, "/api/production", "[]").await;
    let _m = json_mock(
        &mut server,
        "/api/attendance",
        &format!(
            r#"[{{"id": "a1", "date": "{today}", "status": "present", "hours_worked": 8.0, "overtime_hours": null}},
                {{"id": "a2", "date": "{today}", "status": "absent", "hours_worked": null, "overtime_hours": null}}]"#
        ),
    )
    .await;

    let client = client_for(&server, Role::Foreman);
    let mut view =
        dashboards::mount(Arc::new(ForemanDashboard::default()), client, Locale::En).await;
    let state = view.settled().await;
    let summary = state.loaded().unwrap();

    assert_eq!(summary.attendance.records_today, 2);
    assert_eq!(summary.attendance.present_today, 1);
    assert_eq!(summary.attendance.rate_today, 50);
    assert_eq!(summary.attendance.hours_today, 8.0);
    assert!(summary.unavailable.is_empty());
}

/// Accepts connections and never answers them.
async fn silent_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

fn timeout_client(api_url: String) -> ApiClient {
    let config = Config {
        api_url,
        request_timeout_seconds: 1,
        ..Config::default()
    };
    ApiClient::with_token(&config, TOKEN).unwrap()
}

#[tokio::test]
async fn test_request_timeout_is_a_fetch_failure() {
    let client = timeout_client(silent_backend().await);

    let err = client.list::<Equipment>("equipment").await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_timed_out_batch_shows_fallback() {
    let client = timeout_client(silent_backend().await);

    let mut view =
        dashboards::mount(Arc::new(DriverDashboard::default()), client, Locale::En).await;

    assert_eq!(view.settled().await, LoadState::Failed("Failed to load your data".to_string()));
}

#[tokio::test]
async fn test_manager_failure_without_detail_uses_manager_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _m = json_mock(&mut server, "/api/projects", "[]").await;
    let _m = json_mock(&mut server, "/api/employees", "[]").await;
    let _m = json_mock(&mut server, "/api/production", "[]").await;
    let _m = server
        .mock("GET", "/api/equipment")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server, Role::Manager);
    let mut view =
        dashboards::mount(Arc::new(ManagerDashboard::default()), client, Locale::En).await;

    assert_eq!(view.settled().await.error(), Some("Failed to load manager data"));
}
