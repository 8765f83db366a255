use siteboard::config::Config;
use siteboard::permissions::{Action, Resource};
use siteboard::roles::Role;
use siteboard::session::{self, Session, TokenStore};
use siteboard::Error;
use tempfile::TempDir;

fn config_for(server: &mockito::Server) -> Config {
    Config {
        api_url: server.url(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_establish_uses_backend_permissions() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/me")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "u-1",
                "username": "ahmed",
                "full_name": "Ahmed",
                "role": "foreman",
                "permissions": {"dashboard": ["read"], "equipment": ["read"]}
            }"#,
        )
        .create_async()
        .await;

    let session = Session::establish(&config_for(&server), "abc").await.unwrap();

    assert_eq!(session.role(), Role::Foreman);
    assert_eq!(session.token(), "abc");
    assert!(session.permissions().allows(Resource::Equipment, Action::Read));
    assert!(!session.permissions().allows(Resource::Production, Action::Read));

    let names: Vec<&str> = session.nav_items().iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["لوحة التحكم", "المعدات"]);
    let widgets: Vec<&str> = session.dashboard_widgets().iter().map(|w| w.id).collect();
    assert_eq!(widgets, vec!["equipment"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_establish_falls_back_to_role_defaults() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "salem", "role": "guard"}"#)
        .create_async()
        .await;

    let session = Session::establish(&config_for(&server), "abc").await.unwrap();

    assert_eq!(session.role(), Role::Guard);
    assert!(session.permissions().allows(Resource::Attendance, Action::Create));
    assert_eq!(session.nav_items().len(), 1);
}

#[tokio::test]
async fn test_establish_rejects_unknown_grants() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "x", "role": "manager", "permissions": {"equipment": ["raed"]}}"#)
        .create_async()
        .await;

    let err = Session::establish(&config_for(&server), "abc").await.unwrap_err();
    assert!(matches!(err, Error::Permission(_)));
}

#[tokio::test]
async fn test_establish_rejects_unknown_role() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "x", "role": "janitor"}"#)
        .create_async()
        .await;

    let err = Session::establish(&config_for(&server), "abc").await.unwrap_err();
    assert!(matches!(err, Error::Session(_)));
}

#[tokio::test]
async fn test_establish_surfaces_backend_detail() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/me")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Could not validate credentials"}"#)
        .create_async()
        .await;

    let err = Session::establish(&config_for(&server), "expired").await.unwrap_err();
    match err {
        Error::Backend { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail.as_deref(), Some("Could not validate credentials"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_login_returns_access_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/login")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "username": "fatima",
            "password": "password123"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "jwt-token", "token_type": "bearer", "expires_in": 86400}"#)
        .create_async()
        .await;

    let token = session::login(&config_for(&server), "fatima", "password123")
        .await
        .unwrap();

    assert_eq!(token, "jwt-token");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let config = Config {
        api_url: "http://127.0.0.1:9".to_string(),
        request_timeout_seconds: 2,
        ..Config::default()
    };

    let err = Session::establish(&config, "abc").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_) | Error::Timeout));
}

#[test]
fn test_token_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().join("state"),
        ..Config::default()
    };
    let store = TokenStore::new(&config);

    assert_eq!(store.load().unwrap(), None);
    assert!(matches!(store.require(), Err(Error::Session(_))));

    store.save("bearer-1").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("bearer-1"));
    assert_eq!(store.require().unwrap(), "bearer-1");

    store.clear().unwrap();
    assert!(!store.path().exists());
    store.clear().unwrap();
}
