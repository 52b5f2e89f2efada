// Session and facade tests: login, logout, 401 redirects, paging and maps.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oltnms_api::types::{ActivityLogFilter, AlarmFilter, OltFilter};
use oltnms_api::{CredentialStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
use oltnms_core::{
    ChannelNotifier, CoreError, Navigation, Nms, NmsConfig, PageRequest, PointKind, Redirect, Route,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Nms, Arc<MemoryStorage>) {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let config = NmsConfig {
        base_url: server.uri(),
        ..NmsConfig::default()
    };
    let nms = Nms::new(config, storage.clone(), Arc::new(ChannelNotifier::default())).unwrap();
    (server, nms, storage)
}

async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "token_type": "bearer",
            "user": { "id": 1, "name": "Admin", "email": "admin@example.com", "role": "admin" }
        })))
        .mount(server)
        .await;
}

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_persists_token_and_authorizes_requests() {
    let (server, nms, storage) = setup().await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut nav = nms.session().navigation();
    let user = nms.login("admin@example.com", &password("secret")).await.unwrap();
    assert_eq!(user.name, "Admin");
    assert_eq!(nav.try_recv().unwrap(), Navigation::Dashboard);

    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok123"));
    let cached: serde_json::Value = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(cached["role"], "admin");

    let olts = nms.mount_olts(OltFilter::default()).await;
    assert!(olts.error().is_none());
}

#[tokio::test]
async fn test_bad_credentials_report_server_detail() {
    let (server, nms, storage) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Incorrect email or password"
        })))
        .mount(&server)
        .await;

    let mut nav = nms.session().navigation();
    let err = nms.login("admin@example.com", &password("wrong")).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.to_string(), "Authentication failed: Incorrect email or password");
    assert!(storage.get(TOKEN_KEY).is_none());
    // never authenticated, so nothing to redirect from
    assert!(nav.try_recv().is_err());
}

#[tokio::test]
async fn test_login_rejects_malformed_email_locally() {
    let (server, nms, _storage) = setup().await;
    let err = nms.login("admin", &password("secret")).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "email", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_survives_server_failure() {
    let (server, nms, storage) = setup().await;
    mock_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    nms.login("admin@example.com", &password("secret")).await.unwrap();
    nms.logout().await.unwrap();

    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(storage.get(USER_KEY).is_none());
    assert!(!nms.session().is_authenticated());
    assert_eq!(nms.guard(Route::Olts), Err(Redirect(Route::Login)));
}

// ── 401 handling ────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_from_any_list_redirects_once() {
    let (server, nms, storage) = setup().await;
    mock_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alarms"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })))
        .mount(&server)
        .await;

    nms.login("admin@example.com", &password("secret")).await.unwrap();
    let mut nav = nms.session().navigation();

    let olts = nms.mount_olts(OltFilter::default()).await;
    let alarms = nms.mount_alarms(AlarmFilter::default()).await;

    assert_eq!(nav.try_recv().unwrap(), Navigation::Login);
    assert!(nav.try_recv().is_err());
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(!nms.session().is_authenticated());
    assert_eq!(olts.error().as_deref(), Some("Authentication failed: Token expired"));
    assert!(alarms.error().is_some());
}

#[tokio::test]
async fn test_restored_session_skips_login() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok123").unwrap();
    storage
        .set(
            USER_KEY,
            r#"{"id":1,"name":"Admin","email":"admin@example.com","role":"admin"}"#,
        )
        .unwrap();

    let config = NmsConfig {
        base_url: server.uri(),
        ..NmsConfig::default()
    };
    let nms = Nms::new(config, storage, Arc::new(ChannelNotifier::default())).unwrap();
    assert!(nms.session().is_authenticated());
    assert_eq!(nms.guard(Route::Dashboard), Ok(()));
}

// ── Activity paging ─────────────────────────────────────────────────

#[tokio::test]
async fn test_activity_page_uses_skip_and_limit() {
    let (server, nms, _storage) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/activity-logs"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 45,
            "skip": 20,
            "limit": 10,
            "logs": [{
                "id": 77,
                "activity_type": "provision",
                "entity_type": "onu",
                "description": "Provisioned ONU ZTEG1"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (logs, info) = nms
        .activity_logs(ActivityLogFilter::default(), PageRequest::new(20, 10))
        .await
        .unwrap();

    assert_eq!(logs.len(), 1);
    assert_eq!(info.total, 45);
    assert_eq!(info.next(), Some(PageRequest::new(30, 10)));
}

// ── Map ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_map_points_include_onus_on_request() {
    let (server, nms, _storage) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/maps/olts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "OLT-1", "status": "online", "latitude": -6.2, "longitude": 106.8 },
            { "id": 2, "name": "OLT-2", "status": "offline" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/maps/onus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "name": "ZTEG9", "serial_number": "ZTEG9", "status": "online",
              "latitude": -6.3, "longitude": 106.9 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let olts_only = nms.map_points(false).await.unwrap();
    assert_eq!(olts_only.len(), 1);

    let all = nms.map_points(true).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].kind, PointKind::Onu);
}
