// Integration tests for `ResourceList` against a wiremock backend.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oltnms_api::types::{
    Alarm, AlarmFilter, Olt, OltCreate, OltFilter, OltUpdate, Onu, OnuFilter, ProvisionOnuRequest,
};
use oltnms_api::{ApiClient, MemoryStorage, TransportConfig};
use oltnms_core::{ChannelNotifier, CoreError, Notice, NoticeLevel, ResourceList, SharedNotifier};

// ── Helpers ─────────────────────────────────────────────────────────

struct Fixture {
    server: MockServer,
    api: Arc<ApiClient>,
    notifier: SharedNotifier,
    notices: broadcast::Receiver<Notice>,
}

async fn setup() -> Fixture {
    let server = MockServer::start().await;
    let api = ApiClient::new(&server.uri(), Arc::new(MemoryStorage::new()), &TransportConfig::default()).unwrap();
    let channel = ChannelNotifier::default();
    let notices = channel.subscribe();
    Fixture {
        server,
        api: Arc::new(api),
        notifier: Arc::new(channel),
        notices,
    }
}

fn olt_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "ip_address": format!("10.0.0.{id}"),
        "status": "online"
    })
}

fn alarm_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "olt_id": 1,
        "severity": "major",
        "type": "onu_offline",
        "message": "ONU went offline",
        "status": status
    })
}

async fn mount_olts(fx: &Fixture, olts: serde_json::Value) -> ResourceList<Olt> {
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(olts))
        .up_to_n_times(1)
        .mount(&fx.server)
        .await;
    let list = ResourceList::<Olt>::mount(fx.api.clone(), fx.notifier.clone(), OltFilter::default()).await;
    assert!(list.error().is_none());
    list
}

fn ids(list: &ResourceList<Olt>) -> Vec<i64> {
    list.items().iter().map(|o| o.id).collect()
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mount_fetches_in_server_order() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(3, "C"), olt_json(1, "A"), olt_json(2, "B")])).await;

    assert_eq!(ids(&list), vec![3, 1, 2]);
    assert!(!list.is_loading());
    assert!(list.state().last_fetched.is_some());
}

#[tokio::test]
async fn test_fetch_failure_keeps_items_and_sets_error() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B")])).await;

    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "database unavailable" })))
        .mount(&fx.server)
        .await;

    let err = list.refresh().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(list.error().as_deref(), Some("database unavailable"));
    assert_eq!(ids(&list), vec![1, 2]);
    assert!(!list.is_loading());
}

#[tokio::test]
async fn test_failed_mount_is_recorded_not_returned() {
    let fx = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fx.server)
        .await;

    let list = ResourceList::<Olt>::mount(fx.api.clone(), fx.notifier.clone(), OltFilter::default()).await;
    assert!(list.is_empty());
    assert_eq!(list.error().as_deref(), Some("HTTP 503"));
}

#[tokio::test]
async fn test_refetch_keeps_unchanged_arcs() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B")])).await;
    let before = list.items();

    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([olt_json(1, "A"), olt_json(2, "B-renamed")])))
        .mount(&fx.server)
        .await;
    list.refresh().await.unwrap();

    let after = list.items();
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(!Arc::ptr_eq(&before[1], &after[1]));
    assert_eq!(after[1].name, "B-renamed");
}

// ── Mutators ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_appends_once() {
    let mut fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B")])).await;
    let before = list.items();

    Mock::given(method("POST"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(olt_json(3, "C")))
        .mount(&fx.server)
        .await;

    let created = list
        .create(&OltCreate {
            name: "C".into(),
            ip_address: "10.0.0.3".into(),
            ..OltCreate::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(ids(&list), vec![1, 2, 3]);
    let after = list.items();
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[1], &after[1]));

    let notice = fx.notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "OLT 'C' created");
}

#[tokio::test]
async fn test_create_with_known_id_replaces_in_place() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B")])).await;

    Mock::given(method("POST"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(olt_json(1, "A2")))
        .mount(&fx.server)
        .await;

    list.create(&OltCreate {
        name: "A2".into(),
        ip_address: "10.0.0.1".into(),
        ..OltCreate::default()
    })
    .await
    .unwrap();

    assert_eq!(ids(&list), vec![1, 2]);
    assert_eq!(list.get(1).unwrap().name, "A2");
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([])).await;

    let err = list
        .create(&OltCreate {
            name: "Core".into(),
            ip_address: "not-an-ip".into(),
            ..OltCreate::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { field: "ip_address", .. }));
    // only the mount fetch
    assert_eq!(fx.server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_replaces_only_target() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B"), olt_json(3, "C")])).await;
    let before = list.items();

    Mock::given(method("PUT"))
        .and(path("/api/olts/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(olt_json(2, "B2")))
        .mount(&fx.server)
        .await;

    list.update(
        2,
        &OltUpdate {
            name: Some("B2".into()),
            ..OltUpdate::default()
        },
    )
    .await
    .unwrap();

    let after = list.items();
    assert_eq!(ids(&list), vec![1, 2, 3]);
    assert_eq!(after[1].name, "B2");
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[2], &after[2]));
}

#[tokio::test]
async fn test_delete_then_repeat_is_not_found() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B")])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/olts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OLT deleted successfully" })))
        .up_to_n_times(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/olts/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "OLT not found" })))
        .mount(&fx.server)
        .await;

    list.delete(1).await.unwrap();
    assert_eq!(ids(&list), vec![2]);

    let err = list.delete(1).await.unwrap_err();
    match err {
        CoreError::NotFound {
            entity_type,
            identifier,
        } => {
            assert_eq!(entity_type, "OLT");
            assert_eq!(identifier, "1");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_mutator_error_leaves_error_slot_alone() {
    let fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A")])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/olts/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&fx.server)
        .await;

    let err = list.delete(1).await.unwrap_err();
    assert_eq!(err.to_string(), "boom");
    assert!(list.error().is_none());
    assert_eq!(list.len(), 1);
}

// ── Device actions ──────────────────────────────────────────────────

fn onu_json(id: i64, serial: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "olt_id": 1,
        "serial_number": serial,
        "name": name,
        "pon_port": 1,
        "onu_id": id,
        "status": "online"
    })
}

async fn mount_onus(fx: &Fixture, onus: serde_json::Value) -> ResourceList<Onu> {
    Mock::given(method("GET"))
        .and(path("/api/onus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onus))
        .up_to_n_times(1)
        .mount(&fx.server)
        .await;
    let list = ResourceList::<Onu>::mount(fx.api.clone(), fx.notifier.clone(), OnuFilter::default()).await;
    assert!(list.error().is_none());
    list
}

fn onu_ids(list: &ResourceList<Onu>) -> Vec<i64> {
    list.items().iter().map(|o| o.id).collect()
}

#[tokio::test]
async fn test_poll_replaces_polled_olt() {
    let mut fx = setup().await;
    let list = mount_olts(&fx, json!([olt_json(1, "A"), olt_json(2, "B"), olt_json(3, "C")])).await;
    let before = list.items();

    Mock::given(method("POST"))
        .and(path("/api/monitoring/olt/2/poll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "online" })))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/olts/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(olt_json(2, "B-polled")))
        .expect(1)
        .mount(&fx.server)
        .await;

    let result = list.poll(2).await.unwrap();
    assert_eq!(result.status, "online");

    let after = list.items();
    assert_eq!(ids(&list), vec![1, 2, 3]);
    assert_eq!(after[1].name, "B-polled");
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[2], &after[2]));

    let notice = fx.notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "OLT 'B-polled' polled: online");
}

#[tokio::test]
async fn test_provision_appends_onu() {
    let mut fx = setup().await;
    let list = mount_onus(&fx, json!([onu_json(1, "ZTEG00000001", "cust-a")])).await;
    let before = list.items();

    Mock::given(method("POST"))
        .and(path("/api/provisioning/onu"))
        .respond_with(ResponseTemplate::new(201).set_body_json(onu_json(2, "ZTEG00000002", "cust-b")))
        .expect(1)
        .mount(&fx.server)
        .await;

    let onu = list
        .provision(&ProvisionOnuRequest {
            olt_id: 1,
            serial_number: "ZTEG00000002".into(),
            pon_port: 1,
            onu_id: 2,
            ..ProvisionOnuRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(onu.id, 2);
    assert_eq!(onu_ids(&list), vec![1, 2]);
    assert!(Arc::ptr_eq(&before[0], &list.items()[0]));

    let notice = fx.notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "ONU ZTEG00000002 provisioned on PON 1/2");
}

#[tokio::test]
async fn test_deprovision_removes_then_not_found() {
    let fx = setup().await;
    let list = mount_onus(&fx, json!([onu_json(1, "ZTEG00000001", "a"), onu_json(2, "ZTEG00000002", "b")])).await;
    let before = list.items();

    Mock::given(method("DELETE"))
        .and(path("/api/provisioning/onu/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ONU deprovisioned" })))
        .up_to_n_times(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/provisioning/onu/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "ONU not found" })))
        .mount(&fx.server)
        .await;

    list.deprovision(1).await.unwrap();
    assert_eq!(onu_ids(&list), vec![2]);
    assert!(Arc::ptr_eq(&before[1], &list.items()[0]));

    let err = list.deprovision(1).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { entity_type: "ONU", .. }), "{err:?}");
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_serial_change_and_rename_replace_only_target() {
    let fx = setup().await;
    let list = mount_onus(
        &fx,
        json!([
            onu_json(1, "ZTEG00000001", "a"),
            onu_json(2, "ZTEG00000002", "b"),
            onu_json(3, "ZTEG00000003", "c")
        ]),
    )
    .await;
    let before = list.items();

    Mock::given(method("PUT"))
        .and(path("/api/provisioning/onu/2/serial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onu_json(2, "ZTEG99999999", "b")))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/provisioning/onu/3/name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onu_json(3, "ZTEG00000003", "rooftop")))
        .expect(1)
        .mount(&fx.server)
        .await;

    list.change_serial(2, " ZTEG99999999 ").await.unwrap();
    list.rename(3, "rooftop").await.unwrap();

    let after = list.items();
    assert_eq!(onu_ids(&list), vec![1, 2, 3]);
    assert_eq!(after[1].serial_number, "ZTEG99999999");
    assert_eq!(after[2].name.as_deref(), Some("rooftop"));
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(!Arc::ptr_eq(&before[1], &after[1]));
}

#[tokio::test]
async fn test_blank_serial_sends_nothing() {
    let fx = setup().await;
    let list = mount_onus(&fx, json!([onu_json(1, "ZTEG00000001", "a")])).await;

    let err = list.change_serial(1, "  ").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "serial_number", .. }));
    assert_eq!(fx.server.received_requests().await.unwrap().len(), 1);
}

// ── Alarm transitions ───────────────────────────────────────────────

async fn mount_alarms(fx: &Fixture, alarms: serde_json::Value) -> ResourceList<Alarm> {
    Mock::given(method("GET"))
        .and(path("/api/alarms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarms))
        .mount(&fx.server)
        .await;
    ResourceList::<Alarm>::mount(fx.api.clone(), fx.notifier.clone(), AlarmFilter::default()).await
}

#[tokio::test]
async fn test_acknowledge_swaps_in_server_alarm() {
    let fx = setup().await;
    let list = mount_alarms(&fx, json!([alarm_json(5, "active"), alarm_json(6, "active")])).await;

    Mock::given(method("POST"))
        .and(path("/api/alarms/5/acknowledge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm_json(5, "acknowledged")))
        .expect(1)
        .mount(&fx.server)
        .await;

    let alarm = list.acknowledge(5).await.unwrap();
    assert_eq!(alarm.status.to_string(), "acknowledged");
    assert_eq!(list.get(5).unwrap().status.to_string(), "acknowledged");
    assert_eq!(list.get(6).unwrap().status.to_string(), "active");
}

#[tokio::test]
async fn test_cleared_alarm_cannot_be_acknowledged() {
    let fx = setup().await;
    let list = mount_alarms(&fx, json!([alarm_json(5, "cleared")])).await;

    let err = list.acknowledge(5).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot move alarm from cleared to acknowledged");
    assert_eq!(fx.server.received_requests().await.unwrap().len(), 1);
}

// ── Auto-refresh ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_no_fetch_after_handle_dropped() {
    let fx = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&fx.server)
        .await;

    let list = ResourceList::<Olt>::new(fx.api.clone(), fx.notifier.clone());
    let handle = list.auto_refresh(Duration::from_secs(30));
    tokio::time::sleep(Duration::from_secs(10)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(fx.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_refreshes_on_interval_until_stopped() {
    let fx = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([olt_json(1, "A")])))
        .mount(&fx.server)
        .await;

    let list = ResourceList::<Olt>::new(fx.api.clone(), fx.notifier.clone());
    let mut rx = list.subscribe();
    let handle = list.auto_refresh(Duration::from_secs(30));

    rx.wait_for(|s| s.last_fetched.is_some()).await.unwrap();
    assert_eq!(list.len(), 1);

    handle.shutdown().await;
    let seen = fx.server.received_requests().await.unwrap().len();
    assert!(seen >= 1);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(fx.server.received_requests().await.unwrap().len(), seen);
}
