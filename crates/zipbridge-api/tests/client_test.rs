#![allow(clippy::unwrap_used)]
// Integration tests for `ZipatoClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zipbridge_api::models::{ATTR_METER, ATTR_SWITCH};
use zipbridge_api::{Error, HubOptions, ZipatoClient};

const GROUPS: &[&str] = &[
    "lights",
    "switches",
    "scenes",
    "meters",
    "sensors",
    "thermostats",
];

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ZipatoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ZipatoClient::with_client(
        reqwest::Client::new(),
        base_url,
        "admin",
        SecretString::from("test-password".to_owned()),
        HubOptions::default(),
    );
    (server, client)
}

async fn mount_group(server: &MockServer, group: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{group}")))
        .and(query_param("full", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_empty_groups_except(server: &MockServer, except: &[&str]) {
    for &group in GROUPS {
        if !except.contains(&group) {
            mount_group(server, group, json!([])).await;
        }
    }
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn connect_logs_in_with_nonce_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/init"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "nonce": "abc123"
            })),
        )
        .mount(&server)
        .await;

    // token = sha1("abc123" + sha1("test-password"))
    Mock::given(method("GET"))
        .and(path("/user/login"))
        .and(query_param("username", "admin"))
        .and(query_param(
            "token",
            "004c680d4e90c523f41a4c038aa82ba40b202332",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/box"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "name": "Home",
                "serial": "ZT0012345",
                "firmwareVersion": "1.3.57"
            })),
        )
        .mount(&server)
        .await;

    let info = client.connect().await.unwrap();
    assert_eq!(info.serial.as_deref(), Some("ZT0012345"));
    assert_eq!(info.firmware_version.as_deref(), Some("1.3.57"));
}

#[tokio::test]
async fn connect_rejected_login_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/init"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "nonce": "abc123"
            })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Invalid token"
            })),
        )
        .mount(&server)
        .await;

    let result = client.connect().await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid token"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn connect_failed_init_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/init"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "maintenance"
            })),
        )
        .mount(&server)
        .await;

    let result = client.connect().await;
    assert!(
        matches!(result, Err(Error::Api { .. })),
        "expected Api error, got: {result:?}"
    );
}

// ── Enumeration tests ───────────────────────────────────────────────

#[tokio::test]
async fn load_devices_returns_nonempty_groups_and_fills_cache() {
    let (server, client) = setup().await;

    let module_uuid = Uuid::new_v4();
    mount_group(
        &server,
        "meters",
        json!([{
            "uuid": module_uuid,
            "name": "Kitchen Temp",
            "attributes": {
                "95": {
                    "value": "21.5",
                    "definition": { "name": "TEMPERATURE" }
                }
            }
        }]),
    )
    .await;
    mount_empty_groups_except(&server, &["meters"]).await;

    let devices = client.load_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "meters");
    assert_eq!(devices[0].modules.len(), 1);

    let cached = client.module(module_uuid).unwrap();
    assert_eq!(cached.name, "Kitchen Temp");
    assert_eq!(
        cached.attribute(ATTR_METER).unwrap().value_as_f64(),
        Some(21.5)
    );
}

#[tokio::test]
async fn load_devices_session_expiry_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.load_devices().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn load_devices_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.load_devices().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "not json");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Write tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn set_module_value_puts_resolved_attribute_uuid() {
    let (server, client) = setup().await;

    let module_uuid = Uuid::new_v4();
    let attribute_uuid = Uuid::new_v4();
    mount_group(
        &server,
        "switches",
        json!([{
            "uuid": module_uuid,
            "name": "Relay 1",
            "attributes": {
                "11": { "uuid": attribute_uuid, "value": "false" }
            }
        }]),
    )
    .await;
    mount_empty_groups_except(&server, &["switches"]).await;
    client.load_devices().await.unwrap();

    Mock::given(method("PUT"))
        .and(path(format!("/attributes/{attribute_uuid}/value")))
        .and(body_json(json!({ "value": true })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_module_value(module_uuid, ATTR_SWITCH, json!(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn set_module_value_unknown_module_is_cache_miss() {
    let (_server, client) = setup().await;

    let result = client
        .set_module_value(Uuid::new_v4(), ATTR_SWITCH, json!(true))
        .await;
    assert!(
        matches!(result, Err(Error::ModuleNotFound { .. })),
        "expected ModuleNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn set_module_value_write_failure_is_api_error() {
    let (server, client) = setup().await;

    let module_uuid = Uuid::new_v4();
    let attribute_uuid = Uuid::new_v4();
    mount_group(
        &server,
        "switches",
        json!([{
            "uuid": module_uuid,
            "name": "Relay 1",
            "attributes": {
                "11": { "uuid": attribute_uuid, "value": "false" }
            }
        }]),
    )
    .await;
    mount_empty_groups_except(&server, &["switches"]).await;
    client.load_devices().await.unwrap();

    Mock::given(method("PUT"))
        .and(path(format!("/attributes/{attribute_uuid}/value")))
        .respond_with(ResponseTemplate::new(500).set_body_string("device unreachable"))
        .mount(&server)
        .await;

    let result = client
        .set_module_value(module_uuid, ATTR_SWITCH, json!(false))
        .await;
    match result {
        Err(Error::Api { ref message }) => {
            assert!(message.contains("device unreachable"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Scene tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn run_scene_gets_run_endpoint() {
    let (server, client) = setup().await;

    let scene_uuid = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/scenes/{scene_uuid}/run")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.run_scene(scene_uuid).await.unwrap();
}

#[tokio::test]
async fn run_scene_reported_failure_is_api_error() {
    let (server, client) = setup().await;

    let scene_uuid = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/scenes/{scene_uuid}/run")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "scene not found"
            })),
        )
        .mount(&server)
        .await;

    let result = client.run_scene(scene_uuid).await;
    match result {
        Err(Error::Api { ref message }) => {
            assert!(message.contains("scene not found"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
