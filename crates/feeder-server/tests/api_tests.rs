use std::sync::{Arc, Mutex};

use application::{RegistrationService, ServiceSettings};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use domain::DomainError;
use domain::command::{CommandRelay, GatewayCommand};
use domain::device::{Device, DeviceRepository, NewDeviceRecord};
use domain::gateway::{Gateway, GatewayRepository};
use feeder_server::{api, state::AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;

// --- In-memory ports ---

#[derive(Default)]
struct InMemoryGatewayRepository {
    rows: Mutex<Vec<Gateway>>,
}

#[async_trait]
impl GatewayRepository for InMemoryGatewayRepository {
    async fn get_or_create(
        &self,
        hid: &str,
        uid: Option<&str>,
    ) -> Result<(Gateway, bool), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|g| g.hid == hid) {
            return Ok((existing.clone(), false));
        }
        let gateway = Gateway::new(
            hid.to_string(),
            uid.map(str::to_string),
            Utc::now().timestamp(),
        );
        rows.push(gateway.clone());
        Ok((gateway, true))
    }

    async fn find_by_hid(&self, hid: &str) -> Result<Option<Gateway>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.hid == hid)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Gateway>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct InMemoryDeviceRepository {
    rows: Mutex<Vec<Device>>,
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn get_or_create(
        &self,
        hid: &str,
        record: NewDeviceRecord,
    ) -> Result<(Device, bool), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|d| d.hid == hid) {
            return Ok((existing.clone(), false));
        }
        let device = Device::from_record(hid.to_string(), record, Utc::now().timestamp());
        rows.push(device.clone());
        Ok((device, true))
    }

    async fn find_by_hid(&self, hid: &str) -> Result<Option<Device>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.hid == hid)
            .cloned())
    }

    async fn find_by_gateway(&self, gateway_hid: &str) -> Result<Vec<Device>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.gateway_hid == gateway_hid)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Device>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn record_ping(&self, _hid: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingRelay {
    sent: Mutex<Vec<(String, GatewayCommand)>>,
    fail: bool,
}

#[async_trait]
impl CommandRelay for RecordingRelay {
    async fn send(
        &self,
        gateway_id: &str,
        command: GatewayCommand,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err("broker unreachable".into());
        }
        self.sent
            .lock()
            .unwrap()
            .push((gateway_id.to_string(), command));
        Ok(())
    }
}

struct TestApp {
    router: Router,
    gateways: Arc<InMemoryGatewayRepository>,
    relay: Arc<RecordingRelay>,
}

fn test_app_with_relay(relay: RecordingRelay) -> TestApp {
    let gateways = Arc::new(InMemoryGatewayRepository::default());
    let devices = Arc::new(InMemoryDeviceRepository::default());
    let relay = Arc::new(relay);
    let service = RegistrationService::new(
        gateways.clone(),
        devices,
        relay.clone(),
        ServiceSettings::default(),
    );
    TestApp {
        router: api::create_router(Arc::new(AppState::new(service))),
        gateways,
        relay,
    }
}

fn test_app() -> TestApp {
    test_app_with_relay(RecordingRelay::default())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Gateway registration ---

#[tokio::test]
async fn gateway_registration_round_trip() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/kronos/gateways",
            r#"{"uid":"smartfeeder-795ae773737d","name":"SF Gateway","osName":"FreeRTOS"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("JSESSIONID="));

    let body = body_json(response).await;
    assert_eq!(body["hid"], "6ec68eb4db216f61822a9aa4333d9824ae7d1abc");
    assert_eq!(body["message"], "OK");

    // Second registration with the same uid is a friendly no-op
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/kronos/gateways",
            r#"{"uid":"smartfeeder-795ae773737d"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "gateway is already registered");
    assert_eq!(app.gateways.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn gateway_registration_without_uid_is_rejected() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json("/api/v1/kronos/gateways", r#"{"name":"nameless"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("uid"));
}

#[tokio::test]
async fn gateway_listing_wraps_summaries() {
    let app = test_app();
    for uid in ["feeder-g1", "feeder-g2", "feeder-g3"] {
        let body = format!(r#"{{"uid":"{uid}"}}"#);
        app.router
            .clone()
            .oneshot(post_json("/api/v1/kronos/gateways", &body))
            .await
            .unwrap();
    }

    let response = app
        .router
        .oneshot(get("/api/v1/kronos/gateways"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["size"], 3);
    assert_eq!(body["totalSize"], 3);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["page"], 0);
    let first = &body["data"][0];
    assert_eq!(
        first["pri"],
        format!("arw:pgs:gwy:{}", first["hid"].as_str().unwrap())
    );
    assert_eq!(first["softwareName"], "SMART FEEDER");
}

// --- Device registration and listing ---

#[tokio::test]
async fn device_registration_requires_known_gateway() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/kronos/devices",
            r#"{"uid":"dev-1","gatewayHid":"unknown"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn device_registration_answers_already_registered() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/kronos/gateways",
            r#"{"uid":"smartfeeder-795ae773737d"}"#,
        ))
        .await
        .unwrap();
    let gateway_hid = body_json(response).await["hid"].as_str().unwrap().to_string();

    let body = format!(
        r#"{{"uid":"smartfeeder-795ae773737d-prod","gatewayHid":"{gateway_hid}","name":"SF20A","type":"SMART FEEDER"}}"#
    );
    let response = app
        .router
        .oneshot(post_json("/api/v1/kronos/devices", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["hid"], "e954822c15b4e7a0c23a92b73edc1280722c3b34");
    assert_eq!(body["message"], "device is already registered");
    assert_eq!(
        body["pri"],
        "arw:krn:dev:e954822c15b4e7a0c23a92b73edc1280722c3b34"
    );
    assert_eq!(body["links"], serde_json::json!({}));
}

#[tokio::test]
async fn device_listing_with_unknown_filter_is_rejected() {
    let app = test_app();

    let response = app
        .router
        .oneshot(get("/api/v1/kronos/devices?gatewayHid=unknown"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn device_listing_without_filter_returns_all() {
    let app = test_app();

    let response = app
        .router
        .oneshot(get("/api/v1/kronos/devices"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["size"], 0);
    assert_eq!(body["totalPages"], 1);
}

// --- Check-in, config, events ---

#[tokio::test]
async fn checkin_silently_registers_and_is_idempotent() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/kronos/gateways/aabbccdd/checkin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({}));

    // POST works too, and neither creates a second record
    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/v1/kronos/gateways/aabbccdd/checkin", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.gateways.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn config_fetch_requires_known_gateway() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/kronos/gateways/missing/config"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.router
        .clone()
        .oneshot(get("/api/v1/kronos/gateways/aabbccdd/checkin"))
        .await
        .unwrap();
    let response = app
        .router
        .oneshot(get("/api/v1/kronos/gateways/aabbccdd/config"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    let body = body_json(response).await;
    assert_eq!(body["cloudPlatform"], "IotConnect");
    assert!(body["key"]["apiKey"].as_str().is_some());
    assert!(body["key"]["secretKey"].as_str().is_some());
}

#[tokio::test]
async fn events_received_acknowledges_known_gateways_only() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/v1/core/events/missing/received", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.router
        .clone()
        .oneshot(get("/api/v1/kronos/gateways/aabbccdd/checkin"))
        .await
        .unwrap();
    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/core/events/aabbccdd/received",
            r#"{"batch":[]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({}));
}

// --- Commands ---

#[tokio::test]
async fn feed_command_defaults_portion() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/gw-1/feed", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], "ok");

    let response = app
        .router
        .oneshot(post_json("/api/gw-1/feed", r#"{"portion":0.5}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.relay.sent.lock().unwrap();
    assert_eq!(
        sent.as_slice(),
        &[
            ("gw-1".to_string(), GatewayCommand::Feed { portion: 0.0625 }),
            ("gw-1".to_string(), GatewayCommand::Feed { portion: 0.5 }),
        ]
    );
}

#[tokio::test]
async fn button_reboot_and_offset_commands_dispatch() {
    let app = test_app();

    for (uri, body) in [
        ("/api/gw-1/button", r#"{"enable":false}"#),
        ("/api/gw-1/reboot", ""),
        ("/api/gw-1/utc_offset", r#"{"utc_offset":2}"#),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(post_json(uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let sent = app.relay.sent.lock().unwrap();
    assert_eq!(sent[0].1, GatewayCommand::Button { enabled: false });
    assert_eq!(sent[1].1, GatewayCommand::Reboot);
    assert_eq!(sent[2].1, GatewayCommand::UtcOffset { offset: 2 });
}

#[tokio::test]
async fn relay_failure_maps_to_bad_gateway() {
    let app = test_app_with_relay(RecordingRelay {
        fail: true,
        ..Default::default()
    });

    let response = app
        .router
        .oneshot(post_json("/api/gw-1/reboot", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("broker"));
}

// --- Misc ---

#[tokio::test]
async fn gateway_names_listing_maps_hid_to_name() {
    let app = test_app();
    app.router
        .clone()
        .oneshot(get("/api/v1/kronos/gateways/aabbccdd/checkin"))
        .await
        .unwrap();

    let response = app.router.oneshot(get("/api/gateways")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // nickname-less gateways display their hid
    assert_eq!(body["gateways"][0]["aabbccdd"], "aabbccdd");
}

#[tokio::test]
async fn unimplemented_api_paths_fall_through_to_greeting() {
    let app = test_app();

    let response = app
        .router
        .oneshot(get("/api/v2/does/not/exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["default"].as_str().is_some());
}
