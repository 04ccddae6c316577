use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use application::registration::{
    ButtonRequest, FeedRequest, NewDeviceRequest, NewGatewayRequest, UtcOffsetRequest,
};
use domain::DomainError;

use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gateways", get(gateway_names))
        .route(
            "/api/v1/kronos/gateways",
            get(list_gateways).post(register_gateway),
        )
        .route(
            "/api/v1/kronos/devices",
            get(list_devices).post(register_device),
        )
        .route(
            "/api/v1/kronos/gateways/{gateway_id}/config",
            get(gateway_config),
        )
        .route(
            "/api/v1/kronos/gateways/{gateway_id}/checkin",
            get(gateway_checkin).post(gateway_checkin),
        )
        .route(
            "/api/v1/core/events/{gateway_id}/received",
            post(events_received),
        )
        .route("/api/{gateway_id}/button", post(send_button))
        .route("/api/{gateway_id}/reboot", post(send_reboot))
        .route("/api/{gateway_id}/feed", post(send_feed))
        .route("/api/{gateway_id}/utc_offset", post(send_utc_offset))
        .fallback(welcome)
        .layer(cors)
        .with_state(state)
}

/// Error envelope: `{"error": ..}` plus a status from the domain taxonomy.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match err {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Downstream(_) => StatusCode::BAD_GATEWAY,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl ApiError {
    /// The kronos collection endpoints historically answered 400 for a
    /// missing gateway rather than 404; keep that shape.
    fn missing_gateway_as_bad_request(mut self) -> Self {
        if self.status == StatusCode::NOT_FOUND {
            self.status = StatusCode::BAD_REQUEST;
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type SessionCookie = AppendHeaders<[(header::HeaderName, String); 1]>;

fn session_cookie(state: &AppState) -> SessionCookie {
    AppendHeaders([(
        header::SET_COOKIE,
        format!("JSESSIONID={}", state.service.session_token()),
    )])
}

async fn gateway_names(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let gateways = state.service.gateways().await?;
    let names: Vec<serde_json::Value> = gateways
        .iter()
        .map(|g| {
            let mut entry = serde_json::Map::new();
            entry.insert(g.hid.clone(), json!(g.name()));
            serde_json::Value::Object(entry)
        })
        .collect();
    Ok(Json(json!({ "gateways": names })).into_response())
}

async fn list_gateways(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let listing = state.service.list_gateways().await?;
    Ok(Json(listing).into_response())
}

async fn register_gateway(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewGatewayRequest>,
) -> Result<Response, ApiError> {
    let result = state.service.register_gateway(payload).await?;
    Ok((session_cookie(&state), Json(result)).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListQuery {
    gateway_hid: Option<String>,
}

async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceListQuery>,
) -> Result<Response, ApiError> {
    let listing = state
        .service
        .list_devices(query.gateway_hid.as_deref())
        .await
        .map_err(|e| ApiError::from(e).missing_gateway_as_bad_request())?;
    Ok(Json(listing).into_response())
}

async fn register_device(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewDeviceRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .service
        .register_device(payload)
        .await
        .map_err(|e| ApiError::from(e).missing_gateway_as_bad_request())?;
    Ok(Json(result).into_response())
}

async fn gateway_config(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
) -> Result<Response, ApiError> {
    let config = state.service.fetch_config(&gateway_id).await?;
    Ok((session_cookie(&state), Json(config)).into_response())
}

async fn gateway_checkin(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
) -> Result<Response, ApiError> {
    state.service.check_in(&gateway_id).await?;
    Ok((session_cookie(&state), Json(json!({}))).into_response())
}

async fn events_received(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
    body: String,
) -> Result<Response, ApiError> {
    state.service.events_received(&gateway_id, &body).await?;
    Ok((session_cookie(&state), Json(json!({}))).into_response())
}

async fn send_button(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
    Json(payload): Json<ButtonRequest>,
) -> Result<Response, ApiError> {
    state.service.send_button(&gateway_id, payload).await?;
    Ok(Json(json!({ "success": "ok" })).into_response())
}

async fn send_reboot(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
) -> Result<Response, ApiError> {
    state.service.send_reboot(&gateway_id).await?;
    Ok(Json(json!({ "success": "ok" })).into_response())
}

async fn send_feed(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
    Json(payload): Json<FeedRequest>,
) -> Result<Response, ApiError> {
    state.service.send_feed(&gateway_id, payload).await?;
    Ok(Json(json!({ "success": "ok" })).into_response())
}

async fn send_utc_offset(
    State(state): State<Arc<AppState>>,
    Path(gateway_id): Path<String>,
    Json(payload): Json<UtcOffsetRequest>,
) -> Result<Response, ApiError> {
    state.service.send_utc_offset(&gateway_id, payload).await?;
    Ok(Json(json!({ "success": "ok" })).into_response())
}

/// Catch-all for SDK endpoints the emulator does not implement.
async fn welcome() -> Response {
    Json(json!({ "default": "🤖😻\n" })).into_response()
}
