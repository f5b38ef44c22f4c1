use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::device::DeviceMessage;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct WifiScanResponse {
    pub networks: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct WifiConfigRequest {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

#[utoipa::path(
    get,
    path = "/api/wifi/scan",
    responses(
        (status = 200, description = "Networks visible to the device", body = WifiScanResponse),
        (status = 409, description = "Scan already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "wifi"
)]
pub async fn scan(State(state): State<AppState>) -> ApiResult<Json<WifiScanResponse>> {
    let networks = state.session.orchestrator().scan_wifi().await?;
    Ok(Json(WifiScanResponse { networks }))
}

#[utoipa::path(
    post,
    path = "/api/wifi/config",
    request_body = WifiConfigRequest,
    responses(
        (status = 200, description = "Credentials saved; the device is restarting its network", body = DeviceMessage),
        (status = 400, description = "Missing SSID", body = ErrorResponse),
        (status = 502, description = "Device rejected the credentials", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "wifi"
)]
pub async fn configure(
    State(state): State<AppState>,
    Json(request): Json<WifiConfigRequest>,
) -> ApiResult<Json<DeviceMessage>> {
    let reply = state
        .session
        .orchestrator()
        .save_wifi_config(&request.ssid, &request.password)
        .await?;
    Ok(Json(reply))
}
