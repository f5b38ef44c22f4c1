use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::device::{DeviceMessage, MotorPositions, SatelliteEntry};
use crate::reconcile::CatalogView;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Case-insensitive name filter.
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TleRefreshResponse {
    /// `false` when no satellite is selected and nothing was requested.
    pub refreshed: bool,
    pub satellites: Option<Vec<SatelliteEntry>>,
}

/// Either `tle` (a pasted two or three line block) or both `line1` and `line2`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ManualTleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tle: Option<String>,
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Filtered satellite catalog", body = CatalogView),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn list_satellites(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<CatalogView>> {
    Ok(Json(state.session.satellites(&query.search).await?))
}

#[utoipa::path(
    post,
    path = "/api/tle/refresh",
    responses(
        (status = 200, description = "TLE refreshed for the selected satellite", body = TleRefreshResponse),
        (status = 409, description = "Refresh already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected a step", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn refresh_tle(State(state): State<AppState>) -> ApiResult<Json<TleRefreshResponse>> {
    let satellites = state.session.orchestrator().refresh_tle().await?;
    Ok(Json(TleRefreshResponse {
        refreshed: satellites.is_some(),
        satellites,
    }))
}

#[utoipa::path(
    post,
    path = "/api/tle/manual",
    request_body = ManualTleRequest,
    responses(
        (status = 200, description = "Manual TLE loaded", body = DeviceMessage),
        (status = 400, description = "Missing name or TLE lines", body = ErrorResponse),
        (status = 409, description = "Load already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the TLE", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn load_manual_tle(
    State(state): State<AppState>,
    Json(request): Json<ManualTleRequest>,
) -> ApiResult<Json<DeviceMessage>> {
    let orchestrator = state.session.orchestrator();
    let reply = match (request.tle, request.line1, request.line2) {
        (Some(block), _, _) => {
            orchestrator
                .load_pasted_tle(request.name.as_deref(), &block)
                .await?
        }
        (None, Some(line1), Some(line2)) => {
            orchestrator
                .load_manual_tle(request.name.as_deref().unwrap_or(""), &line1, &line2)
                .await?
        }
        _ => {
            return Err(ApiError::Validation(
                "provide a TLE block or both TLE lines".to_string(),
            ))
        }
    };
    Ok(Json(reply))
}

#[utoipa::path(
    get,
    path = "/api/motors",
    responses(
        (status = 200, description = "Raw motor positions in degrees", body = MotorPositions),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "device"
)]
pub async fn motors(State(state): State<AppState>) -> ApiResult<Json<MotorPositions>> {
    Ok(Json(state.session.motors().await?))
}
