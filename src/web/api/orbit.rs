use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::device::DerivedRates;
use crate::orchestrator::PendingOrbitParams;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrbitApplyResponse {
    pub rates: DerivedRates,
    /// Set when the parameters were accepted but switching to orbit mode failed.
    pub mode_error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/orbit/pending",
    responses(
        (status = 200, description = "Orbit parameters awaiting apply", body = PendingOrbitParams)
    ),
    tag = "orbit"
)]
pub async fn get_pending(State(state): State<AppState>) -> Json<PendingOrbitParams> {
    Json(state.session.pending_orbit())
}

#[utoipa::path(
    put,
    path = "/api/orbit/pending",
    request_body = PendingOrbitParams,
    responses(
        (status = 200, description = "Pending parameters after the edit", body = PendingOrbitParams)
    ),
    tag = "orbit"
)]
pub async fn edit_pending(
    State(state): State<AppState>,
    Json(edit): Json<PendingOrbitParams>,
) -> Json<PendingOrbitParams> {
    Json(state.session.edit_pending_orbit(edit))
}

#[utoipa::path(
    post,
    path = "/api/orbit/pending/current",
    responses(
        (status = 200, description = "Pending parameters filled from the device's current orbit", body = PendingOrbitParams),
        (status = 400, description = "Device reports no orbit parameters", body = ErrorResponse)
    ),
    tag = "orbit"
)]
pub async fn load_current(State(state): State<AppState>) -> ApiResult<Json<PendingOrbitParams>> {
    // A failed fetch falls back to the last view that landed.
    let _ = state.session.refresh_now().await;
    Ok(Json(state.session.load_current_orbit()?))
}

#[utoipa::path(
    post,
    path = "/api/orbit/preset/{name}",
    params(
        ("name" = String, Path, description = "Preset name: iss, leo or geo")
    ),
    responses(
        (status = 200, description = "Pending parameters filled from the preset", body = PendingOrbitParams),
        (status = 404, description = "Unknown preset", body = ErrorResponse)
    ),
    tag = "orbit"
)]
pub async fn load_preset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<PendingOrbitParams>> {
    state.session.load_preset(&name)?;
    Ok(Json(state.session.pending_orbit()))
}

#[utoipa::path(
    post,
    path = "/api/orbit/apply",
    responses(
        (status = 200, description = "Parameters sent; derived rates returned", body = OrbitApplyResponse),
        (status = 400, description = "Pending parameters incomplete", body = ErrorResponse),
        (status = 409, description = "Apply already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the parameters", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "orbit"
)]
pub async fn apply(State(state): State<AppState>) -> ApiResult<Json<OrbitApplyResponse>> {
    let outcome = state.session.apply_pending_orbit().await?;
    Ok(Json(OrbitApplyResponse {
        rates: outcome.rates,
        mode_error: outcome.mode_error.map(|e| e.to_string()),
    }))
}
