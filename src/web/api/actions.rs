use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::device::{Mode, Motor};
use crate::orchestrator::Action;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackRequest {
    pub satellite: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NudgeRequest {
    pub motor: Motor,
    /// Signed degrees.
    pub delta: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub action: Action,
    pub completed: bool,
}

impl ActionResponse {
    fn completed(action: Action) -> Json<Self> {
        Json(Self {
            action,
            completed: true,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/actions/track",
    request_body = TrackRequest,
    responses(
        (status = 200, description = "Satellite selected and tracking enabled", body = ActionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Tracking request already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected a step", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "actions"
)]
pub async fn track(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> ApiResult<Json<ActionResponse>> {
    state
        .session
        .orchestrator()
        .track_satellite(&request.satellite)
        .await?;
    Ok(ActionResponse::completed(Action::TrackSatellite))
}

#[utoipa::path(
    post,
    path = "/api/actions/stop",
    responses(
        (status = 200, description = "Tracking disabled", body = ActionResponse),
        (status = 409, description = "Stop already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "actions"
)]
pub async fn stop(State(state): State<AppState>) -> ApiResult<Json<ActionResponse>> {
    state.session.orchestrator().stop_tracking().await?;
    Ok(ActionResponse::completed(Action::StopTracking))
}

#[utoipa::path(
    post,
    path = "/api/actions/mode",
    request_body = ModeRequest,
    responses(
        (status = 200, description = "Mode switched", body = ActionResponse),
        (status = 409, description = "Mode switch already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "actions"
)]
pub async fn set_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> ApiResult<Json<ActionResponse>> {
    state.session.orchestrator().set_mode(request.mode).await?;
    Ok(ActionResponse::completed(Action::SetMode))
}

#[utoipa::path(
    post,
    path = "/api/actions/nudge",
    request_body = NudgeRequest,
    responses(
        (status = 200, description = "Motor nudged", body = ActionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Nudge already in flight", body = ErrorResponse),
        (status = 502, description = "Device rejected the request", body = ErrorResponse),
        (status = 504, description = "Device unreachable", body = ErrorResponse)
    ),
    tag = "actions"
)]
pub async fn nudge(
    State(state): State<AppState>,
    Json(request): Json<NudgeRequest>,
) -> ApiResult<Json<ActionResponse>> {
    state
        .session
        .orchestrator()
        .nudge_motor(request.motor, request.delta)
        .await?;
    Ok(ActionResponse::completed(Action::NudgeMotor))
}
