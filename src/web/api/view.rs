use axum::{extract::State, Json};

use crate::orchestrator::Action;
use crate::poller::{PollOutcome, SlotSnapshot};
use crate::web::server::AppState;

#[utoipa::path(
    get,
    path = "/api/view",
    responses(
        (status = 200, description = "Latest reconciled view and connectivity", body = SlotSnapshot)
    ),
    tag = "view"
)]
pub async fn get_view(State(state): State<AppState>) -> Json<SlotSnapshot> {
    Json(state.session.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/view/refresh",
    responses(
        (status = 200, description = "View after an out-of-band status fetch", body = SlotSnapshot)
    ),
    tag = "view"
)]
pub async fn refresh_view(State(state): State<AppState>) -> Json<SlotSnapshot> {
    if let PollOutcome::Failed(message) = state.session.refresh_now().await {
        log::debug!("Manual refresh failed: {message}");
    }
    Json(state.session.snapshot())
}

#[utoipa::path(
    get,
    path = "/api/actions/busy",
    responses(
        (status = 200, description = "Actions with a sequence in flight", body = Vec<Action>)
    ),
    tag = "actions"
)]
pub async fn busy_actions(State(state): State<AppState>) -> Json<Vec<Action>> {
    Json(state.session.orchestrator().busy_actions())
}
