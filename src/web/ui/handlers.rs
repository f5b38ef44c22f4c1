use axum::{extract::State, response::IntoResponse};

use crate::web::server::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    DashboardTemplate::new(
        state.session.snapshot(),
        state.session.orchestrator().busy_actions(),
        state.refresh_secs,
    )
}
