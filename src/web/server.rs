use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::device::HttpDeviceClient;
use crate::session::Session;

use super::api::{actions, orbit, satellites, view, wifi};
use super::api_doc::ApiDoc;
use super::ui::handlers as ui_handlers;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session<HttpDeviceClient>>,
    /// Dashboard page auto-reload period.
    pub refresh_secs: u64,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // View
        .route("/api/view", get(view::get_view))
        .route("/api/view/refresh", post(view::refresh_view))
        // Commands
        .route("/api/actions/busy", get(view::busy_actions))
        .route("/api/actions/track", post(actions::track))
        .route("/api/actions/stop", post(actions::stop))
        .route("/api/actions/mode", post(actions::set_mode))
        .route("/api/actions/nudge", post(actions::nudge))
        // Catalog and TLE
        .route("/api/satellites", get(satellites::list_satellites))
        .route("/api/tle/refresh", post(satellites::refresh_tle))
        .route("/api/tle/manual", post(satellites::load_manual_tle))
        .route("/api/motors", get(satellites::motors))
        // Orbit parameters
        .route(
            "/api/orbit/pending",
            get(orbit::get_pending).put(orbit::edit_pending),
        )
        .route("/api/orbit/pending/current", post(orbit::load_current))
        .route("/api/orbit/preset/{name}", post(orbit::load_preset))
        .route("/api/orbit/apply", post(orbit::apply))
        // Wi-Fi
        .route("/api/wifi/scan", get(wifi::scan))
        .route("/api/wifi/config", post(wifi::configure))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the dashboard until ctrl-c, then stops the session's poller.
pub async fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let session = state.session.clone();
    session.start().await;

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down");
        })
        .await;

    session.stop().await;
    result
}
