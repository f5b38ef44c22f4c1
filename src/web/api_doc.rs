use utoipa::OpenApi;

use super::api::{actions, error::ErrorResponse, orbit, satellites, view, wifi};

#[derive(OpenApi)]
#[openapi(
    paths(
        view::get_view,
        view::refresh_view,
        view::busy_actions,
        actions::track,
        actions::stop,
        actions::set_mode,
        actions::nudge,
        satellites::list_satellites,
        satellites::refresh_tle,
        satellites::load_manual_tle,
        satellites::motors,
        orbit::get_pending,
        orbit::edit_pending,
        orbit::load_current,
        orbit::load_preset,
        orbit::apply,
        wifi::scan,
        wifi::configure,
    ),
    components(
        schemas(
            ErrorResponse,
            actions::TrackRequest,
            actions::ModeRequest,
            actions::NudgeRequest,
            actions::ActionResponse,
            satellites::TleRefreshResponse,
            satellites::ManualTleRequest,
            orbit::OrbitApplyResponse,
            wifi::WifiScanResponse,
            wifi::WifiConfigRequest,
            crate::poller::SlotSnapshot,
            crate::poller::Connectivity,
            crate::reconcile::ViewState,
            crate::reconcile::TrackingPanel,
            crate::reconcile::MotorReadout,
            crate::reconcile::Badge,
            crate::reconcile::BadgeClass,
            crate::reconcile::CatalogView,
            crate::reconcile::CatalogRow,
            crate::orchestrator::Action,
            crate::orchestrator::PendingOrbitParams,
            crate::device::Mode,
            crate::device::Motor,
            crate::device::OrbitParams,
            crate::device::DerivedRates,
            crate::device::MotorPositions,
            crate::device::SatelliteEntry,
            crate::device::DeviceMessage,
        )
    ),
    info(
        title = "Orbigator HUD API",
        description = "Status view and command sequencing for an Orbigator tracking mount",
        version = "0.1.0"
    ),
    tags(
        (name = "view", description = "Reconciled device status"),
        (name = "actions", description = "Tracking, mode and motor commands"),
        (name = "satellites", description = "Catalog and TLE management"),
        (name = "orbit", description = "Static orbit parameters and presets"),
        (name = "wifi", description = "Device network provisioning"),
        (name = "device", description = "Raw device readings")
    )
)]
pub struct ApiDoc;
