use askama::Template;
use askama_web::WebTemplate;

use crate::device::OrbitParams;
use crate::orchestrator::Action;
use crate::poller::{Connectivity, SlotSnapshot};
use crate::reconcile::{Badge, BadgeClass, TrackingPanel, ViewState};

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub connectivity: Badge,
    pub last_error: Option<String>,
    pub view: Option<DashboardView>,
    pub busy: Vec<String>,
    pub refresh_secs: u64,
}

pub struct DashboardView {
    pub mode: String,
    pub tracking_badge: Badge,
    pub connection_badge: Badge,
    pub rtc_badge: Badge,
    pub tle_badge: Badge,
    pub satellite: String,
    pub position: Option<PositionRows>,
    pub aov: String,
    pub eqx: String,
    pub orbit: Option<OrbitParams>,
    pub refreshed_at: String,
}

pub struct PositionRows {
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

impl DashboardTemplate {
    pub fn new(snapshot: SlotSnapshot, busy: Vec<Action>, refresh_secs: u64) -> Self {
        Self {
            connectivity: connectivity_badge(snapshot.connectivity),
            last_error: snapshot.last_error,
            view: snapshot.view.map(DashboardView::from),
            busy: busy.iter().map(ToString::to_string).collect(),
            refresh_secs,
        }
    }
}

impl From<ViewState> for DashboardView {
    fn from(view: ViewState) -> Self {
        let position = match view.tracking {
            TrackingPanel::Active {
                latitude,
                longitude,
                altitude,
                ..
            } => Some(PositionRows {
                latitude,
                longitude,
                altitude,
            }),
            TrackingPanel::Inactive => None,
        };

        Self {
            mode: view.mode,
            tracking_badge: view.tracking_badge,
            connection_badge: view.connection_badge,
            rtc_badge: view.rtc_badge,
            tle_badge: view.tle_badge,
            satellite: view.satellite.unwrap_or_else(|| "None".to_string()),
            position,
            aov: view.motors.aov,
            eqx: view.motors.eqx,
            orbit: view.orbit,
            refreshed_at: view.refreshed_at.format("%H:%M:%S UTC").to_string(),
        }
    }
}

fn connectivity_badge(connectivity: Connectivity) -> Badge {
    let (label, class) = match connectivity {
        Connectivity::Connecting => ("Connecting", BadgeClass::Neutral),
        Connectivity::Online => ("Online", BadgeClass::Success),
        Connectivity::Stale => ("Offline", BadgeClass::Danger),
        Connectivity::Reconnecting => ("Reconnecting", BadgeClass::Warning),
    };
    Badge {
        label: label.to_string(),
        class,
    }
}
