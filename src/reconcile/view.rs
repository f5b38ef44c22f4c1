use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::device::{DeviceStatus, OrbitParams};

use super::badges::{
    is_tracking, mode_label, rtc_badge, tle_badge, tracking_badge, wifi_badge, Badge,
};
use super::format::{format_altitude, format_latitude, format_longitude, format_motor_angle};

const UNKNOWN_VALUE: &str = "—";

/// Display-ready state derived from one full status snapshot.
///
/// A `ViewState` is never patched: every poll or refresh builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ViewState {
    pub mode: String,
    pub tracking_badge: Badge,
    pub connection_badge: Badge,
    pub rtc_badge: Badge,
    pub tle_badge: Badge,
    /// Satellite as confirmed by the device, not as requested locally.
    pub satellite: Option<String>,
    pub tracking: TrackingPanel,
    pub motors: MotorReadout,
    pub orbit: Option<OrbitParams>,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrackingPanel {
    Active {
        satellite: Option<String>,
        latitude: String,
        longitude: String,
        altitude: String,
    },
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MotorReadout {
    pub aov: String,
    pub eqx: String,
}

pub fn reconcile(status: &DeviceStatus, refreshed_at: DateTime<Utc>) -> ViewState {
    ViewState {
        mode: mode_label(status.mode),
        tracking_badge: tracking_badge(status),
        connection_badge: wifi_badge(status.wifi.as_ref()),
        rtc_badge: rtc_badge(status.rtc.as_ref()),
        tle_badge: tle_badge(status.tle_age.as_deref()),
        satellite: status.satellite.clone(),
        tracking: tracking_panel(status),
        motors: motor_readout(status),
        orbit: status.orbital_params,
        refreshed_at,
    }
}

fn tracking_panel(status: &DeviceStatus) -> TrackingPanel {
    if !is_tracking(status) {
        return TrackingPanel::Inactive;
    }

    let position = status.position.clone().unwrap_or_default();
    TrackingPanel::Active {
        satellite: status.satellite.clone(),
        latitude: display_or_unknown(position.lat, format_latitude),
        longitude: display_or_unknown(position.lon, format_longitude),
        altitude: display_or_unknown(position.alt, format_altitude),
    }
}

fn motor_readout(status: &DeviceStatus) -> MotorReadout {
    let motors = status.motors.clone().unwrap_or_default();
    MotorReadout {
        aov: display_or_unknown(motors.aov, format_motor_angle),
        eqx: display_or_unknown(motors.eqx, format_motor_angle),
    }
}

fn display_or_unknown(value: Option<f64>, format: fn(f64) -> String) -> String {
    value
        .filter(|v| v.is_finite())
        .map(format)
        .unwrap_or_else(|| UNKNOWN_VALUE.to_string())
}
