use serde::Serialize;
use utoipa::ToSchema;

use crate::device::{DeviceStatus, Mode, RtcStatus, WifiStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BadgeClass {
    Success,
    Warning,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Badge {
    pub label: String,
    pub class: BadgeClass,
}

impl Badge {
    fn new(label: impl Into<String>, class: BadgeClass) -> Self {
        Self {
            label: label.into(),
            class,
        }
    }
}

/// Classifies a device TLE age token (`"0m"`, `"5h"`, `"9d"`, `"none"`, ...).
///
/// `"0m"` is the only minute value treated as fresh; any other minute count
/// falls through to the warning class like every unrecognised token.
pub fn classify_tle_age(age: &str) -> BadgeClass {
    if age == "none" {
        return BadgeClass::Danger;
    }
    if age.ends_with('h') || age == "0m" {
        return BadgeClass::Success;
    }
    if age.ends_with('d') {
        return match leading_integer(age) {
            Some(days) if days > 7 => BadgeClass::Danger,
            _ => BadgeClass::Warning,
        };
    }
    BadgeClass::Warning
}

fn leading_integer(token: &str) -> Option<u64> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn tle_badge(age: Option<&str>) -> Badge {
    match age {
        Some(age) => Badge::new(format!("TLE: {age}"), classify_tle_age(age)),
        None => Badge::new("TLE: unknown", BadgeClass::Neutral),
    }
}

pub fn is_tracking(status: &DeviceStatus) -> bool {
    status.mode == Some(Mode::Sgp4) && status.tracking
}

pub fn tracking_badge(status: &DeviceStatus) -> Badge {
    if is_tracking(status) {
        Badge::new("Tracking", BadgeClass::Success)
    } else {
        Badge::new("Not Tracking", BadgeClass::Warning)
    }
}

pub fn wifi_badge(wifi: Option<&WifiStatus>) -> Badge {
    match wifi {
        Some(w) if w.connected => Badge::new(format!("Connected ({})", w.ssid), BadgeClass::Success),
        Some(w) if w.ssid == "AP MODE" => Badge::new("Setup WiFi", BadgeClass::Warning),
        Some(_) => Badge::new("Disconnected", BadgeClass::Danger),
        None => Badge::new("Unknown", BadgeClass::Neutral),
    }
}

pub fn rtc_badge(rtc: Option<&RtcStatus>) -> Badge {
    match rtc {
        Some(r) if r.synced => Badge::new("Synced", BadgeClass::Success),
        Some(_) => Badge::new("Not Synced", BadgeClass::Warning),
        None => Badge::new("Unknown", BadgeClass::Neutral),
    }
}

pub fn mode_label(mode: Option<Mode>) -> String {
    match mode {
        Some(mode) => mode.to_string().to_uppercase(),
        None => "UNKNOWN".to_string(),
    }
}
