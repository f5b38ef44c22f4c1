use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Orbit,
    Sgp4,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Motor {
    Aov,
    Eqx,
}

/// Raw status snapshot as reported by `GET /api/status`.
///
/// Every field is optional on the wire; a missing or unrecognised value
/// deserializes to `None` instead of failing the whole poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeviceStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub tracking: bool,
    #[serde(default)]
    pub satellite: Option<String>,
    #[serde(default)]
    pub tle_age: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient")]
    pub motors: Option<MotorPositions>,
    #[serde(default, deserialize_with = "lenient")]
    pub wifi: Option<WifiStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub rtc: Option<RtcStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub orbital_params: Option<OrbitParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct MotorPositions {
    pub aov: Option<f64>,
    pub eqx: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WifiStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub ssid: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RtcStatus {
    #[serde(default)]
    pub synced: bool,
}

/// Orbit parameters submitted to `POST /api/orbit/params` and echoed back in status.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct OrbitParams {
    pub altitude_km: f64,
    pub period_min: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
}

/// Angular rates the device derives from submitted orbit parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DerivedRates {
    pub aov_rate: f64,
    pub eqx_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct OrbitParamsResponse {
    pub params: DerivedRates,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct SatelliteEntry {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub norad_id: String,
    #[serde(default)]
    pub has_tle: bool,
    #[serde(default = "no_tle_age")]
    pub tle_age: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct SatelliteCatalog {
    #[serde(default)]
    pub satellites: Vec<SatelliteEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct WifiScan {
    #[serde(default)]
    pub networks: Vec<String>,
}

/// Human-readable reply to manual TLE and Wi-Fi provisioning calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DeviceMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SatelliteRequest<'a> {
    pub satellite: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ManualTleRequest<'a> {
    pub name: &'a str,
    pub line1: &'a str,
    pub line2: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub(super) struct TrackingRequest {
    pub tracking: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct NudgeRequest {
    pub motor: Motor,
    pub delta: f64,
}

#[derive(Serialize)]
pub(super) struct WifiConfigRequest<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for WifiConfigRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WifiConfigRequest")
            .field("ssid", &self.ssid)
            .field("password", &"***")
            .finish()
    }
}

fn no_tle_age() -> String {
    "none".to_string()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
