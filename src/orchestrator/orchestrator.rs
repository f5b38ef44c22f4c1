use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};

use serde::Serialize;
use utoipa::ToSchema;

use crate::device::{
    DerivedRates, DeviceApi, DeviceError, DeviceMessage, Mode, Motor, OrbitParams,
    SatelliteEntry,
};
use crate::poller::StatusRefresher;

use super::error::CommandError;
use super::tle::ManualTle;

/// A user-triggerable operation. At most one sequence per action runs at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    TrackSatellite,
    StopTracking,
    SetMode,
    ApplyOrbit,
    LoadManualTle,
    RefreshTle,
    NudgeMotor,
    ScanWifi,
    SaveWifi,
}

/// Result of applying orbit parameters.
///
/// The rates from `setOrbitParams` are kept even when the follow-up mode
/// switch fails; that failure is carried in `mode_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitApplyOutcome {
    pub rates: DerivedRates,
    pub mode_error: Option<CommandError>,
}

/// Releases the action's in-flight slot on drop, whatever the sequence outcome.
pub struct ActionGuard {
    action: Action,
    in_flight: Arc<StdMutex<HashSet<Action>>>,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.in_flight.lock().unwrap().remove(&self.action);
    }
}

pub struct Orchestrator<C> {
    client: Arc<C>,
    refresher: StatusRefresher<C>,
    in_flight: Arc<StdMutex<HashSet<Action>>>,
}

impl<C> Clone for Orchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            refresher: self.refresher.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<C: DeviceApi + Send + Sync + 'static> Orchestrator<C> {
    pub fn new(client: Arc<C>, refresher: StatusRefresher<C>) -> Self {
        Self {
            client,
            refresher,
            in_flight: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    pub fn busy_actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.in_flight.lock().unwrap().iter().copied().collect();
        actions.sort_by_key(|a| a.to_string());
        actions
    }

    /// Claims `action`, rejecting a concurrent identical trigger.
    pub fn begin(&self, action: Action) -> Result<ActionGuard, CommandError> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(action) {
            log::warn!("Rejecting {action}: already in progress");
            return Err(CommandError::Busy(action));
        }
        log::info!("Starting {action}");
        Ok(ActionGuard {
            action,
            in_flight: self.in_flight.clone(),
        })
    }

    fn converge(&self) {
        let _ = self.refresher.spawn_refresh();
    }

    /// `selectSatellite(name)` then `setMode(sgp4)` then `setTracking(true)`.
    pub async fn track_satellite(&self, name: &str) -> Result<(), CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::validation("satellite name is required"));
        }

        let action = Action::TrackSatellite;
        let _guard = self.begin(action)?;
        self.client
            .select_satellite(name)
            .await
            .map_err(abort(action, "select_satellite"))?;
        self.client
            .set_mode(Mode::Sgp4)
            .await
            .map_err(abort(action, "set_mode"))?;
        self.client
            .set_tracking(true)
            .await
            .map_err(abort(action, "set_tracking"))?;

        self.converge();
        Ok(())
    }

    pub async fn stop_tracking(&self) -> Result<(), CommandError> {
        let action = Action::StopTracking;
        let _guard = self.begin(action)?;
        self.client
            .set_tracking(false)
            .await
            .map_err(abort(action, "set_tracking"))?;

        self.converge();
        Ok(())
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<(), CommandError> {
        let action = Action::SetMode;
        let _guard = self.begin(action)?;
        self.client
            .set_mode(mode)
            .await
            .map_err(abort(action, "set_mode"))?;

        self.converge();
        Ok(())
    }

    /// `setOrbitParams(params)` then `setMode(orbit)`.
    pub async fn apply_orbit(&self, params: OrbitParams) -> Result<OrbitApplyOutcome, CommandError> {
        let finite = [
            params.altitude_km,
            params.period_min,
            params.eccentricity,
            params.inclination_deg,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(CommandError::validation("orbit parameters must be numbers"));
        }

        let action = Action::ApplyOrbit;
        let _guard = self.begin(action)?;
        let rates = self
            .client
            .set_orbit_params(params)
            .await
            .map_err(abort(action, "set_orbit_params"))?;

        let mode_error = self
            .client
            .set_mode(Mode::Orbit)
            .await
            .map_err(abort(action, "set_mode"))
            .err();

        if mode_error.is_none() {
            self.converge();
        }
        Ok(OrbitApplyOutcome { rates, mode_error })
    }

    /// Validates the TLE, then `setMode(sgp4)` then `setManualTLE`.
    pub async fn load_manual_tle(
        &self,
        name: &str,
        line1: &str,
        line2: &str,
    ) -> Result<DeviceMessage, CommandError> {
        let tle = ManualTle::new(name, line1, line2)?;
        self.send_manual_tle(tle).await
    }

    /// Same as [`Self::load_manual_tle`] for a pasted two or three line block.
    pub async fn load_pasted_tle(
        &self,
        name: Option<&str>,
        block: &str,
    ) -> Result<DeviceMessage, CommandError> {
        let tle = ManualTle::from_block(name, block)?;
        self.send_manual_tle(tle).await
    }

    async fn send_manual_tle(&self, tle: ManualTle) -> Result<DeviceMessage, CommandError> {
        let action = Action::LoadManualTle;
        let _guard = self.begin(action)?;
        self.client
            .set_mode(Mode::Sgp4)
            .await
            .map_err(abort(action, "set_mode"))?;
        let reply = self
            .client
            .set_manual_tle(&tle.name, &tle.line1, &tle.line2)
            .await
            .map_err(abort(action, "set_manual_tle"))?;

        self.converge();
        Ok(reply)
    }

    /// `refreshTLE(selected)` then `getSatellites()`. Without a confirmed
    /// selection this succeeds immediately with `None`.
    pub async fn refresh_tle(&self) -> Result<Option<Vec<SatelliteEntry>>, CommandError> {
        let Some(selected) = self.refresher.slot().selected_satellite() else {
            log::debug!("No satellite selected, skipping TLE refresh");
            return Ok(None);
        };

        let action = Action::RefreshTle;
        let _guard = self.begin(action)?;
        self.client
            .refresh_tle(&selected)
            .await
            .map_err(abort(action, "refresh_tle"))?;
        let catalog = self
            .client
            .satellites()
            .await
            .map_err(abort(action, "satellites"))?;

        self.converge();
        Ok(Some(catalog))
    }

    pub async fn nudge_motor(&self, motor: Motor, delta: f64) -> Result<(), CommandError> {
        if !delta.is_finite() {
            return Err(CommandError::validation("nudge delta must be a number"));
        }

        let action = Action::NudgeMotor;
        let _guard = self.begin(action)?;
        self.client
            .nudge_motor(motor, delta)
            .await
            .map_err(abort(action, "nudge_motor"))?;

        self.converge();
        Ok(())
    }

    /// Read-only; leaves the view untouched.
    pub async fn scan_wifi(&self) -> Result<Vec<String>, CommandError> {
        let action = Action::ScanWifi;
        let _guard = self.begin(action)?;
        self.client
            .scan_wifi()
            .await
            .map_err(abort(action, "scan_wifi"))
    }

    /// The device restarts its network after accepting new credentials, so
    /// no refresh is scheduled and the following poll failures are expected.
    pub async fn save_wifi_config(
        &self,
        ssid: &str,
        password: &str,
    ) -> Result<DeviceMessage, CommandError> {
        let ssid = ssid.trim();
        if ssid.is_empty() {
            return Err(CommandError::validation("ssid is required"));
        }

        let action = Action::SaveWifi;
        let _guard = self.begin(action)?;
        let reply = self
            .client
            .save_wifi_config(ssid, password)
            .await
            .map_err(abort(action, "save_wifi_config"))?;

        self.refresher.slot().expect_reconnect();
        Ok(reply)
    }
}

fn abort(action: Action, step: &'static str) -> impl FnOnce(DeviceError) -> CommandError {
    move |err| {
        log::warn!("{action} aborted at {step}: {err}");
        CommandError::device(action, step, err)
    }
}
