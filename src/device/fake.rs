//! Scripted in-memory device used by the poller, orchestrator and session tests.
//!
//! Successful commands update the status served once the scripted queue is
//! empty, so tests can observe the device echoing what was applied.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::{
    DerivedRates, DeviceApi, DeviceError, DeviceMessage, DeviceStatus, Mode, Motor,
    MotorPositions, OrbitParams, SatelliteEntry,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    Satellites,
    SelectSatellite(String),
    RefreshTle(String),
    SetManualTle {
        name: String,
        line1: String,
        line2: String,
    },
    SetMode(Mode),
    SetTracking(bool),
    SetOrbitParams(OrbitParams),
    Motors,
    NudgeMotor(Motor, f64),
    ScanWifi,
    SaveWifiConfig(String),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Status => "status",
            Call::Satellites => "satellites",
            Call::SelectSatellite(_) => "select_satellite",
            Call::RefreshTle(_) => "refresh_tle",
            Call::SetManualTle { .. } => "set_manual_tle",
            Call::SetMode(_) => "set_mode",
            Call::SetTracking(_) => "set_tracking",
            Call::SetOrbitParams(_) => "set_orbit_params",
            Call::Motors => "motors",
            Call::NudgeMotor(..) => "nudge_motor",
            Call::ScanWifi => "scan_wifi",
            Call::SaveWifiConfig(_) => "save_wifi_config",
        }
    }
}

type ScriptedStatus = (Duration, Result<DeviceStatus, DeviceError>);

#[derive(Default)]
pub struct FakeDevice {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, DeviceError>>,
    statuses: Mutex<VecDeque<ScriptedStatus>>,
    fallback_status: Mutex<DeviceStatus>,
    satellites: Mutex<Vec<SatelliteEntry>>,
    command_delay: Mutex<Duration>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call named `call` fail with `err`.
    pub fn fail(&self, call: &'static str, err: DeviceError) {
        self.failures.lock().unwrap().insert(call, err);
    }

    /// Queues a one-shot status reply delivered after `delay`.
    pub fn push_status(&self, delay: Duration, result: Result<DeviceStatus, DeviceError>) {
        self.statuses.lock().unwrap().push_back((delay, result));
    }

    /// Reply used once the scripted queue is empty.
    pub fn set_status(&self, status: DeviceStatus) {
        *self.fallback_status.lock().unwrap() = status;
    }

    pub fn set_satellites(&self, satellites: Vec<SatelliteEntry>) {
        *self.satellites.lock().unwrap() = satellites;
    }

    /// Delays every non-status call, to keep a command sequence in flight.
    pub fn hold_commands(&self, delay: Duration) {
        *self.command_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than status polls, in issue order.
    pub fn commands(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::Status)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == name).count()
    }

    async fn command(&self, call: Call) -> Result<(), DeviceError> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);

        let delay = *self.command_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.failures.lock().unwrap().get(name) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl DeviceApi for FakeDevice {
    async fn status(&self) -> Result<DeviceStatus, DeviceError> {
        self.calls.lock().unwrap().push(Call::Status);

        let scripted = self.statuses.lock().unwrap().pop_front();
        let (delay, result) = scripted.unwrap_or_else(|| {
            (
                Duration::ZERO,
                Ok(self.fallback_status.lock().unwrap().clone()),
            )
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.failures.lock().unwrap().get("status") {
            return Err(err.clone());
        }
        result
    }

    async fn satellites(&self) -> Result<Vec<SatelliteEntry>, DeviceError> {
        self.command(Call::Satellites).await?;
        Ok(self.satellites.lock().unwrap().clone())
    }

    async fn select_satellite(&self, name: &str) -> Result<(), DeviceError> {
        self.command(Call::SelectSatellite(name.to_string())).await?;
        self.fallback_status.lock().unwrap().satellite = Some(name.to_string());
        Ok(())
    }

    async fn refresh_tle(&self, name: &str) -> Result<(), DeviceError> {
        self.command(Call::RefreshTle(name.to_string())).await
    }

    async fn set_manual_tle(
        &self,
        name: &str,
        line1: &str,
        line2: &str,
    ) -> Result<DeviceMessage, DeviceError> {
        self.command(Call::SetManualTle {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
        .await?;
        Ok(DeviceMessage {
            message: format!("TLE loaded for {name}"),
        })
    }

    async fn set_mode(&self, mode: Mode) -> Result<(), DeviceError> {
        self.command(Call::SetMode(mode)).await?;
        self.fallback_status.lock().unwrap().mode = Some(mode);
        Ok(())
    }

    async fn set_tracking(&self, tracking: bool) -> Result<(), DeviceError> {
        self.command(Call::SetTracking(tracking)).await?;
        self.fallback_status.lock().unwrap().tracking = tracking;
        Ok(())
    }

    async fn set_orbit_params(&self, params: OrbitParams) -> Result<DerivedRates, DeviceError> {
        self.command(Call::SetOrbitParams(params)).await?;
        self.fallback_status.lock().unwrap().orbital_params = Some(params);
        Ok(DerivedRates {
            aov_rate: 360.0 / (params.period_min * 60.0),
            eqx_rate: -0.004167,
        })
    }

    async fn motors(&self) -> Result<MotorPositions, DeviceError> {
        self.command(Call::Motors).await?;
        Ok(self
            .fallback_status
            .lock()
            .unwrap()
            .motors
            .clone()
            .unwrap_or_default())
    }

    async fn nudge_motor(&self, motor: Motor, delta: f64) -> Result<(), DeviceError> {
        self.command(Call::NudgeMotor(motor, delta)).await
    }

    async fn scan_wifi(&self) -> Result<Vec<String>, DeviceError> {
        self.command(Call::ScanWifi).await?;
        Ok(vec!["home".to_string(), "lab".to_string()])
    }

    async fn save_wifi_config(
        &self,
        ssid: &str,
        _password: &str,
    ) -> Result<DeviceMessage, DeviceError> {
        self.command(Call::SaveWifiConfig(ssid.to_string())).await?;
        Ok(DeviceMessage {
            message: format!("Restarting to join {ssid}"),
        })
    }
}
