mod client;
mod error;
mod types;

#[cfg(test)]
pub mod fake;

pub use client::{DeviceApi, HttpDeviceClient};
pub use error::DeviceError;
pub use types::{
    DerivedRates, DeviceMessage, DeviceStatus, Mode, Motor, MotorPositions, OrbitParams, Position,
    RtcStatus, SatelliteEntry, WifiStatus,
};
