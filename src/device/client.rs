use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use trait_variant::make;

use super::error::DeviceError;
use super::types::{
    DerivedRates, DeviceMessage, DeviceStatus, ManualTleRequest, Mode, ModeRequest, Motor,
    MotorPositions, NudgeRequest, OrbitParams, OrbitParamsResponse, SatelliteCatalog,
    SatelliteEntry, SatelliteRequest, TrackingRequest, WifiConfigRequest, WifiScan,
};

/// One call per device capability. Every failure, whatever its origin, comes
/// back as a [`DeviceError`].
#[make(Send)]
pub trait DeviceApi {
    async fn status(&self) -> Result<DeviceStatus, DeviceError>;
    async fn satellites(&self) -> Result<Vec<SatelliteEntry>, DeviceError>;
    async fn select_satellite(&self, name: &str) -> Result<(), DeviceError>;
    async fn refresh_tle(&self, name: &str) -> Result<(), DeviceError>;
    async fn set_manual_tle(
        &self,
        name: &str,
        line1: &str,
        line2: &str,
    ) -> Result<DeviceMessage, DeviceError>;
    async fn set_mode(&self, mode: Mode) -> Result<(), DeviceError>;
    async fn set_tracking(&self, tracking: bool) -> Result<(), DeviceError>;
    async fn set_orbit_params(&self, params: OrbitParams) -> Result<DerivedRates, DeviceError>;
    async fn motors(&self) -> Result<MotorPositions, DeviceError>;
    async fn nudge_motor(&self, motor: Motor, delta: f64) -> Result<(), DeviceError>;
    async fn scan_wifi(&self) -> Result<Vec<String>, DeviceError>;
    async fn save_wifi_config(&self, ssid: &str, password: &str)
        -> Result<DeviceMessage, DeviceError>;
}

#[derive(Clone)]
pub struct HttpDeviceClient {
    client: Client,
    base_url: String,
}

impl HttpDeviceClient {
    const STATUS_ENDPOINT: &'static str = "/api/status";
    const SATELLITES_ENDPOINT: &'static str = "/api/satellites";
    const SATELLITE_ENDPOINT: &'static str = "/api/satellite";
    const TLE_REFRESH_ENDPOINT: &'static str = "/api/tle/refresh";
    const TLE_MANUAL_ENDPOINT: &'static str = "/api/tle/manual";
    const MODE_ENDPOINT: &'static str = "/api/mode";
    const TRACKING_ENDPOINT: &'static str = "/api/tracking";
    const ORBIT_PARAMS_ENDPOINT: &'static str = "/api/orbit/params";
    const MOTORS_ENDPOINT: &'static str = "/api/motors";
    const NUDGE_ENDPOINT: &'static str = "/api/motors/nudge";
    const WIFI_SCAN_ENDPOINT: &'static str = "/api/wifi/scan";
    const WIFI_CONFIG_ENDPOINT: &'static str = "/api/wifi/config";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeviceError::transport("build http client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        let normalized_path = path.trim_start_matches('/');
        format!("{}/{normalized_path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeviceError> {
        let url = self.build_url(path);
        let operation = format!("GET {path}");
        log::debug!("GET {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DeviceError::from((operation.as_str(), e)))?;

        decode_response(res, &operation).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, DeviceError>
    where
        B: Serialize + std::fmt::Debug + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        let operation = format!("POST {path}");
        log::debug!("POST {url} with body: {body:?}");

        let res = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| DeviceError::from((operation.as_str(), e)))?;

        decode_response(res, &operation).await
    }

    /// POST whose reply body carries nothing the caller needs.
    async fn post_ack<B>(&self, path: &str, body: &B) -> Result<(), DeviceError>
    where
        B: Serialize + std::fmt::Debug + ?Sized,
    {
        self.post::<B, serde::de::IgnoredAny>(path, body)
            .await
            .map(|_| ())
    }
}

/// Checks the status code and decodes the JSON body.
///
/// An empty 2xx body decodes as JSON `null`, so acknowledgement-only calls
/// succeed whether or not the device sends a payload.
async fn decode_response<T: DeserializeOwned>(
    res: Response,
    operation: &str,
) -> Result<T, DeviceError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| DeviceError::transport(operation, e))?;

    if !status.is_success() {
        return Err(DeviceError::rejected(
            operation,
            status.as_u16(),
            rejection_message(&body),
        ));
    }

    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(body).map_err(|e| DeviceError::decode(operation, e))
}

/// Pulls the device's own explanation out of an error body when it sent one.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl DeviceApi for HttpDeviceClient {
    async fn status(&self) -> Result<DeviceStatus, DeviceError> {
        self.get(Self::STATUS_ENDPOINT).await
    }

    async fn satellites(&self) -> Result<Vec<SatelliteEntry>, DeviceError> {
        let catalog: Option<SatelliteCatalog> = self.get(Self::SATELLITES_ENDPOINT).await?;
        Ok(catalog.unwrap_or_default().satellites)
    }

    async fn select_satellite(&self, name: &str) -> Result<(), DeviceError> {
        self.post_ack(Self::SATELLITE_ENDPOINT, &SatelliteRequest { satellite: name })
            .await
    }

    async fn refresh_tle(&self, name: &str) -> Result<(), DeviceError> {
        self.post_ack(Self::TLE_REFRESH_ENDPOINT, &SatelliteRequest { satellite: name })
            .await
    }

    async fn set_manual_tle(
        &self,
        name: &str,
        line1: &str,
        line2: &str,
    ) -> Result<DeviceMessage, DeviceError> {
        let reply: Option<DeviceMessage> = self
            .post(
                Self::TLE_MANUAL_ENDPOINT,
                &ManualTleRequest { name, line1, line2 },
            )
            .await?;
        Ok(reply.unwrap_or_default())
    }

    async fn set_mode(&self, mode: Mode) -> Result<(), DeviceError> {
        self.post_ack(Self::MODE_ENDPOINT, &ModeRequest { mode }).await
    }

    async fn set_tracking(&self, tracking: bool) -> Result<(), DeviceError> {
        self.post_ack(Self::TRACKING_ENDPOINT, &TrackingRequest { tracking })
            .await
    }

    async fn set_orbit_params(&self, params: OrbitParams) -> Result<DerivedRates, DeviceError> {
        let response: OrbitParamsResponse = self.post(Self::ORBIT_PARAMS_ENDPOINT, &params).await?;
        Ok(response.params)
    }

    async fn motors(&self) -> Result<MotorPositions, DeviceError> {
        self.get(Self::MOTORS_ENDPOINT).await
    }

    async fn nudge_motor(&self, motor: Motor, delta: f64) -> Result<(), DeviceError> {
        self.post_ack(Self::NUDGE_ENDPOINT, &NudgeRequest { motor, delta })
            .await
    }

    async fn scan_wifi(&self) -> Result<Vec<String>, DeviceError> {
        let scan: Option<WifiScan> = self.get(Self::WIFI_SCAN_ENDPOINT).await?;
        Ok(scan.unwrap_or_default().networks)
    }

    async fn save_wifi_config(
        &self,
        ssid: &str,
        password: &str,
    ) -> Result<DeviceMessage, DeviceError> {
        let reply: Option<DeviceMessage> = self
            .post(
                Self::WIFI_CONFIG_ENDPOINT,
                &WifiConfigRequest { ssid, password },
            )
            .await?;
        Ok(reply.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod build_url {
        use super::*;

        fn create_test_client(base: &str) -> HttpDeviceClient {
            HttpDeviceClient::new(base, Duration::from_secs(1)).unwrap()
        }

        #[test]
        fn joins_base_and_path() {
            let client = create_test_client("http://192.168.4.1");
            assert_eq!(
                client.build_url("/api/status"),
                "http://192.168.4.1/api/status"
            );
        }

        #[test]
        fn strips_trailing_slash_from_base() {
            let client = create_test_client("http://orbigator.local/");
            assert_eq!(
                client.build_url("api/status"),
                "http://orbigator.local/api/status"
            );
        }

        #[test]
        fn collapses_multiple_leading_slashes() {
            let client = create_test_client("http://orbigator.local");
            assert_eq!(
                client.build_url("///api/motors"),
                "http://orbigator.local/api/motors"
            );
        }
    }

    mod rejection_message {
        use super::*;

        #[test]
        fn prefers_error_field() {
            assert_eq!(
                rejection_message(r#"{"error": "Unknown satellite"}"#),
                "Unknown satellite"
            );
        }

        #[test]
        fn falls_back_to_message_field() {
            assert_eq!(
                rejection_message(r#"{"message": "Invalid TLE"}"#),
                "Invalid TLE"
            );
        }

        #[test]
        fn uses_raw_body_when_not_json() {
            assert_eq!(rejection_message("  Bad Request \n"), "Bad Request");
        }
    }

    #[tokio::test]
    async fn unreachable_device_is_a_transport_error() {
        let client = HttpDeviceClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.status().await.unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err}");
        assert_eq!(err.status(), None);
    }
}
