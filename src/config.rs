use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration for {field}: {cause}")]
    Duration { field: &'static str, cause: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub device: DeviceConfig,
    pub polling: PollingConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollingConfig {
    /// Dashboard refresh period.
    pub interval: Duration,
    /// Live telemetry refresh period.
    pub telemetry_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    device: DeviceSection,
    #[serde(default)]
    polling: PollingSection,
    #[serde(default)]
    web: WebConfig,
}

#[derive(Debug, Deserialize)]
struct DeviceSection {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_timeout")]
    timeout: String,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PollingSection {
    #[serde(default = "default_interval")]
    interval: String,
    #[serde(default = "default_telemetry_interval")]
    telemetry_interval: String,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            telemetry_interval: default_telemetry_interval(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "http://192.168.4.1".to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_interval() -> String {
    "60s".to_string()
}

fn default_telemetry_interval() -> String {
    "2s".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceConfig {
                base_url: default_base_url(),
                timeout: Duration::from_secs(10),
            },
            polling: PollingConfig {
                interval: Duration::from_secs(60),
                telemetry_interval: Duration::from_secs(2),
            },
            web: WebConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let file: Option<ConfigFile> = serde_yaml::from_str(content)?;
        Self::resolve(file.unwrap_or_default())
    }

    fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        Ok(Config {
            device: DeviceConfig {
                base_url: file.device.base_url,
                timeout: parse_duration("device.timeout", &file.device.timeout)?,
            },
            polling: PollingConfig {
                interval: parse_duration("polling.interval", &file.polling.interval)?,
                telemetry_interval: parse_duration(
                    "polling.telemetry_interval",
                    &file.polling.telemetry_interval,
                )?,
            },
            web: file.web,
        })
    }
}

fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    let duration = humantime::parse_duration(s.trim()).map_err(|e| ConfigError::Duration {
        field,
        cause: e.to_string(),
    })?;
    if duration.is_zero() {
        return Err(ConfigError::Duration {
            field,
            cause: "must be greater than zero".to_string(),
        });
    }
    Ok(duration)
}
