use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::device::DeviceError;
use crate::orchestrator::CommandError;

pub enum ApiError {
    Validation(String),
    NotFound(String),
    Busy(String),
    Device {
        step: Option<&'static str>,
        source: DeviceError,
    },
}

impl From<CommandError> for ApiError {
    fn from(e: CommandError) -> Self {
        let step = e.failed_step();
        match e {
            CommandError::Validation(msg) => ApiError::Validation(msg),
            CommandError::UnknownPreset(_) => ApiError::NotFound(e.to_string()),
            CommandError::Busy(_) => ApiError::Busy(e.to_string()),
            CommandError::Device { source, .. } => ApiError::Device { step, source },
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(source: DeviceError) -> Self {
        ApiError::Device { step: None, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("not_found", &msg)),
            )
                .into_response(),
            ApiError::Busy(msg) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::with_message("action_in_progress", &msg)),
            )
                .into_response(),
            ApiError::Device { step, source } if source.is_transport() => (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse::from_device(
                    "device_unreachable",
                    &source.to_string(),
                    step,
                    &source,
                )),
            )
                .into_response(),
            ApiError::Device { step, source } => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::from_device(
                    "device_rejected",
                    source.message(),
                    step,
                    &source,
                )),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Device call that aborted a command sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    /// HTTP status the device answered with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_status: Option<u16>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
            step: None,
            device_status: None,
        }
    }

    fn from_device(error: &str, message: &str, step: Option<&str>, source: &DeviceError) -> Self {
        ErrorResponse {
            step: step.map(str::to_string),
            device_status: source.status(),
            ..Self::with_message(error, message)
        }
    }
}
