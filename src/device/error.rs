use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeviceError {
    #[error("{operation}: device unreachable: {cause}")]
    Transport { operation: String, cause: String },
    #[error("{operation}: device rejected request with status {status}: {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },
    #[error("{operation}: unexpected response: {cause}")]
    Decode { operation: String, cause: String },
}

impl DeviceError {
    pub fn transport(operation: impl Into<String>, cause: impl ToString) -> Self {
        DeviceError::Transport {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    pub fn rejected(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        DeviceError::Rejected {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    pub fn decode(operation: impl Into<String>, cause: impl ToString) -> Self {
        DeviceError::Decode {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    /// HTTP status reported by the device, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeviceError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable reason without the operation prefix.
    pub fn message(&self) -> &str {
        match self {
            DeviceError::Transport { cause, .. } | DeviceError::Decode { cause, .. } => cause,
            DeviceError::Rejected { message, .. } => message,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, DeviceError::Transport { .. })
    }
}

impl From<(&str, reqwest::Error)> for DeviceError {
    fn from((operation, err): (&str, reqwest::Error)) -> Self {
        if let Some(status) = err.status() {
            DeviceError::rejected(operation, status.as_u16(), err.to_string())
        } else if err.is_decode() {
            DeviceError::decode(operation, err)
        } else {
            DeviceError::transport(operation, err)
        }
    }
}
