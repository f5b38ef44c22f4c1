use thiserror::Error;

use crate::device::DeviceError;

use super::Action;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("{0} already in progress")]
    Busy(Action),
    #[error("{action} failed at {step}: {source}")]
    Device {
        action: Action,
        step: &'static str,
        #[source]
        source: DeviceError,
    },
}

impl CommandError {
    pub fn validation(reason: impl Into<String>) -> Self {
        CommandError::Validation(reason.into())
    }

    pub(super) fn device(action: Action, step: &'static str, source: DeviceError) -> Self {
        CommandError::Device {
            action,
            step,
            source,
        }
    }

    /// Name of the device call that aborted the sequence.
    pub fn failed_step(&self) -> Option<&'static str> {
        match self {
            CommandError::Device { step, .. } => Some(step),
            _ => None,
        }
    }
}
