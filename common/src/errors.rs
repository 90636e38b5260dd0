//! Module errors

use thiserror::Error;

use crate::types::SensorKind;

/// Failures raised between the platform sensor service and the relay.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    /// The platform has no default sensor of the requested kind.
    #[error("no {0} sensor available on this device")]
    SensorUnavailable(SensorKind),

    /// A sensor callback carried no payload or fewer than three values.
    #[error("malformed sensor event: expected at least 3 values, got {received}")]
    MalformedSensorEvent { received: usize },

    /// A sensor callback carried NaN or an infinite value, which has no
    /// floating-point representation on the host side.
    #[error("malformed sensor event: value {index} is not finite")]
    NonFiniteSample { index: usize },

    /// The platform refused the listener registration.
    #[error("listener registration rejected: {0}")]
    RegistrationFailed(String),

    /// A pushed event could not be decoded back into a reading.
    #[error("incorrect data format: {0}")]
    IncorrectDataFormat(String),
}
