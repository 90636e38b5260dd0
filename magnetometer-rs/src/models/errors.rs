//! Module errors

use thiserror::Error;

use common::SensorError;
use event_channel::ChannelError;

/// Represents the different types of errors that can occur in the magnetometer library.
#[derive(Debug, Error)]
pub enum MagnetometerError {
    /// Error raised between the platform sensor service and the relay.
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Error raised by the event channel.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Error reading configuration or sensor files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Recorded trace could not be loaded.
    #[error("trace error: {0}")]
    Trace(String),

    /// Adapter was built outside of a tokio runtime.
    #[error("runtime error: {0}")]
    Runtime(String),
}
