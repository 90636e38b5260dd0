use std::sync::Arc;

use crate::errors::SensorError;
use crate::types::MagnetometerReading;

/// Callback handed to a `MagnetometerSource` on activation.
///
/// Receives one `Ok` per hardware reading, or an `Err` when the platform
/// delivered a payload that could not be turned into a reading.
pub type ReadingCallback = Arc<dyn Fn(Result<MagnetometerReading, SensorError>) + Send + Sync>;
