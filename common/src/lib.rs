//! General functionality shared by the `magnetometer-rs` workspace.
//!
//! Holds the data model relayed from the platform sensor service to the host
//! (`MagnetometerReading`, `SensorEvent`, ...) and the seams between the
//! platform, the relay and the host event channel.

pub mod errors;

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

#[doc(inline)]
pub use errors::SensorError;

// Re-export traits
#[doc(inline)]
pub use traits::{
    EventSink, MagnetometerSource, SensorEventListener, SensorManagerPort, StreamHandler,
};

// Re-export types
#[doc(inline)]
pub use types::{
    MagnetometerReading, PlatformError, ReadingCallback, SamplingRate, Sensor, SensorAccuracy,
    SensorEvent, SensorKind, SinkEvent,
};
