use std::sync::Arc;
use uuid::Uuid;

use crate::errors::SensorError;
use crate::types::{ReadingCallback, SamplingRate, Sensor, SensorAccuracy, SensorEvent, SensorKind};

/// Receiver of hardware callbacks, invoked on whatever thread or task the
/// platform delivers them.
pub trait SensorEventListener: Send + Sync {
    /// New values are available. `None` models a callback without payload.
    fn on_sensor_changed(&self, event: Option<&SensorEvent>);
    fn on_accuracy_changed(&self, sensor: &Sensor, accuracy: SensorAccuracy);
}

/// Platform sensor service.
pub trait SensorManagerPort: Send + Sync {
    /// Returns the default sensor of the given kind, if the device has one.
    fn get_default_sensor(&self, kind: SensorKind) -> Option<Sensor>;

    /// Starts delivering callbacks for `sensor` to `listener`.
    /// Returns the id of the registration.
    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        sensor: &Sensor,
        sampling_rate: SamplingRate,
    ) -> Result<Uuid, SensorError>;

    /// Stops delivering callbacks for a registration. Unknown ids are ignored.
    fn unregister_listener(&self, registration_id: Uuid);
}

/// Capability injected into the stream bridge: a switchable source of readings.
pub trait MagnetometerSource: Send + Sync {
    /// Starts (or keeps) the sensor running and routes readings to `callback`.
    /// Calling it while active only replaces the callback.
    fn activate(&self, callback: ReadingCallback) -> Result<(), SensorError>;

    /// Stops the sensor. Safe to call when not active.
    fn deactivate(&self);

    fn is_active(&self) -> bool;
}
