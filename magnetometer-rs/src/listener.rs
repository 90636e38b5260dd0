use log::{debug, error, info, trace};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

use common::{
    MagnetometerReading, MagnetometerSource, ReadingCallback, SamplingRate, Sensor,
    SensorAccuracy, SensorError, SensorEvent, SensorEventListener, SensorKind, SensorManagerPort,
};

/// Part of the adapter handed to the platform. Callbacks may arrive on any thread.
struct ListenerCore {
    callback: RwLock<Option<ReadingCallback>>,
    latest: RwLock<Option<MagnetometerReading>>,
}

impl ListenerCore {
    fn new() -> Self {
        Self {
            callback: RwLock::new(None),
            latest: RwLock::new(None),
        }
    }
}

impl SensorEventListener for ListenerCore {
    fn on_sensor_changed(&self, event: Option<&SensorEvent>) {
        let values = event.map(SensorEvent::values).unwrap_or_default();
        let result = MagnetometerReading::try_from(values);
        match &result {
            Ok(reading) => *self.latest.write() = Some(*reading),
            Err(e) => error!("Unexpected magnetometer callback: {}", e),
        }

        let callback = self.callback.read().clone();
        match callback {
            Some(callback) => callback(result),
            None => trace!("No consumer attached, dropping magnetometer reading"),
        }
    }

    fn on_accuracy_changed(&self, sensor: &Sensor, accuracy: SensorAccuracy) {
        info!("Sensor accuracy of {} changed to {:?}", sensor, accuracy);
    }
}

/// Bridges a platform sensor service to a `MagnetometerSource`.
///
/// Registers for the default magnetic-field sensor on `activate`, turns every
/// hardware callback into a `MagnetometerReading` and hands it to the callback
/// given on activation.
pub struct SensorListenerAdapter<P> {
    port: Arc<P>,
    core: Arc<ListenerCore>,
    registration: Mutex<Option<Uuid>>,
    sampling_rate: SamplingRate,
}

impl<P> SensorListenerAdapter<P>
where
    P: SensorManagerPort,
{
    pub fn new(port: Arc<P>, sampling_rate: SamplingRate) -> Self {
        Self {
            port,
            core: Arc::new(ListenerCore::new()),
            registration: Mutex::new(None),
            sampling_rate,
        }
    }

    /// Last reading received from the hardware, whether or not it was forwarded.
    pub fn latest(&self) -> Option<MagnetometerReading> {
        *self.core.latest.read()
    }

    pub fn sampling_rate(&self) -> SamplingRate {
        self.sampling_rate
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    fn set_callback(&self, callback: Option<ReadingCallback>) {
        *self.core.callback.write() = callback;
    }
}

impl<P> MagnetometerSource for SensorListenerAdapter<P>
where
    P: SensorManagerPort,
{
    fn activate(&self, callback: ReadingCallback) -> Result<(), SensorError> {
        let mut registration = self.registration.lock();
        self.set_callback(Some(callback));
        if let Some(id) = *registration {
            debug!("Magnetometer listener {} already registered", id);
            return Ok(());
        }

        let registered = self
            .port
            .get_default_sensor(SensorKind::MagneticField)
            .ok_or(SensorError::SensorUnavailable(SensorKind::MagneticField))
            .and_then(|sensor| {
                let id = self.port.register_listener(
                    self.core.clone(),
                    &sensor,
                    self.sampling_rate,
                )?;
                info!(
                    "Magnetometer listener {} registered on {} at {:?}",
                    id, sensor, self.sampling_rate
                );
                Ok(id)
            });

        match registered {
            Ok(id) => {
                *registration = Some(id);
                Ok(())
            }
            Err(e) => {
                self.set_callback(None);
                Err(e)
            }
        }
    }

    fn deactivate(&self) {
        let registration = self.registration.lock().take();
        self.set_callback(None);
        match registration {
            Some(id) => {
                self.port.unregister_listener(id);
                info!("Magnetometer listener {} unregistered", id);
            }
            None => debug!("Magnetometer listener not registered, nothing to deactivate"),
        }
    }

    fn is_active(&self) -> bool {
        self.registration.lock().is_some()
    }
}
