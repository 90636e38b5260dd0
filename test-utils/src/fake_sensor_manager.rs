use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use common::{
    SamplingRate, Sensor, SensorAccuracy, SensorError, SensorEvent, SensorEventListener,
    SensorKind, SensorManagerPort,
};

const FAKE_TICK_NANOS: i64 = 60_000_000;

/// Synchronous stand-in for a platform sensor service.
///
/// Nothing happens on its own: tests push hardware callbacks with `emit`, which
/// runs every registered listener on the calling thread.
pub struct FakeSensorManager {
    sensor: Option<Sensor>,
    registrations: Mutex<HashMap<Uuid, Arc<dyn SensorEventListener>>>,
    last_sampling_rate: Mutex<Option<SamplingRate>>,
    register_calls: AtomicUsize,
    unregister_calls: AtomicUsize,
    clock: AtomicI64,
}

impl FakeSensorManager {
    /// Device with a magnetic-field sensor.
    pub fn new() -> Self {
        Self::with_sensor(Some(Self::magnetometer()))
    }

    /// Device lacking magnetic-field hardware.
    pub fn without_sensor() -> Self {
        Self::with_sensor(None)
    }

    fn with_sensor(sensor: Option<Sensor>) -> Self {
        Self {
            sensor,
            registrations: Mutex::new(HashMap::new()),
            last_sampling_rate: Mutex::new(None),
            register_calls: AtomicUsize::new(0),
            unregister_calls: AtomicUsize::new(0),
            clock: AtomicI64::new(0),
        }
    }

    pub fn magnetometer() -> Sensor {
        Sensor::new(SensorKind::MagneticField, "fake-magnetometer", "test", "fake:0")
    }

    /// Delivers a hardware callback carrying `values` to every registered listener.
    pub fn emit(&self, values: &[f32]) {
        let Some(sensor) = self.sensor.clone() else {
            return;
        };
        let timestamp = self.clock.fetch_add(FAKE_TICK_NANOS, Ordering::SeqCst);
        let event = SensorEvent::new(sensor, SensorAccuracy::High, timestamp, values.to_vec());
        for listener in self.listeners() {
            listener.on_sensor_changed(Some(&event));
        }
    }

    /// Delivers a hardware callback without payload.
    pub fn emit_empty(&self) {
        for listener in self.listeners() {
            listener.on_sensor_changed(None);
        }
    }

    pub fn change_accuracy(&self, accuracy: SensorAccuracy) {
        let Some(sensor) = self.sensor.clone() else {
            return;
        };
        for listener in self.listeners() {
            listener.on_accuracy_changed(&sensor, accuracy);
        }
    }

    /// Number of successful `register_listener` calls.
    pub fn register_count(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Number of `unregister_listener` calls that removed a registration.
    pub fn unregister_count(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }

    pub fn active_registrations(&self) -> usize {
        self.registrations.lock().len()
    }

    pub fn last_sampling_rate(&self) -> Option<SamplingRate> {
        *self.last_sampling_rate.lock()
    }

    // Listeners are cloned out so callbacks run without the lock held.
    fn listeners(&self) -> Vec<Arc<dyn SensorEventListener>> {
        self.registrations.lock().values().cloned().collect()
    }
}

impl Default for FakeSensorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorManagerPort for FakeSensorManager {
    fn get_default_sensor(&self, kind: SensorKind) -> Option<Sensor> {
        self.sensor
            .as_ref()
            .filter(|sensor| sensor.kind() == kind)
            .cloned()
    }

    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        sensor: &Sensor,
        sampling_rate: SamplingRate,
    ) -> Result<Uuid, SensorError> {
        if self.sensor.as_ref() != Some(sensor) {
            return Err(SensorError::SensorUnavailable(sensor.kind()));
        }
        let id = Uuid::new_v4();
        self.registrations.lock().insert(id, listener);
        *self.last_sampling_rate.lock() = Some(sampling_rate);
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        debug!("Fake listener {} registered", id);
        Ok(id)
    }

    fn unregister_listener(&self, registration_id: Uuid) {
        if self.registrations.lock().remove(&registration_id).is_some() {
            self.unregister_calls.fetch_add(1, Ordering::SeqCst);
            debug!("Fake listener {} unregistered", registration_id);
        }
    }
}
