//! Replays a recorded magnetometer trace as if it came from hardware.

use dashmap::DashMap;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use common::{
    SamplingRate, Sensor, SensorAccuracy, SensorError, SensorEvent, SensorEventListener,
    SensorKind, SensorManagerPort,
};
use test_utils::csv_loader::{self, CsvColumnMapper};

use crate::constants::MIN_POLL_PERIOD_MICROS;
use crate::models::errors::MagnetometerError;

mod gaussian;

use gaussian::GaussianNoise;

const GAUSSIAN_SENSOR_MEAN: f32 = 0.0;
const GAUSSIAN_SENSOR_STDEV: f32 = 0.5;
const MOCK_SENSOR_NAME: &str = "replay-magnetometer";
const MOCK_SENSOR_VENDOR: &str = "mock";
const MOCK_SENSOR_ID: &str = "replay:0";

/// Sensor service replaying a CSV trace in a loop, one row per sampling period.
pub struct ReplaySensorManager {
    readings: Arc<Vec<[f32; 3]>>,
    sensor_noise: Option<GaussianNoise>,
    sensor: Option<Sensor>,
    runtime: Handle,
    registrations: DashMap<Uuid, JoinHandle<()>>,
    epoch: Instant,
}

impl ReplaySensorManager {
    /// Loads the `x, y, z` columns of `trace_path`.
    /// Fails if the trace cannot be read or has no rows, or if called outside of a tokio runtime.
    pub fn new<T: AsRef<Path>>(
        trace_path: T,
        add_sensor_noise: bool,
    ) -> Result<Self, MagnetometerError> {
        let runtime = Handle::try_current().map_err(|e| MagnetometerError::Runtime(e.to_string()))?;

        let trace_path = trace_path.as_ref().to_string_lossy();
        let mut mapper = CsvColumnMapper::new();
        mapper.add_mag();
        let readings: Vec<[f32; 3]> =
            csv_loader::load_csv_columns::<[f64; 3]>(&trace_path, &mapper.columns())
                .map_err(|e| MagnetometerError::Trace(format!("{}: {}", trace_path, e)))?
                .into_iter()
                .map(|row| row.map(|v| v as f32))
                .collect();
        if readings.is_empty() {
            return Err(MagnetometerError::Trace(format!(
                "{}: trace has no readings",
                trace_path
            )));
        }

        let sensor_noise = if add_sensor_noise {
            Some(GaussianNoise::new(
                GAUSSIAN_SENSOR_MEAN,
                GAUSSIAN_SENSOR_STDEV,
            )?)
        } else {
            None
        };

        info!("Loaded {} magnetometer readings from {}", readings.len(), trace_path);
        Ok(Self {
            readings: Arc::new(readings),
            sensor_noise,
            sensor: Some(Sensor::new(
                SensorKind::MagneticField,
                MOCK_SENSOR_NAME,
                MOCK_SENSOR_VENDOR,
                MOCK_SENSOR_ID,
            )),
            runtime,
            registrations: DashMap::new(),
            epoch: Instant::now(),
        })
    }

    /// Same service on a device that has no magnetometer.
    pub fn without_sensor(mut self) -> Self {
        self.sensor = None;
        self
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn active_registrations(&self) -> usize {
        self.registrations.len()
    }
}

impl SensorManagerPort for ReplaySensorManager {
    fn get_default_sensor(&self, kind: SensorKind) -> Option<Sensor> {
        self.sensor.clone().filter(|sensor| sensor.kind() == kind)
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

        let period = sampling_rate
            .period()
            .max(Duration::from_micros(MIN_POLL_PERIOD_MICROS));
        let readings = self.readings.clone();
        let sensor_noise = self.sensor_noise.clone();
        let epoch = self.epoch;
        let sensor = sensor.clone();
        let id = Uuid::new_v4();

        let handle = self.runtime.spawn(async move {
            let mut rng = StdRng::from_entropy();
            listener.on_accuracy_changed(&sensor, SensorAccuracy::High);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            for reading in readings.iter().cycle() {
                interval.tick().await;
                let values = match &sensor_noise {
                    Some(noise) => noise.add_noise(&mut rng, *reading),
                    None => *reading,
                };
                let timestamp = epoch.elapsed().as_nanos() as i64;
                let event =
                    SensorEvent::new(sensor.clone(), SensorAccuracy::High, timestamp, values.to_vec());
                listener.on_sensor_changed(Some(&event));
            }
        });
        self.registrations.insert(id, handle);
        info!("Replaying trace every {:?} for listener {}", period, id);
        Ok(id)
    }

    fn unregister_listener(&self, registration_id: Uuid) {
        if let Some((_, handle)) = self.registrations.remove(&registration_id) {
            handle.abort();
            debug!("Stopped replay for listener {}", registration_id);
        }
    }
}

impl Drop for ReplaySensorManager {
    fn drop(&mut self) {
        for entry in self.registrations.iter() {
            entry.value().abort();
        }
    }
}
