//! Linux Industrial I/O (IIO) sensor service.
//!
//! Sensors are discovered under the sysfs root (normally `/sys/bus/iio/devices`):
//! a device exposing `in_<prefix>_x_raw` is a sensor of the kind matching `<prefix>`.
//! Each registration polls the raw channels at the requested sampling period.

use dashmap::DashMap;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
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

use crate::constants::{GAUSS_TO_MICROTESLA, IIO_DEVICE_PREFIX, MIN_POLL_PERIOD_MICROS};
use crate::models::errors::MagnetometerError;

const AXES: [&str; 3] = ["x", "y", "z"];
const IIO_VENDOR: &str = "iio";
const UNKNOWN_NAME: &str = "unknown";

/// Raw channel files of one IIO device, with their scale and offset resolved.
struct IioChannels {
    raw: [PathBuf; 3],
    offset: [f32; 3],
    scale: [f32; 3],
}

impl IioChannels {
    fn open(device: &Path, kind: SensorKind) -> Result<Self, MagnetometerError> {
        let prefix = kind.iio_prefix();
        let unit = match kind {
            SensorKind::MagneticField => GAUSS_TO_MICROTESLA,
            SensorKind::Accelerometer | SensorKind::Gyroscope => 1.0,
        };

        let mut raw: [PathBuf; 3] = Default::default();
        let mut offset = [0f32; 3];
        let mut scale = [1f32; 3];
        for (i, axis) in AXES.iter().enumerate() {
            let raw_path = device.join(format!("in_{}_{}_raw", prefix, axis));
            if !raw_path.exists() {
                return Err(MagnetometerError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("missing channel {}", raw_path.display()),
                )));
            }
            raw[i] = raw_path;
            offset[i] = read_attribute(device, prefix, axis, "offset")?.unwrap_or(0.0);
            scale[i] = read_attribute(device, prefix, axis, "scale")?.unwrap_or(1.0) * unit;
        }
        Ok(Self { raw, offset, scale })
    }

    async fn read(&self) -> Result<Vec<f32>, MagnetometerError> {
        let mut values = Vec::with_capacity(AXES.len());
        for i in 0..AXES.len() {
            let raw = tokio::fs::read_to_string(&self.raw[i]).await?;
            let raw = parse_value(&raw, &self.raw[i])?;
            values.push((raw + self.offset[i]) * self.scale[i]);
        }
        Ok(values)
    }
}

/// Reads `in_<prefix>_<axis>_<name>`, falling back to the shared `in_<prefix>_<name>`.
fn read_attribute(
    device: &Path,
    prefix: &str,
    axis: &str,
    name: &str,
) -> Result<Option<f32>, MagnetometerError> {
    let candidates = [
        device.join(format!("in_{}_{}_{}", prefix, axis, name)),
        device.join(format!("in_{}_{}", prefix, name)),
    ];
    for path in candidates.iter() {
        if path.exists() {
            let value = std::fs::read_to_string(path)?;
            return Ok(Some(parse_value(&value, path)?));
        }
    }
    Ok(None)
}

fn parse_value(value: &str, path: &Path) -> Result<f32, MagnetometerError> {
    value.trim().parse::<f32>().map_err(|e| {
        MagnetometerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Sensor service backed by the Linux IIO sysfs interface.
pub struct IioSensorManager {
    root: PathBuf,
    runtime: Handle,
    registrations: DashMap<Uuid, JoinHandle<()>>,
    epoch: Instant,
}

impl IioSensorManager {
    /// Creates a sensor service rooted at `root`.
    /// Returns a Runtime error if called outside of a tokio runtime.
    pub fn new<T: AsRef<Path>>(root: T) -> Result<Self, MagnetometerError> {
        let runtime = Handle::try_current().map_err(|e| MagnetometerError::Runtime(e.to_string()))?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            runtime,
            registrations: DashMap::new(),
            epoch: Instant::now(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn devices(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };
        let mut devices: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(IIO_DEVICE_PREFIX)
            })
            .map(|entry| entry.path())
            .collect();
        devices.sort();
        devices
    }
}

impl SensorManagerPort for IioSensorManager {
    fn get_default_sensor(&self, kind: SensorKind) -> Option<Sensor> {
        let channel = format!("in_{}_x_raw", kind.iio_prefix());
        let device = self
            .devices()
            .into_iter()
            .find(|device| device.join(&channel).exists())?;

        let id = device.file_name()?.to_string_lossy().to_string();
        let name = std::fs::read_to_string(device.join("name"))
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|_| UNKNOWN_NAME.to_string());
        Some(Sensor::new(kind, &name, IIO_VENDOR, &id))
    }

    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        sensor: &Sensor,
        sampling_rate: SamplingRate,
    ) -> Result<Uuid, SensorError> {
        let channels = IioChannels::open(&self.root.join(sensor.id()), sensor.kind())
            .map_err(|e| SensorError::RegistrationFailed(e.to_string()))?;
        let period = sampling_rate
            .period()
            .max(Duration::from_micros(MIN_POLL_PERIOD_MICROS));
        let epoch = self.epoch;
        let sensor = sensor.clone();
        let id = Uuid::new_v4();

        let handle = self.runtime.spawn(async move {
            listener.on_accuracy_changed(&sensor, SensorAccuracy::High);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match channels.read().await {
                    Ok(values) => {
                        let timestamp = epoch.elapsed().as_nanos() as i64;
                        let event =
                            SensorEvent::new(sensor.clone(), SensorAccuracy::High, timestamp, values);
                        listener.on_sensor_changed(Some(&event));
                    }
                    Err(e) => warn!("Skipping sample from {}: {}", sensor, e),
                }
            }
        });
        self.registrations.insert(id, handle);
        info!("Polling IIO device every {:?} for listener {}", period, id);
        Ok(id)
    }

    fn unregister_listener(&self, registration_id: Uuid) {
        if let Some((_, handle)) = self.registrations.remove(&registration_id) {
            handle.abort();
            debug!("Stopped polling for listener {}", registration_id);
        }
    }
}

impl Drop for IioSensorManager {
    fn drop(&mut self) {
        for entry in self.registrations.iter() {
            entry.value().abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    struct FakeSysfs {
        root: PathBuf,
    }

    impl FakeSysfs {
        fn new() -> Self {
            let root = std::env::temp_dir().join(format!("iio-{}", Uuid::new_v4()));
            std::fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn add_device(&self, id: &str, name: &str, files: &[(&str, &str)]) -> PathBuf {
            let device = self.root.join(id);
            std::fs::create_dir_all(&device).unwrap();
            std::fs::write(device.join("name"), format!("{}\n", name)).unwrap();
            for (file, content) in files {
                std::fs::write(device.join(file), content).unwrap();
            }
            device
        }
    }

    impl Drop for FakeSysfs {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    struct ChannelListener {
        sender: mpsc::UnboundedSender<Vec<f32>>,
        accuracy: Mutex<Option<SensorAccuracy>>,
    }

    impl SensorEventListener for ChannelListener {
        fn on_sensor_changed(&self, event: Option<&SensorEvent>) {
            if let Some(event) = event {
                let _ = self.sender.send(event.values().to_vec());
            }
        }

        fn on_accuracy_changed(&self, _sensor: &Sensor, accuracy: SensorAccuracy) {
            *self.accuracy.lock() = Some(accuracy);
        }
    }

    fn magnetometer_files() -> Vec<(&'static str, &'static str)> {
        vec![
            ("in_magn_x_raw", "100\n"),
            ("in_magn_y_raw", "-50\n"),
            ("in_magn_z_raw", "0\n"),
            ("in_magn_scale", "0.0015\n"),
            ("in_magn_z_offset", "-200\n"),
        ]
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = IioSensorManager::new("/tmp");
        assert!(matches!(result, Err(MagnetometerError::Runtime(_))));
    }

    #[tokio::test]
    async fn test_default_sensor_discovery() {
        let sysfs = FakeSysfs::new();
        sysfs.add_device("iio:device1", "accel_3d", &[("in_accel_x_raw", "1")]);
        sysfs.add_device("iio:device0", "ak09911", &magnetometer_files());
        sysfs.add_device("trigger0", "ignored", &[("in_magn_x_raw", "1")]);

        let manager = IioSensorManager::new(&sysfs.root).unwrap();
        let sensor = manager
            .get_default_sensor(SensorKind::MagneticField)
            .unwrap();
        assert_eq!(sensor.name(), "ak09911");
        assert_eq!(sensor.id(), "iio:device0");
        assert_eq!(sensor.kind(), SensorKind::MagneticField);

        let sensor = manager
            .get_default_sensor(SensorKind::Accelerometer)
            .unwrap();
        assert_eq!(sensor.id(), "iio:device1");

        assert!(manager.get_default_sensor(SensorKind::Gyroscope).is_none());
    }

    #[tokio::test]
    async fn test_missing_root() {
        let manager = IioSensorManager::new("/nonexistent/iio").unwrap();
        assert!(manager
            .get_default_sensor(SensorKind::MagneticField)
            .is_none());
    }

    #[tokio::test]
    async fn test_register_polls_scaled_values() {
        let sysfs = FakeSysfs::new();
        sysfs.add_device("iio:device0", "ak09911", &magnetometer_files());
        let manager = IioSensorManager::new(&sysfs.root).unwrap();
        let sensor = manager
            .get_default_sensor(SensorKind::MagneticField)
            .unwrap();

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let listener = Arc::new(ChannelListener {
            sender,
            accuracy: Mutex::new(None),
        });
        let id = manager
            .register_listener(
                listener.clone(),
                &sensor,
                SamplingRate::Custom {
                    period_micros: 5_000,
                },
            )
            .unwrap();

        let values = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        // (raw + offset) * scale, gauss to µT
        let expected = [100.0 * 0.15, -50.0 * 0.15, -200.0 * 0.15];
        for (value, expected) in values.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-4, "{} != {}", value, expected);
        }
        assert_eq!(*listener.accuracy.lock(), Some(SensorAccuracy::High));

        manager.unregister_listener(id);
        tokio::time::sleep(Duration::from_millis(20)).await;
        while receiver.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_register_without_channels_fails() {
        let sysfs = FakeSysfs::new();
        sysfs.add_device("iio:device0", "broken", &[("in_magn_x_raw", "1")]);
        let manager = IioSensorManager::new(&sysfs.root).unwrap();
        let sensor = manager
            .get_default_sensor(SensorKind::MagneticField)
            .unwrap();

        let (sender, _receiver) = mpsc::unbounded_channel();
        let listener = Arc::new(ChannelListener {
            sender,
            accuracy: Mutex::new(None),
        });
        let result = manager.register_listener(listener, &sensor, SamplingRate::Ui);
        assert!(matches!(result, Err(SensorError::RegistrationFailed(_))));
    }
}
