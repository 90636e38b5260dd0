use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use common::SamplingRate;

use crate::constants::{DEFAULT_IIO_ROOT, MAGNETOMETER_EVENTS_CHANNEL};
use crate::models::errors::MagnetometerError;

/// Configuration of the magnetometer relay.
///
/// Every field is optional in JSON; missing fields take their default.
///
/// ```
/// use magnetometer_rs::MagnetometerConfig;
/// use common::SamplingRate;
///
/// let config = MagnetometerConfig::from_json_str(r#"{"sampling_rate": "game"}"#).unwrap();
/// assert_eq!(config.sampling_rate, SamplingRate::Game);
/// assert_eq!(config.channel_name, "flutter_magnetometer/magnetometer-events");
/// assert!(config.report_missing_sensor);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetometerConfig {
    /// Event channel the stream is served on.
    pub channel_name: String,
    /// Rate hint passed to the platform on registration.
    pub sampling_rate: SamplingRate,
    /// Push a `SENSOR_UNAVAILABLE` error to the consumer when the device has no
    /// magnetometer. When false the stream just stays silent.
    pub report_missing_sensor: bool,
    /// Root of the Linux IIO sysfs tree.
    pub iio_root: PathBuf,
}

impl Default for MagnetometerConfig {
    fn default() -> Self {
        Self {
            channel_name: MAGNETOMETER_EVENTS_CHANNEL.to_string(),
            sampling_rate: SamplingRate::Ui,
            report_missing_sensor: true,
            iio_root: PathBuf::from(DEFAULT_IIO_ROOT),
        }
    }
}

impl MagnetometerConfig {
    pub fn from_json_str(config: &str) -> Result<Self, MagnetometerError> {
        Ok(serde_json::from_str(config)?)
    }

    pub fn from_json_file<T: AsRef<Path>>(path: T) -> Result<Self, MagnetometerError> {
        let config = std::fs::read_to_string(path)?;
        Self::from_json_str(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MagnetometerConfig::default();
        assert_eq!(config.channel_name, MAGNETOMETER_EVENTS_CHANNEL);
        assert_eq!(config.sampling_rate, SamplingRate::Ui);
        assert!(config.report_missing_sensor);
        assert_eq!(config.iio_root, PathBuf::from("/sys/bus/iio/devices"));
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = MagnetometerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MagnetometerConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = MagnetometerConfig::from_json_str(
            r#"{
                "channel_name": "compass/events",
                "sampling_rate": {"custom": {"period_micros": 10000}},
                "report_missing_sensor": false,
                "iio_root": "/tmp/iio"
            }"#,
        )
        .unwrap();
        assert_eq!(config.channel_name, "compass/events");
        assert_eq!(
            config.sampling_rate,
            SamplingRate::Custom {
                period_micros: 10_000
            }
        );
        assert!(!config.report_missing_sensor);
        assert_eq!(config.iio_root, PathBuf::from("/tmp/iio"));
    }

    #[test]
    fn test_invalid_json() {
        let result = MagnetometerConfig::from_json_str(r#"{"sampling_rate": "warp"}"#);
        assert!(matches!(result, Err(MagnetometerError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = MagnetometerConfig::from_json_file("/nonexistent/magnetometer.json");
        assert!(matches!(result, Err(MagnetometerError::Io(_))));
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("magnetometer-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"sampling_rate": "normal"}"#).unwrap();

        let config = MagnetometerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.sampling_rate, SamplingRate::Normal);

        std::fs::remove_file(path).unwrap();
    }
}
