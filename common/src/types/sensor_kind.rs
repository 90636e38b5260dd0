use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the kinds of sensor a platform sensor service can be queried for.
///
/// # Variants
///
/// - `MagneticField`: ambient magnetic flux density along three device axes (µT).
/// - `Accelerometer`: acceleration along three device axes (m/s^2).
/// - `Gyroscope`: angular velocity around three device axes (rad/s).
///
/// # Examples
///
/// ```
/// use common::SensorKind;
///
/// let kind = SensorKind::try_from("magn").unwrap();
/// assert_eq!(kind, SensorKind::MagneticField);
/// assert_eq!(kind.iio_prefix(), "magn");
///
/// assert!(SensorKind::try_from("pressure").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    MagneticField,
    Accelerometer,
    Gyroscope,
}

const MAGN_PREFIX: &str = "magn";
const ACCEL_PREFIX: &str = "accel";
const ANGLVEL_PREFIX: &str = "anglvel";

impl SensorKind {
    /// Channel prefix used by the Linux Industrial I/O subsystem for this kind.
    pub fn iio_prefix(&self) -> &'static str {
        match self {
            SensorKind::MagneticField => MAGN_PREFIX,
            SensorKind::Accelerometer => ACCEL_PREFIX,
            SensorKind::Gyroscope => ANGLVEL_PREFIX,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::MagneticField => "magnetic field",
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
        };
        f.write_str(name)
    }
}

impl TryFrom<&str> for SensorKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower_case_value = value.to_lowercase();

        if lower_case_value.starts_with(MAGN_PREFIX) {
            Ok(Self::MagneticField)
        } else if lower_case_value.starts_with(ACCEL_PREFIX) {
            Ok(Self::Accelerometer)
        } else if lower_case_value.starts_with(ANGLVEL_PREFIX)
            || lower_case_value.starts_with("gyr")
        {
            Ok(Self::Gyroscope)
        } else {
            Err(format!("Unknown sensor kind: {}", value))
        }
    }
}
