use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SensorError;

pub const N_XYZ_COORDINATES: usize = 3;

const X_KEY: &str = "x";
const Y_KEY: &str = "y";
const Z_KEY: &str = "z";

/// A single magnetometer reading along the device's coordinate system.
///
/// The attributes are stored as µT (microtesla).
///
/// # Examples
///
/// ```
/// use common::MagnetometerReading;
///
/// let reading = MagnetometerReading::try_from(&[1.0f32, 2.0, 3.0, 0.5][..]).unwrap();
/// assert_eq!(reading, MagnetometerReading::new(1.0, 2.0, 3.0));
///
/// let map = reading.to_map();
/// assert_eq!(map.len(), 3);
/// assert_eq!(map["z"].as_f64(), Some(3.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct MagnetometerReading {
    x: f32,
    y: f32,
    z: f32,
}

impl MagnetometerReading {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn inner(&self) -> [f32; N_XYZ_COORDINATES] {
        [self.x, self.y, self.z]
    }

    /// Representation of the reading as the `{x, y, z}` map pushed to the host.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(N_XYZ_COORDINATES);
        map.insert(X_KEY.to_string(), Value::from(self.x));
        map.insert(Y_KEY.to_string(), Value::from(self.y));
        map.insert(Z_KEY.to_string(), Value::from(self.z));
        map
    }
}

impl From<[f32; N_XYZ_COORDINATES]> for MagnetometerReading {
    fn from(value: [f32; N_XYZ_COORDINATES]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<MagnetometerReading> for [f32; N_XYZ_COORDINATES] {
    fn from(value: MagnetometerReading) -> Self {
        value.inner()
    }
}

impl From<MagnetometerReading> for Value {
    fn from(value: MagnetometerReading) -> Self {
        Value::Object(value.to_map())
    }
}

/// Takes the first three values of a raw sensor payload. Trailing values are ignored.
/// NaN and infinities are rejected, since they cannot be pushed as JSON numbers.
impl TryFrom<&[f32]> for MagnetometerReading {
    type Error = SensorError;

    fn try_from(value: &[f32]) -> Result<Self, Self::Error> {
        let [x, y, z, ..] = value else {
            return Err(SensorError::MalformedSensorEvent {
                received: value.len(),
            });
        };
        let xyz = [*x, *y, *z];
        if let Some(index) = xyz.iter().position(|v| !v.is_finite()) {
            return Err(SensorError::NonFiniteSample { index });
        }
        Ok(Self::from(xyz))
    }
}

impl TryFrom<&Value> for MagnetometerReading {
    type Error = SensorError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value
            .as_object()
            .ok_or_else(|| SensorError::IncorrectDataFormat(format!("not a map: {}", value)))?;
        if map.len() != N_XYZ_COORDINATES {
            return Err(SensorError::IncorrectDataFormat(format!(
                "expected {} keys, got {}",
                N_XYZ_COORDINATES,
                map.len()
            )));
        }
        let coordinate = |key: &str| {
            map.get(key)
                .and_then(Value::as_f64)
                .map(|v| v as f32)
                .ok_or_else(|| SensorError::IncorrectDataFormat(format!("missing `{}`", key)))
        };
        Ok(Self::new(
            coordinate(X_KEY)?,
            coordinate(Y_KEY)?,
            coordinate(Z_KEY)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new() {
        let reading = MagnetometerReading::new(1.0, -2.5, 48.0);
        assert_eq!(reading.x(), 1.0);
        assert_eq!(reading.y(), -2.5);
        assert_eq!(reading.z(), 48.0);
        assert_eq!(reading.inner(), [1.0, -2.5, 48.0]);
    }

    #[test]
    fn test_to_map_has_exactly_xyz() {
        let map = MagnetometerReading::new(1.0, 2.0, 3.0).to_map();
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(map["x"].as_f64(), Some(1.0));
        assert_eq!(map["y"].as_f64(), Some(2.0));
        assert_eq!(map["z"].as_f64(), Some(3.0));
    }

    #[test]
    fn test_from_slice_ignores_trailing_values() {
        let reading = MagnetometerReading::try_from(&[4.0f32, 5.0, 6.0, 7.0, 8.0][..]).unwrap();
        assert_eq!(reading, MagnetometerReading::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_from_short_slice_is_malformed() {
        assert_eq!(
            MagnetometerReading::try_from(&[1.0f32, 2.0][..]),
            Err(SensorError::MalformedSensorEvent { received: 2 })
        );
        assert_eq!(
            MagnetometerReading::try_from(&[0f32; 0][..]),
            Err(SensorError::MalformedSensorEvent { received: 0 })
        );
    }

    #[test]
    fn test_from_non_finite_slice_is_rejected() {
        assert_eq!(
            MagnetometerReading::try_from(&[f32::NAN, 2.0, f32::INFINITY][..]),
            Err(SensorError::NonFiniteSample { index: 0 })
        );
        assert_eq!(
            MagnetometerReading::try_from(&[1.0f32, 2.0, f32::NEG_INFINITY][..]),
            Err(SensorError::NonFiniteSample { index: 2 })
        );
        // Only the first three values count.
        let reading = MagnetometerReading::try_from(&[1.0f32, 2.0, 3.0, f32::NAN][..]).unwrap();
        assert_eq!(reading, MagnetometerReading::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_value() {
        let value = json!({"x": 10.5, "y": -3.0, "z": 0.0});
        let reading = MagnetometerReading::try_from(&value).unwrap();
        assert_eq!(reading, MagnetometerReading::new(10.5, -3.0, 0.0));
    }

    #[test]
    fn test_from_value_rejects_partial_map() {
        let value = json!({"x": 1.0, "y": 2.0});
        assert!(MagnetometerReading::try_from(&value).is_err());

        let value = json!({"x": 1.0, "y": 2.0, "w": 3.0});
        assert!(MagnetometerReading::try_from(&value).is_err());

        let value = json!([1.0, 2.0, 3.0]);
        assert!(MagnetometerReading::try_from(&value).is_err());
    }

    #[test]
    fn test_serialize_matches_map() {
        let reading = MagnetometerReading::new(1.0, 2.0, 3.0);
        let serialized = serde_json::to_value(reading).unwrap();
        assert_eq!(serialized, Value::from(reading));
    }
}
