use crate::types::{Sensor, SensorAccuracy};

/// Raw payload delivered by the platform on every hardware callback.
///
/// `values` holds the ordered axis values; a magnetic-field event carries at
/// least three. `timestamp_nanos` is monotonic and not relayed.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorEvent {
    sensor: Sensor,
    accuracy: SensorAccuracy,
    timestamp_nanos: i64,
    values: Vec<f32>,
}

impl SensorEvent {
    pub fn new(
        sensor: Sensor,
        accuracy: SensorAccuracy,
        timestamp_nanos: i64,
        values: Vec<f32>,
    ) -> Self {
        Self {
            sensor,
            accuracy,
            timestamp_nanos,
            values,
        }
    }

    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    pub fn accuracy(&self) -> SensorAccuracy {
        self.accuracy
    }

    pub fn timestamp_nanos(&self) -> i64 {
        self.timestamp_nanos
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
