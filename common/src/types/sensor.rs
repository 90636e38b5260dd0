use std::fmt;

use crate::types::SensorKind;

/// Handle to a hardware sensor as returned by a platform sensor service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sensor {
    kind: SensorKind,
    name: String,
    vendor: String,
    id: String,
}

impl Sensor {
    pub fn new(kind: SensorKind, name: &str, vendor: &str, id: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            vendor: vendor.to_string(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Platform specific identifier (e.g. the IIO device directory).
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind, self.id)
    }
}

/// Accuracy status reported by the platform alongside sensor values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorAccuracy {
    NoContact,
    Unreliable,
    Low,
    Medium,
    High,
}

impl TryFrom<i32> for SensorAccuracy {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::NoContact),
            0 => Ok(Self::Unreliable),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            _ => Err(format!("Unknown accuracy level: {}", value)),
        }
    }
}

impl From<SensorAccuracy> for i32 {
    fn from(value: SensorAccuracy) -> Self {
        match value {
            SensorAccuracy::NoContact => -1,
            SensorAccuracy::Unreliable => 0,
            SensorAccuracy::Low => 1,
            SensorAccuracy::Medium => 2,
            SensorAccuracy::High => 3,
        }
    }
}
