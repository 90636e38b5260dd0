/// Name of the event channel the magnetometer stream is served on.
pub const MAGNETOMETER_EVENTS_CHANNEL: &str = "flutter_magnetometer/magnetometer-events";

pub(crate) const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";
pub(crate) const IIO_DEVICE_PREFIX: &str = "iio:device";
// IIO reports magnetic flux density in gauss.
pub(crate) const GAUSS_TO_MICROTESLA: f32 = 100.0;
// Poll period used when `SamplingRate::Fastest` asks for no delay at all.
pub(crate) const MIN_POLL_PERIOD_MICROS: u64 = 1_000;

/// Error codes pushed to the consumer.
pub const SENSOR_UNAVAILABLE_CODE: &str = "SENSOR_UNAVAILABLE";
pub const MALFORMED_SENSOR_EVENT_CODE: &str = "MALFORMED_SENSOR_EVENT";
pub const REGISTRATION_FAILED_CODE: &str = "REGISTRATION_FAILED";
