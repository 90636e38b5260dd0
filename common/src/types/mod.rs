pub mod callback;
pub mod reading;
pub mod sampling_rate;
pub mod sensor;
pub mod sensor_event;
pub mod sensor_kind;
pub mod sink_event;

pub use callback::ReadingCallback;
pub use reading::MagnetometerReading;
pub use sampling_rate::SamplingRate;
pub use sensor::{Sensor, SensorAccuracy};
pub use sensor_event::SensorEvent;
pub use sensor_kind::SensorKind;
pub use sink_event::{PlatformError, SinkEvent};
