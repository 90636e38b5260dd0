pub mod channel;
pub mod sensor;

pub use crate::traits::channel::{EventSink, StreamHandler};
pub use crate::traits::sensor::{MagnetometerSource, SensorEventListener, SensorManagerPort};
