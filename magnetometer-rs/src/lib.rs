//! # Crate magnetometer_rs
//!
//! ## magnetometer_rs
//!
//! The `magnetometer_rs` crate relays raw magnetometer readings from the platform sensor
//! service to a consumer subscribed on the `flutter_magnetometer/magnetometer-events`
//! event channel. Each reading is pushed as a map `{"x", "y", "z"}` in µT, unfiltered and
//! uncalibrated.
//!
//! Features include:
//! - The sensor is registered only while a consumer is subscribed.
//! - Linux IIO sysfs sensor service, and a mock service replaying a recorded trace.
//! - Configurable channel name and sampling rate hint, loaded from JSON.
//! - Typed errors pushed to the consumer when the sensor is missing or sends malformed events.
//!
//! ### Example
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() {
//!     let config = MagnetometerConfig::default();
//!     let (handle, _plugin) = run_service(&config, Some(5_000), |reading| {
//!         println!("{:?}", reading);
//!     })
//!     .unwrap();
//!     handle.await.unwrap();
//! }
//! ```

pub mod adapters;
mod config;
pub mod constants;
mod handler;
mod listener;
pub mod models;
mod plugin;
pub mod services;

pub use adapters::{iio::IioSensorManager, mock::ReplaySensorManager};
pub use config::MagnetometerConfig;
pub use constants::MAGNETOMETER_EVENTS_CHANNEL;
pub use handler::MagnetometerStreamHandler;
pub use listener::SensorListenerAdapter;
pub use models::errors::MagnetometerError;
pub use plugin::MagnetometerPlugin;
pub use services::{run_mock_service, run_service};
