//! Fakes and fixtures shared by the tests of the workspace crates.

pub mod csv_loader;
pub mod fake_sensor_manager;
pub mod sinks;

pub use fake_sensor_manager::FakeSensorManager;
