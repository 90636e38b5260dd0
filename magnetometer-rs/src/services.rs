use futures::StreamExt;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use common::{MagnetometerReading, SensorManagerPort};
use event_channel::ChannelRegistry;

use crate::adapters::{iio::IioSensorManager, mock::ReplaySensorManager};
use crate::config::MagnetometerConfig;
use crate::models::errors::MagnetometerError;
use crate::models::shutdown;
use crate::plugin::MagnetometerPlugin;

/// Installs the plugin over `port`, subscribes to its channel and forwards every decoded
/// reading to `on_reading` until shutdown or end of stream.
fn start<P, F>(
    port: Arc<P>,
    config: &MagnetometerConfig,
    run_for_millis: Option<u64>,
    on_reading: F,
) -> Result<(JoinHandle<()>, Arc<MagnetometerPlugin<P>>), MagnetometerError>
where
    P: SensorManagerPort + 'static,
    F: Fn(MagnetometerReading) + Send + 'static,
{
    let registry = ChannelRegistry::new();
    let plugin = MagnetometerPlugin::register_with(&registry, port, config);
    let mut events = plugin.receive_stream()?;

    let abort_signal = Arc::new(Notify::new());
    let shutdown_handle = shutdown::listen_for_shutdown(abort_signal.clone(), run_for_millis);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = abort_signal.notified() => {
                    info!("Stopping magnetometer service");
                    break;
                }
                event = events.next() => match event {
                    Some(Ok(value)) => match MagnetometerReading::try_from(&value) {
                        Ok(reading) => on_reading(reading),
                        Err(e) => warn!("Discarding event {}: {}", value, e),
                    },
                    Some(Err(e)) => error!("Magnetometer stream error: {}", e),
                    None => {
                        info!("Magnetometer stream ended");
                        break;
                    }
                },
            }
        }
        // Dropping the stream cancels the subscription and stops the sensor.
        drop(events);
        shutdown_handle.abort();
    });
    Ok((handle, plugin))
}

/// Starts the magnetometer relay over the Linux IIO sensors found under `config.iio_root`.
///
/// Readings are handed to `on_reading` until Ctrl+C, or for `run_for_millis` when given.
///
/// # Returns
///
/// Returns a tuple containing:
/// * A `tokio::task::JoinHandle<()>` for the task draining the event stream.
/// * An `Arc<MagnetometerPlugin<IioSensorManager>>`, allowing further interaction with the relay.
///
/// A Runtime error is returned if called outside of a tokio runtime.
pub fn run_service<F>(
    config: &MagnetometerConfig,
    run_for_millis: Option<u64>,
    on_reading: F,
) -> Result<
    (
        JoinHandle<()>,
        Arc<MagnetometerPlugin<IioSensorManager>>,
    ),
    MagnetometerError,
>
where
    F: Fn(MagnetometerReading) + Send + 'static,
{
    let port = Arc::new(IioSensorManager::new(&config.iio_root)?);
    start(port, config, run_for_millis, on_reading)
}

/// Starts the magnetometer relay over a recorded trace.
///
/// Returns a tuple containing:
/// - A `tokio::task::JoinHandle<()>` for the task draining the event stream.
/// - An `Arc<MagnetometerPlugin<ReplaySensorManager>>` instance.
///
/// A Trace error is returned if the trace cannot be loaded.
pub fn run_mock_service<T, F>(
    config: &MagnetometerConfig,
    trace_path: T,
    add_sensor_noise: bool,
    run_for_millis: Option<u64>,
    on_reading: F,
) -> Result<
    (
        JoinHandle<()>,
        Arc<MagnetometerPlugin<ReplaySensorManager>>,
    ),
    MagnetometerError,
>
where
    T: AsRef<Path>,
    F: Fn(MagnetometerReading) + Send + 'static,
{
    let port = Arc::new(ReplaySensorManager::new(trace_path, add_sensor_noise)?);
    start(port, config, run_for_millis, on_reading)
}
