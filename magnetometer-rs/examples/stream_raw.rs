use log::info;
use std::env;

use magnetometer_rs::{self, MagnetometerConfig};
use test_utils::csv_loader::MAGNETOMETER_TRACE;

// Usage: stream_raw [config.json] [--mock]
#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let use_mock = args.iter().any(|arg| arg == "--mock");
    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => MagnetometerConfig::from_json_file(path).unwrap(),
        None => MagnetometerConfig::default(),
    };
    info!("Streaming on {} at {:?}", config.channel_name, config.sampling_rate);

    let print = |reading: common::MagnetometerReading| {
        println!("x: {:8.3} y: {:8.3} z: {:8.3} µT", reading.x(), reading.y(), reading.z());
    };

    // Runs until Ctrl+C
    let handle = if use_mock {
        let (handle, _plugin) =
            magnetometer_rs::run_mock_service(&config, MAGNETOMETER_TRACE, true, None, print)
                .unwrap();
        handle
    } else {
        let (handle, _plugin) = magnetometer_rs::run_service(&config, None, print).unwrap();
        handle
    };
    handle.await.unwrap();
}
