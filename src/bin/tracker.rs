//! Antenna tracker daemon.
//!
//! Binds the telemetry UDP port, opens the actuator serial port, then
//! runs the ingest task and the 10 Hz pointing loop until Ctrl+C or a
//! fatal actuator error.
//!
//! Usage:
//!   tracker [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (default: tracker.conf)
//!   -h, --help           Show this help

use std::path::PathBuf;
use std::process;

use log::{error, info};

use antenna_tracker::{
    open_serial, ActuatorSink, PointingComputer, SharedAircraftState, ShutdownFlag,
    TelemetryIngestor, TrackerConfig,
};

struct Args {
    config: PathBuf,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: PathBuf::from("tracker.conf"),
    };

    let raw: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                match raw.get(i) {
                    Some(path) => args.config = PathBuf::from(path),
                    None => {
                        eprintln!("Error: --config requires a value");
                        process::exit(1);
                    }
                }
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn print_usage() {
    eprintln!(
        "Usage: tracker [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -c, --config <FILE>  Configuration file (default: tracker.conf)\n\
         \x20 -h, --help           Show this help"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let config = TrackerConfig::load(&args.config);
    let station = config.ground_station();
    info!(
        "Ground station at {:.6} deg, {:.6} deg, {:.1} m AMSL",
        station.lat_rad.to_degrees(),
        station.lon_rad.to_degrees(),
        station.alt_m
    );

    let shutdown = ShutdownFlag::new();
    let state = SharedAircraftState::new();

    // Both channels are fatal at startup: without them there is nothing
    // to track or to command.
    let ingestor =
        match TelemetryIngestor::bind(config.udp_port, state.clone(), shutdown.clone()).await {
            Ok(ingestor) => ingestor,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        };
    info!("Listening for telemetry on UDP port {}", config.udp_port);

    let serial = match open_serial(&config.serial_port, config.baud_rate) {
        Ok(serial) => serial,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!(
        "Actuator connected on {} at {} baud",
        config.serial_port, config.baud_rate
    );

    let computer = PointingComputer::new(
        station,
        state,
        ingestor.link_status(),
        ActuatorSink::new(serial),
        shutdown.clone(),
    );

    let ingest_handle = tokio::spawn(ingestor.run());

    // The signal path only raises the flag; channel teardown happens
    // below, in normal task context.
    let signal_flag = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_flag.set();
        }
    });

    let result = computer.run().await;

    // Stop the ingest task and release the UDP socket; the serial port
    // was dropped with the pointing loop's sink.
    shutdown.set();
    let _ = ingest_handle.await;

    match result {
        Ok(()) => info!("Tracker stopped"),
        Err(_) => process::exit(1),
    }
}
