//! antenna_tracker: points a ground-based antenna/camera mount at a
//! moving aircraft.
//!
//! MAVLink position telemetry arrives over UDP, a background task keeps
//! the shared aircraft state fresh, and a 10 Hz loop converts the
//! station-to-aircraft geometry into inclination/azimuth commands for a
//! serial-attached motor controller.
//!
//! # Modules
//!
//! - [`config`]: key=value configuration file and the ground station
//! - [`geo`]: WGS84 / ECEF / local-tangent pointing math
//! - [`telemetry`]: MAVLink frame decoding
//! - [`state`]: shared aircraft snapshot cell
//! - [`monitor`]: edge-triggered telemetry link detection
//! - [`ingest`]: UDP ingestion task
//! - [`pointing`]: fixed-cadence angle computation loop
//! - [`actuator`]: serial command output

pub mod actuator;
pub mod config;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod monitor;
pub mod pointing;
pub mod state;
pub mod telemetry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use actuator::{open_serial, ActuatorSink};
pub use config::{GroundStation, TrackerConfig};
pub use error::TrackerError;
pub use geo::PointingAngles;
pub use ingest::TelemetryIngestor;
pub use monitor::{ConnectionMonitor, LinkEvent, LinkStatus};
pub use pointing::PointingComputer;
pub use state::{AircraftSnapshot, SharedAircraftState};
pub use telemetry::PositionUpdate;

/// Cooperative shutdown signal shared by both loops.
///
/// Set from the signal watcher or on a fatal actuator error; each loop
/// polls it at least once per poll interval, so the process winds down
/// within one cycle of the flag going up. The signal path does nothing
/// but set this flag; all teardown happens in normal task context.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
