//! Pointing computation loop.
//!
//! Runs at 10 Hz: reads the shared aircraft snapshot, dead-reckons it
//! forward over the telemetry gap, converts the relative geometry to
//! inclination/azimuth, and hands the result to the actuator sink. While
//! the telemetry link is down no angles are emitted at all; the mount
//! holds its last commanded position.

use std::io::Write;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::actuator::ActuatorSink;
use crate::config::GroundStation;
use crate::error::TrackerError;
use crate::geo::{self, PointingAngles};
use crate::monitor::LinkStatus;
use crate::state::{AircraftSnapshot, SharedAircraftState};
use crate::ShutdownFlag;

/// Output cadence: 10 Hz.
pub const CYCLE_PERIOD: Duration = Duration::from_millis(100);

/// Compute pointing angles from the station to a dead-reckoned aircraft
/// position.
///
/// The snapshot's NED velocity times its staleness is added directly to
/// the NED relative vector. The local frame is not re-derived at the
/// extrapolated position, which is accurate only for the sub-second
/// staleness this loop sees between telemetry frames.
pub fn compute_angles(
    station: &GroundStation,
    snapshot: &AircraftSnapshot,
    now: Instant,
) -> PointingAngles {
    let station_ecef = geo::geodetic_to_ecef(station.lat_rad, station.lon_rad, station.alt_m);
    let aircraft_ecef =
        geo::geodetic_to_ecef(snapshot.lat_rad, snapshot.lon_rad, snapshot.alt_m);
    let delta = [
        aircraft_ecef[0] - station_ecef[0],
        aircraft_ecef[1] - station_ecef[1],
        aircraft_ecef[2] - station_ecef[2],
    ];
    let mut ned = geo::ecef_to_ned(station.lat_rad, station.lon_rad, delta);

    let elapsed = now.saturating_duration_since(snapshot.captured_at).as_secs_f64();
    ned[0] += snapshot.vel_ned_ms[0] * elapsed;
    ned[1] += snapshot.vel_ned_ms[1] * elapsed;
    ned[2] += snapshot.vel_ned_ms[2] * elapsed;

    geo::pointing_angles(ned)
}

/// Fixed-cadence loop driving the actuator.
///
/// Stateless across cycles; everything it needs lives in the shared
/// state, the link status, and the station configuration.
pub struct PointingComputer<W: Write> {
    station: GroundStation,
    state: SharedAircraftState,
    link: LinkStatus,
    sink: ActuatorSink<W>,
    shutdown: ShutdownFlag,
}

impl<W: Write> PointingComputer<W> {
    pub fn new(
        station: GroundStation,
        state: SharedAircraftState,
        link: LinkStatus,
        sink: ActuatorSink<W>,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            station,
            state,
            link,
            sink,
            shutdown,
        }
    }

    /// Run until the shutdown flag is set, or until an actuator write
    /// fails. A write failure is returned to the caller, which escalates
    /// it to a process-wide shutdown.
    pub async fn run(mut self) -> Result<(), TrackerError> {
        let mut interval = tokio::time::interval(CYCLE_PERIOD);
        let mut ticks: u64 = 0;
        loop {
            interval.tick().await;
            if self.shutdown.is_set() {
                debug!("Pointing computer stopped");
                return Ok(());
            }
            if let Err(e) = self.cycle() {
                error!("Actuator write failed, shutting down: {e}");
                return Err(e);
            }
            ticks += 1;
            // Status summary every 10 seconds.
            if ticks % 100 == 0 {
                debug!(
                    "{ticks} cycles, link {}",
                    if self.link.is_connected() {
                        "up"
                    } else {
                        "down"
                    }
                );
            }
        }
    }

    /// One compute/emit cycle. Skips silently while the link is down or
    /// before the first fix.
    fn cycle(&mut self) -> Result<(), TrackerError> {
        if !self.link.is_connected() {
            return Ok(());
        }
        let Some(snapshot) = self.state.read() else {
            return Ok(());
        };
        let angles = compute_angles(&self.station, &snapshot, Instant::now());
        self.sink.write_angles(angles)
    }
}
