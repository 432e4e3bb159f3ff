//! Shared aircraft state.
//!
//! The one piece of cross-thread mutable data in the tracker: the most
//! recent aircraft fix, written by the ingest task and read by the
//! pointing loop. Access goes through a mutex so a reader always sees a
//! complete snapshot, never a torn write.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::telemetry::PositionUpdate;

/// The latest known aircraft position and velocity.
///
/// `captured_at` is the monotonic instant the fix was decoded; the
/// pointing loop uses it to dead-reckon across telemetry gaps.
#[derive(Clone, Copy, Debug)]
pub struct AircraftSnapshot {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
    /// North/East/Down velocity, m/s.
    pub vel_ned_ms: [f64; 3],
    pub captured_at: Instant,
}

impl AircraftSnapshot {
    pub fn new(update: PositionUpdate, captured_at: Instant) -> Self {
        Self {
            lat_rad: update.lat_rad,
            lon_rad: update.lon_rad,
            alt_m: update.alt_m,
            vel_ned_ms: [
                update.vel_north_ms,
                update.vel_east_ms,
                update.vel_down_ms,
            ],
            captured_at,
        }
    }
}

/// Cheaply cloneable handle to the shared snapshot cell.
///
/// Starts empty; `read` returns `None` until the first valid telemetry
/// frame has been ingested.
#[derive(Clone, Debug, Default)]
pub struct SharedAircraftState {
    cell: Arc<Mutex<Option<AircraftSnapshot>>>,
}

impl SharedAircraftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn update(&self, snapshot: AircraftSnapshot) {
        // Lock poisoning would mean a panic mid-store of a Copy value;
        // the stored data is still the last complete snapshot.
        let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
        *cell = Some(snapshot);
    }

    /// Copy out the current snapshot, if any.
    pub fn read(&self) -> Option<AircraftSnapshot> {
        *self.cell.lock().unwrap_or_else(|e| e.into_inner())
    }
}
