//! Telemetry link monitoring.
//!
//! Edge-triggered two-state machine: a valid frame establishes the link,
//! 2 seconds without one loses it. Each transition is reported exactly
//! once as a [`LinkEvent`] so the caller can log the edge without
//! per-check spam. The current state is also published through a
//! [`LinkStatus`] handle the pointing loop polls without locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default staleness threshold before the link is declared lost.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A link state transition, emitted once per edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    Established,
    Lost,
}

/// Shared read-only view of the link state.
#[derive(Clone, Debug, Default)]
pub struct LinkStatus {
    connected: Arc<AtomicBool>,
}

impl LinkStatus {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Detects telemetry gain and loss from the timing of valid updates.
///
/// Owned by the ingest task; only `LinkStatus` crosses threads.
#[derive(Debug)]
pub struct ConnectionMonitor {
    timeout: Duration,
    last_update: Option<Instant>,
    connected: bool,
    status: LinkStatus,
}

impl ConnectionMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_update: None,
            connected: false,
            status: LinkStatus::default(),
        }
    }

    /// Handle into the published link state.
    pub fn status(&self) -> LinkStatus {
        self.status.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a valid telemetry update at `now`.
    ///
    /// Returns `Some(LinkEvent::Established)` only on the
    /// disconnected-to-connected edge.
    pub fn on_valid_update(&mut self, now: Instant) -> Option<LinkEvent> {
        self.last_update = Some(now);
        if self.connected {
            return None;
        }
        self.connected = true;
        self.status.connected.store(true, Ordering::Relaxed);
        Some(LinkEvent::Established)
    }

    /// Check for staleness at `now`.
    ///
    /// Returns `Some(LinkEvent::Lost)` only on the
    /// connected-to-disconnected edge; repeated checks while already
    /// disconnected return `None`.
    pub fn check_timeout(&mut self, now: Instant) -> Option<LinkEvent> {
        if !self.connected {
            return None;
        }
        let stale = match self.last_update {
            Some(last) => now.duration_since(last) > self.timeout,
            None => true,
        };
        if !stale {
            return None;
        }
        self.connected = false;
        self.status.connected.store(false, Ordering::Relaxed);
        Some(LinkEvent::Lost)
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
