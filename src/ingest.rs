//! Telemetry ingestion task.
//!
//! Owns the inbound UDP socket and the connection monitor. Runs until
//! the shutdown flag is set, never blocking longer than one poll
//! interval, so cancellation is observed within ~10 ms.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::error::TrackerError;
use crate::monitor::{ConnectionMonitor, LinkEvent, LinkStatus};
use crate::state::{AircraftSnapshot, SharedAircraftState};
use crate::telemetry;
use crate::ShutdownFlag;

/// Upper bound on one receive wait; doubles as the cancellation check
/// interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Largest datagram we expect; fits any MAVLink frame.
const RECV_BUF_SIZE: usize = 512;

/// Background task that feeds decoded telemetry into the shared state.
pub struct TelemetryIngestor {
    socket: UdpSocket,
    state: SharedAircraftState,
    monitor: ConnectionMonitor,
    shutdown: ShutdownFlag,
}

impl TelemetryIngestor {
    /// Bind the telemetry port on all interfaces. Failure here is fatal
    /// for the process.
    pub async fn bind(
        port: u16,
        state: SharedAircraftState,
        shutdown: ShutdownFlag,
    ) -> Result<Self, TrackerError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))
            .await
            .map_err(|source| TrackerError::Bind { port, source })?;
        Ok(Self {
            socket,
            state,
            monitor: ConnectionMonitor::default(),
            shutdown,
        })
    }

    /// Handle to the link state published by the monitor.
    pub fn link_status(&self) -> LinkStatus {
        self.monitor.status()
    }

    /// Local address of the bound socket; port 0 at bind time resolves
    /// to the actual ephemeral port here.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }

    /// Run until the shutdown flag is set.
    pub async fn run(mut self) {
        let mut buf = [0u8; RECV_BUF_SIZE];
        while !self.shutdown.is_set() {
            match timeout(POLL_INTERVAL, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((len, _addr))) => self.ingest(&buf[..len]),
                Ok(Err(e)) => debug!("Telemetry receive error: {e}"),
                // Poll timeout: no data this interval.
                Err(_) => {}
            }
            if let Some(LinkEvent::Lost) = self.monitor.check_timeout(Instant::now()) {
                warn!("Telemetry connection lost; suspending angle output");
            }
        }
        debug!("Telemetry ingestor stopped");
    }

    /// Decode one datagram and, if it carries a position fix, publish it.
    fn ingest(&mut self, datagram: &[u8]) {
        let Some(update) = telemetry::decode_position(datagram) else {
            // Malformed frames and foreign message ids are dropped
            // silently; per-frame logging would flood at stream rate.
            return;
        };
        let now = Instant::now();
        self.state.update(AircraftSnapshot::new(update, now));
        if let Some(LinkEvent::Established) = self.monitor.on_valid_update(now) {
            info!("Telemetry connection established");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use mavlink::common::{MavMessage, GLOBAL_POSITION_INT_DATA, HEARTBEAT_DATA};
    use mavlink::MavHeader;

    fn encode(msg: &MavMessage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let header = MavHeader {
            system_id: 1,
            component_id: 1,
            sequence: 0,
        };
        mavlink::write_v2_msg(&mut cursor, header, msg).unwrap();
        cursor.into_inner()
    }

    async fn ingestor() -> (TelemetryIngestor, SharedAircraftState, u16) {
        let state = SharedAircraftState::new();
        let ingestor = TelemetryIngestor::bind(0, state.clone(), ShutdownFlag::new())
            .await
            .unwrap();
        let port = ingestor.socket.local_addr().unwrap().port();
        (ingestor, state, port)
    }

    #[tokio::test]
    async fn position_frame_updates_state_and_link() {
        let (mut ingestor, state, _port) = ingestor().await;
        let msg = MavMessage::GLOBAL_POSITION_INT(GLOBAL_POSITION_INT_DATA {
            lat: 100_000_000, // 10 deg
            lon: 200_000_000, // 20 deg
            alt: 2_000_000,   // 2000 m
            vx: 500,
            ..Default::default()
        });
        let status = ingestor.link_status();

        ingestor.ingest(&encode(&msg));

        let snap = state.read().expect("state should be populated");
        assert!((snap.lat_rad - 10.0_f64.to_radians()).abs() < 1e-12);
        assert!((snap.alt_m - 2000.0).abs() < 1e-9);
        assert!((snap.vel_ned_ms[0] - 5.0).abs() < 1e-9);
        assert!(status.is_connected());
    }

    #[tokio::test]
    async fn garbage_never_touches_state() {
        let (mut ingestor, state, _port) = ingestor().await;
        let status = ingestor.link_status();

        ingestor.ingest(&[0xfd, 0x00, 0x13, 0x37]);
        ingestor.ingest(b"definitely not mavlink");
        ingestor.ingest(&encode(&MavMessage::HEARTBEAT(HEARTBEAT_DATA::default())));

        assert!(state.read().is_none());
        assert!(!status.is_connected());
    }

    #[tokio::test]
    async fn run_exits_promptly_on_shutdown() {
        let state = SharedAircraftState::new();
        let shutdown = ShutdownFlag::new();
        let ingestor = TelemetryIngestor::bind(0, state, shutdown.clone())
            .await
            .unwrap();
        let handle = tokio::spawn(ingestor.run());
        shutdown.set();
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("ingestor should stop within one poll interval")
            .unwrap();
    }

    #[tokio::test]
    async fn receives_real_datagram_over_loopback() {
        let (ingestor, state, port) = ingestor().await;
        let shutdown = ingestor.shutdown.clone();
        let handle = tokio::spawn(ingestor.run());

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let msg = MavMessage::GLOBAL_POSITION_INT(GLOBAL_POSITION_INT_DATA {
            lat: 473_000_000,
            ..Default::default()
        });
        sender
            .send_to(&encode(&msg), ("127.0.0.1", port))
            .await
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while state.read().is_none() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let snap = state.read().expect("datagram should arrive and decode");
        assert!((snap.lat_rad - 47.3_f64.to_radians()).abs() < 1e-12);

        shutdown.set();
        handle.await.unwrap();
    }
}
