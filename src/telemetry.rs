//! MAVLink telemetry decoding.
//!
//! A received datagram is scanned for one MAVLink frame (v2 first, then
//! v1) and reduced to a [`PositionUpdate`] if that frame is a
//! `GLOBAL_POSITION_INT`. Everything else (CRC failures, truncated
//! frames, random garbage, other message ids) decodes to `None` without
//! logging; a telemetry stream drops frames routinely and per-frame noise
//! would drown the log.

use std::io::Cursor;

use mavlink::common::{MavMessage, GLOBAL_POSITION_INT_DATA};
use mavlink::peek_reader::PeekReader;

/// One decoded aircraft position/velocity fix, already in SI units.
///
/// Latitude/longitude are radians, altitude is meters AMSL, velocity is
/// North/East/Down meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionUpdate {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
    pub vel_north_ms: f64,
    pub vel_east_ms: f64,
    pub vel_down_ms: f64,
}

impl From<&GLOBAL_POSITION_INT_DATA> for PositionUpdate {
    fn from(data: &GLOBAL_POSITION_INT_DATA) -> Self {
        Self {
            // lat/lon arrive as degrees scaled by 1e7, altitude as
            // millimeters, velocity as centimeters per second.
            lat_rad: (data.lat as f64 / 1e7).to_radians(),
            lon_rad: (data.lon as f64 / 1e7).to_radians(),
            alt_m: data.alt as f64 / 1e3,
            vel_north_ms: data.vx as f64 / 1e2,
            vel_east_ms: data.vy as f64 / 1e2,
            vel_down_ms: data.vz as f64 / 1e2,
        }
    }
}

/// Decode at most one position update from a raw datagram.
///
/// Only the first complete frame in the buffer is considered; any frames
/// after it in the same datagram are ignored. If that frame is not a
/// `GLOBAL_POSITION_INT`, or no frame parses at all, returns `None`.
pub fn decode_position(buf: &[u8]) -> Option<PositionUpdate> {
    let msg = parse_frame(buf)?;
    match msg {
        MavMessage::GLOBAL_POSITION_INT(ref data) => Some(data.into()),
        _ => None,
    }
}

/// Parse the first MAVLink frame found in the buffer, trying the v2 wire
/// format before falling back to v1.
fn parse_frame(buf: &[u8]) -> Option<MavMessage> {
    let mut reader = PeekReader::new(Cursor::new(buf));
    if let Ok((_header, msg)) = mavlink::read_v2_msg::<MavMessage, _>(&mut reader) {
        return Some(msg);
    }
    let mut reader = PeekReader::new(Cursor::new(buf));
    mavlink::read_v1_msg::<MavMessage, _>(&mut reader)
        .ok()
        .map(|(_header, msg)| msg)
}
