//! Actuator command output.
//!
//! Angles leave the process as one ASCII line per command,
//! `"<inclination> <azimuth>\r\n"` with two decimal places, written to
//! whatever `io::Write` the sink wraps: the motor controller's serial
//! port in production, a byte buffer in tests.

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;

use crate::error::TrackerError;
use crate::geo::PointingAngles;

/// Bound on a single serial write so a wedged device cannot stall
/// shutdown.
const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Formats pointing angles and writes them to the outbound channel.
///
/// A write or flush error is surfaced as [`TrackerError::ActuatorWrite`];
/// the caller treats it as fatal, mirroring a physically detached device.
#[derive(Debug)]
pub struct ActuatorSink<W: Write> {
    writer: W,
}

impl<W: Write> ActuatorSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one angle command line.
    pub fn write_angles(&mut self, angles: PointingAngles) -> Result<(), TrackerError> {
        write!(
            self.writer,
            "{:.2} {:.2}\r\n",
            angles.inclination_deg, angles.azimuth_deg
        )?;
        self.writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

/// Open the actuator serial port with a bounded write timeout.
pub fn open_serial(path: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>, TrackerError> {
    serialport::new(path, baud_rate)
        .timeout(WRITE_TIMEOUT)
        .open()
        .map_err(|source| TrackerError::SerialOpen {
            path: path.to_string(),
            source,
        })
}
