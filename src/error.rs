/// Errors that can end the tracking process.
///
/// Malformed telemetry frames and stale links are deliberately absent:
/// they are represented as `None` decodes and link-state transitions,
/// never as errors.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Failed to bind UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open serial port {path}: {source}")]
    SerialOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Actuator write failed: {0}")]
    ActuatorWrite(#[from] std::io::Error),
}
