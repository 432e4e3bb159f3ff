//! Tracker configuration.
//!
//! Loaded from a key=value text file (`%` starts a comment line). A
//! missing file or a malformed value is never fatal: the affected keys
//! keep their defaults and a warning is logged.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;

/// Raw configuration as read from disk, angles already in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// UDP port the telemetry stream arrives on.
    pub udp_port: u16,
    /// Serial device the actuator is attached to.
    pub serial_port: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Ground station latitude, radians.
    pub latitude_rad: f64,
    /// Ground station longitude, radians.
    pub longitude_rad: f64,
    /// Ground station altitude above mean sea level, meters.
    pub altitude_amsl_m: f64,
    /// Local magnetic declination, radians. Informational; not applied
    /// to the emitted azimuth.
    pub magnetic_declination_rad: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            udp_port: 14551,
            serial_port: "/dev/ttyACM0".to_string(),
            baud_rate: 9600,
            latitude_rad: 0.0,
            longitude_rad: 0.0,
            altitude_amsl_m: 0.0,
            magnetic_declination_rad: 11.79_f64.to_radians(),
        }
    }
}

/// The fixed observer the pointing math is computed from.
///
/// Built once from [`TrackerConfig`] at startup, never mutated.
#[derive(Clone, Copy, Debug)]
pub struct GroundStation {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
    pub magnetic_declination_rad: f64,
}

impl TrackerConfig {
    /// Load configuration from `path`, falling back to defaults for
    /// anything missing or unparseable.
    pub fn load(path: &Path) -> Self {
        let mut config = Self::default();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(
                    "Could not read configuration file {}: {e}; using defaults",
                    path.display()
                );
                return config;
            }
        };
        config.apply(&contents);
        config
    }

    /// Parse key=value lines into this config.
    fn apply(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "udp_port" => assign(key, value, &mut self.udp_port),
                "serial_port" => self.serial_port = value.to_string(),
                "baud_rate" => assign(key, value, &mut self.baud_rate),
                "latitude" => assign_degrees(key, value, &mut self.latitude_rad),
                "longitude" => assign_degrees(key, value, &mut self.longitude_rad),
                "altitude_AMSL" => assign(key, value, &mut self.altitude_amsl_m),
                "magnetic_declination" => {
                    assign_degrees(key, value, &mut self.magnetic_declination_rad)
                }
                _ => {}
            }
        }
    }

    pub fn ground_station(&self) -> GroundStation {
        GroundStation {
            lat_rad: self.latitude_rad,
            lon_rad: self.longitude_rad,
            alt_m: self.altitude_amsl_m,
            magnetic_declination_rad: self.magnetic_declination_rad,
        }
    }
}

fn assign<T: std::str::FromStr>(key: &str, value: &str, target: &mut T)
where
    T::Err: fmt::Display,
{
    match value.parse() {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!("Ignoring config key {key}={value}: {e}"),
    }
}

/// Degree-valued keys are stored in radians.
fn assign_degrees(key: &str, value: &str, target: &mut f64) {
    let mut degrees = f64::NAN;
    assign(key, value, &mut degrees);
    if degrees.is_finite() {
        *target = degrees.to_radians();
    }
}
