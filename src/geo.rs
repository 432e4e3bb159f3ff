//! Geodetic math for antenna pointing.
//!
//! All functions are pure and operate in f64. Angles are radians
//! internally; degrees appear only in [`PointingAngles`], the output
//! boundary of the pipeline.

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS84 first eccentricity squared.
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Pointing solution handed to the actuator, in signed degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointingAngles {
    /// Elevation above the local horizontal plane (positive = up).
    pub inclination_deg: f64,
    /// Bearing in the local tangent plane, range (-180, 180].
    pub azimuth_deg: f64,
}

/// Convert a WGS84 geodetic position (radians, meters above the
/// ellipsoid) to ECEF meters.
pub fn geodetic_to_ecef(lat: f64, lon: f64, alt: f64) -> [f64; 3] {
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    // Prime-vertical radius of curvature at this latitude.
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    [
        (n + alt) * cos_lat * lon.cos(),
        (n + alt) * cos_lat * lon.sin(),
        (n * (1.0 - WGS84_E2) + alt) * sin_lat,
    ]
}

/// Rotate an ECEF displacement vector into the North/East/Down tangent
/// frame centered at the given origin latitude/longitude (radians).
pub fn ecef_to_ned(origin_lat: f64, origin_lon: f64, delta: [f64; 3]) -> [f64; 3] {
    let (sin_lat, cos_lat) = origin_lat.sin_cos();
    let (sin_lon, cos_lon) = origin_lon.sin_cos();
    let [dx, dy, dz] = delta;
    [
        -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz,
        -sin_lon * dx + cos_lon * dy,
        -cos_lat * cos_lon * dx - cos_lat * sin_lon * dy - sin_lat * dz,
    ]
}

/// Compute pointing angles from a NED relative vector.
///
/// Azimuth is left in the signed range (-180, 180] produced by `atan2`;
/// downstream firmware receives that range as the contract, there is no
/// normalization to [0, 360).
pub fn pointing_angles(ned: [f64; 3]) -> PointingAngles {
    let [n, e, d] = ned;
    PointingAngles {
        inclination_deg: (-d).atan2(n.hypot(e)).to_degrees(),
        azimuth_deg: e.atan2(n).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT_TOL_RAD: f64 = 1e-9;
    const ALT_TOL_M: f64 = 1e-3;

    /// Reference iterative ECEF -> geodetic inverse, used only to verify
    /// the forward conversion.
    fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
        let [x, y, z] = ecef;
        let lon = y.atan2(x);
        let p = x.hypot(y);
        let mut lat = z.atan2(p * (1.0 - WGS84_E2));
        let mut alt = 0.0;
        for _ in 0..10 {
            let sin_lat = lat.sin();
            let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
            alt = p / lat.cos() - n;
            lat = z.atan2(p * (1.0 - WGS84_E2 * n / (n + alt)));
        }
        (lat, lon, alt)
    }

    #[test]
    fn ecef_round_trip_recovers_geodetic() {
        let cases = [
            (0.0_f64, 0.0_f64, 0.0_f64),
            (45.0, 7.5, 1200.0),
            (-33.9, 151.2, 50.0),
            (68.0, -110.0, 300.0),
        ];
        for (lat_deg, lon_deg, alt) in cases {
            let lat = lat_deg.to_radians();
            let lon = lon_deg.to_radians();
            let (lat2, lon2, alt2) = ecef_to_geodetic(geodetic_to_ecef(lat, lon, alt));
            assert!((lat - lat2).abs() < LAT_TOL_RAD, "lat mismatch at {lat_deg}");
            assert!((lon - lon2).abs() < LAT_TOL_RAD, "lon mismatch at {lon_deg}");
            assert!((alt - alt2).abs() < ALT_TOL_M, "alt mismatch at {alt}");
        }
    }

    #[test]
    fn equator_prime_meridian_lies_on_x_axis() {
        let [x, y, z] = geodetic_to_ecef(0.0, 0.0, 0.0);
        assert!((x - WGS84_A).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!(z.abs() < 1e-6);
    }

    #[test]
    fn aircraft_directly_overhead_gives_90_degrees_inclination() {
        let lat = 47.3_f64.to_radians();
        let lon = 8.5_f64.to_radians();
        let station = geodetic_to_ecef(lat, lon, 400.0);
        let aircraft = geodetic_to_ecef(lat, lon, 1400.0);
        let delta = [
            aircraft[0] - station[0],
            aircraft[1] - station[1],
            aircraft[2] - station[2],
        ];
        let angles = pointing_angles(ecef_to_ned(lat, lon, delta));
        assert!(
            (angles.inclination_deg - 90.0).abs() < 0.1,
            "inclination was {}",
            angles.inclination_deg
        );
    }

    #[test]
    fn aircraft_due_east_gives_90_degrees_azimuth() {
        let lat = 10.0_f64.to_radians();
        let lon = 20.0_f64.to_radians();
        // ~5.5 km east at equal altitude.
        let lon_east = (20.0_f64 + 0.05).to_radians();
        let station = geodetic_to_ecef(lat, lon, 100.0);
        let aircraft = geodetic_to_ecef(lat, lon_east, 100.0);
        let delta = [
            aircraft[0] - station[0],
            aircraft[1] - station[1],
            aircraft[2] - station[2],
        ];
        let angles = pointing_angles(ecef_to_ned(lat, lon, delta));
        assert!(
            (angles.azimuth_deg - 90.0).abs() < 1.0,
            "azimuth was {}",
            angles.azimuth_deg
        );
        assert!(
            angles.inclination_deg.abs() < 1.0,
            "inclination was {}",
            angles.inclination_deg
        );
    }

    #[test]
    fn azimuth_stays_in_signed_range() {
        // Due west: atan2 gives +180, not -180 and not 270.
        let angles = pointing_angles([-1000.0, -1e-9, 0.0]);
        assert!(angles.azimuth_deg <= 180.0 && angles.azimuth_deg > -180.0);
        let west = pointing_angles([0.0, -1000.0, 0.0]);
        assert!((west.azimuth_deg + 90.0).abs() < 1e-9);
    }
}
