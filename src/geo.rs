//! Geographic math.
//!
//! Pure functions for great-circle distance, initial bearing, and
//! coordinate validity. All coordinates use WGS84 (lat/lon in degrees).
//! Invalid input never propagates: every function degrades to a safe
//! constant instead of returning NaN or panicking.

use serde::{Deserialize, Serialize};

/// Earth radius in meters (spherical approximation).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Replacement for coordinates that fail validation (Vienna city center).
pub const FALLBACK_COORD: Coordinate = Coordinate {
    lat: 48.2082,
    lon: 16.3738,
};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within valid ranges.
    pub fn is_valid(&self) -> bool {
        is_safe_number(self.lat)
            && is_safe_number(self.lon)
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Returns self if valid, otherwise the fixed fallback coordinate.
    pub fn sanitized(self) -> Coordinate {
        if self.is_valid() {
            self
        } else {
            FALLBACK_COORD
        }
    }
}

/// A value is safe iff it is a finite real number.
pub fn is_safe_number(v: f64) -> bool {
    v.is_finite()
}

/// Haversine distance between two coordinates in meters.
///
/// Returns 0.0 if either coordinate is invalid. Callers must not treat
/// a zero distance as "arrived" without also checking validity.
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    if !a.is_valid() || !b.is_valid() {
        return 0.0;
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Floating-point overshoot above 1.0 would put sqrt/asin out of
    // domain, so clamp before the square root.
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Initial bearing from a to b in compass degrees [0, 360).
///
/// Returns 0.0 if either coordinate is invalid.
pub fn bearing_deg(a: &Coordinate, b: &Coordinate) -> f64 {
    if !a.is_valid() || !b.is_valid() {
        return 0.0;
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    wrap_360(y.atan2(x).to_degrees())
}

/// Wrap an angle to [0, 360).
pub fn wrap_360(deg: f64) -> f64 {
    let w = deg % 360.0;
    if w < 0.0 {
        w + 360.0
    } else {
        w
    }
}

/// Wrap an angle to [-180, 180).
pub fn wrap_180(deg: f64) -> f64 {
    wrap_360(deg + 180.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn distance_same_point_is_zero() {
        let p = pt(48.2082, 16.3738);
        assert!(distance_m(&p, &p).abs() < 0.01);
    }

    #[test]
    fn distance_known_value() {
        // Vienna to Bratislava ~55 km
        let vienna = pt(48.2082, 16.3738);
        let bratislava = pt(48.1486, 17.1077);
        let dist = distance_m(&vienna, &bratislava);
        assert!(
            dist > 50_000.0 && dist < 60_000.0,
            "Expected ~55 km, got {:.0} m",
            dist
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let a = pt(40.0, -3.0);
        let b = pt(41.3, -2.1);
        let d1 = distance_m(&a, &b);
        let d2 = distance_m(&b, &a);
        assert!((d1 - d2).abs() < 1e-6, "Expected symmetry, {d1} vs {d2}");
    }

    #[test]
    fn distance_invalid_input_is_zero() {
        let good = pt(48.0, 16.0);
        for bad in [
            pt(f64::NAN, 16.0),
            pt(48.0, f64::INFINITY),
            pt(91.0, 16.0),
            pt(48.0, -181.0),
        ] {
            let d = distance_m(&good, &bad);
            assert_eq!(d, 0.0, "Expected 0 for invalid input, got {d}");
            assert_eq!(distance_m(&bad, &good), 0.0);
        }
    }

    #[test]
    fn bearing_east() {
        let b = bearing_deg(&pt(0.0, 0.0), &pt(0.0, 1.0));
        assert!((b - 90.0).abs() < 0.1, "Expected ~90, got {b}");
    }

    #[test]
    fn bearing_north() {
        let b = bearing_deg(&pt(0.0, 0.0), &pt(1.0, 0.0));
        assert!(b.abs() < 0.1, "Expected ~0, got {b}");
    }

    #[test]
    fn bearing_always_in_range() {
        let points = [
            pt(48.0, 16.0),
            pt(-33.9, 151.2),
            pt(35.7, 139.7),
            pt(40.7, -74.0),
        ];
        for a in &points {
            for b in &points {
                if a == b {
                    continue;
                }
                let bearing = bearing_deg(a, b);
                assert!(
                    (0.0..360.0).contains(&bearing),
                    "Bearing out of range: {bearing}"
                );
            }
        }
    }

    #[test]
    fn bearing_invalid_input_is_zero() {
        let good = pt(48.0, 16.0);
        let bad = pt(f64::NAN, 16.0);
        assert_eq!(bearing_deg(&good, &bad), 0.0);
        assert_eq!(bearing_deg(&bad, &good), 0.0);
    }

    #[test]
    fn sanitized_replaces_invalid() {
        let bad = pt(f64::NAN, 200.0);
        assert_eq!(bad.sanitized(), FALLBACK_COORD);

        let good = pt(48.0, 16.0);
        assert_eq!(good.sanitized(), good);
    }

    #[test]
    fn wrap_360_normalizes() {
        assert!((wrap_360(-90.0) - 270.0).abs() < 1e-9);
        assert!((wrap_360(370.0) - 10.0).abs() < 1e-9);
        assert!(wrap_360(360.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_180_normalizes() {
        assert!((wrap_180(190.0) + 170.0).abs() < 1e-9);
        assert!((wrap_180(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_180(90.0) - 90.0).abs() < 1e-9);
    }
}
