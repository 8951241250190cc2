//! Route polyline model.
//!
//! Normalizes raw route geometry into an ordered point sequence that is
//! safe for interpolation and bearing math: unsafe coordinates are
//! dropped, near-duplicate neighbors are collapsed, and an empty result
//! degrades to a single fallback point instead of failing.

use crate::geo::{self, Coordinate, FALLBACK_COORD};

/// Consecutive points closer than this in both axes (degrees, ~1 m)
/// are collapsed to one, so no downstream segment is zero-length.
const DUPLICATE_EPS_DEG: f64 = 1e-5;

/// The sanitized geometric polyline of a route.
///
/// Always holds at least one point. A single-point path means "cannot
/// navigate"; callers show a static fallback rather than crash.
#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<Coordinate>,
}

impl Path {
    /// Build a path from raw coordinate candidates, in travel order.
    pub fn build(raw: &[Coordinate]) -> Path {
        let mut points: Vec<Coordinate> = Vec::with_capacity(raw.len());

        for p in raw {
            if !p.is_valid() {
                continue;
            }
            if let Some(last) = points.last() {
                if (p.lat - last.lat).abs() < DUPLICATE_EPS_DEG
                    && (p.lon - last.lon).abs() < DUPLICATE_EPS_DEG
                {
                    continue;
                }
            }
            points.push(*p);
        }

        if points.is_empty() {
            points.push(FALLBACK_COORD);
        }

        Path { points }
    }

    /// Whether the path has enough geometry to follow.
    pub fn is_navigable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, i: usize) -> Option<Coordinate> {
        self.points.get(i).copied()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of segments (one less than the point count).
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Endpoints of segment `i`, if it exists.
    pub fn segment(&self, i: usize) -> Option<(Coordinate, Coordinate)> {
        match (self.points.get(i), self.points.get(i + 1)) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Total length in meters.
    pub fn total_length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| geo::distance_m(&w[0], &w[1]))
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn from_raw_points(points: Vec<Coordinate>) -> Path {
        Path { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn build_keeps_valid_points() {
        let path = Path::build(&[pt(48.0, 16.0), pt(48.1, 16.1), pt(48.2, 16.2)]);
        assert_eq!(path.point_count(), 3);
        assert!(path.is_navigable());
    }

    #[test]
    fn build_filters_invalid_points() {
        let path = Path::build(&[
            pt(48.0, 16.0),
            pt(f64::NAN, 16.1),
            pt(95.0, 16.1),
            pt(48.2, 16.2),
        ]);
        assert_eq!(path.point_count(), 2);
    }

    #[test]
    fn build_collapses_near_duplicates() {
        let path = Path::build(&[
            pt(48.0, 16.0),
            pt(48.000001, 16.000001), // within ~1m
            pt(48.1, 16.1),
        ]);
        assert_eq!(path.point_count(), 2);

        // No surviving consecutive pair is within the epsilon box
        for w in path.points().windows(2) {
            let close = (w[1].lat - w[0].lat).abs() < 1e-5
                && (w[1].lon - w[0].lon).abs() < 1e-5;
            assert!(!close, "Found near-duplicate pair after build");
        }
    }

    #[test]
    fn build_all_invalid_gives_single_fallback() {
        let path = Path::build(&[pt(f64::NAN, 16.0), pt(48.0, f64::INFINITY)]);
        assert_eq!(path.point_count(), 1);
        assert_eq!(path.point(0), Some(FALLBACK_COORD));
        assert!(!path.is_navigable());
    }

    #[test]
    fn build_empty_gives_single_fallback() {
        let path = Path::build(&[]);
        assert_eq!(path.point_count(), 1);
        assert!(!path.is_navigable());
    }

    #[test]
    fn segment_access() {
        let path = Path::build(&[pt(48.0, 16.0), pt(48.1, 16.1)]);
        assert_eq!(path.segment_count(), 1);

        let (a, b) = path.segment(0).unwrap();
        assert_eq!(a, pt(48.0, 16.0));
        assert_eq!(b, pt(48.1, 16.1));
        assert!(path.segment(1).is_none());
    }

    #[test]
    fn total_length_simple() {
        let path = Path::build(&[pt(0.0, 0.0), pt(0.0, 1.0), pt(0.0, 2.0)]);
        let len = path.total_length_m();
        // Each degree of longitude at the equator ~111 km
        assert!(
            len > 200_000.0 && len < 230_000.0,
            "Expected ~222 km, got {:.0} m",
            len
        );
    }
}
