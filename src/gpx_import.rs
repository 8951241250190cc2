//! GPX route import.
//!
//! Reads a planned route from a GPX 1.1 file and lifts it into the
//! route contract. Routes are preferred; recorded tracks are accepted
//! as a fallback with their segments flattened. Maneuver steps are
//! synthesized from the bare geometry.

use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::instructions::synthesize_steps;
use crate::route::RouteOption;

/// Parse GPX bytes into a navigable route.
pub fn route_from_gpx(data: &[u8]) -> Result<RouteOption, RouteError> {
    let parsed = gpx::read(data).map_err(|e| RouteError::Gpx(e.to_string()))?;

    let (name, points) = if let Some(route) = parsed.routes.first() {
        let points = route
            .points
            .iter()
            .map(|wp| Coordinate::new(wp.point().y(), wp.point().x()))
            .collect::<Vec<_>>();
        (route.name.clone(), points)
    } else if let Some(track) = parsed.tracks.first() {
        let points = track
            .segments
            .iter()
            .flat_map(|seg| seg.points.iter())
            .map(|wp| Coordinate::new(wp.point().y(), wp.point().x()))
            .collect::<Vec<_>>();
        (track.name.clone(), points)
    } else {
        return Err(RouteError::EmptyGpx);
    };

    let steps = synthesize_steps(&points);
    if steps.is_empty() {
        return Err(RouteError::NoUsablePath);
    }

    Ok(RouteOption {
        name,
        steps,
        path: points,
        vehicle: None,
    })
}
