//! Route-generation output contract.
//!
//! Typed form of the data produced by the external route generation
//! service: an ordered maneuver step list plus a dense road polyline,
//! annotated with vehicle hazard warnings. The data is untrusted;
//! `Path::build` re-validates all geometry before navigation starts.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::geo::Coordinate;

/// Maneuver kinds a step can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Start,
    Straight,
    TurnLeft,
    TurnRight,
    SlightLeft,
    SlightRight,
    UTurn,
    Roundabout,
    Merge,
    Exit,
    End,
}

/// One maneuver unit of a route.
///
/// Steps are immutable during a session; only the session's current
/// step index moves, and only forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub maneuver: Maneuver,
    /// Free-text instruction, e.g. "Turn left onto Ringstrasse".
    pub instruction: String,
    /// The coordinate at which the maneuver takes place.
    pub approach: Coordinate,
    /// Vehicle-specific caution text (low bridge, weight limit, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard: Option<String>,
    /// Pre-formatted display distance from the previous step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,
}

/// Vehicle dimensions echoed back by route generation, so hazard text
/// can be related to the profile it was computed for. Profile storage
/// itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub height_m: f64,
    pub width_m: f64,
    pub length_m: f64,
    pub weight_t: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_class: Option<String>,
}

/// One candidate route as delivered by route generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: Vec<Step>,
    /// Dense road polyline, when the road geometry service supplied one.
    #[serde(default)]
    pub path: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleProfile>,
}

impl RouteOption {
    /// Parse a route from route-generation JSON.
    pub fn from_json(data: &str) -> Result<RouteOption, RouteError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Points used to build the navigation path.
    ///
    /// The dense polyline wins when it really is one (more than two
    /// points). Otherwise the step approach coordinates are used, with
    /// the short polyline as a last resort for step-poor routes.
    pub fn nav_points(&self) -> Vec<Coordinate> {
        if self.path.len() > 2 {
            return self.path.clone();
        }
        if self.steps.len() >= 2 {
            return self.steps.iter().map(|s| s.approach).collect();
        }
        self.path.clone()
    }

    /// Number of steps carrying a hazard warning.
    pub fn hazard_count(&self) -> usize {
        self.steps.iter().filter(|s| s.hazard.is_some()).count()
    }

    /// Minimal direct-line route between two coordinates.
    ///
    /// Used when route generation fails entirely. It is an ordinary
    /// route like any other: a start marker at the origin and a single
    /// maneuver, arriving at the destination.
    pub fn direct_fallback(origin: Coordinate, destination: Coordinate) -> RouteOption {
        let steps = vec![
            Step {
                maneuver: Maneuver::Start,
                instruction: maneuver_text(Maneuver::Start).to_string(),
                approach: origin,
                hazard: None,
                distance_text: None,
            },
            Step {
                maneuver: Maneuver::End,
                instruction: maneuver_text(Maneuver::End).to_string(),
                approach: destination,
                hazard: None,
                distance_text: None,
            },
        ];

        RouteOption {
            name: None,
            steps,
            path: vec![origin, destination],
            vehicle: None,
        }
    }
}

/// Human/speech text for a maneuver.
pub fn maneuver_text(maneuver: Maneuver) -> &'static str {
    match maneuver {
        Maneuver::Start => "start navigation",
        Maneuver::Straight => "continue straight",
        Maneuver::TurnLeft => "turn left",
        Maneuver::TurnRight => "turn right",
        Maneuver::SlightLeft => "keep slightly left",
        Maneuver::SlightRight => "keep slightly right",
        Maneuver::UTurn => "make a U-turn",
        Maneuver::Roundabout => "enter the roundabout",
        Maneuver::Merge => "merge",
        Maneuver::Exit => "take the exit",
        Maneuver::End => "arrive at destination",
    }
}

/// Format a distance for display or speech.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", (meters / 10.0).round() as i64 * 10)
    }
}
