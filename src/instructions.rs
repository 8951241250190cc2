//! Step synthesis from bare geometry.
//!
//! When a route arrives without maneuver steps (a GPX import, or a
//! geometry-only response), derives them from the polyline: the bearing
//! change at each interior point is classified into a maneuver and
//! wrapped into a step with instruction text.

use crate::geo::{self, Coordinate};
use crate::route::{format_distance, maneuver_text, Maneuver, Step};

/// Generate a step sequence for a bare point list.
///
/// The list must have at least 2 points to produce anything. Returns
/// one step per point: a start marker, a classified turn at each
/// interior point, and an arrival step at the end.
pub fn synthesize_steps(points: &[Coordinate]) -> Vec<Step> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut steps = Vec::with_capacity(points.len());

    steps.push(Step {
        maneuver: Maneuver::Start,
        instruction: "Start navigation".to_string(),
        approach: points[0],
        hazard: None,
        distance_text: None,
    });

    for i in 1..points.len() - 1 {
        let dist = geo::distance_m(&points[i - 1], &points[i]);
        let maneuver = classify_turn(turn_angle(&points[i - 1], &points[i], &points[i + 1]));

        steps.push(Step {
            maneuver,
            instruction: format!(
                "In {}, {}",
                format_distance(dist),
                maneuver_text(maneuver)
            ),
            approach: points[i],
            hazard: None,
            distance_text: Some(format_distance(dist)),
        });
    }

    let last = points.len() - 1;
    let dist = geo::distance_m(&points[last - 1], &points[last]);
    steps.push(Step {
        maneuver: Maneuver::End,
        instruction: format!("In {}, arrive at destination", format_distance(dist)),
        approach: points[last],
        hazard: None,
        distance_text: Some(format_distance(dist)),
    });

    steps
}

/// Relative bearing change at point B, approaching from A and leaving
/// toward C. Positive = right turn, negative = left turn, in [-180, 180).
fn turn_angle(a: &Coordinate, b: &Coordinate, c: &Coordinate) -> f64 {
    geo::wrap_180(geo::bearing_deg(b, c) - geo::bearing_deg(a, b))
}

/// Classify a relative bearing angle into a maneuver.
fn classify_turn(angle: f64) -> Maneuver {
    let abs_angle = angle.abs();

    if abs_angle > 170.0 {
        Maneuver::UTurn
    } else if abs_angle > 60.0 {
        if angle > 0.0 {
            Maneuver::TurnRight
        } else {
            Maneuver::TurnLeft
        }
    } else if abs_angle > 20.0 {
        if angle > 0.0 {
            Maneuver::SlightRight
        } else {
            Maneuver::SlightLeft
        }
    } else {
        Maneuver::Straight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn classify_straight() {
        assert_eq!(classify_turn(5.0), Maneuver::Straight);
        assert_eq!(classify_turn(-10.0), Maneuver::Straight);
    }

    #[test]
    fn classify_turns() {
        assert_eq!(classify_turn(90.0), Maneuver::TurnRight);
        assert_eq!(classify_turn(-90.0), Maneuver::TurnLeft);
        assert_eq!(classify_turn(30.0), Maneuver::SlightRight);
        assert_eq!(classify_turn(-30.0), Maneuver::SlightLeft);
    }

    #[test]
    fn classify_u_turn() {
        assert_eq!(classify_turn(175.0), Maneuver::UTurn);
        assert_eq!(classify_turn(-175.0), Maneuver::UTurn);
    }

    #[test]
    fn synthesize_straight_route() {
        // Three points along the same meridian
        let route = [pt(48.0, 16.0), pt(48.5, 16.0), pt(49.0, 16.0)];
        let steps = synthesize_steps(&route);

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].maneuver, Maneuver::Start);
        assert_eq!(steps[1].maneuver, Maneuver::Straight);
        assert_eq!(steps[2].maneuver, Maneuver::End);
        assert_eq!(steps[1].approach, pt(48.5, 16.0));
    }

    #[test]
    fn synthesize_right_turn() {
        // North then east
        let route = [pt(48.0, 16.0), pt(48.5, 16.0), pt(48.5, 17.0)];
        let steps = synthesize_steps(&route);

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].maneuver, Maneuver::TurnRight);
        assert!(steps[1].instruction.contains("turn right"));
    }

    #[test]
    fn synthesize_two_points() {
        let steps = synthesize_steps(&[pt(48.0, 16.0), pt(49.0, 16.0)]);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].maneuver, Maneuver::Start);
        assert_eq!(steps[1].maneuver, Maneuver::End);
    }

    #[test]
    fn synthesize_too_few_points() {
        assert!(synthesize_steps(&[pt(48.0, 16.0)]).is_empty());
        assert!(synthesize_steps(&[]).is_empty());
    }

    #[test]
    fn synthesized_distance_text_present() {
        let route = [pt(48.0, 16.0), pt(48.5, 16.0), pt(49.0, 16.0)];
        let steps = synthesize_steps(&route);
        assert!(steps[1].distance_text.is_some());
        assert!(steps[2].distance_text.is_some());
    }
}
