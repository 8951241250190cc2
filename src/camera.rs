//! Camera controller.
//!
//! Derives the map viewport from the latest fix: an instant snap on the
//! first fix of a session, animated follow afterwards, with the zoom
//! tiered by speed (faster travel gets a wider lookahead). Auto-follow
//! pauses while the user pans and resumes on an explicit recenter.

use serde::Serialize;

use crate::fix::Fix;
use crate::geo::Coordinate;

/// Zoom used for the initial snap.
pub const INITIAL_ZOOM: f64 = 17.0;

/// Zoom tier for a speed in km/h. Lower speed gets a closer zoom.
fn zoom_for_speed(speed_kmh: f64) -> f64 {
    if !speed_kmh.is_finite() || speed_kmh < 30.0 {
        17.0
    } else if speed_kmh < 60.0 {
        16.0
    } else if speed_kmh < 90.0 {
        15.0
    } else {
        14.0
    }
}

/// A viewport command for the map layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraCommand {
    pub center: Coordinate,
    pub zoom: f64,
    /// Animate the transition; false means snap instantly.
    pub animate: bool,
}

/// Viewport follow state for one session.
pub struct CameraController {
    tracking: bool,
    started: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            tracking: true,
            started: false,
        }
    }

    /// Whether the camera auto-follows the vehicle.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// The user dragged the map; leave the viewport to them.
    pub fn on_user_pan(&mut self) {
        self.tracking = false;
    }

    /// Explicit recenter action; resume following.
    pub fn recenter(&mut self) {
        self.tracking = true;
    }

    pub fn reset(&mut self) {
        self.tracking = true;
        self.started = false;
    }

    /// Viewport for a new fix. None while the user controls the map or
    /// the fix is unusable; guidance keeps operating either way.
    pub fn on_fix(&mut self, fix: &Fix) -> Option<CameraCommand> {
        if !fix.coord.is_valid() || !self.tracking {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(CameraCommand {
                center: fix.coord,
                zoom: INITIAL_ZOOM,
                animate: false,
            });
        }

        Some(CameraCommand {
            center: fix.coord,
            zoom: zoom_for_speed(fix.speed_kmh),
            animate: true,
        })
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::FixSource;

    fn fix(speed_kmh: f64) -> Fix {
        Fix {
            coord: Coordinate::new(48.0, 16.0),
            heading_deg: 0.0,
            speed_kmh,
            accuracy_m: None,
            source: FixSource::Simulated,
            elapsed_s: 0.0,
        }
    }

    #[test]
    fn first_fix_snaps_instantly() {
        let mut camera = CameraController::new();
        let cmd = camera.on_fix(&fix(80.0)).unwrap();
        assert!(!cmd.animate);
        assert_eq!(cmd.zoom, INITIAL_ZOOM);
    }

    #[test]
    fn later_fixes_animate() {
        let mut camera = CameraController::new();
        camera.on_fix(&fix(10.0));
        let cmd = camera.on_fix(&fix(10.0)).unwrap();
        assert!(cmd.animate);
    }

    #[test]
    fn zoom_widens_with_speed() {
        let mut camera = CameraController::new();
        camera.on_fix(&fix(0.0));

        let slow = camera.on_fix(&fix(20.0)).unwrap().zoom;
        let urban = camera.on_fix(&fix(50.0)).unwrap().zoom;
        let fast = camera.on_fix(&fix(120.0)).unwrap().zoom;

        assert!(slow > urban, "Slower speed zooms closer");
        assert!(urban > fast);
    }

    #[test]
    fn pan_pauses_follow_and_recenter_resumes() {
        let mut camera = CameraController::new();
        camera.on_fix(&fix(30.0));

        camera.on_user_pan();
        assert!(!camera.is_tracking());
        assert!(camera.on_fix(&fix(30.0)).is_none());

        camera.recenter();
        assert!(camera.is_tracking());
        assert!(camera.on_fix(&fix(30.0)).is_some());
    }

    #[test]
    fn invalid_fix_produces_no_command() {
        let mut camera = CameraController::new();
        let mut bad = fix(30.0);
        bad.coord = Coordinate::new(f64::NAN, 16.0);
        assert!(camera.on_fix(&bad).is_none());
    }
}
