//! Navigation session.
//!
//! Owns everything that mutates during a drive: the sanitized path,
//! the step list, the guidance engine, the camera controller, and
//! exactly one position source. Every producer (animation ticks,
//! device callbacks, user commands) is serialized through the
//! session's entry points, so no session state is ever touched from
//! two places at once.

use log::{info, warn};
use serde::Serialize;

use crate::camera::{CameraCommand, CameraController};
use crate::error::{LocationError, RouteError};
use crate::fix::{Fix, FixSource, RawLocation};
use crate::guidance::{DriveState, GuidanceEngine, GuidanceUpdate};
use crate::live::{LiveSource, Subscription};
use crate::path::Path;
use crate::route::{RouteOption, Step};
use crate::sim::SimulatedSource;

/// The active fix producer. Exactly one exists at a time; replacing or
/// dropping it tears the previous one down.
enum PositionSource {
    Simulated(SimulatedSource),
    Live(LiveSource),
}

/// Transient, non-blocking user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    SignalLost,
}

/// Effects produced by one session event, for the presentation layer.
#[derive(Debug, Default)]
pub struct SessionUpdate {
    pub fix: Option<Fix>,
    pub guidance: Option<GuidanceUpdate>,
    pub camera: Option<CameraCommand>,
    pub notice: Option<Notice>,
    /// The drive reached a terminal state during this event.
    pub finished: bool,
}

/// Read-only session snapshot for the UI bridge.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: DriveState,
    pub step_index: usize,
    pub step_instruction: Option<String>,
    pub distance_to_next_m: Option<f64>,
    pub speed_kmh: f64,
    pub heading_deg: f64,
    pub tracking: bool,
    pub degraded_signal: bool,
}

/// One navigation run over a chosen route.
pub struct NavigationSession {
    path: Path,
    steps: Vec<Step>,
    engine: GuidanceEngine,
    camera: CameraController,
    source: Option<PositionSource>,
    last_fix: Option<Fix>,
}

impl NavigationSession {
    /// Create a session for a chosen route.
    ///
    /// Fails with `NoUsablePath` when no valid geometry survives
    /// sanitization (the visible "cannot compute route" state) and
    /// with `NoSteps` for a route without maneuvers.
    pub fn new(route: &RouteOption) -> Result<Self, RouteError> {
        let path = Path::build(&route.nav_points());
        if !path.is_navigable() {
            return Err(RouteError::NoUsablePath);
        }
        if route.steps.is_empty() {
            return Err(RouteError::NoSteps);
        }

        Ok(Self {
            path,
            steps: route.steps.clone(),
            engine: GuidanceEngine::new(),
            camera: CameraController::new(),
            source: None,
            last_fix: None,
        })
    }

    /// Begin navigation with the chosen position source. Any
    /// previously active source is torn down first, so switching modes
    /// can never leave two producers running.
    pub fn start(&mut self, mode: FixSource) {
        self.shutdown_source();
        self.engine.start();
        self.source = Some(match mode {
            FixSource::Simulated => PositionSource::Simulated(SimulatedSource::new()),
            FixSource::Live => PositionSource::Live(LiveSource::new()),
        });
        info!(
            "navigation started ({mode:?}, {} steps, {:.0} m path)",
            self.steps.len(),
            self.path.total_length_m()
        );
    }

    /// Hand the device stream handle to the session so it is cancelled
    /// on every exit path. Cancelled on the spot when the session is
    /// not in live mode.
    pub fn attach_subscription(&mut self, mut subscription: Box<dyn Subscription>) {
        match &mut self.source {
            Some(PositionSource::Live(live)) => live.attach(subscription),
            _ => {
                warn!("subscription attached outside live mode, cancelling");
                subscription.cancel();
            }
        }
    }

    /// Stop navigating, keeping route and progress for a restart.
    pub fn stop(&mut self) {
        self.shutdown_source();
        self.engine.stop();
        info!("navigation stopped");
    }

    /// Clear all per-drive state; the route stays selected.
    pub fn reset(&mut self) {
        self.shutdown_source();
        self.engine.reset();
        self.camera.reset();
        self.last_fix = None;
    }

    /// Advance the simulated drive by one animation tick. No-op in
    /// live mode or when stopped.
    pub fn on_tick(&mut self, dt_s: f64) -> SessionUpdate {
        let mut update = SessionUpdate::default();

        let tick = match &mut self.source {
            Some(PositionSource::Simulated(sim)) => sim.tick(&self.path, dt_s),
            _ => return update,
        };

        if let Some(fix) = tick.fix {
            update = self.process_fix(fix);
        }
        if tick.finished {
            // The synthetic vehicle ran out of path; the drive is over
            // even if guidance never saw an arrival-radius fix.
            self.engine.stop();
            update.finished = true;
        }
        update
    }

    /// Feed one raw device fix. No-op outside live mode.
    pub fn on_location(&mut self, raw: &RawLocation) -> SessionUpdate {
        let fix = match &mut self.source {
            Some(PositionSource::Live(live)) => live.ingest(raw),
            _ => return SessionUpdate::default(),
        };

        match fix {
            Some(fix) => self.process_fix(fix),
            None => SessionUpdate::default(),
        }
    }

    /// Surface a device stream error as a transient notice. The drive
    /// continues on the last known fix.
    pub fn on_location_error(&mut self, err: &LocationError) -> SessionUpdate {
        warn!("location stream error: {err}");
        SessionUpdate {
            notice: Some(Notice::SignalLost),
            ..SessionUpdate::default()
        }
    }

    /// Map pan from the user; pauses camera follow only.
    pub fn on_user_pan(&mut self) {
        self.camera.on_user_pan();
    }

    /// Resume camera follow, re-framing on the latest fix.
    pub fn recenter(&mut self) -> Option<CameraCommand> {
        self.camera.recenter();
        match self.last_fix {
            Some(fix) => self.camera.on_fix(&fix),
            None => None,
        }
    }

    pub fn state(&self) -> DriveState {
        self.engine.state()
    }

    pub fn current_step_index(&self) -> usize {
        self.engine.current_step()
    }

    /// The step currently being approached.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.engine.current_step())
    }

    pub fn distance_to_next_m(&self) -> Option<f64> {
        self.engine.distance_to_next_m()
    }

    /// Speed for display; zero whenever the vehicle is not driving.
    pub fn speed_kmh(&self) -> f64 {
        if self.engine.state() != DriveState::Driving {
            return 0.0;
        }
        self.last_fix.map(|f| f.speed_kmh).unwrap_or(0.0)
    }

    pub fn heading_deg(&self) -> f64 {
        self.last_fix.map(|f| f.heading_deg).unwrap_or(0.0)
    }

    pub fn is_tracking(&self) -> bool {
        self.camera.is_tracking()
    }

    pub fn latest_fix(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Read-only snapshot of the session for the UI bridge.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.engine.state(),
            step_index: self.engine.current_step(),
            step_instruction: self.current_step().map(|s| s.instruction.clone()),
            distance_to_next_m: self.engine.distance_to_next_m(),
            speed_kmh: self.speed_kmh(),
            heading_deg: self.heading_deg(),
            tracking: self.camera.is_tracking(),
            degraded_signal: self.last_fix.map(|f| f.is_degraded()).unwrap_or(false),
        }
    }

    /// The snapshot as JSON, for bridges that cross a language boundary.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    fn process_fix(&mut self, fix: Fix) -> SessionUpdate {
        let guidance = self.engine.on_fix(&fix, &self.steps);
        let camera = self.camera.on_fix(&fix);
        let finished = guidance.arrived;
        self.last_fix = Some(fix);

        if finished {
            // Arrival is terminal; tear the producer down so nothing
            // keeps delivering fixes into a completed drive.
            self.shutdown_source();
        }

        SessionUpdate {
            fix: Some(fix),
            guidance: Some(guidance),
            camera,
            notice: None,
            finished,
        }
    }

    fn shutdown_source(&mut self) {
        if let Some(PositionSource::Live(mut live)) = self.source.take() {
            live.cancel();
        }
        // A taken simulated source is simply dropped; with it gone,
        // on_tick is a no-op and no further frames are consumed.
    }
}

impl Drop for NavigationSession {
    fn drop(&mut self) {
        self.shutdown_source();
    }
}
