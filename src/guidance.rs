//! Guidance engine.
//!
//! The stateful navigation core: consumes validated fixes, tracks the
//! step currently being approached, fires proximity announcements
//! exactly once per step and threshold, advances the step index on
//! arrival at each approach point, and detects trip completion.
//!
//! Announcements fire inside (guard, ceiling] distance windows. The
//! guard keeps a sparse fix stream from retroactively firing a cue the
//! vehicle has already driven past; a missed cue is accepted over a
//! stale or duplicate one. Each window fires at most once per step, so
//! a noisy signal oscillating around a boundary cannot re-trigger it.

use std::collections::HashSet;

use log::{debug, info};
use serde::Serialize;

use crate::fix::Fix;
use crate::geo;
use crate::route::{format_distance, maneuver_text, Step};

/// Distance below which an approach point counts as reached, meters.
/// Tighter than the announcement windows to avoid premature advancement.
pub const ARRIVAL_RADIUS_M: f64 = 25.0;

/// Proximity announcement thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// First hazard cue, far out. Interrupts in-progress speech.
    HazardEarly,
    /// Last hazard cue before the maneuver. Interrupts.
    HazardCritical,
    /// Upcoming maneuver with full instruction text. Queued.
    Distant,
    /// Short maneuver-type cue. Queued.
    Prepare,
    /// "Do it now" cue. Queued.
    Imminent,
    /// One-time arrival at the destination.
    Arrival,
}

impl Trigger {
    /// The (guard, ceiling] distance window in meters, if band-triggered.
    fn window(self) -> Option<(f64, f64)> {
        match self {
            Trigger::HazardEarly => Some((200.0, 800.0)),
            Trigger::HazardCritical => Some((ARRIVAL_RADIUS_M, 200.0)),
            Trigger::Distant => Some((200.0, 500.0)),
            Trigger::Prepare => Some((50.0, 200.0)),
            Trigger::Imminent => Some((ARRIVAL_RADIUS_M, 50.0)),
            Trigger::Arrival => None,
        }
    }

    /// Whether this announcement cancels in-progress speech.
    pub fn interrupts(self) -> bool {
        matches!(self, Trigger::HazardEarly | Trigger::HazardCritical)
    }
}

/// One announcement event for the presentation layer to speak/show.
#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub step_index: usize,
    pub trigger: Trigger,
    pub text: String,
    /// Cancel in-progress speech before this one.
    pub interrupt: bool,
}

/// Session drive state. `Driving -> NotStarted` on explicit stop is
/// re-entrant; `Arrived` is terminal until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveState {
    NotStarted,
    Driving,
    Arrived,
}

/// The outcome of processing one fix.
#[derive(Debug, Clone)]
pub struct GuidanceUpdate {
    /// Whole-meter distance to the current approach point. None when
    /// the fix or the target was unusable and nothing changed.
    pub distance_m: Option<f64>,
    pub announcements: Vec<Announcement>,
    /// The step index advanced; render a short non-speech cue.
    pub step_advanced: bool,
    /// The trip completed during this fix.
    pub arrived: bool,
}

impl GuidanceUpdate {
    fn empty() -> Self {
        Self {
            distance_m: None,
            announcements: Vec::new(),
            step_advanced: false,
            arrived: false,
        }
    }
}

/// Per-session guidance state machine.
pub struct GuidanceEngine {
    state: DriveState,
    current_step: usize,
    /// (step index, trigger) pairs already fired this session.
    announced: HashSet<(usize, Trigger)>,
    last_distance_m: Option<f64>,
}

impl GuidanceEngine {
    pub fn new() -> Self {
        Self {
            state: DriveState::NotStarted,
            current_step: 0,
            announced: HashSet::new(),
            last_distance_m: None,
        }
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Index of the step currently being approached.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Whole-meter distance to the current approach point, from the
    /// most recent usable fix.
    pub fn distance_to_next_m(&self) -> Option<f64> {
        self.last_distance_m
    }

    /// Begin driving. No-op unless the engine is in `NotStarted`;
    /// a completed trip needs `reset` before it can be driven again.
    pub fn start(&mut self) {
        if self.state == DriveState::NotStarted {
            self.state = DriveState::Driving;
        }
    }

    /// Stop driving, keeping progress for a restart.
    pub fn stop(&mut self) {
        if self.state == DriveState::Driving {
            self.state = DriveState::NotStarted;
        }
    }

    /// Clear all per-drive state.
    pub fn reset(&mut self) {
        self.state = DriveState::NotStarted;
        self.current_step = 0;
        self.announced.clear();
        self.last_distance_m = None;
    }

    /// Process one fix against the route's steps.
    ///
    /// Invalid fixes and invalid step targets are skipped without
    /// stopping the engine; it waits for the next usable fix.
    pub fn on_fix(&mut self, fix: &Fix, steps: &[Step]) -> GuidanceUpdate {
        let mut update = GuidanceUpdate::empty();

        if self.state != DriveState::Driving || steps.is_empty() {
            return update;
        }
        if !fix.coord.is_valid() {
            return update;
        }
        let step = match steps.get(self.current_step) {
            Some(s) => s,
            None => return update,
        };
        if !step.approach.is_valid() {
            return update;
        }

        let distance = geo::distance_m(&fix.coord, &step.approach).round();
        update.distance_m = Some(distance);
        self.last_distance_m = Some(distance);

        if distance < ARRIVAL_RADIUS_M {
            if self.current_step + 1 >= steps.len() {
                // Final approach point reached: one-time arrival.
                if self.announced.insert((self.current_step, Trigger::Arrival)) {
                    update.announcements.push(Announcement {
                        step_index: self.current_step,
                        trigger: Trigger::Arrival,
                        text: "You have arrived at your destination".to_string(),
                        interrupt: false,
                    });
                    update.arrived = true;
                    self.state = DriveState::Arrived;
                    self.last_distance_m = Some(0.0);
                    info!("arrived after {} steps", steps.len());
                }
            } else {
                // Advance by exactly one step per fix, even when the fix
                // jumped past several approach points.
                self.current_step += 1;
                update.step_advanced = true;
                debug!("advanced to step {}", self.current_step);
            }
            return update;
        }

        // Hazard warnings on the upcoming step, highest priority.
        if let Some(hazard) = step.hazard.as_deref() {
            for trigger in [Trigger::HazardEarly, Trigger::HazardCritical] {
                if self.newly_entered(distance, trigger) {
                    update.announcements.push(Announcement {
                        step_index: self.current_step,
                        trigger,
                        text: format!("Caution: {hazard}"),
                        interrupt: true,
                    });
                }
            }
        }

        // Standard instruction cues; the bands do not overlap, so at
        // most one fires per fix, evaluated farthest first.
        for trigger in [Trigger::Distant, Trigger::Prepare, Trigger::Imminent] {
            if self.newly_entered(distance, trigger) {
                update.announcements.push(Announcement {
                    step_index: self.current_step,
                    trigger,
                    text: instruction_text(trigger, step, distance),
                    interrupt: false,
                });
                break;
            }
        }

        update
    }

    /// True when `distance` lies in the trigger's window and the
    /// trigger has not fired yet for the current step. Records it.
    fn newly_entered(&mut self, distance: f64, trigger: Trigger) -> bool {
        let Some((guard, ceiling)) = trigger.window() else {
            return false;
        };
        if distance <= guard || distance > ceiling {
            return false;
        }
        self.announced.insert((self.current_step, trigger))
    }
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn instruction_text(trigger: Trigger, step: &Step, distance: f64) -> String {
    match trigger {
        Trigger::Distant => {
            if step.instruction.is_empty() {
                format!(
                    "In {}, {}",
                    format_distance(distance),
                    maneuver_text(step.maneuver)
                )
            } else {
                format!("In {}, {}", format_distance(distance), step.instruction)
            }
        }
        Trigger::Prepare => format!("{} ahead", maneuver_text(step.maneuver)),
        Trigger::Imminent => format!("{} now", maneuver_text(step.maneuver)),
        _ => step.instruction.clone(),
    }
}
