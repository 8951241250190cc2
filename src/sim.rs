//! Simulated position source.
//!
//! Advances a synthetic vehicle along the route polyline on every
//! animation tick. The cursor's integer part is the current segment
//! index, the fractional part the interpolation offset within it.
//! Speed eases toward a per-segment cruise target instead of jumping,
//! and any non-finite intermediate self-heals instead of stalling the
//! drive or propagating corruption.

use log::warn;

use crate::fix::{Fix, FixSource};
use crate::geo::{self, Coordinate};
use crate::path::Path;

/// EMA factor applied to speed per tick.
const SPEED_SMOOTHING: f64 = 0.05;

/// Minimum speed used for the per-tick advance, km/h.
const MIN_ADVANCE_SPEED_KMH: f64 = 10.0;

/// Nominal tick rate assumed when the caller supplies no usable dt.
const TICKS_PER_SECOND: f64 = 60.0;

/// Cursor slack at the final segment end.
const END_EPS: f64 = 1e-3;

/// Fallback fractional advance when a tick produces a non-finite value.
const RECOVERY_ADVANCE: f64 = 0.01;

/// Segments shorter than this are crossed in a single tick, meters.
const MIN_SEGMENT_M: f64 = 0.5;

/// Cruise speed target for a segment, km/h. Longer segments are
/// assumed to be faster roads. Heuristic, tunable.
fn cruise_speed_kmh(segment_m: f64) -> f64 {
    if segment_m < 100.0 {
        30.0
    } else if segment_m < 500.0 {
        60.0
    } else {
        90.0
    }
}

/// The outcome of one simulation tick.
#[derive(Debug, Clone, Copy)]
pub struct SimTick {
    /// The new synthetic fix, absent on skip or terminal ticks.
    pub fix: Option<Fix>,
    /// The cursor has reached the end of the path.
    pub finished: bool,
}

/// Synthetic vehicle state following a path.
#[derive(Debug)]
pub struct SimulatedSource {
    cursor: f64,
    speed_kmh: f64,
    elapsed_s: f64,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self {
            cursor: 0.0,
            speed_kmh: 0.0,
            elapsed_s: 0.0,
        }
    }

    /// Fractional index into the path (integer part = segment index).
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Advance the simulation by one tick of `dt_s` seconds.
    ///
    /// A non-finite or non-positive `dt_s` falls back to the nominal
    /// frame interval, so a stalled or clamped animation clock cannot
    /// freeze or corrupt the drive.
    pub fn tick(&mut self, path: &Path, dt_s: f64) -> SimTick {
        let segments = path.segment_count();
        if segments == 0 {
            return SimTick {
                fix: None,
                finished: true,
            };
        }

        let end = segments as f64;
        if !self.cursor.is_finite() || self.cursor < 0.0 {
            self.cursor = 0.0;
        }

        // Terminal: the last segment's end has been reached.
        if self.cursor >= end - END_EPS {
            self.speed_kmh = 0.0;
            return SimTick {
                fix: None,
                finished: true,
            };
        }

        let idx = (self.cursor.floor() as usize).min(segments - 1);
        let (p1, p2) = match path.segment(idx) {
            Some(seg) => seg,
            None => {
                self.cursor = end;
                return SimTick {
                    fix: None,
                    finished: true,
                };
            }
        };

        // Skip corrupt segments rather than stall on them.
        if !p1.is_valid() || !p2.is_valid() {
            warn!("skipping invalid path segment {idx}");
            self.cursor = (idx + 1) as f64;
            return SimTick {
                fix: None,
                finished: false,
            };
        }

        let segment_m = geo::distance_m(&p1, &p2);
        let target = cruise_speed_kmh(segment_m);
        self.speed_kmh += SPEED_SMOOTHING * (target - self.speed_kmh);

        let dt = if dt_s.is_finite() && dt_s > 0.0 {
            dt_s
        } else {
            1.0 / TICKS_PER_SECOND
        };
        let frame_m = self.speed_kmh.max(MIN_ADVANCE_SPEED_KMH) / 3.6 * dt;

        let mut advance = if segment_m < MIN_SEGMENT_M {
            // Degenerately short segment: cross it in one tick.
            1.0
        } else {
            frame_m / segment_m
        };
        if !advance.is_finite() || advance <= 0.0 {
            advance = RECOVERY_ADVANCE;
        }

        self.cursor += advance;
        if !self.cursor.is_finite() {
            self.cursor = (idx + 1) as f64;
        }
        self.cursor = self.cursor.min(end);
        self.elapsed_s += dt;

        // Interpolate within the segment the tick started on; the next
        // tick re-derives the segment from the advanced cursor.
        let frac = (self.cursor - idx as f64).clamp(0.0, 1.0);
        let coord = Coordinate {
            lat: p1.lat + (p2.lat - p1.lat) * frac,
            lon: p1.lon + (p2.lon - p1.lon) * frac,
        };

        SimTick {
            fix: Some(Fix {
                coord,
                heading_deg: geo::bearing_deg(&p1, &p2),
                speed_kmh: self.speed_kmh,
                accuracy_m: None,
                source: FixSource::Simulated,
                elapsed_s: self.elapsed_s,
            }),
            finished: false,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0.0;
        self.speed_kmh = 0.0;
        self.elapsed_s = 0.0;
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}
