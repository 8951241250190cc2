//! Position fixes.
//!
//! The ephemeral real-time position snapshot shared by both position
//! sources, plus the raw contract of the device location service.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Which producer a fix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixSource {
    Simulated,
    Live,
}

/// One real-time position/heading/speed sample.
///
/// Fixes are never persisted. Each new fix supersedes the previous one
/// for display; speed is low-pass filtered across fixes by the
/// producing source rather than replaced instantaneously.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Fix {
    pub coord: Coordinate,
    /// Compass heading in degrees [0, 360).
    pub heading_deg: f64,
    /// Ground speed in km/h, >= 0.
    pub speed_kmh: f64,
    /// Reported accuracy radius in meters, if known.
    pub accuracy_m: Option<f64>,
    pub source: FixSource,
    /// Seconds since the session started.
    pub elapsed_s: f64,
}

impl Fix {
    /// Accuracy above this is shown with a reduced-confidence indicator.
    pub const DEGRADED_ACCURACY_M: f64 = 50.0;

    /// Whether the fix is usable but low-confidence. Not an error;
    /// navigation computations proceed unchanged.
    pub fn is_degraded(&self) -> bool {
        matches!(self.accuracy_m, Some(a) if a > Self::DEGRADED_ACCURACY_M)
    }
}

/// A raw sample from the device location service, before validation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Compass heading in degrees, when the device reports one.
    pub heading: Option<f64>,
    /// Ground speed in m/s, when the device reports one.
    pub speed_mps: Option<f64>,
    pub accuracy_m: Option<f64>,
    /// Seconds since the session started, stamped by the adapter.
    pub elapsed_s: Option<f64>,
}

/// Options passed to the device location service when subscribing.
#[derive(Debug, Clone, Copy)]
pub struct LocationRequest {
    pub high_accuracy: bool,
    /// Maximum age of a delivered fix, milliseconds.
    pub max_age_ms: u64,
    /// How long to wait for the first fix, milliseconds.
    pub timeout_ms: u64,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_age_ms: 5_000,
            timeout_ms: 10_000,
        }
    }
}
