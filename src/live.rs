//! Live position source.
//!
//! Validates fixes from the device location service and forwards them
//! to the guidance engine. Unsafe heading or speed values keep the
//! previous value rather than snapping to zero, stream errors surface
//! as a transient notice without ending the session, and the
//! subscription handle is cancelled on every exit path.

use log::{debug, warn};

use crate::fix::{Fix, FixSource, RawLocation};
use crate::geo::{self, Coordinate};

/// Conversion factor from m/s (device units) to km/h.
const MPS_TO_KMH: f64 = 3.6;

/// A cancellable handle to a device location stream.
///
/// Implemented by the platform adapter around whatever callback API
/// the device exposes. `cancel` must be idempotent; it is called on
/// stop, reset, source switch, and drop, so a forgotten teardown path
/// cannot leak a background callback.
pub trait Subscription {
    fn cancel(&mut self);
}

/// Validating wrapper around the device location stream.
pub struct LiveSource {
    heading_deg: f64,
    speed_kmh: f64,
    elapsed_s: f64,
    subscription: Option<Box<dyn Subscription>>,
}

impl LiveSource {
    pub fn new() -> Self {
        Self {
            heading_deg: 0.0,
            speed_kmh: 0.0,
            elapsed_s: 0.0,
            subscription: None,
        }
    }

    /// Take ownership of the stream handle. Any previously attached
    /// handle is cancelled first; at most one stream is ever active.
    pub fn attach(&mut self, subscription: Box<dyn Subscription>) {
        self.cancel();
        self.subscription = Some(subscription);
    }

    /// Cancel the attached stream, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            debug!("cancelling live location subscription");
            sub.cancel();
        }
    }

    /// Validate one raw device sample into a fix.
    ///
    /// Returns None for an unusable coordinate; the engine then waits
    /// for the next valid fix. Heading and speed are forwarded only
    /// when individually safe, otherwise the previous value is kept.
    pub fn ingest(&mut self, raw: &RawLocation) -> Option<Fix> {
        let coord = Coordinate::new(raw.latitude, raw.longitude);
        if !coord.is_valid() {
            warn!(
                "dropping invalid live fix ({}, {})",
                raw.latitude, raw.longitude
            );
            return None;
        }

        if let Some(h) = raw.heading {
            if geo::is_safe_number(h) {
                self.heading_deg = geo::wrap_360(h);
            }
        }
        if let Some(s) = raw.speed_mps {
            if geo::is_safe_number(s) && s >= 0.0 {
                self.speed_kmh = s * MPS_TO_KMH;
            }
        }
        if let Some(t) = raw.elapsed_s {
            if geo::is_safe_number(t) && t >= self.elapsed_s {
                self.elapsed_s = t;
            }
        }

        let accuracy_m = raw
            .accuracy_m
            .filter(|a| geo::is_safe_number(*a) && *a >= 0.0);

        Some(Fix {
            coord,
            heading_deg: self.heading_deg,
            speed_kmh: self.speed_kmh,
            accuracy_m,
            source: FixSource::Live,
            elapsed_s: self.elapsed_s,
        })
    }
}

impl Default for LiveSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LiveSource {
    fn drop(&mut self) {
        self.cancel();
    }
}
