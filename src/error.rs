//! Error taxonomy.
//!
//! Only two failure classes ever cross the crate boundary: unusable
//! route input and device location trouble. Everything else (degenerate
//! arithmetic, invalid coordinates, degraded accuracy) is recovered
//! internally and never surfaced.

/// Errors produced while parsing or accepting a route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No valid geometry survived sanitization. This is the only
    /// geometry failure that reaches the user, as a "no route" state.
    #[error("no usable route geometry after sanitizing input")]
    NoUsablePath,

    #[error("route contains no maneuver steps")]
    NoSteps,

    #[error("route JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GPX parse error: {0}")]
    Gpx(String),

    #[error("GPX file contains no routes or tracks")]
    EmptyGpx,
}

/// Errors reported by the device location service.
///
/// None of these terminate a driving session; the engine keeps the
/// last known fix and the session surfaces a transient notice.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("location service unavailable: {0}")]
    Unavailable(String),
}
