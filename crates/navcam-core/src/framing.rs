//! Camera framing targets produced by the viewport data source.

use serde::{Deserialize, Serialize};

use crate::geo::{EdgeInsets, GeoPoint};

/// Default zoom level for the deterministic no-data framing.
pub const DEFAULT_ZOOM: f64 = 14.0;

/// A complete camera framing: where the camera should point and how.
///
/// Framings are immutable snapshots, produced independently per intent on
/// every evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFraming {
    /// Geographic point at the camera's focus.
    pub center: GeoPoint,
    /// Zoom level.
    pub zoom: f64,
    /// Bearing in degrees, normalized to [0, 360).
    pub bearing: f64,
    /// Pitch in degrees from the vertical.
    pub pitch: f64,
    /// Screen-space padding applied around the framed geometry.
    pub padding: EdgeInsets,
}

impl CameraFraming {
    /// The deterministic framing produced before any input is available:
    /// origin coordinate, north bearing, zero pitch, default zoom.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            center: GeoPoint::ORIGIN,
            zoom: DEFAULT_ZOOM,
            bearing: 0.0,
            pitch: 0.0,
            padding: EdgeInsets::ZERO,
        }
    }
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self::fallback()
    }
}

/// The pair of target framings computed on each evaluation cycle.
///
/// Owned by the viewport data source and replaced wholesale on every
/// `evaluate()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewportData {
    /// Target framing while tracking the vehicle.
    pub camera_for_following: CameraFraming,
    /// Target framing for the route overview.
    pub camera_for_overview: CameraFraming,
}
