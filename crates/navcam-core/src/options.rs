//! Tunable options for viewport data evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{NavCamError, Result};

/// Selects which part of the route the overview framing fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverviewMode {
    /// Frame the remaining points of the active leg only.
    ActiveLeg,
    /// Frame the remaining points of the whole route.
    #[default]
    EntireRoute,
}

/// Options shaping the following-mode framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowingFrameOptions {
    /// Pitch generated for following frames, in degrees.
    pub default_pitch: f64,
    /// Lower bound for generated following zoom levels.
    pub min_zoom: f64,
    /// Upper bound for generated following zoom levels.
    pub max_zoom: f64,
    /// Zoom levels subtracted from the projection result to keep framed
    /// geometry clear of the padding edges.
    pub zoom_safety_margin: f64,
    /// Fixed lookahead window in meters; `None` frames the whole remainder
    /// of the current step.
    pub lookahead_distance: Option<f64>,
    /// Bearing deviation from the first edge at which lookahead geometry is
    /// cut, in degrees.
    pub max_angle_delta_for_slicing: f64,
    /// Whether the frame bearing may deviate from the raw location bearing
    /// toward the upcoming geometry.
    pub bearing_smoothing: bool,
    /// Maximum deviation from the location bearing when smoothing, in
    /// degrees.
    pub max_bearing_angle_diff: f64,
    /// Whether frames flatten to pitch zero close to a maneuver.
    pub pitch_zero_near_maneuver: bool,
    /// Distance to the upcoming maneuver at which the pitch flattens, in
    /// meters.
    pub pitch_zero_trigger_distance: f64,
}

impl Default for FollowingFrameOptions {
    fn default() -> Self {
        Self {
            default_pitch: 45.0,
            min_zoom: 10.5,
            max_zoom: 17.0,
            zoom_safety_margin: 0.2,
            lookahead_distance: None,
            max_angle_delta_for_slicing: 100.0,
            bearing_smoothing: true,
            max_bearing_angle_diff: 20.0,
            pitch_zero_near_maneuver: true,
            pitch_zero_trigger_distance: 180.0,
        }
    }
}

/// Options shaping the overview-mode framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewFrameOptions {
    /// Upper bound for generated overview zoom levels.
    pub max_zoom: f64,
    /// Which part of the route the overview fits.
    pub mode: OverviewMode,
    /// Geometry thinning applied to overview point sets.
    pub simplification: GeometrySimplification,
}

impl Default for OverviewFrameOptions {
    fn default() -> Self {
        Self {
            max_zoom: 17.0,
            mode: OverviewMode::default(),
            simplification: GeometrySimplification::default(),
        }
    }
}

/// Every-nth-point thinning for overview geometry, keeping endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometrySimplification {
    /// Whether thinning is applied.
    pub enabled: bool,
    /// Keep every nth point; must be positive to take effect.
    pub factor: usize,
}

impl Default for GeometrySimplification {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 25,
        }
    }
}

/// The full option set of the viewport data source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportDataSourceOptions {
    /// Following-mode options.
    pub following: FollowingFrameOptions,
    /// Overview-mode options.
    pub overview: OverviewFrameOptions,
}

impl ViewportDataSourceOptions {
    /// Validates the option set.
    ///
    /// Conflicting defaults signal API misuse rather than bad data, so they
    /// surface as an error instead of being absorbed.
    pub fn validate(&self) -> Result<()> {
        if self.following.min_zoom > self.following.max_zoom {
            return Err(NavCamError::ConflictingZoomBounds {
                min: self.following.min_zoom,
                max: self.following.max_zoom,
            });
        }
        Ok(())
    }
}
