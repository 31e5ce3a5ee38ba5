//! Geographic and screen-space primitives.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A position on screen, in pixels.
pub type ScreenCoordinate = DVec2;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a new point from longitude and latitude in degrees.
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The origin coordinate (0, 0), used as the deterministic fallback
    /// center before any location is known.
    pub const ORIGIN: GeoPoint = GeoPoint {
        longitude: 0.0,
        latitude: 0.0,
    };
}

/// A four-sided inset, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the left edge.
    pub left: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the right edge.
    pub right: f64,
}

impl EdgeInsets {
    /// Creates a new inset from the four edge values.
    #[must_use]
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// An inset of zero on all sides.
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_origin() {
        assert_eq!(GeoPoint::ORIGIN.longitude, 0.0);
        assert_eq!(GeoPoint::ORIGIN.latitude, 0.0);
    }

    #[test]
    fn test_edge_insets_zero_is_default() {
        assert_eq!(EdgeInsets::ZERO, EdgeInsets::default());
    }

    #[test]
    fn test_geo_point_serde_round_trip() {
        let point = GeoPoint::new(13.4, 52.5);
        let json = serde_json::to_string(&point).unwrap();
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(point, back);
    }
}
