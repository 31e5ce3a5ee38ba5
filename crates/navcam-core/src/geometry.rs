//! Pure geodesic helpers and route-geometry slicing.
//!
//! Distances are in meters, angles in degrees. Bearings follow the
//! compass convention: 0° is north, positive clockwise.

use crate::error::{NavCamError, Result};
use crate::geo::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Returns the haversine distance between two points, in meters.
#[must_use]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Returns the initial great-circle bearing from `a` to `b`, in degrees
/// within [-180, 180).
#[must_use]
pub fn bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();
    y.atan2(x).to_degrees()
}

/// Returns the point reached by traveling `meters` from `origin` along the
/// given bearing.
#[must_use]
pub fn destination(origin: GeoPoint, meters: f64, bearing_degrees: f64) -> GeoPoint {
    let lat = origin.latitude.to_radians();
    let lon = origin.longitude.to_radians();
    let theta = bearing_degrees.to_radians();
    let delta = meters / EARTH_RADIUS_METERS;

    let lat_out = (lat.sin() * delta.cos() + lat.cos() * delta.sin() * theta.cos()).asin();
    let lon_out = lon
        + (theta.sin() * delta.sin() * lat.cos()).atan2(delta.cos() - lat.sin() * lat_out.sin());

    GeoPoint::new(lon_out.to_degrees(), lat_out.to_degrees())
}

/// Returns the total length of a polyline, in meters.
#[must_use]
pub fn line_distance(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Wraps `angle` into the half-open interval `[min, max)`.
#[must_use]
pub fn wrap(angle: f64, min: f64, max: f64) -> f64 {
    let d = max - min;
    (((angle - min) % d + d) % d) + min
}

/// Returns the signed shortest rotation from `anchor` to `angle`, in
/// degrees within [-180, 180). NaN inputs yield a zero difference.
#[must_use]
pub fn shortest_rotation_diff(angle: f64, anchor: f64) -> f64 {
    if angle.is_nan() || anchor.is_nan() {
        return 0.0;
    }
    wrap(angle - anchor, -180.0, 180.0)
}

/// Normalizes a bearing into [0, 360).
#[must_use]
pub fn normalize_bearing(bearing: f64) -> f64 {
    wrap(bearing, 0.0, 360.0)
}

/// Extracts the sub-polyline between the `start` and `stop` distances along
/// the line, interpolating both endpoints.
///
/// A `stop` beyond the line's end slices to the end. Fewer than two points,
/// non-finite coordinates, an inverted range, or a `start` beyond the line's
/// end are malformed-polyline errors; callers at the framing boundary absorb
/// those by using the unsliced set.
pub fn line_slice_along(points: &[GeoPoint], start: f64, stop: f64) -> Result<Vec<GeoPoint>> {
    if points.len() < 2 {
        return Err(NavCamError::MalformedPolyline(
            "fewer than two points".to_string(),
        ));
    }
    if points
        .iter()
        .any(|p| !p.longitude.is_finite() || !p.latitude.is_finite())
    {
        return Err(NavCamError::MalformedPolyline(
            "non-finite coordinate".to_string(),
        ));
    }
    if !start.is_finite() || !stop.is_finite() || start < 0.0 || stop < start {
        return Err(NavCamError::MalformedPolyline(format!(
            "invalid slice range [{start}, {stop}]"
        )));
    }

    let mut slice: Vec<GeoPoint> = Vec::new();
    let mut travelled = 0.0;
    for i in 0..points.len() - 1 {
        let a = points[i];
        let b = points[i + 1];
        let edge_end = travelled + distance(a, b);

        if slice.is_empty() {
            if start <= travelled {
                slice.push(a);
            } else if start < edge_end {
                slice.push(point_along(a, b, start - travelled));
            } else {
                travelled = edge_end;
                continue;
            }
        }

        if stop <= edge_end {
            if stop > travelled {
                push_distinct(&mut slice, point_along(a, b, stop - travelled));
            }
            return Ok(slice);
        }
        push_distinct(&mut slice, b);
        travelled = edge_end;
    }

    if slice.is_empty() {
        return Err(NavCamError::MalformedPolyline(
            "slice start beyond polyline end".to_string(),
        ));
    }
    Ok(slice)
}

/// Truncates a polyline at the point where the edge bearing deviates from
/// the first edge's bearing by `max_angle_diff` degrees or more.
///
/// Keeps a sharply bending lookahead out of the frame. Degenerate inputs
/// (fewer than two points, NaN bearings) pass through unchanged.
#[must_use]
pub fn slice_at_angle(points: &[GeoPoint], max_angle_diff: f64) -> Vec<GeoPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let first_edge_bearing = bearing(points[0], points[1]);
    let mut out = vec![points[0]];
    for i in 1..points.len() {
        let edge_bearing = bearing(points[i - 1], points[i]);
        let rotation = shortest_rotation_diff(edge_bearing, first_edge_bearing);
        if rotation.abs() < max_angle_diff {
            out.push(points[i]);
        } else {
            break;
        }
    }
    out
}

/// Returns the route-point subset relevant to a following framing decision:
/// the polyline truncated to `[traveled, traveled + lookahead]` meters and
/// then cut before the first sharp bend.
///
/// A negative traveled distance is clamped to zero; a traveled distance
/// beyond the line's length (stale progress after a route refresh) resets
/// to zero. Slicing faults degrade to the unsliced set.
#[must_use]
pub fn slice_for_lookahead(
    points: &[GeoPoint],
    traveled: f64,
    lookahead: f64,
    max_angle_delta_degrees: f64,
) -> Vec<GeoPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut traveled = traveled;
    if !traveled.is_finite() || traveled < 0.0 {
        log::warn!("stale traveled distance {traveled}; clamping to 0");
        traveled = 0.0;
    }
    if traveled > line_distance(points) {
        traveled = 0.0;
    }
    let lookahead = if lookahead.is_finite() { lookahead.max(0.0) } else { 0.0 };

    match line_slice_along(points, traveled, traveled + lookahead) {
        Ok(sliced) => slice_at_angle(&sliced, max_angle_delta_degrees),
        Err(e) => {
            log::debug!("lookahead slice failed ({e}); framing the unsliced geometry");
            points.to_vec()
        }
    }
}

fn point_along(a: GeoPoint, b: GeoPoint, meters: f64) -> GeoPoint {
    destination(a, meters, bearing(a, b))
}

fn push_distinct(slice: &mut Vec<GeoPoint>, point: GeoPoint) {
    if slice.last() != Some(&point) {
        slice.push(point);
    }
}
