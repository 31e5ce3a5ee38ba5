//! Route and trip-progress data consumed by the viewport data source.

use crate::geo::GeoPoint;
use crate::geometry;

/// A located vehicle sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Geographic position.
    pub point: GeoPoint,
    /// Travel bearing in degrees.
    pub bearing: f64,
}

impl Location {
    /// Creates a new location sample.
    #[must_use]
    pub fn new(point: GeoPoint, bearing: f64) -> Self {
        Self { point, bearing }
    }
}

/// One maneuver-to-maneuver segment of a route leg.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    points: Vec<GeoPoint>,
    distance: f64,
}

impl RouteStep {
    /// Creates a step from its geometry; the step distance is derived from
    /// the point sequence.
    #[must_use]
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let distance = geometry::line_distance(&points);
        Self { points, distance }
    }

    /// Returns the step geometry.
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Returns the step length in meters.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// A route leg: the steps between two waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Steps making up the leg.
    pub steps: Vec<RouteStep>,
}

impl RouteLeg {
    /// Creates a leg from its steps.
    #[must_use]
    pub fn new(steps: Vec<RouteStep>) -> Self {
        Self { steps }
    }
}

/// A navigable route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Legs making up the route.
    pub legs: Vec<RouteLeg>,
}

impl Route {
    /// Creates a route from its legs.
    #[must_use]
    pub fn new(legs: Vec<RouteLeg>) -> Self {
        Self { legs }
    }

    /// Returns the step at the given leg/step indices, if present.
    #[must_use]
    pub fn step(&self, leg_index: usize, step_index: usize) -> Option<&RouteStep> {
        self.legs.get(leg_index)?.steps.get(step_index)
    }

    /// Returns the complete route geometry as `[leg][step][point]`.
    #[must_use]
    pub fn points_by_leg_and_step(&self) -> Vec<Vec<Vec<GeoPoint>>> {
        self.legs
            .iter()
            .map(|leg| leg.steps.iter().map(|step| step.points.clone()).collect())
            .collect()
    }
}

/// Progress of the trip along the current route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProgress {
    /// Index of the active leg.
    pub leg_index: usize,
    /// Index of the active step within the leg.
    pub step_index: usize,
    /// Meters traveled on the active step.
    pub step_distance_traveled: f64,
    /// Meters remaining on the active step.
    pub step_distance_remaining: f64,
}

impl RouteProgress {
    /// Creates a progress sample.
    #[must_use]
    pub fn new(
        leg_index: usize,
        step_index: usize,
        step_distance_traveled: f64,
        step_distance_remaining: f64,
    ) -> Self {
        Self {
            leg_index,
            step_index,
            step_distance_traveled,
            step_distance_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_north(from_lat: f64, to_lat: f64) -> RouteStep {
        RouteStep::new(vec![
            GeoPoint::new(0.0, from_lat),
            GeoPoint::new(0.0, to_lat),
        ])
    }

    #[test]
    fn test_step_distance_derived_from_geometry() {
        let step = step_north(0.0, 1.0);
        let one_degree = geometry::EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((step.distance() - one_degree).abs() < 1.0);
    }

    #[test]
    fn test_route_step_lookup() {
        let route = Route::new(vec![
            RouteLeg::new(vec![step_north(0.0, 1.0), step_north(1.0, 2.0)]),
            RouteLeg::new(vec![step_north(2.0, 3.0)]),
        ]);
        assert!(route.step(0, 1).is_some());
        assert!(route.step(1, 0).is_some());
        assert!(route.step(1, 1).is_none());
        assert!(route.step(2, 0).is_none());
    }

    #[test]
    fn test_points_by_leg_and_step_shape() {
        let route = Route::new(vec![RouteLeg::new(vec![
            step_north(0.0, 1.0),
            step_north(1.0, 2.0),
        ])]);
        let nested = route.points_by_leg_and_step();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].len(), 2);
        assert_eq!(nested[0][0].len(), 2);
    }
}
