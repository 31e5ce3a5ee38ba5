//! Viewport data evaluation: inputs in, target framings out.

use std::rc::Rc;

use navcam_core::geometry;
use navcam_core::{
    CameraFraming, EdgeInsets, GeoPoint, GeometrySimplification, Location, OverviewMode, Result,
    Route, RouteProgress, ViewportData, ViewportDataSourceOptions,
};
use navcam_engine::ProjectionEngine;

use crate::observer::{ObserverHandle, Observers};

/// Callback receiving every new [`ViewportData`].
pub type ViewportDataObserver = Box<dyn FnMut(&ViewportData)>;

/// A camera property with an optional override pinning it.
///
/// The source keeps producing the computed fallback, but as long as the
/// override is present it wins.
struct ViewportProperty<T> {
    override_value: Option<T>,
    fallback: T,
}

impl<T: Copy> ViewportProperty<T> {
    fn new(fallback: T) -> Self {
        Self {
            override_value: None,
            fallback,
        }
    }

    fn get(&self) -> T {
        self.override_value.unwrap_or(self.fallback)
    }
}

/// The overridable property set of one framing intent.
struct FramingProperties {
    center: ViewportProperty<GeoPoint>,
    zoom: ViewportProperty<f64>,
    bearing: ViewportProperty<f64>,
    pitch: ViewportProperty<f64>,
}

impl FramingProperties {
    fn new() -> Self {
        let fallback = CameraFraming::fallback();
        Self {
            center: ViewportProperty::new(fallback.center),
            zoom: ViewportProperty::new(fallback.zoom),
            bearing: ViewportProperty::new(fallback.bearing),
            pitch: ViewportProperty::new(fallback.pitch),
        }
    }

    fn framing(&self, padding: EdgeInsets) -> CameraFraming {
        CameraFraming {
            center: self.center.get(),
            zoom: self.zoom.get(),
            bearing: self.bearing.get(),
            pitch: self.pitch.get(),
            padding,
        }
    }

    fn clear_overrides(&mut self) {
        self.center.override_value = None;
        self.zoom.override_value = None;
        self.bearing.override_value = None;
        self.pitch.override_value = None;
    }
}

/// Converts location, route, and progress inputs into the pair of target
/// framings the navigation camera animates toward.
///
/// Input setters only stage data; call [`ViewportDataSource::evaluate`] to
/// recompute the [`ViewportData`] and notify update observers. Any number
/// of setter calls between evaluations batch into a single update.
pub struct ViewportDataSource {
    projection: Rc<dyn ProjectionEngine>,
    options: ViewportDataSourceOptions,
    active: bool,

    location: Option<Location>,
    route: Option<Route>,
    progress: Option<RouteProgress>,

    complete_route_points: Vec<Vec<Vec<GeoPoint>>>,
    simplified_route_points: Vec<Vec<Vec<GeoPoint>>>,
    remaining_points_on_step: Vec<GeoPoint>,
    remaining_points_on_route: Vec<GeoPoint>,
    distance_remaining_on_step: Option<f64>,

    following: FramingProperties,
    overview: FramingProperties,
    following_padding: EdgeInsets,
    overview_padding: EdgeInsets,
    additional_following_points: Vec<GeoPoint>,
    additional_overview_points: Vec<GeoPoint>,

    viewport_data: ViewportData,
    observers: Observers<ViewportDataObserver>,
}

impl ViewportDataSource {
    /// Creates a data source with default options.
    #[must_use]
    pub fn new(projection: Rc<dyn ProjectionEngine>) -> Self {
        Self::with_options(projection, ViewportDataSourceOptions::default())
            .unwrap_or_else(|_| unreachable!("default options are valid"))
    }

    /// Creates a data source with the given options.
    pub fn with_options(
        projection: Rc<dyn ProjectionEngine>,
        options: ViewportDataSourceOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            projection,
            options,
            active: true,
            location: None,
            route: None,
            progress: None,
            complete_route_points: Vec::new(),
            simplified_route_points: Vec::new(),
            remaining_points_on_step: Vec::new(),
            remaining_points_on_route: Vec::new(),
            distance_remaining_on_step: None,
            following: FramingProperties::new(),
            overview: FramingProperties::new(),
            following_padding: EdgeInsets::ZERO,
            overview_padding: EdgeInsets::ZERO,
            additional_following_points: Vec::new(),
            additional_overview_points: Vec::new(),
            viewport_data: ViewportData::default(),
            observers: Observers::new(),
        })
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> &ViewportDataSourceOptions {
        &self.options
    }

    /// Replaces the options and re-derives the staged point sets that
    /// depend on them. Call [`ViewportDataSource::evaluate`] afterwards.
    pub fn set_options(&mut self, options: ViewportDataSourceOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        self.restage_route_points();
        Ok(())
    }

    /// Switches the part of the route the overview frames. An actual change
    /// triggers exactly one recomputation; setting the current mode again
    /// does nothing.
    pub fn set_overview_mode(&mut self, mode: OverviewMode) {
        if self.options.overview.mode != mode {
            self.options.overview.mode = mode;
            self.restage_remaining_route_points();
            self.evaluate();
        }
    }

    /// Suspends or resumes evaluation. While suspended, inputs still
    /// accumulate and [`ViewportDataSource::evaluate`] is a no-op; resuming
    /// triggers one immediate recomputation with the accumulated inputs.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.evaluate();
        }
    }

    /// Returns whether evaluation is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the last computed viewport data.
    #[must_use]
    pub fn viewport_data(&self) -> &ViewportData {
        &self.viewport_data
    }

    /// Registers an update observer. The observer immediately receives the
    /// current viewport data, then every subsequent change.
    pub fn register_update_observer(&mut self, mut observer: ViewportDataObserver) -> ObserverHandle {
        observer(&self.viewport_data);
        self.observers.register(observer)
    }

    /// Stages a new location sample. The location becomes the anchor of the
    /// following framing and its bearing source.
    pub fn on_location_changed(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Stages a new primary route, replacing any previous route and
    /// progress data.
    pub fn on_route_changed(&mut self, route: Route) {
        self.route = Some(route);
        self.progress = None;
        self.remaining_points_on_step.clear();
        self.distance_remaining_on_step = None;
        self.restage_route_points();
    }

    /// Stages a trip-progress sample. Requires a route staged via
    /// [`ViewportDataSource::on_route_changed`]; progress against a missing
    /// route is dropped.
    pub fn on_route_progress_changed(&mut self, progress: RouteProgress) {
        if self.route.is_none() {
            log::warn!("route progress without a staged route; ignoring");
            return;
        }
        self.progress = Some(progress);
        self.restage_progress_points();
    }

    /// Clears all route and progress data.
    pub fn clear_route_data(&mut self) {
        self.route = None;
        self.progress = None;
        self.complete_route_points.clear();
        self.simplified_route_points.clear();
        self.remaining_points_on_step.clear();
        self.remaining_points_on_route.clear();
        self.distance_remaining_on_step = None;
    }

    /// Clears progress data only; the overview falls back to framing the
    /// whole route.
    pub fn clear_progress_data(&mut self) {
        self.progress = None;
        self.remaining_points_on_step.clear();
        self.distance_remaining_on_step = None;
        self.restage_remaining_route_points();
    }

    /// Sets the padding for following framings.
    pub fn set_following_padding(&mut self, padding: EdgeInsets) {
        self.following_padding = padding;
    }

    /// Sets the padding for overview framings.
    pub fn set_overview_padding(&mut self, padding: EdgeInsets) {
        self.overview_padding = padding;
    }

    /// Replaces the extra points fitted into following framings.
    pub fn additional_points_to_frame_for_following(&mut self, points: Vec<GeoPoint>) {
        self.additional_following_points = points;
    }

    /// Replaces the extra points fitted into overview framings.
    pub fn additional_points_to_frame_for_overview(&mut self, points: Vec<GeoPoint>) {
        self.additional_overview_points = points;
    }

    /// Pins the following center; `None` restores the computed value.
    pub fn set_following_center_override(&mut self, value: Option<GeoPoint>) {
        self.following.center.override_value = value;
    }

    /// Pins the following zoom; `None` restores the computed value.
    pub fn set_following_zoom_override(&mut self, value: Option<f64>) {
        self.following.zoom.override_value = value;
    }

    /// Pins the following bearing; `None` restores the computed value.
    pub fn set_following_bearing_override(&mut self, value: Option<f64>) {
        self.following.bearing.override_value = value;
    }

    /// Pins the following pitch; `None` restores the computed value.
    pub fn set_following_pitch_override(&mut self, value: Option<f64>) {
        self.following.pitch.override_value = value;
    }

    /// Pins the overview center; `None` restores the computed value.
    pub fn set_overview_center_override(&mut self, value: Option<GeoPoint>) {
        self.overview.center.override_value = value;
    }

    /// Pins the overview zoom; `None` restores the computed value.
    pub fn set_overview_zoom_override(&mut self, value: Option<f64>) {
        self.overview.zoom.override_value = value;
    }

    /// Pins the overview bearing; `None` restores the computed value.
    pub fn set_overview_bearing_override(&mut self, value: Option<f64>) {
        self.overview.bearing.override_value = value;
    }

    /// Pins the overview pitch; `None` restores the computed value.
    pub fn set_overview_pitch_override(&mut self, value: Option<f64>) {
        self.overview.pitch.override_value = value;
    }

    /// Clears all following overrides.
    pub fn clear_following_overrides(&mut self) {
        self.following.clear_overrides();
    }

    /// Clears all overview overrides.
    pub fn clear_overview_overrides(&mut self) {
        self.overview.clear_overrides();
    }

    /// Recomputes the viewport data from the staged inputs and notifies
    /// observers when it changed.
    ///
    /// Setters never evaluate on their own, so any number of staged changes
    /// coalesce into a single recomputation and at most one notification.
    pub fn evaluate(&mut self) {
        if !self.active {
            return;
        }
        self.update_following_frame();
        self.update_overview_frame();

        let data = ViewportData {
            camera_for_following: self.following.framing(self.following_padding),
            camera_for_overview: self.overview.framing(self.overview_padding),
        };
        if data != self.viewport_data {
            self.viewport_data = data.clone();
            self.observers.notify(|observer| observer(&data));
        }
    }

    fn update_following_frame(&mut self) {
        let Some(location) = self.location else {
            // No location yet: the deterministic fallback framing stands.
            return;
        };

        let mut points = Vec::with_capacity(1 + self.remaining_points_on_step.len());
        points.push(location.point);
        points.extend_from_slice(&self.remaining_points_on_step);
        points.extend_from_slice(&self.additional_following_points);

        let opts = &self.options.following;

        let smoothed = if opts.bearing_smoothing {
            smooth_bearing(opts.max_bearing_angle_diff, location.bearing, &points)
        } else {
            location.bearing
        };
        let rendered = self.projection.camera_state();
        self.following.bearing.fallback = geometry::normalize_bearing(
            rendered.bearing + geometry::shortest_rotation_diff(smoothed, rendered.bearing),
        );

        self.following.pitch.fallback = match self.distance_remaining_on_step {
            Some(remaining)
                if opts.pitch_zero_near_maneuver
                    && remaining <= opts.pitch_zero_trigger_distance =>
            {
                0.0
            }
            _ => opts.default_pitch,
        };

        if points.len() > 1 {
            match self.projection.camera_for_coordinates(
                &points,
                self.following_padding,
                self.following.bearing.get(),
                self.following.pitch.get(),
            ) {
                Some(estimate) => {
                    self.following.center.fallback = estimate.center;
                    self.following.zoom.fallback = (estimate.zoom - opts.zoom_safety_margin)
                        .clamp(opts.min_zoom, opts.max_zoom);
                }
                None => {
                    log::debug!("following projection query unresolved; keeping previous framing");
                }
            }
        } else {
            self.following.center.fallback = location.point;
            self.following.zoom.fallback = rendered.zoom.clamp(opts.min_zoom, opts.max_zoom);
        }
    }

    fn update_overview_frame(&mut self) {
        let mut points = Vec::with_capacity(1 + self.remaining_points_on_route.len());
        if let Some(location) = self.location {
            points.push(location.point);
        }
        points.extend_from_slice(&self.remaining_points_on_route);
        points.extend_from_slice(&self.additional_overview_points);

        self.overview.bearing.fallback = 0.0;
        self.overview.pitch.fallback = 0.0;

        if points.is_empty() {
            return;
        }
        match self.projection.camera_for_coordinates(
            &points,
            self.overview_padding,
            self.overview.bearing.get(),
            self.overview.pitch.get(),
        ) {
            Some(estimate) => {
                self.overview.center.fallback = estimate.center;
                self.overview.zoom.fallback = estimate.zoom.min(self.options.overview.max_zoom);
            }
            None => {
                log::debug!("overview projection query unresolved; keeping previous framing");
            }
        }
    }

    fn restage_route_points(&mut self) {
        match &self.route {
            Some(route) => {
                self.complete_route_points = route.points_by_leg_and_step();
                self.simplified_route_points = simplify_route_points(
                    &self.complete_route_points,
                    self.options.overview.simplification,
                );
            }
            None => {
                self.complete_route_points.clear();
                self.simplified_route_points.clear();
            }
        }
        self.restage_progress_points();
    }

    fn restage_progress_points(&mut self) {
        if let (Some(route), Some(progress)) = (&self.route, self.progress) {
            let Some(step) = route.step(progress.leg_index, progress.step_index) else {
                log::warn!(
                    "stale progress indices ({}, {}); dropping progress data",
                    progress.leg_index,
                    progress.step_index
                );
                self.progress = None;
                self.remaining_points_on_step.clear();
                self.distance_remaining_on_step = None;
                self.restage_remaining_route_points();
                return;
            };

            let remaining = progress.step_distance_remaining.max(0.0);
            let lookahead = self
                .options
                .following
                .lookahead_distance
                .unwrap_or(remaining);
            self.remaining_points_on_step = geometry::slice_for_lookahead(
                step.points(),
                progress.step_distance_traveled,
                lookahead,
                self.options.following.max_angle_delta_for_slicing,
            );
            self.distance_remaining_on_step = Some(remaining);
        }
        self.restage_remaining_route_points();
    }

    fn restage_remaining_route_points(&mut self) {
        let Some(progress) = self.progress else {
            self.remaining_points_on_route = flatten_all(&self.simplified_route_points);
            return;
        };

        let mut points = self.remaining_points_on_step.clone();
        if let Some(leg) = self.simplified_route_points.get(progress.leg_index) {
            for step_points in leg.iter().skip(progress.step_index + 1) {
                points.extend_from_slice(step_points);
            }
        }
        if self.options.overview.mode == OverviewMode::EntireRoute {
            for leg in self.simplified_route_points.iter().skip(progress.leg_index + 1) {
                for step_points in leg {
                    points.extend_from_slice(step_points);
                }
            }
        }
        self.remaining_points_on_route = points;
    }
}

/// Deviates the frame bearing from the raw vehicle bearing toward the
/// direction of the upcoming framed geometry, bounded by `max_diff`.
fn smooth_bearing(max_diff: f64, vehicle_bearing: f64, points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return vehicle_bearing;
    }
    let geometry_bearing = geometry::bearing(points[0], points[points.len() - 1]);
    let diff = geometry::shortest_rotation_diff(geometry_bearing, vehicle_bearing);
    if diff.abs() > max_diff {
        vehicle_bearing + max_diff * diff.signum()
    } else {
        geometry_bearing
    }
}

fn simplify_route_points(
    complete: &[Vec<Vec<GeoPoint>>],
    simplification: GeometrySimplification,
) -> Vec<Vec<Vec<GeoPoint>>> {
    if !simplification.enabled {
        return complete.to_vec();
    }
    if simplification.factor == 0 {
        log::warn!("geometry simplification factor must be positive; skipping");
        return complete.to_vec();
    }
    complete
        .iter()
        .map(|leg| {
            leg.iter()
                .map(|step_points| {
                    step_points
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| {
                            i % simplification.factor == 0 || *i == step_points.len() - 1
                        })
                        .map(|(_, p)| *p)
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn flatten_all(nested: &[Vec<Vec<GeoPoint>>]) -> Vec<GeoPoint> {
    nested
        .iter()
        .flat_map(|leg| leg.iter().flat_map(|step| step.iter().copied()))
        .collect()
}
