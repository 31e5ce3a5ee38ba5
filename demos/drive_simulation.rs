//! Simulates a short drive and logs what the navigation camera does.
//!
//! Stub engines stand in for a real map renderer: the projection answers
//! framing queries from bounding boxes and the animation engine jumps
//! straight to every target, reporting completions back to the camera.
//!
//! Run with `RUST_LOG=info cargo run --example drive_simulation`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navcam::{
    AnimationEngine, AnimationId, AnimationOutcome, AnimatorSet, CameraEstimate, DVec2,
    EdgeInsets, GeoPoint, Location, NavigationCamera, ProjectionEngine, PropertyTarget,
    RenderedCamera, Route, RouteLeg, RouteProgress, RouteStep, TransitionPlanner,
    ViewportDataSource,
};

/// Map projection stub answering framing queries from bounding boxes.
struct ConsoleProjection {
    camera: Cell<RenderedCamera>,
}

impl ConsoleProjection {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            camera: Cell::new(RenderedCamera {
                center: GeoPoint::ORIGIN,
                zoom: 14.0,
                bearing: 0.0,
                pitch: 0.0,
                padding: EdgeInsets::ZERO,
            }),
        })
    }
}

impl ProjectionEngine for ConsoleProjection {
    fn camera_for_coordinates(
        &self,
        points: &[GeoPoint],
        _padding: EdgeInsets,
        _bearing: f64,
        _pitch: f64,
    ) -> Option<CameraEstimate> {
        let first = points.first()?;
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        for p in points {
            min_lon = min_lon.min(p.longitude);
            max_lon = max_lon.max(p.longitude);
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
        }
        let span = (max_lon - min_lon).max(max_lat - min_lat).max(1e-4);
        Some(CameraEstimate {
            center: GeoPoint::new((min_lon + max_lon) / 2.0, (min_lat + max_lat) / 2.0),
            zoom: (360.0 / span).log2().clamp(0.0, 20.0),
        })
    }

    fn pixel_for_coordinate(&self, point: GeoPoint) -> DVec2 {
        DVec2::new(point.longitude * 1000.0, point.latitude * -1000.0)
    }

    fn camera_state(&self) -> RenderedCamera {
        self.camera.get()
    }
}

/// Animation engine stub that jumps to every target immediately and queues
/// the completion for the main loop to report.
struct ConsoleAnimations {
    projection: Rc<ConsoleProjection>,
    pending: Rc<RefCell<Vec<AnimationId>>>,
    next_id: u64,
}

impl AnimationEngine for ConsoleAnimations {
    fn set_anchor(&mut self, _anchor: Option<DVec2>) {}

    fn start(&mut self, set: AnimatorSet, instant: bool) -> AnimationId {
        let mut camera = self.projection.camera.get();
        for animation in &set.animations {
            match animation.target {
                PropertyTarget::Center(center) => camera.center = center,
                PropertyTarget::Zoom(zoom) => camera.zoom = zoom,
                PropertyTarget::Bearing(bearing) => camera.bearing = bearing.rem_euclid(360.0),
                PropertyTarget::Pitch(pitch) => camera.pitch = pitch,
                PropertyTarget::Padding(padding) => camera.padding = padding,
            }
        }
        self.projection.camera.set(camera);

        self.next_id += 1;
        let id = AnimationId(self.next_id);
        log::info!(
            "animation {:?}: {} properties over {:?}{}",
            id,
            set.animations.len(),
            set.total_duration(),
            if instant { " (instant)" } else { "" }
        );
        self.pending.borrow_mut().push(id);
        id
    }

    fn cancel(&mut self, id: AnimationId) {
        self.pending.borrow_mut().retain(|pending| *pending != id);
        log::debug!("animation {id:?} canceled");
    }

    fn release(&mut self, id: AnimationId) {
        log::debug!("animation {id:?} released");
    }
}

fn demo_route() -> Route {
    let step = |points: &[(f64, f64)]| {
        RouteStep::new(points.iter().map(|(lon, lat)| GeoPoint::new(*lon, *lat)).collect())
    };
    Route::new(vec![RouteLeg::new(vec![
        step(&[(13.400, 52.500), (13.400, 52.510), (13.401, 52.520)]),
        step(&[(13.401, 52.520), (13.410, 52.521), (13.420, 52.522)]),
        step(&[(13.420, 52.522), (13.421, 52.530)]),
    ])])
}

fn main() {
    env_logger::init();

    let projection = ConsoleProjection::new();
    let pending = Rc::new(RefCell::new(Vec::new()));
    let animations = ConsoleAnimations {
        projection: projection.clone(),
        pending: pending.clone(),
        next_id: 0,
    };

    let data_source = Rc::new(RefCell::new(ViewportDataSource::new(projection.clone())));
    let planner = TransitionPlanner::new(projection.clone());
    let camera = NavigationCamera::new(data_source.clone(), planner, Box::new(animations));

    let _observer = camera
        .borrow_mut()
        .register_state_observer(Box::new(|state| log::info!("camera state: {state:?}")));

    let complete_pending = |camera: &Rc<RefCell<NavigationCamera>>| {
        let ids: Vec<AnimationId> = pending.borrow_mut().drain(..).collect();
        for id in ids {
            camera
                .borrow_mut()
                .on_animation_outcome(id, AnimationOutcome::Completed);
        }
    };

    // Preview the route from above.
    let route = demo_route();
    data_source.borrow_mut().on_route_changed(route.clone());
    data_source
        .borrow_mut()
        .on_location_changed(Location::new(GeoPoint::new(13.400, 52.500), 0.0));
    data_source.borrow_mut().evaluate();
    camera.borrow_mut().request_to_overview(None, None, None);
    complete_pending(&camera);

    // Start driving: follow the vehicle along the first step.
    camera.borrow_mut().request_to_following(None, None, None);
    complete_pending(&camera);

    let step_distance = route.step(0, 0).map_or(0.0, RouteStep::distance);
    for tick in 0..5 {
        let fraction = f64::from(tick) / 4.0;
        let traveled = step_distance * fraction;
        data_source.borrow_mut().on_location_changed(Location::new(
            GeoPoint::new(13.400, 52.500 + 0.02 * fraction),
            5.0,
        ));
        data_source
            .borrow_mut()
            .on_route_progress_changed(RouteProgress::new(
                0,
                0,
                traveled,
                step_distance - traveled,
            ));
        data_source.borrow_mut().evaluate();
        complete_pending(&camera);

        let rendered = projection.camera_state();
        log::info!(
            "tick {tick}: camera at ({:.4}, {:.4}) zoom {:.2} pitch {:.0}",
            rendered.center.longitude,
            rendered.center.latitude,
            rendered.zoom,
            rendered.pitch
        );
    }

    camera.borrow_mut().request_to_idle();
}
