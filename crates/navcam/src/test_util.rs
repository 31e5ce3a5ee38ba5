//! Shared test doubles for the renderer seams.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::DVec2;
use navcam_core::{EdgeInsets, GeoPoint};
use navcam_engine::{
    AnimationEngine, AnimationId, AnimatorSet, CameraEstimate, ProjectionEngine, RenderedCamera,
};

/// Projection stub: answers coordinate queries with the centroid of the
/// points and a configurable zoom, and records every query.
pub struct MockProjection {
    pub camera: Cell<RenderedCamera>,
    pub response_zoom: Cell<f64>,
    pub fail_queries: Cell<bool>,
    pub queries: RefCell<Vec<Vec<GeoPoint>>>,
}

impl MockProjection {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            camera: Cell::new(RenderedCamera {
                center: GeoPoint::ORIGIN,
                zoom: 14.0,
                bearing: 0.0,
                pitch: 0.0,
                padding: EdgeInsets::ZERO,
            }),
            response_zoom: Cell::new(15.0),
            fail_queries: Cell::new(false),
            queries: RefCell::new(Vec::new()),
        })
    }
}

impl ProjectionEngine for MockProjection {
    fn camera_for_coordinates(
        &self,
        points: &[GeoPoint],
        _padding: EdgeInsets,
        _bearing: f64,
        _pitch: f64,
    ) -> Option<CameraEstimate> {
        self.queries.borrow_mut().push(points.to_vec());
        if self.fail_queries.get() || points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let center = GeoPoint::new(
            points.iter().map(|p| p.longitude).sum::<f64>() / n,
            points.iter().map(|p| p.latitude).sum::<f64>() / n,
        );
        Some(CameraEstimate {
            center,
            zoom: self.response_zoom.get(),
        })
    }

    fn pixel_for_coordinate(&self, point: GeoPoint) -> DVec2 {
        DVec2::new(point.longitude * 100.0, point.latitude * -100.0)
    }

    fn camera_state(&self) -> RenderedCamera {
        self.camera.get()
    }
}

/// One animator set handed to the recording engine.
pub struct StartedAnimation {
    pub id: AnimationId,
    pub set: AnimatorSet,
    pub instant: bool,
}

#[derive(Default)]
pub struct EngineState {
    pub next_id: u64,
    pub started: Vec<StartedAnimation>,
    pub canceled: Vec<AnimationId>,
    pub released: Vec<AnimationId>,
    pub anchor_sets: Vec<Option<DVec2>>,
}

/// Animation engine stub recording every call for later assertions.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    pub state: Rc<RefCell<EngineState>>,
}

impl AnimationEngine for RecordingEngine {
    fn set_anchor(&mut self, anchor: Option<DVec2>) {
        self.state.borrow_mut().anchor_sets.push(anchor);
    }

    fn start(&mut self, set: AnimatorSet, instant: bool) -> AnimationId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = AnimationId(state.next_id);
        state.started.push(StartedAnimation { id, set, instant });
        id
    }

    fn cancel(&mut self, id: AnimationId) {
        self.state.borrow_mut().canceled.push(id);
    }

    fn release(&mut self, id: AnimationId) {
        self.state.borrow_mut().released.push(id);
    }
}
