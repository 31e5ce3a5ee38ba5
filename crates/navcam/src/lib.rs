//! navcam: the camera-orchestration core of a turn-by-turn navigation SDK.
//!
//! navcam decides, update by update, where a map camera should point while
//! following a moving vehicle or previewing a route, and choreographs the
//! animated transitions between those framings.
//!
//! The map renderer is consumed through two narrow traits injected at
//! construction time ([`ProjectionEngine`] for coordinate queries,
//! [`AnimationEngine`] for executing animations), so the core never touches
//! a concrete rendering stack.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use navcam::{
//!     AnimationEngine, AnimationId, AnimatorSet, CameraEstimate, DVec2, EdgeInsets, GeoPoint,
//!     Location, NavigationCamera, ProjectionEngine, RenderedCamera, TransitionPlanner,
//!     ViewportDataSource,
//! };
//!
//! # struct Renderer;
//! # impl ProjectionEngine for Renderer {
//! #     fn camera_for_coordinates(
//! #         &self,
//! #         points: &[GeoPoint],
//! #         _padding: EdgeInsets,
//! #         _bearing: f64,
//! #         _pitch: f64,
//! #     ) -> Option<CameraEstimate> {
//! #         points.first().map(|p| CameraEstimate { center: *p, zoom: 15.0 })
//! #     }
//! #     fn pixel_for_coordinate(&self, _point: GeoPoint) -> DVec2 { DVec2::ZERO }
//! #     fn camera_state(&self) -> RenderedCamera {
//! #         RenderedCamera {
//! #             center: GeoPoint::ORIGIN,
//! #             zoom: 14.0,
//! #             bearing: 0.0,
//! #             pitch: 0.0,
//! #             padding: EdgeInsets::ZERO,
//! #         }
//! #     }
//! # }
//! # struct Animations;
//! # impl AnimationEngine for Animations {
//! #     fn set_anchor(&mut self, _anchor: Option<DVec2>) {}
//! #     fn start(&mut self, _set: AnimatorSet, _instant: bool) -> AnimationId { AnimationId(1) }
//! #     fn cancel(&mut self, _id: AnimationId) {}
//! #     fn release(&mut self, _id: AnimationId) {}
//! # }
//! let projection = Rc::new(Renderer);
//! let data_source = Rc::new(RefCell::new(ViewportDataSource::new(projection.clone())));
//! let planner = TransitionPlanner::new(projection);
//! let camera = NavigationCamera::new(data_source.clone(), planner, Box::new(Animations));
//!
//! // Feed inputs, evaluate, and request a state.
//! data_source
//!     .borrow_mut()
//!     .on_location_changed(Location::new(GeoPoint::new(13.4, 52.5), 90.0));
//! data_source.borrow_mut().evaluate();
//! camera.borrow_mut().request_to_following(None, None, None);
//! ```
//!
//! # Architecture
//!
//! - [`ViewportDataSource`] converts `{location, route, progress,
//!   overrides, padding}` into the two target framings per cycle.
//! - [`TransitionPlanner`] builds per-property animation timing for state
//!   transitions and continuous frame updates.
//! - [`NavigationCamera`] owns the state machine, arbitrates concurrent
//!   requests, and forwards animations to the renderer.

pub mod camera;
pub mod data_source;
pub mod lifecycle;
pub mod observer;

#[cfg(test)]
mod test_util;

// Re-export core types
pub use navcam_core::{
    geometry, CameraFraming, CameraState, EdgeInsets, FollowingFrameOptions, GeoPoint,
    GeometrySimplification, Location, NavCamError, OverviewFrameOptions, OverviewMode, Result,
    Route, RouteLeg, RouteProgress, RouteStep, ScreenCoordinate, ViewportData,
    ViewportDataSourceOptions, DEFAULT_ZOOM,
};

// Re-export the renderer seam and transition planning
pub use navcam_engine::{
    AnimationEngine, AnimationId, AnimationOutcome, AnimatorSet, CameraEstimate, Easing,
    ProjectionEngine, PropertyAnimation, PropertyTarget, RenderedCamera, TransitionOptions,
    TransitionPlanner, DEFAULT_FRAME_TRANSITION_MAX_DURATION,
    DEFAULT_STATE_TRANSITION_MAX_DURATION, NAVIGATION_CAMERA_OWNER,
};

pub use camera::{CameraStateObserver, NavigationCamera, TransitionEndListener};
pub use data_source::{ViewportDataObserver, ViewportDataSource};
pub use lifecycle::BasicGesturesHandler;
pub use observer::ObserverHandle;

// Re-export glam types for convenience
pub use glam::DVec2;
