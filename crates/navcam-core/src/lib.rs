//! Core abstractions for navcam.
//!
//! This crate provides the fundamental types used throughout navcam:
//! - Geographic and screen-space primitives ([`GeoPoint`], [`EdgeInsets`])
//! - The camera framing data model ([`CameraFraming`], [`ViewportData`])
//! - The camera lifecycle state ([`CameraState`])
//! - Route and trip-progress inputs ([`Route`], [`RouteProgress`])
//! - Pure geodesic helpers and the lookahead geometry slicer

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]

pub mod error;
pub mod framing;
pub mod geo;
pub mod geometry;
pub mod options;
pub mod route;
pub mod state;

pub use error::{NavCamError, Result};
pub use framing::{CameraFraming, ViewportData, DEFAULT_ZOOM};
pub use geo::{EdgeInsets, GeoPoint, ScreenCoordinate};
pub use options::{
    FollowingFrameOptions, GeometrySimplification, OverviewFrameOptions, OverviewMode,
    ViewportDataSourceOptions,
};
pub use route::{Location, Route, RouteLeg, RouteProgress, RouteStep};
pub use state::CameraState;

// Re-export glam types for convenience
pub use glam::DVec2;
