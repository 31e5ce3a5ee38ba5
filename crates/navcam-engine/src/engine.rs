//! Renderer-facing engine traits.
//!
//! The camera core never performs service lookup on a host map view; the
//! two seams below are injected at construction time. Both are driven on
//! the single logical thread the whole camera stack runs on.

use glam::DVec2;
use navcam_core::{EdgeInsets, GeoPoint};

use crate::animation::AnimatorSet;

/// Identifier of a running animator set, issued by the animation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

/// Center and zoom proposed by the renderer for a coordinate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraEstimate {
    /// Proposed camera center.
    pub center: GeoPoint,
    /// Proposed zoom level.
    pub zoom: f64,
}

/// The camera the renderer is currently showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedCamera {
    /// Current camera center.
    pub center: GeoPoint,
    /// Current zoom level.
    pub zoom: f64,
    /// Current bearing in degrees.
    pub bearing: f64,
    /// Current pitch in degrees.
    pub pitch: f64,
    /// Current padding.
    pub padding: EdgeInsets,
}

/// Projection queries answered by the map renderer.
pub trait ProjectionEngine {
    /// Returns the camera that fits `points` within `padding` at the given
    /// bearing and pitch, or `None` if the renderer cannot resolve one
    /// (for example, for an empty point set).
    fn camera_for_coordinates(
        &self,
        points: &[GeoPoint],
        padding: EdgeInsets,
        bearing: f64,
        pitch: f64,
    ) -> Option<CameraEstimate>;

    /// Projects a geographic point to its on-screen position.
    fn pixel_for_coordinate(&self, point: GeoPoint) -> DVec2;

    /// Returns the currently rendered camera.
    fn camera_state(&self) -> RenderedCamera;
}

/// Property-animation execution provided by the map renderer.
///
/// Starting a set registers its per-property animators with the renderer;
/// `cancel` and `release` unregister them again. Natural completion is
/// reported back to the camera by the host loop, not through this trait.
pub trait AnimationEngine {
    /// Sets or clears the camera anchor point. The camera clears the anchor
    /// before every programmatic move so gesture anchors cannot leak in.
    fn set_anchor(&mut self, anchor: Option<DVec2>);

    /// Registers and starts a parallel animator set. With `instant` the set
    /// runs with zero duration, jumping straight to the targets.
    fn start(&mut self, set: AnimatorSet, instant: bool) -> AnimationId;

    /// Cancels a running set and unregisters its animators. Unknown or
    /// already-finished ids are a no-op.
    fn cancel(&mut self, id: AnimationId);

    /// Unregisters the animators of a set that ran to completion.
    fn release(&mut self, id: AnimationId);
}
