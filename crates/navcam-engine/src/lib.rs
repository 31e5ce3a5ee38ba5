//! Renderer-facing seam and animation planning for navcam.
//!
//! The map renderer is consumed through two narrow traits injected at
//! construction time: [`ProjectionEngine`] for coordinate/camera queries
//! and [`AnimationEngine`] for executing parallel per-property animations.
//! [`TransitionPlanner`] turns a pair of camera framings into a timed
//! [`AnimatorSet`] for the engine to run.

pub mod animation;
pub mod engine;
pub mod transition;

pub use animation::{
    AnimationOutcome, AnimatorSet, Easing, PropertyAnimation, PropertyTarget,
    NAVIGATION_CAMERA_OWNER,
};
pub use engine::{AnimationEngine, AnimationId, CameraEstimate, ProjectionEngine, RenderedCamera};
pub use transition::{
    TransitionOptions, TransitionPlanner, DEFAULT_FRAME_TRANSITION_MAX_DURATION,
    DEFAULT_STATE_TRANSITION_MAX_DURATION,
};
