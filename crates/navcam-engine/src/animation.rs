//! Property-animation primitives handed to the animation engine.

use std::time::Duration;

use navcam_core::{EdgeInsets, GeoPoint};

/// Owner tag carried by animator sets started by the navigation camera.
///
/// Lets gesture/lifecycle collaborators distinguish the camera's own
/// animations from foreign ones on the shared renderer.
pub const NAVIGATION_CAMERA_OWNER: &str = "navcam";

/// How an animator set finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The set ran to its end.
    Completed,
    /// The set was canceled before reaching its end.
    Canceled,
}

/// Easing applied to a property animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant-rate interpolation; used for continuous frame updates.
    #[default]
    Linear,
    /// Cubic ease-out; used for state transitions.
    CubicOut,
}

impl Easing {
    /// Applies the easing curve to a progress value in [0, 1].
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// The camera property a single animator drives, with its target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyTarget {
    /// Animate the camera center.
    Center(GeoPoint),
    /// Animate the zoom level.
    Zoom(f64),
    /// Animate the bearing. The value is a resolved rotation target and may
    /// lie outside [0, 360) so the renderer interpolates the short way.
    Bearing(f64),
    /// Animate the pitch.
    Pitch(f64),
    /// Animate the padding.
    Padding(EdgeInsets),
}

/// One per-property timed animation within a parallel set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyAnimation {
    /// Property and target value.
    pub target: PropertyTarget,
    /// Delay before the animation starts.
    pub start_delay: Duration,
    /// Running time of the animation.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

impl PropertyAnimation {
    /// Creates an undelayed animation.
    #[must_use]
    pub fn new(target: PropertyTarget, duration: Duration, easing: Easing) -> Self {
        Self {
            target,
            start_delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Creates a delayed animation.
    #[must_use]
    pub fn with_delay(
        target: PropertyTarget,
        start_delay: Duration,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            target,
            start_delay,
            duration,
            easing,
        }
    }

    fn end_time(&self) -> Duration {
        self.start_delay + self.duration
    }
}

/// A parallel set of per-property animations executed as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorSet {
    /// Member animations, run in parallel.
    pub animations: Vec<PropertyAnimation>,
    /// Owner tag recognized by lifecycle collaborators.
    pub owner: &'static str,
}

impl AnimatorSet {
    /// Creates a set owned by the navigation camera.
    #[must_use]
    pub fn new(animations: Vec<PropertyAnimation>) -> Self {
        Self {
            animations,
            owner: NAVIGATION_CAMERA_OWNER,
        }
    }

    /// Returns the wall-clock time until the last member settles.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.animations
            .iter()
            .map(PropertyAnimation::end_time)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Proportionally scales delays and durations so the whole set settles
    /// within `max_duration`. Sets already inside the bound are unchanged.
    #[must_use]
    pub fn constrained_to(mut self, max_duration: Duration) -> Self {
        let total = self.total_duration();
        if total <= max_duration || total.is_zero() {
            return self;
        }
        let factor = max_duration.as_secs_f64() / total.as_secs_f64();
        for animation in &mut self.animations {
            animation.start_delay = animation.start_delay.mul_f64(factor);
            animation.duration = animation.duration.mul_f64(factor);
        }
        self
    }
}
