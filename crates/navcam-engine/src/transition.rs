//! Transition planning: per-property animation timing between framings.

use std::rc::Rc;
use std::time::Duration;

use navcam_core::geometry::{normalize_bearing, shortest_rotation_diff};
use navcam_core::{CameraFraming, NavCamError, Result};

use crate::animation::{AnimatorSet, Easing, PropertyAnimation, PropertyTarget};
use crate::engine::{ProjectionEngine, RenderedCamera};

/// Default cap for a state-transition animation.
pub const DEFAULT_STATE_TRANSITION_MAX_DURATION: Duration = Duration::from_millis(3500);

/// Default cap for a frame-update animation.
pub const DEFAULT_FRAME_TRANSITION_MAX_DURATION: Duration = Duration::from_millis(1000);

/// Screen-distance rate driving the center animation duration.
const CENTER_ANIMATION_PX_PER_SECOND: f64 = 500.0;

/// Zoom-delta rate driving the zoom animation duration.
const ZOOM_ANIMATION_LEVELS_PER_SECOND: f64 = 2.2;

/// Cap applied to each magnitude-derived property duration.
const MAX_PROPERTY_DURATION: Duration = Duration::from_millis(3000);

const ZOOM_IN_BEARING_DURATION: Duration = Duration::from_millis(1800);
const ZOOM_IN_PITCH_PADDING_DURATION: Duration = Duration::from_millis(1200);

const ZOOM_OUT_CENTER_DURATION: Duration = Duration::from_millis(800);
const ZOOM_OUT_ZOOM_DURATION: Duration = Duration::from_millis(1800);
const ZOOM_OUT_BEARING_DELAY: Duration = Duration::from_millis(600);
const ZOOM_OUT_BEARING_DURATION: Duration = Duration::from_millis(1200);
const ZOOM_OUT_PITCH_PADDING_DURATION: Duration = Duration::from_millis(1000);

/// Caps for one transition request. Non-sticky: custom options apply to a
/// single state-entry call and the frame updates that follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOptions {
    max_duration: Duration,
}

impl TransitionOptions {
    /// Creates options with the given duration cap.
    ///
    /// A zero cap is a contract violation and is rejected.
    pub fn with_max_duration(max_duration: Duration) -> Result<Self> {
        if max_duration.is_zero() {
            return Err(NavCamError::InvalidTransitionDuration);
        }
        Ok(Self { max_duration })
    }

    /// The default cap for state-entry transitions (3500 ms).
    #[must_use]
    pub fn for_state_transition() -> Self {
        Self {
            max_duration: DEFAULT_STATE_TRANSITION_MAX_DURATION,
        }
    }

    /// The default cap for continuous frame updates (1000 ms).
    #[must_use]
    pub fn for_frame_transition() -> Self {
        Self {
            max_duration: DEFAULT_FRAME_TRANSITION_MAX_DURATION,
        }
    }

    /// Returns the duration cap.
    #[must_use]
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }
}

/// Builds per-property animation timing for state transitions and frame
/// updates.
///
/// State transitions derive durations from change magnitude (screen-pixel
/// distance for the center, level delta for the zoom) and delay the
/// secondary properties so they settle together with the end of the
/// dominant motion. Frame updates use the cheap fixed-duration linear
/// variant, since per-property heuristics are unnecessary at update
/// frequency.
pub struct TransitionPlanner {
    projection: Rc<dyn ProjectionEngine>,
}

impl TransitionPlanner {
    /// Creates a planner querying the given projection engine.
    #[must_use]
    pub fn new(projection: Rc<dyn ProjectionEngine>) -> Self {
        Self { projection }
    }

    /// Plans a one-shot state-transition animation from the currently
    /// rendered camera to `target`, constrained to the options cap.
    #[must_use]
    pub fn state_transition(
        &self,
        target: &CameraFraming,
        options: TransitionOptions,
    ) -> AnimatorSet {
        let current = self.projection.camera_state();
        let set = if current.zoom < target.zoom {
            self.zoom_in_transition(&current, target)
        } else {
            Self::zoom_out_transition(&current, target)
        };
        set.constrained_to(options.max_duration)
    }

    /// Plans a continuous frame-update animation easing every property to
    /// `target` over the options cap, linearly.
    #[must_use]
    pub fn frame_update(&self, target: &CameraFraming, options: TransitionOptions) -> AnimatorSet {
        let current = self.projection.camera_state();
        let duration = options.max_duration;
        AnimatorSet::new(
            property_targets(&current, target)
                .into_iter()
                .map(|t| PropertyAnimation::new(t, duration, Easing::Linear))
                .collect(),
        )
    }

    fn zoom_in_transition(&self, current: &RenderedCamera, target: &CameraFraming) -> AnimatorSet {
        let current_px = self.projection.pixel_for_coordinate(current.center);
        let target_px = self.projection.pixel_for_coordinate(target.center);
        let screen_distance = current_px.distance(target_px);

        let center_duration =
            duration_at_rate(screen_distance, CENTER_ANIMATION_PX_PER_SECOND)
                .min(MAX_PROPERTY_DURATION);
        let zoom_duration = duration_at_rate(
            (target.zoom - current.zoom).abs(),
            ZOOM_ANIMATION_LEVELS_PER_SECOND,
        )
        .min(MAX_PROPERTY_DURATION);
        let dominant = center_duration.max(zoom_duration);

        // Secondary properties settle together with the dominant motion's
        // end, not simultaneously with its start.
        let bearing_duration = ZOOM_IN_BEARING_DURATION.min(dominant);
        let bearing_delay = dominant - bearing_duration;
        let pitch_padding_duration = ZOOM_IN_PITCH_PADDING_DURATION.min(dominant);
        let pitch_padding_delay = dominant - pitch_padding_duration;

        AnimatorSet::new(vec![
            PropertyAnimation::new(
                PropertyTarget::Center(target.center),
                center_duration,
                Easing::CubicOut,
            ),
            PropertyAnimation::new(
                PropertyTarget::Zoom(target.zoom),
                zoom_duration,
                Easing::CubicOut,
            ),
            PropertyAnimation::with_delay(
                PropertyTarget::Bearing(resolve_bearing(current.bearing, target.bearing)),
                bearing_delay,
                bearing_duration,
                Easing::CubicOut,
            ),
            PropertyAnimation::with_delay(
                PropertyTarget::Pitch(target.pitch),
                pitch_padding_delay,
                pitch_padding_duration,
                Easing::CubicOut,
            ),
            PropertyAnimation::with_delay(
                PropertyTarget::Padding(target.padding),
                pitch_padding_delay,
                pitch_padding_duration,
                Easing::CubicOut,
            ),
        ])
    }

    fn zoom_out_transition(current: &RenderedCamera, target: &CameraFraming) -> AnimatorSet {
        AnimatorSet::new(vec![
            PropertyAnimation::new(
                PropertyTarget::Center(target.center),
                ZOOM_OUT_CENTER_DURATION,
                Easing::CubicOut,
            ),
            PropertyAnimation::new(
                PropertyTarget::Zoom(target.zoom),
                ZOOM_OUT_ZOOM_DURATION,
                Easing::CubicOut,
            ),
            PropertyAnimation::with_delay(
                PropertyTarget::Bearing(resolve_bearing(current.bearing, target.bearing)),
                ZOOM_OUT_BEARING_DELAY,
                ZOOM_OUT_BEARING_DURATION,
                Easing::CubicOut,
            ),
            PropertyAnimation::new(
                PropertyTarget::Pitch(target.pitch),
                ZOOM_OUT_PITCH_PADDING_DURATION,
                Easing::CubicOut,
            ),
            PropertyAnimation::new(
                PropertyTarget::Padding(target.padding),
                ZOOM_OUT_PITCH_PADDING_DURATION,
                Easing::CubicOut,
            ),
        ])
    }
}

/// Resolves a [0, 360) bearing target against the rendered bearing so the
/// animation always takes the shortest rotation path, never the long way
/// around. The result may lie outside [0, 360).
fn resolve_bearing(current: f64, target: f64) -> f64 {
    current + shortest_rotation_diff(normalize_bearing(target), current)
}

fn property_targets(current: &RenderedCamera, target: &CameraFraming) -> Vec<PropertyTarget> {
    vec![
        PropertyTarget::Center(target.center),
        PropertyTarget::Zoom(target.zoom),
        PropertyTarget::Bearing(resolve_bearing(current.bearing, target.bearing)),
        PropertyTarget::Pitch(target.pitch),
        PropertyTarget::Padding(target.padding),
    ]
}

fn duration_at_rate(magnitude: f64, per_second: f64) -> Duration {
    if magnitude.is_finite() && magnitude > 0.0 {
        Duration::from_secs_f64(magnitude / per_second)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navcam_core::{EdgeInsets, GeoPoint, ScreenCoordinate};

    use crate::engine::CameraEstimate;

    /// Projection stub with a fixed rendered camera and a flat
    /// 100-pixels-per-degree screen mapping.
    struct FixedProjection {
        camera: RenderedCamera,
    }

    impl FixedProjection {
        fn at(center: GeoPoint, zoom: f64, bearing: f64) -> Rc<Self> {
            Rc::new(Self {
                camera: RenderedCamera {
                    center,
                    zoom,
                    bearing,
                    pitch: 0.0,
                    padding: EdgeInsets::ZERO,
                },
            })
        }
    }

    impl ProjectionEngine for FixedProjection {
        fn camera_for_coordinates(
            &self,
            _points: &[GeoPoint],
            _padding: EdgeInsets,
            _bearing: f64,
            _pitch: f64,
        ) -> Option<CameraEstimate> {
            None
        }

        fn pixel_for_coordinate(&self, point: GeoPoint) -> ScreenCoordinate {
            ScreenCoordinate::new(point.longitude * 100.0, point.latitude * -100.0)
        }

        fn camera_state(&self) -> RenderedCamera {
            self.camera
        }
    }

    fn target(center: GeoPoint, zoom: f64, bearing: f64) -> CameraFraming {
        CameraFraming {
            center,
            zoom,
            bearing,
            pitch: 45.0,
            padding: EdgeInsets::ZERO,
        }
    }

    fn find_duration(set: &AnimatorSet, pick: impl Fn(&PropertyTarget) -> bool) -> (Duration, Duration) {
        let animation = set
            .animations
            .iter()
            .find(|a| pick(&a.target))
            .expect("property animation missing");
        (animation.start_delay, animation.duration)
    }

    #[test]
    fn test_transition_options_reject_zero_duration() {
        assert!(matches!(
            TransitionOptions::with_max_duration(Duration::ZERO),
            Err(NavCamError::InvalidTransitionDuration)
        ));
        assert!(TransitionOptions::with_max_duration(Duration::from_millis(500)).is_ok());
    }

    #[test]
    fn test_zoom_in_durations_derive_from_magnitude() {
        // 10 degrees of longitude = 1000 px at the stub's scale.
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 10.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.state_transition(
            &target(GeoPoint::new(10.0, 0.0), 14.4, 0.0),
            TransitionOptions::for_state_transition(),
        );

        let (_, center) = find_duration(&set, |t| matches!(t, PropertyTarget::Center(_)));
        assert_eq!(center, Duration::from_secs(2));
        let (_, zoom) = find_duration(&set, |t| matches!(t, PropertyTarget::Zoom(_)));
        assert_eq!(zoom, Duration::from_secs_f64(4.4 / 2.2));
    }

    #[test]
    fn test_zoom_in_secondaries_settle_with_dominant_motion() {
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 10.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.state_transition(
            &target(GeoPoint::new(10.0, 0.0), 14.4, 0.0),
            TransitionOptions::for_state_transition(),
        );
        let dominant = Duration::from_secs(2);

        let (delay, duration) = find_duration(&set, |t| matches!(t, PropertyTarget::Bearing(_)));
        assert_eq!(delay + duration, dominant);
        assert_eq!(duration, Duration::from_millis(1800));

        let (delay, duration) = find_duration(&set, |t| matches!(t, PropertyTarget::Pitch(_)));
        assert_eq!(delay + duration, dominant);
        assert_eq!(duration, Duration::from_millis(1200));
    }

    #[test]
    fn test_property_durations_capped() {
        // An enormous jump: both magnitude-derived durations hit the cap.
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 2.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.state_transition(
            &target(GeoPoint::new(170.0, 80.0), 17.0, 0.0),
            TransitionOptions::for_state_transition(),
        );

        let (_, center) = find_duration(&set, |t| matches!(t, PropertyTarget::Center(_)));
        assert_eq!(center, Duration::from_secs(3));
        let (_, zoom) = find_duration(&set, |t| matches!(t, PropertyTarget::Zoom(_)));
        assert_eq!(zoom, Duration::from_secs(3));
    }

    #[test]
    fn test_zoom_out_uses_fixed_staging() {
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 16.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.state_transition(
            &target(GeoPoint::new(1.0, 1.0), 12.0, 0.0),
            TransitionOptions::for_state_transition(),
        );

        let (_, center) = find_duration(&set, |t| matches!(t, PropertyTarget::Center(_)));
        assert_eq!(center, Duration::from_millis(800));
        let (_, zoom) = find_duration(&set, |t| matches!(t, PropertyTarget::Zoom(_)));
        assert_eq!(zoom, Duration::from_millis(1800));
        let (delay, duration) = find_duration(&set, |t| matches!(t, PropertyTarget::Bearing(_)));
        assert_eq!(delay, Duration::from_millis(600));
        assert_eq!(duration, Duration::from_millis(1200));
    }

    #[test]
    fn test_bearing_takes_shortest_rotation_path() {
        // 10 -> 350 degrees must rotate -20 through north, not +340.
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 16.0, 10.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.state_transition(
            &target(GeoPoint::ORIGIN, 12.0, 350.0),
            TransitionOptions::for_state_transition(),
        );

        let bearing = set
            .animations
            .iter()
            .find_map(|a| match a.target {
                PropertyTarget::Bearing(b) => Some(b),
                _ => None,
            })
            .unwrap();
        assert!((bearing + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_state_transition_respects_max_duration() {
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 10.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let options = TransitionOptions::with_max_duration(Duration::from_millis(500)).unwrap();
        let set = planner.state_transition(&target(GeoPoint::new(10.0, 0.0), 14.4, 0.0), options);
        assert!(set.total_duration() <= Duration::from_millis(500));
    }

    #[test]
    fn test_frame_update_is_uniform_and_linear() {
        let projection = FixedProjection::at(GeoPoint::ORIGIN, 16.0, 0.0);
        let planner = TransitionPlanner::new(projection);
        let set = planner.frame_update(
            &target(GeoPoint::new(0.01, 0.01), 16.2, 15.0),
            TransitionOptions::for_frame_transition(),
        );

        assert_eq!(set.animations.len(), 5);
        for animation in &set.animations {
            assert_eq!(animation.start_delay, Duration::ZERO);
            assert_eq!(animation.duration, Duration::from_millis(1000));
            assert_eq!(animation.easing, Easing::Linear);
        }
    }
}
