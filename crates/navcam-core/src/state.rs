//! Camera lifecycle states.

/// The lifecycle state of the navigation camera.
///
/// Steady states are entered through their transition helper states; the
/// helper states cannot be requested directly. An interrupted transition
/// resolves to [`CameraState::Idle`], never back to the pre-transition
/// steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    /// The camera is not being manipulated.
    #[default]
    Idle,
    /// Animating toward [`CameraState::Following`].
    TransitionToFollowing,
    /// Tracking the vehicle position and heading.
    Following,
    /// Animating toward [`CameraState::Overview`].
    TransitionToOverview,
    /// Framing the remaining or whole route, top-down.
    Overview,
}

impl CameraState {
    /// Returns whether this is a steady state (idle, following, overview).
    #[must_use]
    pub fn is_steady(self) -> bool {
        !self.is_transitioning()
    }

    /// Returns whether this is one of the transition helper states.
    #[must_use]
    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            CameraState::TransitionToFollowing | CameraState::TransitionToOverview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(CameraState::default(), CameraState::Idle);
    }

    #[test]
    fn test_transition_states_are_not_steady() {
        assert!(CameraState::Idle.is_steady());
        assert!(CameraState::Following.is_steady());
        assert!(CameraState::Overview.is_steady());
        assert!(CameraState::TransitionToFollowing.is_transitioning());
        assert!(CameraState::TransitionToOverview.is_transitioning());
    }
}
