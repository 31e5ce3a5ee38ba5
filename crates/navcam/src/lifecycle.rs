//! Optional gesture/lifecycle collaborators layered on top of the camera.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use navcam_engine::NAVIGATION_CAMERA_OWNER;

use crate::camera::NavigationCamera;

/// Sends the camera to idle whenever a foreign animation takes over the
/// renderer's camera.
///
/// Wire the host's animation-lifecycle notifications into
/// [`BasicGesturesHandler::on_external_animation_started`]; animator sets
/// started by the navigation camera itself carry
/// [`NAVIGATION_CAMERA_OWNER`] and are ignored.
pub struct BasicGesturesHandler {
    camera: Weak<RefCell<NavigationCamera>>,
}

impl BasicGesturesHandler {
    /// Creates a handler for the given camera.
    #[must_use]
    pub fn new(camera: &Rc<RefCell<NavigationCamera>>) -> Self {
        Self {
            camera: Rc::downgrade(camera),
        }
    }

    /// Reports that an animation with the given owner tag started on the
    /// renderer. Foreign owners interrupt the camera; its own sets do not.
    pub fn on_external_animation_started(&self, owner: &str) {
        if owner == NAVIGATION_CAMERA_OWNER {
            return;
        }
        if let Some(camera) = self.camera.upgrade() {
            camera.borrow_mut().request_to_idle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use navcam_core::{CameraState, GeoPoint, Location};
    use navcam_engine::TransitionPlanner;

    use crate::data_source::ViewportDataSource;
    use crate::test_util::{MockProjection, RecordingEngine};

    fn camera_in_transition() -> Rc<RefCell<NavigationCamera>> {
        let projection = MockProjection::new();
        let source = Rc::new(RefCell::new(ViewportDataSource::new(projection.clone())));
        source
            .borrow_mut()
            .on_location_changed(Location::new(GeoPoint::new(0.0, 0.1), 0.0));
        source.borrow_mut().evaluate();

        let camera = NavigationCamera::new(
            source,
            TransitionPlanner::new(projection),
            Box::new(RecordingEngine::default()),
        );
        camera.borrow_mut().request_to_following(None, None, None);
        camera
    }

    #[test]
    fn test_foreign_owner_idles_the_camera() {
        let camera = camera_in_transition();
        let handler = BasicGesturesHandler::new(&camera);
        handler.on_external_animation_started("gestures");
        assert_eq!(camera.borrow().state(), CameraState::Idle);
    }

    #[test]
    fn test_own_animations_are_ignored() {
        let camera = camera_in_transition();
        let handler = BasicGesturesHandler::new(&camera);
        handler.on_external_animation_started(NAVIGATION_CAMERA_OWNER);
        assert_eq!(
            camera.borrow().state(),
            CameraState::TransitionToFollowing
        );
    }

    #[test]
    fn test_dropped_camera_is_a_noop() {
        let camera = camera_in_transition();
        let handler = BasicGesturesHandler::new(&camera);
        drop(camera);
        handler.on_external_animation_started("gestures");
    }
}
