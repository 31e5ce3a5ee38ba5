//! The navigation camera state machine.

use std::cell::RefCell;
use std::rc::Rc;

use navcam_core::{CameraState, ViewportData};
use navcam_engine::{
    AnimationEngine, AnimationId, AnimationOutcome, TransitionOptions, TransitionPlanner,
};

use crate::data_source::ViewportDataSource;
use crate::observer::{ObserverHandle, Observers};

/// Callback fired once when a state transition settles or is canceled.
pub type TransitionEndListener = Box<dyn FnOnce(AnimationOutcome)>;

/// Callback receiving every camera state change.
pub type CameraStateObserver = Box<dyn FnMut(CameraState)>;

enum RunningKind {
    Transition {
        final_state: CameraState,
        frame_options: TransitionOptions,
    },
    Frame,
}

struct RunningAnimation {
    id: AnimationId,
    kind: RunningKind,
}

/// Arbitrates camera state requests, plans transitions, and forwards the
/// resulting animations to the renderer.
///
/// The camera observes its [`ViewportDataSource`]: every data update in a
/// steady state triggers a frame animation easing toward the new target, so
/// the camera continuously tracks motion without per-update jumps. Entering
/// a steady state is two-phase: a one-shot state-transition animation first,
/// then the continuous frame animations.
///
/// All methods run on the single logical thread of the host; a request
/// returns immediately after scheduling and completion is delivered through
/// [`NavigationCamera::on_animation_outcome`] by the host loop.
pub struct NavigationCamera {
    data_source: Rc<RefCell<ViewportDataSource>>,
    planner: TransitionPlanner,
    engine: Box<dyn AnimationEngine>,
    state: CameraState,
    frame_transition_options: TransitionOptions,
    running: Option<RunningAnimation>,
    transition_listeners: Vec<TransitionEndListener>,
    observers: Observers<CameraStateObserver>,
    source_observer: Option<ObserverHandle>,
}

impl NavigationCamera {
    /// Creates a camera observing `data_source` and driving `engine` with
    /// animations planned by `planner`.
    pub fn new(
        data_source: Rc<RefCell<ViewportDataSource>>,
        planner: TransitionPlanner,
        engine: Box<dyn AnimationEngine>,
    ) -> Rc<RefCell<Self>> {
        let camera = Rc::new(RefCell::new(Self {
            data_source: data_source.clone(),
            planner,
            engine,
            state: CameraState::Idle,
            frame_transition_options: TransitionOptions::for_frame_transition(),
            running: None,
            transition_listeners: Vec::new(),
            observers: Observers::new(),
            source_observer: None,
        }));

        let weak = Rc::downgrade(&camera);
        let handle = data_source
            .borrow_mut()
            .register_update_observer(Box::new(move |data: &ViewportData| {
                if let Some(camera) = weak.upgrade() {
                    camera.borrow_mut().update_frame(data, false);
                }
            }));
        camera.borrow_mut().source_observer = Some(handle);
        camera
    }

    /// Returns the current camera state.
    #[must_use]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Registers a state observer. The observer immediately receives the
    /// current state (the initial idle included), then every change,
    /// synchronously and in order.
    pub fn register_state_observer(&mut self, mut observer: CameraStateObserver) -> ObserverHandle {
        observer(self.state);
        self.observers.register(observer)
    }

    /// Requests a transition to [`CameraState::Following`].
    ///
    /// Goes through [`CameraState::TransitionToFollowing`] and settles in
    /// [`CameraState::Following`]; a canceled transition resolves to
    /// [`CameraState::Idle`]. Requesting the current or already-targeted
    /// state starts no new animation, but the listener still fires at the
    /// real completion.
    ///
    /// `state_options` caps the one-shot entry animation, `frame_options`
    /// the frame animations that follow it; both fall back to the system
    /// defaults and neither outlives the next idle (one-shot, not sticky).
    pub fn request_to_following(
        &mut self,
        state_options: Option<TransitionOptions>,
        frame_options: Option<TransitionOptions>,
        listener: Option<TransitionEndListener>,
    ) {
        self.request_state(
            CameraState::TransitionToFollowing,
            CameraState::Following,
            state_options,
            frame_options,
            listener,
        );
    }

    /// Requests a transition to [`CameraState::Overview`].
    ///
    /// Symmetric to [`NavigationCamera::request_to_following`].
    pub fn request_to_overview(
        &mut self,
        state_options: Option<TransitionOptions>,
        frame_options: Option<TransitionOptions>,
        listener: Option<TransitionEndListener>,
    ) {
        self.request_state(
            CameraState::TransitionToOverview,
            CameraState::Overview,
            state_options,
            frame_options,
            listener,
        );
    }

    /// Immediately goes to [`CameraState::Idle`], canceling any in-flight
    /// transition or frame animation.
    pub fn request_to_idle(&mut self) {
        if self.state != CameraState::Idle {
            self.cancel_running();
            self.set_idle_properties();
        }
    }

    /// Runs the frame animation instantly against the latest viewport data.
    ///
    /// Use after teleports or backgrounding, when easing from the stale
    /// camera position would be misleading.
    pub fn reset_frame(&mut self) {
        let data = self.data_source.borrow().viewport_data().clone();
        self.update_frame(&data, true);
    }

    /// Reports the end of an animator set started by this camera. Called by
    /// the host loop when the renderer finishes or cancels a set; stale ids
    /// are ignored.
    pub fn on_animation_outcome(&mut self, id: AnimationId, outcome: AnimationOutcome) {
        let Some(running) = self.running.take() else {
            return;
        };
        if running.id != id {
            self.running = Some(running);
            return;
        }
        self.engine.release(id);

        match running.kind {
            RunningKind::Frame => {}
            RunningKind::Transition {
                final_state,
                frame_options,
            } => match outcome {
                AnimationOutcome::Completed => {
                    self.frame_transition_options = frame_options;
                    self.set_state(final_state);
                    self.fire_transition_listeners(AnimationOutcome::Completed);
                    let data = self.data_source.borrow().viewport_data().clone();
                    self.update_frame(&data, false);
                }
                AnimationOutcome::Canceled => {
                    self.set_idle_properties();
                    self.fire_transition_listeners(AnimationOutcome::Canceled);
                }
            },
        }
    }

    fn request_state(
        &mut self,
        progress_state: CameraState,
        final_state: CameraState,
        state_options: Option<TransitionOptions>,
        frame_options: Option<TransitionOptions>,
        listener: Option<TransitionEndListener>,
    ) {
        if self.state == final_state {
            // Already settled: the scheduled completion is now.
            if let Some(listener) = listener {
                listener(AnimationOutcome::Completed);
            }
            return;
        }
        if self.state == progress_state {
            // Already animating toward the requested state: attach to the
            // in-flight transition instead of restarting it.
            if let Some(listener) = listener {
                self.transition_listeners.push(listener);
            }
            return;
        }

        let data = self.data_source.borrow().viewport_data().clone();
        let target = match final_state {
            CameraState::Overview => data.camera_for_overview,
            _ => data.camera_for_following,
        };
        let set = self.planner.state_transition(
            &target,
            state_options.unwrap_or_else(TransitionOptions::for_state_transition),
        );

        self.cancel_running();
        // Custom frame options only take effect once the entry settles.
        self.frame_transition_options = TransitionOptions::for_frame_transition();
        self.engine.set_anchor(None);
        let id = self.engine.start(set, false);
        self.running = Some(RunningAnimation {
            id,
            kind: RunningKind::Transition {
                final_state,
                frame_options: frame_options.unwrap_or_else(TransitionOptions::for_frame_transition),
            },
        });
        if let Some(listener) = listener {
            self.transition_listeners.push(listener);
        }
        self.set_state(progress_state);
    }

    fn update_frame(&mut self, data: &ViewportData, instant: bool) {
        let target = match self.state {
            CameraState::Following => &data.camera_for_following,
            CameraState::Overview => &data.camera_for_overview,
            _ => return,
        };
        let set = self.planner.frame_update(target, self.frame_transition_options);

        self.cancel_running();
        self.engine.set_anchor(None);
        let id = self.engine.start(set, instant);
        self.running = Some(RunningAnimation {
            id,
            kind: RunningKind::Frame,
        });
    }

    /// Cancels and unregisters the running animator set, if any. A canceled
    /// transition resolves to idle and fires its listeners.
    fn cancel_running(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        self.engine.cancel(running.id);
        if let RunningKind::Transition { .. } = running.kind {
            self.set_idle_properties();
            self.fire_transition_listeners(AnimationOutcome::Canceled);
        }
    }

    fn set_idle_properties(&mut self) {
        self.frame_transition_options = TransitionOptions::for_frame_transition();
        self.set_state(CameraState::Idle);
    }

    fn set_state(&mut self, state: CameraState) {
        if self.state != state {
            self.state = state;
            self.observers.notify(|observer| observer(state));
        }
    }

    fn fire_transition_listeners(&mut self, outcome: AnimationOutcome) {
        for listener in self.transition_listeners.drain(..) {
            listener(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use navcam_core::{GeoPoint, Location};
    use navcam_engine::Easing;

    use crate::test_util::{MockProjection, RecordingEngine};

    struct Harness {
        source: Rc<RefCell<ViewportDataSource>>,
        engine: RecordingEngine,
        camera: Rc<RefCell<NavigationCamera>>,
    }

    fn harness() -> Harness {
        let projection = MockProjection::new();
        let source = Rc::new(RefCell::new(ViewportDataSource::new(projection.clone())));
        source
            .borrow_mut()
            .on_location_changed(Location::new(GeoPoint::new(0.0, 0.1), 0.0));
        source.borrow_mut().evaluate();

        let engine = RecordingEngine::default();
        let planner = TransitionPlanner::new(projection);
        let camera = NavigationCamera::new(source.clone(), planner, Box::new(engine.clone()));
        Harness {
            source,
            engine,
            camera,
        }
    }

    fn counting_listener(count: &Rc<Cell<usize>>, expected: AnimationOutcome) -> TransitionEndListener {
        let count = count.clone();
        Box::new(move |outcome| {
            assert_eq!(outcome, expected);
            count.set(count.get() + 1);
        })
    }

    #[test]
    fn test_initial_state_delivered_on_registration() {
        let h = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _handle = h
            .camera
            .borrow_mut()
            .register_state_observer(Box::new(move |state| sink.borrow_mut().push(state)));
        assert_eq!(*seen.borrow(), vec![CameraState::Idle]);
    }

    #[test]
    fn test_duplicate_requests_start_one_animation_and_one_settle() {
        let h = harness();
        let completions = Rc::new(Cell::new(0));

        h.camera.borrow_mut().request_to_following(
            None,
            None,
            Some(counting_listener(&completions, AnimationOutcome::Completed)),
        );
        h.camera.borrow_mut().request_to_following(
            None,
            None,
            Some(counting_listener(&completions, AnimationOutcome::Completed)),
        );

        assert_eq!(h.engine.state.borrow().started.len(), 1);
        assert_eq!(h.camera.borrow().state(), CameraState::TransitionToFollowing);
        assert_eq!(completions.get(), 0);

        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        assert_eq!(h.camera.borrow().state(), CameraState::Following);
        assert_eq!(completions.get(), 2);
        // Settling schedules the first frame animation, nothing more.
        assert_eq!(h.engine.state.borrow().started.len(), 2);
    }

    #[test]
    fn test_request_in_steady_state_completes_listener_immediately() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        let completions = Rc::new(Cell::new(0));
        h.camera.borrow_mut().request_to_following(
            None,
            None,
            Some(counting_listener(&completions, AnimationOutcome::Completed)),
        );
        assert_eq!(completions.get(), 1);
        assert_eq!(h.engine.state.borrow().started.len(), 2);
    }

    #[test]
    fn test_idle_during_transition_cancels_registered_set() {
        let h = harness();
        let cancellations = Rc::new(Cell::new(0));
        h.camera.borrow_mut().request_to_following(
            None,
            None,
            Some(counting_listener(&cancellations, AnimationOutcome::Canceled)),
        );
        let id = h.engine.state.borrow().started[0].id;

        h.camera.borrow_mut().request_to_idle();

        assert_eq!(h.camera.borrow().state(), CameraState::Idle);
        assert_eq!(h.engine.state.borrow().canceled, vec![id]);
        assert_eq!(cancellations.get(), 1);
    }

    #[test]
    fn test_superseded_transition_resolves_through_idle() {
        let h = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _handle = h
            .camera
            .borrow_mut()
            .register_state_observer(Box::new(move |state| sink.borrow_mut().push(state)));

        h.camera.borrow_mut().request_to_following(None, None, None);
        h.camera.borrow_mut().request_to_overview(None, None, None);
        let id = h.engine.state.borrow().started[1].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        assert_eq!(
            *seen.borrow(),
            vec![
                CameraState::Idle,
                CameraState::TransitionToFollowing,
                CameraState::Idle,
                CameraState::TransitionToOverview,
                CameraState::Overview,
            ]
        );
        // The superseded following transition was canceled on the engine.
        let first_id = h.engine.state.borrow().started[0].id;
        assert_eq!(h.engine.state.borrow().canceled, vec![first_id]);
    }

    #[test]
    fn test_anchor_cleared_before_every_start() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        let state = h.engine.state.borrow();
        assert_eq!(state.anchor_sets.len(), state.started.len());
        assert!(state.anchor_sets.iter().all(Option::is_none));
    }

    #[test]
    fn test_data_updates_drive_frame_animations_in_steady_state() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);
        let started_after_settle = h.engine.state.borrow().started.len();

        h.source
            .borrow_mut()
            .on_location_changed(Location::new(GeoPoint::new(0.0, 0.2), 0.0));
        h.source.borrow_mut().evaluate();

        let state = h.engine.state.borrow();
        assert_eq!(state.started.len(), started_after_settle + 1);
        let frame = &state.started[state.started.len() - 1];
        assert!(frame
            .set
            .animations
            .iter()
            .all(|a| a.easing == Easing::Linear));
    }

    #[test]
    fn test_data_updates_ignored_while_idle_or_transitioning() {
        let h = harness();
        // Idle: no animation on data updates.
        h.source
            .borrow_mut()
            .on_location_changed(Location::new(GeoPoint::new(0.0, 0.2), 0.0));
        h.source.borrow_mut().evaluate();
        assert!(h.engine.state.borrow().started.is_empty());

        // Mid-transition: still no frame animation.
        h.camera.borrow_mut().request_to_following(None, None, None);
        h.source
            .borrow_mut()
            .on_location_changed(Location::new(GeoPoint::new(0.0, 0.3), 0.0));
        h.source.borrow_mut().evaluate();
        assert_eq!(h.engine.state.borrow().started.len(), 1);
    }

    #[test]
    fn test_custom_options_are_one_shot() {
        let h = harness();
        let custom = TransitionOptions::with_max_duration(Duration::from_millis(500)).unwrap();
        h.camera
            .borrow_mut()
            .request_to_following(Some(custom), Some(custom), None);
        let id = h.engine.state.borrow().started[0].id;
        assert!(
            h.engine.state.borrow().started[0].set.total_duration()
                <= Duration::from_millis(500)
        );
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        // The first frame animation after settling uses the custom cap.
        {
            let state = h.engine.state.borrow();
            let frame = &state.started[1];
            assert!(frame
                .set
                .animations
                .iter()
                .all(|a| a.duration == Duration::from_millis(500)));
        }

        // Idle and re-enter without options: system defaults again.
        h.camera.borrow_mut().request_to_idle();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = {
            let state = h.engine.state.borrow();
            state.started[state.started.len() - 1].id
        };
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        let state = h.engine.state.borrow();
        let frame = &state.started[state.started.len() - 1];
        assert!(frame
            .set
            .animations
            .iter()
            .all(|a| a.duration == Duration::from_millis(1000)));
    }

    #[test]
    fn test_reset_frame_runs_instantly() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Completed);

        h.camera.borrow_mut().reset_frame();

        let state = h.engine.state.borrow();
        let last = &state.started[state.started.len() - 1];
        assert!(last.instant);
        // The previous frame animation was canceled first.
        assert_eq!(state.canceled.len(), 1);
    }

    #[test]
    fn test_reset_frame_is_noop_while_idle() {
        let h = harness();
        h.camera.borrow_mut().reset_frame();
        assert!(h.engine.state.borrow().started.is_empty());
    }

    #[test]
    fn test_canceled_entry_reported_by_engine_resolves_to_idle() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        let id = h.engine.state.borrow().started[0].id;
        h.camera
            .borrow_mut()
            .on_animation_outcome(id, AnimationOutcome::Canceled);
        assert_eq!(h.camera.borrow().state(), CameraState::Idle);
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let h = harness();
        h.camera.borrow_mut().request_to_following(None, None, None);
        h.camera
            .borrow_mut()
            .on_animation_outcome(AnimationId(9999), AnimationOutcome::Completed);
        assert_eq!(h.camera.borrow().state(), CameraState::TransitionToFollowing);
    }

    #[test]
    fn test_observer_unregisters_from_its_own_callback() {
        let h = harness();
        let calls = Rc::new(Cell::new(0));
        let handle_slot: Rc<RefCell<Option<ObserverHandle>>> = Rc::new(RefCell::new(None));

        let counter = calls.clone();
        let slot = handle_slot.clone();
        let handle = h
            .camera
            .borrow_mut()
            .register_state_observer(Box::new(move |_| {
                counter.set(counter.get() + 1);
                if let Some(handle) = slot.borrow_mut().take() {
                    handle.unregister();
                }
            }));
        *handle_slot.borrow_mut() = Some(handle);
        assert_eq!(calls.get(), 1); // initial idle

        // The observer unregisters itself when the first change arrives;
        // the next change must not reach it.
        h.camera.borrow_mut().request_to_following(None, None, None);
        assert_eq!(calls.get(), 2);
        h.camera.borrow_mut().request_to_idle();
        assert_eq!(calls.get(), 2);
    }
}
