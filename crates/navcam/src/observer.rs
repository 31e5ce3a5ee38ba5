//! Observer registration plumbing shared by the camera and the data source.

use std::cell::Cell;
use std::rc::Rc;

/// Handle to a registered observer.
///
/// Unregistering flips a shared flag rather than touching the owning
/// collection, so it is safe to call from within the observer's own
/// callback; the observer stops receiving notifications immediately.
#[derive(Debug, Clone)]
pub struct ObserverHandle {
    alive: Rc<Cell<bool>>,
}

impl ObserverHandle {
    /// Stops the associated observer from receiving further notifications.
    pub fn unregister(&self) {
        self.alive.set(false);
    }

    /// Returns whether the associated observer is still registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.alive.get()
    }
}

struct Slot<F> {
    alive: Rc<Cell<bool>>,
    callback: F,
}

/// An ordered collection of observers with alive-flag based removal.
pub(crate) struct Observers<F> {
    slots: Vec<Slot<F>>,
}

impl<F> Observers<F> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn register(&mut self, callback: F) -> ObserverHandle {
        let alive = Rc::new(Cell::new(true));
        self.slots.push(Slot {
            alive: alive.clone(),
            callback,
        });
        ObserverHandle { alive }
    }

    /// Invokes `invoke` for every registered observer, in registration
    /// order. Liveness is re-checked before each call so an observer
    /// unregistered mid-notification is skipped.
    pub(crate) fn notify(&mut self, mut invoke: impl FnMut(&mut F)) {
        self.slots.retain(|slot| slot.alive.get());
        for slot in &mut self.slots {
            if slot.alive.get() {
                invoke(&mut slot.callback);
            }
        }
    }
}
