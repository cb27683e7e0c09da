//! Keeps exactly one registry-update subscription alive.

use std::cell::Cell;
use std::rc::Rc;

use crate::runtime::{RuntimeHandle, SubscriptionId};

/// At most one live `(runtime, listener)` pair plus a dirty flag the
/// notification sets.
///
/// Swapping runtimes always detaches from the previous handle before
/// attaching to the new one, so notifications can never leak across
/// unrelated runtime instances.
pub struct RegistrySubscription {
    attached: Option<(Rc<dyn RuntimeHandle>, SubscriptionId)>,
    dirty: Rc<Cell<bool>>,
}

impl Default for RegistrySubscription {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrySubscription {
    pub fn new() -> Self {
        Self {
            attached: None,
            dirty: Rc::new(Cell::new(false)),
        }
    }

    /// Align the subscription with the current runtime handle.
    ///
    /// Identity is pointer identity: a replaced handle detaches the old
    /// subscription first, then attaches to the new handle and marks the
    /// preview dirty so the next pass re-reads the fresh registry.
    pub fn sync(&mut self, runtime: Option<&Rc<dyn RuntimeHandle>>) {
        let same = match (&self.attached, runtime) {
            (Some((current, _)), Some(next)) => Rc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        self.detach();
        if let Some(runtime) = runtime {
            let dirty = self.dirty.clone();
            let id = runtime.on_registry_update(Box::new(move || dirty.set(true)));
            self.attached = Some((runtime.clone(), id));
            self.dirty.set(true);
        }
    }

    /// Remove the current subscription, if any.
    pub fn detach(&mut self) {
        if let Some((runtime, id)) = self.attached.take() {
            runtime.remove_listener(id);
        }
    }

    /// Consume the dirty flag set by a registry-updated notification.
    pub fn take_dirty(&mut self) -> bool {
        self.dirty.replace(false)
    }
}

impl Drop for RegistrySubscription {
    fn drop(&mut self) {
        self.detach();
    }
}
