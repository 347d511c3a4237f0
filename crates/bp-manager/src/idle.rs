//! The `IdleSlot` — holds the disposable activation-probe instance.
//!
//! The idle instance exists so an expensive "should I start?" computation
//! can run against a non-activated module, without constructing and tearing
//! down a full active instance just to probe viability. The slot is a tagged
//! optional: [`take`][IdleSlot::take] transfers exclusive ownership out
//! (promotion to an active instance) and leaves the slot empty;
//! [`ensure_with`][IdleSlot::ensure_with] lazily repopulates it before the
//! next probe. The idle instance is never counted as active and never shared
//! between concurrent probes.

use bp_module::SceneModule;

/// Exclusive, refillable ownership slot for one idle module instance.
#[derive(Default)]
pub struct IdleSlot {
    inner: Option<Box<dyn SceneModule>>,
}

impl IdleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the slot via `factory` if it is empty, then borrow the
    /// occupant mutably.
    pub fn ensure_with(
        &mut self,
        factory: impl FnOnce() -> Box<dyn SceneModule>,
    ) -> &mut dyn SceneModule {
        &mut **self.inner.get_or_insert_with(factory)
    }

    /// Transfer the idle instance out, leaving the slot empty.
    pub fn take(&mut self) -> Option<Box<dyn SceneModule>> {
        self.inner.take()
    }

    /// Shared borrow of the occupant, if any.
    pub fn get(&self) -> Option<&dyn SceneModule> {
        self.inner.as_deref()
    }

    pub fn is_some(&self) -> bool {
        self.inner.is_some()
    }
}
