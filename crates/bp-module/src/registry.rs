//! The `ModuleRegistry` — the single owner of every scene-module instance.
//!
//! Slots are reused through a free list; each removal bumps the slot's
//! generation so every [`ModuleHandle`] minted for the departed instance
//! stops matching. Lookups therefore answer the liveness question and the
//! access question in one step: a stale handle simply yields `None`.

use bp_core::ModuleHandle;

use crate::SceneModule;

struct Slot {
    /// Incremented on every removal. A handle matches only if its recorded
    /// generation equals this.
    generation: u32,
    module: Option<Box<dyn SceneModule>>,
}

/// Arena of scene-module instances, indexed by [`ModuleHandle`].
///
/// Owned by the pipeline; managers borrow it per call and never hold it.
#[derive(Default)]
pub struct ModuleRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `module` and mint a handle for it.
    pub fn insert(&mut self, module: Box<dyn SceneModule>) -> ModuleHandle {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.module.is_none());
                slot.module = Some(module);
                ModuleHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    module: Some(module),
                });
                ModuleHandle::new(index, 0)
            }
        }
    }

    /// Destroy the instance behind `handle`, returning it to the caller.
    ///
    /// Returns `None` if the handle is already stale. The slot's generation
    /// is bumped, invalidating every outstanding copy of `handle`.
    pub fn remove(&mut self, handle: ModuleHandle) -> Option<Box<dyn SceneModule>> {
        let slot = self.slots.get_mut(handle.slot())?;
        if slot.generation != handle.generation || slot.module.is_none() {
            return None;
        }
        slot.generation += 1;
        self.free.push(handle.index);
        slot.module.take()
    }

    /// `true` iff `handle` still names a live instance.
    #[inline]
    pub fn contains(&self, handle: ModuleHandle) -> bool {
        self.slots
            .get(handle.slot())
            .is_some_and(|slot| slot.generation == handle.generation && slot.module.is_some())
    }

    /// Shared access to a live instance; `None` on a stale handle.
    pub fn get(&self, handle: ModuleHandle) -> Option<&dyn SceneModule> {
        let slot = self.slots.get(handle.slot())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.module.as_deref()
    }

    /// Exclusive access to a live instance; `None` on a stale handle.
    pub fn get_mut(&mut self, handle: ModuleHandle) -> Option<&mut (dyn SceneModule + 'static)> {
        let slot = self.slots.get_mut(handle.slot())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.module.as_deref_mut()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.module.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.module.is_none())
    }
}
