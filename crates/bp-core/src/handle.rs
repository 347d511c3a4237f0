//! Generation-tagged handles into the module registry.
//!
//! # Why generations?
//!
//! Scene-module instances are owned by the pipeline's registry, not by the
//! manager that tracks them. The registry may destroy an instance between
//! planning cycles (e.g. on module completion), so any outstanding reference
//! held by a manager can go stale at any time. Instead of shared ownership,
//! each tracked reference is a `ModuleHandle`: a slot index paired with the
//! generation the slot had when the instance was inserted. Removing an
//! instance bumps the slot's generation, so every old handle stops matching
//! and liveness becomes a cheap equality check rather than a dangling
//! pointer hazard.

use std::fmt;

/// A non-owning reference to a scene-module instance in a registry arena.
///
/// A handle is *live* iff the registry slot at `index` is occupied and its
/// current generation equals `generation`. Handles are `Copy` and cheap to
/// store; holding one never extends the instance's lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleHandle {
    /// Slot index in the owning registry.
    pub index: u32,
    /// Generation of the slot at insertion time.
    pub generation: u32,
}

impl ModuleHandle {
    /// Sentinel that matches no registry slot.
    pub const INVALID: ModuleHandle = ModuleHandle {
        index: u32::MAX,
        generation: u32::MAX,
    };

    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Cast the slot index to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn slot(self) -> usize {
        self.index as usize
    }
}

impl Default for ModuleHandle {
    /// Returns the `INVALID` sentinel so uninitialized handles are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleHandle({}@g{})", self.index, self.generation)
    }
}
