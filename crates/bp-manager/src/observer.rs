//! The `ObserverSet` — ordered, non-owning tracking of active instances.

use bp_core::ModuleHandle;
use bp_module::{ModuleRegistry, SceneModule};

/// An ordered list of handles to the instances a manager currently tracks.
///
/// Insertion order is activation order; it determines marker-ID block
/// assignment and aggregation iteration order. The set holds handles only —
/// instance lifetime belongs to the [`ModuleRegistry`], which may destroy an
/// instance between cycles. Stale handles stay in the list until the next
/// [`prune`][Self::prune] and are skipped (never dereferenced) by
/// [`iter_live`][Self::iter_live].
#[derive(Default)]
pub struct ObserverSet {
    handles: Vec<ModuleHandle>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handle. No liveness or duplicate check at this layer — the
    /// caller validated the handle, and deduplication is the orchestrator's
    /// job via [`exist`][crate::ModuleManager::exist].
    pub fn push(&mut self, handle: ModuleHandle) {
        self.handles.push(handle);
    }

    /// Drop every handle whose instance no longer exists in `registry`.
    ///
    /// Idempotent and order-preserving for survivors.
    pub fn prune(&mut self, registry: &ModuleRegistry) -> usize {
        let before = self.handles.len();
        self.handles.retain(|&h| registry.contains(h));
        before - self.handles.len()
    }

    /// `true` iff `handle` is in the list (stale entries included).
    pub fn contains(&self, handle: ModuleHandle) -> bool {
        self.handles.contains(&handle)
    }

    /// Tracked handles in activation order, stale entries included.
    pub fn handles(&self) -> &[ModuleHandle] {
        &self.handles
    }

    /// Iterate the live entries in activation order, resolving each against
    /// `registry`. Stale entries are skipped, not errors.
    pub fn iter_live<'a>(
        &'a self,
        registry: &'a ModuleRegistry,
    ) -> impl Iterator<Item = (ModuleHandle, &'a dyn SceneModule)> + 'a {
        self.handles
            .iter()
            .filter_map(move |&h| registry.get(h).map(|m| (h, m)))
    }

    /// Number of live entries — stale handles don't count.
    pub fn live_count(&self, registry: &ModuleRegistry) -> usize {
        self.handles.iter().filter(|&&h| registry.contains(h)).count()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
