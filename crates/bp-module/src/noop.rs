//! A no-op scene module — never requests execution, reports nothing.

use crate::SceneModule;

/// A [`SceneModule`] whose activation conditions are never met.
///
/// Useful as a placeholder in tests or for behavior slots that are wired but
/// disabled by configuration.
pub struct NoopModule {
    name: String,
}

impl NoopModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SceneModule for NoopModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self) {}

    fn is_execution_requested(&self) -> bool {
        false
    }
}
