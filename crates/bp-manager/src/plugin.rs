//! Per-behavior-type capabilities, composed into the manager by injection.

use bp_module::SceneModule;

use crate::ParamPatch;

/// What one concrete behavior type contributes to its manager: how to build
/// a fresh instance, and how to apply behavior-specific parameter updates.
///
/// Exactly one plugin is injected per [`ModuleManager`][crate::ModuleManager]
/// at construction. Keeping this a trait (rather than manager subclassing)
/// lets the manager's lifecycle logic stay concrete and testable with stub
/// plugins.
pub trait ModulePlugin {
    /// Build a fresh, idle instance of this behavior.
    fn create_instance(&self) -> Box<dyn SceneModule>;

    /// Apply behavior-specific parameter updates. Unknown keys are the
    /// plugin's to ignore. Default: no behavior-specific parameters.
    fn update_params(&mut self, _patches: &[ParamPatch]) {}
}

/// Admission configuration for one behavior type.
///
/// Both flags are consumed by the pipeline orchestrator, not by the manager
/// itself: they declare whether this behavior may run at the same time as
/// other pipeline stages. Field names follow the pipeline's parameter keys,
/// so [`update_params`][crate::ModuleManager::update_params] patches them
/// directly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdmissionConfig {
    /// May run while another already-approved module is active.
    pub enable_simultaneous_execution_as_approved_module: bool,
    /// May run while another module is still a candidate.
    pub enable_simultaneous_execution_as_candidate_module: bool,
}
