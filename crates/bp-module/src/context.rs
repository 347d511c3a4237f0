//! Read-only planner state injected into every scene module.

use std::sync::Arc;

use bp_core::{Pose, Timestamp};

/// A snapshot of the planner's shared input data for one cycle.
///
/// Built once per planning cycle by the pipeline and shared immutably (via
/// `Arc`) with every manager and module instance. Managers forward the `Arc`
/// into their instances and never mutate the contents; a fresh snapshot
/// replaces the old one each cycle.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerContext {
    /// When this snapshot was assembled.
    pub stamp: Timestamp,

    /// Current ego pose in the map frame.
    pub ego_pose: Pose,

    /// Current ego speed, metres per second (signed; negative = reversing).
    pub ego_velocity_mps: f64,

    /// `true` once the operator (or autonomy supervisor) has approved
    /// autonomous operation. Modules typically refuse to request execution
    /// before this.
    pub operation_approved: bool,
}

impl PlannerContext {
    /// Wrap a snapshot for sharing. Convenience for hosts and tests.
    pub fn shared(self) -> Arc<PlannerContext> {
        Arc::new(self)
    }
}

/// The output of the previous pipeline stage, handed to the next module.
///
/// Each behavior plans relative to what the stage before it produced: the
/// reference path it would follow if this module stayed idle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageOutput {
    /// Reference path from the previous stage, ordered ego-forward.
    pub path: Vec<Pose>,

    /// Lateral drivable margin around the path, metres.
    pub drivable_margin_m: f64,
}

impl StageOutput {
    /// An empty output — what the first stage in a pipeline receives.
    pub fn empty() -> Self {
        Self::default()
    }
}
