//! The `SceneModule` trait — the contract every behavior instance fulfils.

use std::sync::Arc;

use bp_core::{Pose, TimeReporter};

use crate::{
    MarkerBatch, PlannerContext, StageOutput, SteeringFactor, VelocityFactor,
};

/// One running (or idle) evaluator of a single planning behavior.
///
/// Instances are owned by the pipeline's [`ModuleRegistry`][crate::ModuleRegistry];
/// managers reach them only through handles and drive them through this
/// trait. The planning algorithm behind [`refresh`][Self::refresh] is out of
/// scope here — this crate specifies only the lifecycle and status surface
/// the manager consumes.
///
/// # Required methods
///
/// Only [`name`][Self::name], [`refresh`][Self::refresh], and
/// [`is_execution_requested`][Self::is_execution_requested] are required.
/// Every status query has a "nothing to report" default so minimal modules
/// stay minimal.
///
/// # Lifecycle
///
/// An instance is *idle* until its manager calls [`on_entry`][Self::on_entry]
/// (at registration) and *exited* after [`on_exit`][Self::on_exit] (module
/// completion or forced teardown). `on_exit` is called at most once per
/// entry and is never retried.
pub trait SceneModule {
    /// Behavior name, e.g. `"lane_change_left"`. Stable for the instance's
    /// lifetime; used to label walls and factors.
    fn name(&self) -> &str;

    /// Replace the planner-context snapshot this instance plans against.
    fn set_context(&mut self, _ctx: Arc<PlannerContext>) {}

    /// Replace the previous pipeline stage's output.
    fn set_previous_output(&mut self, _output: StageOutput) {}

    /// Recompute internal state from the injected context and previous
    /// output. Called before every [`is_execution_requested`] probe.
    fn refresh(&mut self);

    /// `true` iff activation conditions are currently met.
    fn is_execution_requested(&self) -> bool;

    /// Lifecycle hook: the instance has been promoted to active.
    fn on_entry(&mut self) {}

    /// Lifecycle hook: the instance is being deactivated (normal completion
    /// or forced teardown). No return value; never retried.
    fn on_exit(&mut self) {}

    /// Attach the manager's processing-time reporter to this instance's
    /// internal stopwatch. Default: measurements are discarded.
    fn attach_time_reporter(&mut self, _reporter: TimeReporter) {}

    // ── Status queries (all optional) ─────────────────────────────────────

    /// Pose the vehicle must stop at this cycle, if any.
    fn stop_pose(&self) -> Option<Pose> {
        None
    }

    /// Pose the vehicle should slow down at this cycle, if any.
    fn slow_pose(&self) -> Option<Pose> {
        None
    }

    /// Last feasible pose for the maneuver (the "dead line"), if any.
    fn dead_pose(&self) -> Option<Pose> {
        None
    }

    /// Forget the recorded stop/slow/dead poses. Called by the manager after
    /// wall emission so a stale pose is never re-published next cycle.
    fn reset_wall_poses(&mut self) {}

    /// Wall markers this module synthesizes itself, beyond the pose-derived
    /// ones. Locally numbered from 0.
    fn wall_markers(&self) -> MarkerBatch {
        MarkerBatch::new()
    }

    /// Operator-facing info markers, locally numbered from 0.
    fn info_markers(&self) -> MarkerBatch {
        MarkerBatch::new()
    }

    /// Developer-facing debug markers, locally numbered from 0.
    fn debug_markers(&self) -> MarkerBatch {
        MarkerBatch::new()
    }

    /// Drivable-area outline markers, locally numbered from 0.
    fn drivable_area_markers(&self) -> MarkerBatch {
        MarkerBatch::new()
    }

    /// Current steering factor. [`ManeuverKind::Unknown`][crate::ManeuverKind]
    /// means "nothing to report" and is filtered by aggregation.
    fn steering_factor(&self) -> SteeringFactor {
        SteeringFactor::default()
    }

    /// Current velocity factor, same sentinel convention.
    fn velocity_factor(&self) -> VelocityFactor {
        VelocityFactor::default()
    }
}
