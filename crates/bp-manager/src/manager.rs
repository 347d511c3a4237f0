//! The `ModuleManager` — admission, lifecycle, and status aggregation for
//! one behavior type.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use bp_core::{ModuleHandle, Timestamp};
use bp_module::marker::{virtual_wall, MARKER_ID_BLOCK};
use bp_module::{
    ManeuverKind, MarkerBatch, ModuleRegistry, PlannerContext, SceneModule, StageOutput,
    SteeringFactorBatch, VelocityFactorBatch, WallKind,
};
use bp_output::ReportChannels;

use crate::{
    AdmissionConfig, CooperateInterface, IdleSlot, ManagerError, ManagerResult, ModulePlugin,
    ObserverSet, ParamPatch,
};

/// Lifecycle manager for one behavior type.
///
/// Constructed once per behavior at pipeline startup and alive for the
/// process duration. Instances it tracks are owned by the pipeline's
/// [`ModuleRegistry`], borrowed per call — the manager holds only handles
/// and must tolerate any of them going stale between cycles.
pub struct ModuleManager {
    name: String,
    config: AdmissionConfig,
    plugin: Box<dyn ModulePlugin>,
    context: Option<Arc<PlannerContext>>,
    observers: ObserverSet,
    idle: IdleSlot,
    cooperate: FxHashMap<String, Box<dyn CooperateInterface>>,
    channels: Option<ReportChannels>,
}

impl ModuleManager {
    /// Create a manager for the behavior type `name`.
    ///
    /// The manager is inert until [`init_interface`][Self::init_interface]
    /// wires its output channels; publish calls before that are no-ops.
    pub fn new(
        name: impl Into<String>,
        config: AdmissionConfig,
        plugin: Box<dyn ModulePlugin>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            plugin,
            context: None,
            observers: ObserverSet::new(),
            idle: IdleSlot::new(),
            cooperate: FxHashMap::default(),
            channels: None,
        }
    }

    /// One-time wiring: attach the output channels and the cooperative
    /// interfaces (one per sub-behavior, keys unique).
    ///
    /// # Errors
    ///
    /// [`ManagerError::DuplicateCooperateKey`] if a key repeats; wiring up
    /// to the offending key is kept.
    pub fn init_interface(
        &mut self,
        channels: ReportChannels,
        cooperate: Vec<(String, Box<dyn CooperateInterface>)>,
    ) -> ManagerResult<()> {
        self.channels = Some(channels);
        for (key, interface) in cooperate {
            self.register_cooperate_interface(key, interface)?;
        }
        Ok(())
    }

    /// Register one cooperative interface under `key`.
    pub fn register_cooperate_interface(
        &mut self,
        key: impl Into<String>,
        interface: Box<dyn CooperateInterface>,
    ) -> ManagerResult<()> {
        let key = key.into();
        if self.cooperate.contains_key(&key) {
            return Err(ManagerError::DuplicateCooperateKey(key));
        }
        self.cooperate.insert(key, interface);
        Ok(())
    }

    // ── Identity & configuration ──────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the planner-context snapshot injected into every instance.
    /// Called by the orchestrator at the start of each cycle; the snapshot
    /// itself is externally owned and never mutated here.
    pub fn set_context(&mut self, context: Arc<PlannerContext>) {
        self.context = Some(context);
    }

    pub fn is_simultaneous_executable_as_approved_module(&self) -> bool {
        self.config.enable_simultaneous_execution_as_approved_module
    }

    pub fn is_simultaneous_executable_as_candidate_module(&self) -> bool {
        self.config.enable_simultaneous_execution_as_candidate_module
    }

    /// Apply runtime parameter updates: the admission flags this manager
    /// owns, then everything else forwarded to the plugin. Unknown keys and
    /// mismatched types are tolerated, not errors.
    pub fn update_params(&mut self, patches: &[ParamPatch]) {
        for patch in patches {
            let flag = match patch.key.as_str() {
                "enable_simultaneous_execution_as_approved_module" => Some(
                    &mut self.config.enable_simultaneous_execution_as_approved_module,
                ),
                "enable_simultaneous_execution_as_candidate_module" => Some(
                    &mut self.config.enable_simultaneous_execution_as_candidate_module,
                ),
                _ => None,
            };
            if let Some(flag) = flag {
                match patch.value.as_bool() {
                    Some(value) => *flag = value,
                    None => debug!(
                        manager = %self.name,
                        key = %patch.key,
                        "ignoring non-boolean value for admission flag"
                    ),
                }
            }
        }
        self.plugin.update_params(patches);
    }

    // ── Admission & lifecycle ─────────────────────────────────────────────

    /// Advisory admission check: `true` iff no instance is currently
    /// tracked. Valid only for the instant of the call; the orchestrator is
    /// responsible for the single-instance invariant.
    pub fn can_launch_new_module(&self) -> bool {
        self.observers.is_empty()
    }

    /// Probe whether activation conditions are met, using the retained idle
    /// instance (lazily recreated after any hand-off). The idle instance is
    /// refreshed against the current context and `previous_output` but not
    /// activated.
    pub fn is_execution_requested(&mut self, previous_output: &StageOutput) -> bool {
        let Some(context) = self.context.clone() else {
            trace!(manager = %self.name, "probe before context injection");
            return false;
        };

        let idle = self.idle.ensure_with(|| self.plugin.create_instance());
        idle.set_context(context);
        idle.set_previous_output(previous_output.clone());
        idle.refresh();
        idle.is_execution_requested()
    }

    /// Pre-create the idle instance outside the probe path, so the first
    /// probe of a cycle doesn't pay the construction cost.
    pub fn update_idle_module(&mut self) {
        self.idle.ensure_with(|| self.plugin.create_instance());
    }

    /// Transfer exclusive ownership of the idle instance out of the manager
    /// (e.g. to promote it into an active instance via the registry). The
    /// slot stays empty until the next probe recreates it.
    pub fn take_idle_module(&mut self) -> Option<Box<dyn SceneModule>> {
        self.idle.take()
    }

    /// `true` iff an idle instance is currently held.
    pub fn has_idle_module(&self) -> bool {
        self.idle.is_some()
    }

    /// Attach `candidate` as an active instance: inject the current context
    /// and `previous_output`, hand over the processing-time reporter, invoke
    /// `on_entry`, and start tracking it.
    ///
    /// A stale `candidate` (destroyed by its owner since the handle was
    /// minted) is a recoverable race: the call is a silent no-op and the
    /// caller re-queries admission next cycle. No admission check happens
    /// here — a second registration while one instance is live is accepted;
    /// gating is the orchestrator's contract.
    pub fn register_new_module(
        &mut self,
        registry: &mut ModuleRegistry,
        candidate: ModuleHandle,
        previous_output: &StageOutput,
    ) {
        let context = self.context.clone();
        let reporter = self
            .channels
            .as_ref()
            .map(|ch| ch.processing_time.clone());

        let Some(module) = registry.get_mut(candidate) else {
            trace!(manager = %self.name, handle = %candidate, "candidate expired before registration");
            return;
        };

        if let Some(context) = context {
            module.set_context(context);
        }
        module.set_previous_output(previous_output.clone());
        if let Some(reporter) = reporter {
            module.attach_time_reporter(reporter);
        }
        module.on_entry();

        self.observers.push(candidate);
        debug!(manager = %self.name, handle = %candidate, "registered new module instance");
    }

    /// Prune every tracked handle whose instance no longer exists. Called
    /// once per cycle, before aggregation.
    pub fn update_observer(&mut self, registry: &ModuleRegistry) {
        let removed = self.observers.prune(registry);
        if removed > 0 {
            trace!(manager = %self.name, removed, "pruned stale observers");
        }
    }

    /// `true` iff `handle` is tracked *and* its instance is still live.
    /// Used by the orchestrator to deduplicate registration requests.
    pub fn exist(&self, registry: &ModuleRegistry, handle: ModuleHandle) -> bool {
        self.observers.contains(handle) && registry.contains(handle)
    }

    /// Tracked handles in activation order (stale entries included until the
    /// next prune).
    pub fn observers(&self) -> &[ModuleHandle] {
        self.observers.handles()
    }

    /// Forced teardown: `on_exit` every live tracked instance exactly once,
    /// clear the tracking set, exit and drop the idle instance, and publish
    /// an empty debug-marker batch so stale visualization disappears.
    /// Used on pipeline-level abort/replan; synchronous and unconditional.
    pub fn reset(&mut self, registry: &mut ModuleRegistry) {
        for &handle in self.observers.handles() {
            if let Some(module) = registry.get_mut(handle) {
                module.on_exit();
            }
        }
        self.observers.clear();

        if let Some(mut idle) = self.idle.take() {
            idle.on_exit();
        }

        if let Some(channels) = &self.channels {
            let _ = channels.debug_markers.send(MarkerBatch::new());
        }
        debug!(manager = %self.name, "reset");
    }

    // ── Status aggregation & publication ──────────────────────────────────

    /// Purge and re-publish every cooperative interface's status batch.
    pub fn publish_cooperate_status(&mut self, now: Timestamp) {
        for interface in self.cooperate.values_mut() {
            interface.purge_expired();
            interface.publish_status(now);
        }
    }

    /// Emit this cycle's steering-factor batch. Factors classified
    /// [`ManeuverKind::Unknown`] are filtered out, not errors.
    pub fn publish_steering_factors(&self, registry: &ModuleRegistry, now: Timestamp) {
        let mut batch = SteeringFactorBatch::new(now);
        for (_, module) in self.observers.iter_live(registry) {
            let factor = module.steering_factor();
            if factor.kind != ManeuverKind::Unknown {
                batch.factors.push(factor);
            }
        }
        if let Some(channels) = &self.channels {
            let _ = channels.steering_factors.send(batch);
        }
    }

    /// Emit this cycle's velocity-factor batch, same filtering rule.
    pub fn publish_velocity_factors(&self, registry: &ModuleRegistry, now: Timestamp) {
        let mut batch = VelocityFactorBatch::new(now);
        for (_, module) in self.observers.iter_live(registry) {
            let factor = module.velocity_factor();
            if factor.kind != ManeuverKind::Unknown {
                batch.factors.push(factor);
            }
        }
        if let Some(channels) = &self.channels {
            let _ = channels.velocity_factors.send(batch);
        }
    }

    /// Synthesize and emit this cycle's virtual-wall batch, then clear each
    /// instance's recorded wall poses so a stale pose is never re-emitted.
    ///
    /// Each instance draws marker IDs from its own block of
    /// [`MARKER_ID_BLOCK`], assigned in activation order, so instances with
    /// colliding local IDs never collide in the combined batch.
    pub fn publish_virtual_walls(&mut self, registry: &mut ModuleRegistry, now: Timestamp) {
        let mut combined = MarkerBatch::new();
        let mut block_base = MARKER_ID_BLOCK;

        for &handle in self.observers.handles() {
            let Some(module) = registry.get_mut(handle) else {
                continue;
            };
            let mut next_id = block_base;

            if let Some(pose) = module.stop_pose() {
                combined.append(virtual_wall(WallKind::Stop, pose, module.name(), now, &mut next_id));
            }
            if let Some(pose) = module.slow_pose() {
                combined.append(virtual_wall(WallKind::SlowDown, pose, module.name(), now, &mut next_id));
            }
            if let Some(pose) = module.dead_pose() {
                combined.append(virtual_wall(WallKind::DeadLine, pose, module.name(), now, &mut next_id));
            }

            let mut own_walls = module.wall_markers();
            own_walls.offset_ids(next_id);
            combined.append(own_walls);

            module.reset_wall_poses();
            block_base += MARKER_ID_BLOCK;
        }

        if let Some(channels) = &self.channels {
            let _ = channels.virtual_walls.send(combined);
        }
    }

    /// Emit this cycle's info / debug / drivable-area marker batches, each
    /// instance's markers offset into its ID block.
    ///
    /// With zero live instances and a present idle instance, the idle
    /// instance's markers are substituted instead — this keeps visualization
    /// populated while debugging the probe evaluation.
    pub fn publish_markers(&self, registry: &ModuleRegistry) {
        let mut info = MarkerBatch::new();
        let mut debug = MarkerBatch::new();
        let mut drivable = MarkerBatch::new();

        let mut block_base = MARKER_ID_BLOCK;
        let mut any_live = false;

        for (_, module) in self.observers.iter_live(registry) {
            any_live = true;

            let mut batch = module.info_markers();
            batch.offset_ids(block_base);
            info.append(batch);

            let mut batch = module.debug_markers();
            batch.offset_ids(block_base);
            debug.append(batch);

            let mut batch = module.drivable_area_markers();
            batch.offset_ids(block_base);
            drivable.append(batch);

            block_base += MARKER_ID_BLOCK;
        }

        if !any_live {
            if let Some(idle) = self.idle.get() {
                info.append(idle.info_markers());
                debug.append(idle.debug_markers());
                drivable.append(idle.drivable_area_markers());
            }
        }

        if let Some(channels) = &self.channels {
            let _ = channels.info_markers.send(info);
            let _ = channels.debug_markers.send(debug);
            let _ = channels.drivable_area_markers.send(drivable);
        }
    }
}
