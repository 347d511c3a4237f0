//! Integration tests for bp-manager.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bp_core::{Pose, ProcessingTimeRecord, TimeReporter, Timestamp};
use bp_module::marker::MARKER_ID_BLOCK;
use bp_module::{
    ManeuverKind, Marker, MarkerBatch, MarkerShape, ModuleRegistry, PlannerContext, SceneModule,
    StageOutput, SteeringFactor, VelocityFactor,
};
use bp_output::{ReportChannels, ReportReceivers};

use crate::{
    AdmissionConfig, CooperateInterface, ManagerError, ModuleManager, ModulePlugin, ParamPatch,
    ParamValue,
};

// ── Instrumented stub module ──────────────────────────────────────────────────

/// Shared counters observing one `ProbeModule`'s lifecycle from outside.
#[derive(Clone, Default)]
struct Counters {
    entries: Arc<AtomicUsize>,
    exits: Arc<AtomicUsize>,
    refreshes: Arc<AtomicUsize>,
    context_sets: Arc<AtomicUsize>,
}

struct ProbeModule {
    name: String,
    counters: Counters,
    execution_requested: bool,
    stop_pose: Option<Pose>,
    slow_pose: Option<Pose>,
    dead_pose: Option<Pose>,
    info: MarkerBatch,
    steering: SteeringFactor,
    velocity: VelocityFactor,
    previous_output: StageOutput,
}

impl ProbeModule {
    fn new(name: &str) -> (Self, Counters) {
        let counters = Counters::default();
        let module = Self {
            name: name.to_owned(),
            counters: counters.clone(),
            execution_requested: false,
            stop_pose: None,
            slow_pose: None,
            dead_pose: None,
            info: MarkerBatch::new(),
            steering: SteeringFactor::default(),
            velocity: VelocityFactor::default(),
            previous_output: StageOutput::empty(),
        };
        (module, counters)
    }

    /// Info markers with locally colliding IDs 0 and 1.
    fn with_local_info_markers(mut self) -> Self {
        for id in 0..2 {
            self.info.markers.push(Marker {
                ns: "info".into(),
                id,
                shape: MarkerShape::Sphere,
                pose: Pose::default(),
                stamp: Timestamp::ZERO,
                text: String::new(),
            });
        }
        self
    }
}

impl SceneModule for ProbeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_context(&mut self, _ctx: Arc<PlannerContext>) {
        self.counters.context_sets.fetch_add(1, Ordering::SeqCst);
    }

    fn set_previous_output(&mut self, output: StageOutput) {
        self.previous_output = output;
    }

    fn refresh(&mut self) {
        self.counters.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn is_execution_requested(&self) -> bool {
        self.execution_requested
    }

    fn on_entry(&mut self) {
        self.counters.entries.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exit(&mut self) {
        self.counters.exits.fetch_add(1, Ordering::SeqCst);
    }

    fn attach_time_reporter(&mut self, reporter: TimeReporter) {
        // Announce attachment so tests can observe it arriving on the channel.
        let _ = reporter.send(ProcessingTimeRecord {
            module: self.name.clone(),
            elapsed_us: 0,
        });
    }

    fn stop_pose(&self) -> Option<Pose> {
        self.stop_pose
    }

    fn slow_pose(&self) -> Option<Pose> {
        self.slow_pose
    }

    fn dead_pose(&self) -> Option<Pose> {
        self.dead_pose
    }

    fn reset_wall_poses(&mut self) {
        self.stop_pose = None;
        self.slow_pose = None;
        self.dead_pose = None;
    }

    fn info_markers(&self) -> MarkerBatch {
        self.info.clone()
    }

    fn steering_factor(&self) -> SteeringFactor {
        self.steering.clone()
    }

    fn velocity_factor(&self) -> VelocityFactor {
        self.velocity.clone()
    }
}

// ── Stub plugin ───────────────────────────────────────────────────────────────

struct StubPlugin {
    /// What created idle instances answer to `is_execution_requested`.
    requested: bool,
    created: Arc<AtomicUsize>,
    param_keys: Arc<Mutex<Vec<String>>>,
}

impl StubPlugin {
    fn new(requested: bool) -> Self {
        Self {
            requested,
            created: Arc::new(AtomicUsize::new(0)),
            param_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ModulePlugin for StubPlugin {
    fn create_instance(&self) -> Box<dyn SceneModule> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let (mut module, _) = ProbeModule::new("probe_idle");
        module.execution_requested = self.requested;
        module.info.markers.push(Marker {
            ns: "idle".into(),
            id: 0,
            shape: MarkerShape::Text,
            pose: Pose::default(),
            stamp: Timestamp::ZERO,
            text: "idle".into(),
        });
        Box::new(module)
    }

    fn update_params(&mut self, patches: &[ParamPatch]) {
        let mut keys = self.param_keys.lock().unwrap();
        keys.extend(patches.iter().map(|p| p.key.clone()));
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn wired_manager(plugin: StubPlugin) -> (ModuleManager, ReportReceivers) {
    let mut manager = ModuleManager::new("test_behavior", AdmissionConfig::default(), Box::new(plugin));
    let (channels, receivers) = ReportChannels::create();
    manager.init_interface(channels, vec![]).unwrap();
    manager.set_context(PlannerContext::default().shared());
    (manager, receivers)
}

fn register_probe(
    manager: &mut ModuleManager,
    registry: &mut ModuleRegistry,
    module: ProbeModule,
) -> bp_core::ModuleHandle {
    let handle = registry.insert(Box::new(module));
    manager.register_new_module(registry, handle, &StageOutput::empty());
    handle
}

const NOW: Timestamp = Timestamp(2_000_000_000);

// ── Admission & lifecycle ─────────────────────────────────────────────────────

#[cfg(test)]
mod admission {
    use super::*;

    #[test]
    fn launchable_iff_no_live_observers() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();
        assert!(manager.can_launch_new_module());

        let (module, _) = ProbeModule::new("a");
        let handle = register_probe(&mut manager, &mut registry, module);
        assert!(!manager.can_launch_new_module());

        // External destruction + the per-cycle prune restores launchability.
        registry.remove(handle);
        manager.update_observer(&registry);
        assert!(manager.can_launch_new_module());
    }

    #[test]
    fn registration_injects_and_enters() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (module, counters) = ProbeModule::new("a");
        let handle = register_probe(&mut manager, &mut registry, module);

        assert_eq!(counters.entries.load(Ordering::SeqCst), 1);
        assert_eq!(counters.context_sets.load(Ordering::SeqCst), 1);
        assert!(manager.exist(&registry, handle));
        // The time reporter was attached: the probe announced itself.
        assert_eq!(rx.processing_time.try_recv().unwrap().module, "a");
    }

    #[test]
    fn expired_candidate_is_a_silent_noop() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (module, counters) = ProbeModule::new("a");
        let handle = registry.insert(Box::new(module));
        registry.remove(handle); // destroyed before registration lands

        manager.register_new_module(&mut registry, handle, &StageOutput::empty());
        assert!(manager.observers().is_empty());
        assert_eq!(counters.entries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_registration_is_not_dropped() {
        // Admission gating is the orchestrator's job; the manager itself
        // must accept a second entry while one is live.
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (a, _) = ProbeModule::new("a");
        let (b, _) = ProbeModule::new("b");
        let ha = register_probe(&mut manager, &mut registry, a);
        let hb = register_probe(&mut manager, &mut registry, b);

        assert_eq!(manager.observers(), &[ha, hb]);
        assert!(!manager.can_launch_new_module());
    }

    #[test]
    fn pruning_is_idempotent_and_order_preserving() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (a, _) = ProbeModule::new("a");
        let (b, _) = ProbeModule::new("b");
        let (c, _) = ProbeModule::new("c");
        let ha = register_probe(&mut manager, &mut registry, a);
        let hb = register_probe(&mut manager, &mut registry, b);
        let hc = register_probe(&mut manager, &mut registry, c);

        registry.remove(hb);
        manager.update_observer(&registry);
        assert_eq!(manager.observers(), &[ha, hc]);

        manager.update_observer(&registry);
        assert_eq!(manager.observers(), &[ha, hc]);
    }

    #[test]
    fn exist_is_false_for_stale_entries() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (a, _) = ProbeModule::new("a");
        let handle = register_probe(&mut manager, &mut registry, a);
        registry.remove(handle);

        // Still tracked (not yet pruned) but no longer live.
        assert!(manager.observers().contains(&handle));
        assert!(!manager.exist(&registry, handle));
    }

    #[test]
    fn reset_exits_each_instance_exactly_once() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(true));
        let mut registry = ModuleRegistry::new();

        let (a, ca) = ProbeModule::new("a");
        let (b, cb) = ProbeModule::new("b");
        register_probe(&mut manager, &mut registry, a);
        register_probe(&mut manager, &mut registry, b);

        // Materialize an idle instance too.
        assert!(manager.is_execution_requested(&StageOutput::empty()));
        assert!(manager.has_idle_module());

        manager.reset(&mut registry);

        assert_eq!(ca.exits.load(Ordering::SeqCst), 1);
        assert_eq!(cb.exits.load(Ordering::SeqCst), 1);
        assert!(manager.observers().is_empty());
        assert!(!manager.has_idle_module());

        // Debug visualization cleared with an explicitly empty batch.
        let batch = rx.debug_markers.try_recv().unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn reset_skips_already_destroyed_instances() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (a, ca) = ProbeModule::new("a");
        let handle = register_probe(&mut manager, &mut registry, a);
        registry.remove(handle);

        manager.reset(&mut registry); // must not fail on the stale handle
        assert_eq!(ca.exits.load(Ordering::SeqCst), 0);
        assert!(manager.observers().is_empty());
    }
}

// ── Idle evaluation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod idle {
    use super::*;

    #[test]
    fn probe_refreshes_and_answers() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(true));
        assert!(manager.is_execution_requested(&StageOutput::empty()));
        assert!(manager.has_idle_module());
    }

    #[test]
    fn idle_is_recreated_lazily_after_take() {
        let plugin = StubPlugin::new(true);
        let created = plugin.created.clone();
        let (mut manager, _rx) = wired_manager(plugin);

        assert!(manager.is_execution_requested(&StageOutput::empty()));
        assert_eq!(created.load(Ordering::SeqCst), 1);

        // Hand-off empties the slot...
        let promoted = manager.take_idle_module();
        assert!(promoted.is_some());
        assert!(!manager.has_idle_module());

        // ...and the next probe transparently builds a fresh instance.
        assert!(manager.is_execution_requested(&StageOutput::empty()));
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn repeated_probes_reuse_one_instance() {
        let plugin = StubPlugin::new(false);
        let created = plugin.created.clone();
        let (mut manager, _rx) = wired_manager(plugin);

        manager.is_execution_requested(&StageOutput::empty());
        manager.is_execution_requested(&StageOutput::empty());
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn probe_without_context_is_false() {
        let mut manager = ModuleManager::new(
            "unwired",
            AdmissionConfig::default(),
            Box::new(StubPlugin::new(true)),
        );
        assert!(!manager.is_execution_requested(&StageOutput::empty()));
        assert!(!manager.has_idle_module());
    }

    #[test]
    fn update_idle_module_precreates() {
        let plugin = StubPlugin::new(false);
        let created = plugin.created.clone();
        let (mut manager, _rx) = wired_manager(plugin);

        manager.update_idle_module();
        assert!(manager.has_idle_module());

        manager.is_execution_requested(&StageOutput::empty());
        assert_eq!(created.load(Ordering::SeqCst), 1, "probe reused the pre-created instance");
    }
}

// ── Aggregation & publication ─────────────────────────────────────────────────

#[cfg(test)]
mod aggregation {
    use super::*;

    #[test]
    fn unknown_factors_are_filtered() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("a");
        a.steering.kind = ManeuverKind::LaneChange;
        let (b, _) = ProbeModule::new("b"); // stays Unknown
        register_probe(&mut manager, &mut registry, a);
        register_probe(&mut manager, &mut registry, b);

        manager.publish_steering_factors(&registry, NOW);
        let batch = rx.steering_factors.try_recv().unwrap();
        assert_eq!(batch.factors.len(), 1);
        assert_eq!(batch.factors[0].kind, ManeuverKind::LaneChange);
        assert_eq!(batch.frame_id, "map");
        assert_eq!(batch.stamp, NOW);
    }

    #[test]
    fn velocity_batch_mirrors_filtering() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("a");
        a.velocity.kind = ManeuverKind::PullOver;
        register_probe(&mut manager, &mut registry, a);

        manager.publish_velocity_factors(&registry, NOW);
        let batch = rx.velocity_factors.try_recv().unwrap();
        assert_eq!(batch.factors.len(), 1);
        assert_eq!(batch.factors[0].kind, ManeuverKind::PullOver);
    }

    #[test]
    fn destroyed_instance_vanishes_from_aggregation() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("a");
        a.steering.kind = ManeuverKind::Avoidance;
        let handle = register_probe(&mut manager, &mut registry, a);
        registry.remove(handle);

        // No prune in between: aggregation itself must skip the stale entry.
        manager.publish_steering_factors(&registry, NOW);
        manager.publish_virtual_walls(&mut registry, NOW);
        manager.publish_markers(&registry);

        assert!(rx.steering_factors.try_recv().unwrap().factors.is_empty());
        assert!(rx.virtual_walls.try_recv().unwrap().is_empty());
        assert!(rx.info_markers.try_recv().unwrap().is_empty());
    }

    #[test]
    fn wall_markers_labeled_and_cleared() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("stopper");
        a.stop_pose = Some(Pose::new(12.0, 0.0, 0.0, 0.0));
        register_probe(&mut manager, &mut registry, a);

        manager.publish_virtual_walls(&mut registry, NOW);
        let batch = rx.virtual_walls.try_recv().unwrap();
        assert_eq!(batch.len(), 2); // wall plane + text label
        assert_eq!(batch.markers[1].text, "stopper");
        assert_eq!(batch.markers[0].stamp, NOW);

        // The pose was cleared after emission: next cycle emits nothing.
        manager.publish_virtual_walls(&mut registry, NOW);
        assert!(rx.virtual_walls.try_recv().unwrap().is_empty());
    }

    #[test]
    fn wall_ids_do_not_collide_across_instances() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("a");
        a.stop_pose = Some(Pose::default());
        a.slow_pose = Some(Pose::default());
        let (mut b, _) = ProbeModule::new("b");
        b.stop_pose = Some(Pose::default());
        b.dead_pose = Some(Pose::default());
        register_probe(&mut manager, &mut registry, a);
        register_probe(&mut manager, &mut registry, b);

        manager.publish_virtual_walls(&mut registry, NOW);
        let batch = rx.virtual_walls.try_recv().unwrap();
        assert_eq!(batch.len(), 8);

        let mut ids: Vec<u32> = batch.markers.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8, "all wall marker IDs unique");
    }

    #[test]
    fn info_marker_ids_offset_per_instance_block() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        // Both instances emit local IDs 0 and 1.
        let (a, _) = ProbeModule::new("a");
        let (b, _) = ProbeModule::new("b");
        register_probe(&mut manager, &mut registry, a.with_local_info_markers());
        register_probe(&mut manager, &mut registry, b.with_local_info_markers());

        manager.publish_markers(&registry);
        let batch = rx.info_markers.try_recv().unwrap();
        assert_eq!(batch.len(), 4);

        let ids: Vec<u32> = batch.markers.iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![
                MARKER_ID_BLOCK,
                MARKER_ID_BLOCK + 1,
                2 * MARKER_ID_BLOCK,
                2 * MARKER_ID_BLOCK + 1
            ]
        );
    }

    #[test]
    fn idle_markers_substituted_only_when_no_live_instance() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        // Zero live instances + idle present → idle markers pass through.
        manager.is_execution_requested(&StageOutput::empty());
        manager.publish_markers(&registry);
        let batch = rx.info_markers.try_recv().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.markers[0].text, "idle");

        // A live instance excludes idle markers regardless of idle presence.
        let (a, _) = ProbeModule::new("a");
        register_probe(&mut manager, &mut registry, a.with_local_info_markers());
        manager.publish_markers(&registry);
        let batch = rx.info_markers.try_recv().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.markers.iter().all(|m| m.ns == "info"));
    }

    #[test]
    fn dropped_channel_does_not_disturb_publication() {
        let (mut manager, rx) = wired_manager(StubPlugin::new(false));
        let mut registry = ModuleRegistry::new();

        let (mut a, _) = ProbeModule::new("a");
        a.steering.kind = ManeuverKind::LaneChange;
        register_probe(&mut manager, &mut registry, a);

        drop(rx.steering_factors);
        manager.publish_steering_factors(&registry, NOW); // must not panic
        manager.publish_velocity_factors(&registry, NOW);
        assert!(rx.velocity_factors.try_recv().is_ok());
    }
}

// ── Cooperate interfaces & parameters ─────────────────────────────────────────

#[cfg(test)]
mod wiring {
    use super::*;

    struct RecordingCooperate {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl CooperateInterface for RecordingCooperate {
        fn purge_expired(&mut self) {
            self.log.lock().unwrap().push("purge".into());
        }

        fn publish_status(&mut self, now: Timestamp) {
            self.log.lock().unwrap().push(format!("publish@{}", now.as_secs()));
        }
    }

    #[test]
    fn cooperate_status_purges_then_publishes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = ModuleManager::new(
            "coop",
            AdmissionConfig::default(),
            Box::new(StubPlugin::new(false)),
        );
        let (channels, _rx) = ReportChannels::create();
        manager
            .init_interface(
                channels,
                vec![(
                    "lane_change_left".into(),
                    Box::new(RecordingCooperate { log: log.clone() }) as Box<dyn CooperateInterface>,
                )],
            )
            .unwrap();

        manager.publish_cooperate_status(Timestamp::from_secs(7));
        assert_eq!(*log.lock().unwrap(), vec!["purge", "publish@7"]);
    }

    #[test]
    fn duplicate_cooperate_key_rejected() {
        let mut manager = ModuleManager::new(
            "coop",
            AdmissionConfig::default(),
            Box::new(StubPlugin::new(false)),
        );
        let log = Arc::new(Mutex::new(Vec::new()));
        manager
            .register_cooperate_interface(
                "left",
                Box::new(RecordingCooperate { log: log.clone() }),
            )
            .unwrap();

        let err = manager
            .register_cooperate_interface("left", Box::new(RecordingCooperate { log }))
            .unwrap_err();
        assert!(matches!(err, ManagerError::DuplicateCooperateKey(k) if k == "left"));
    }

    #[test]
    fn update_params_patches_admission_flags() {
        let plugin = StubPlugin::new(false);
        let forwarded = plugin.param_keys.clone();
        let (mut manager, _rx) = wired_manager(plugin);
        assert!(!manager.is_simultaneous_executable_as_approved_module());

        manager.update_params(&[
            ParamPatch::new(
                "enable_simultaneous_execution_as_approved_module",
                ParamValue::Bool(true),
            ),
            ParamPatch::new("avoidance.lateral_margin", ParamValue::Float(0.8)),
        ]);

        assert!(manager.is_simultaneous_executable_as_approved_module());
        assert!(!manager.is_simultaneous_executable_as_candidate_module());
        // Every patch is also forwarded to the plugin.
        assert_eq!(forwarded.lock().unwrap().len(), 2);
    }

    #[test]
    fn mistyped_admission_value_is_ignored() {
        let (mut manager, _rx) = wired_manager(StubPlugin::new(false));
        manager.update_params(&[ParamPatch::new(
            "enable_simultaneous_execution_as_candidate_module",
            ParamValue::Text("yes".into()),
        )]);
        assert!(!manager.is_simultaneous_executable_as_candidate_module());
    }
}
