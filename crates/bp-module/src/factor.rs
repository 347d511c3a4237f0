//! Intent factors — structured signals about upcoming steering / velocity
//! behavior changes, consumed by downstream HMI and supervision layers.
//!
//! A factor whose [`ManeuverKind`] is [`ManeuverKind::Unknown`] means "this
//! instance has nothing to report this cycle"; aggregation filters those out
//! rather than treating them as errors.

use bp_core::{Pose, Timestamp};

/// Reference frame every factor batch is expressed in.
pub const FACTOR_FRAME_ID: &str = "map";

// ── Classification ────────────────────────────────────────────────────────────

/// The maneuver category a factor announces.
///
/// `Unknown` is the unset sentinel: factors carrying it never leave the
/// module boundary.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManeuverKind {
    #[default]
    Unknown,
    LaneChange,
    Avoidance,
    PullOver,
    PullOut,
    GoalPlanner,
    SideShift,
    StartPlanner,
}

/// Which way an announced steering maneuver moves the vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SteerDirection {
    #[default]
    Straight,
    Left,
    Right,
}

/// Progress of an announced velocity change.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VelocityStatus {
    #[default]
    Approaching,
    Stopped,
    Resuming,
}

// ── Factors ───────────────────────────────────────────────────────────────────

/// An upcoming steering behavior change reported by one module instance.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringFactor {
    pub kind: ManeuverKind,
    pub direction: SteerDirection,
    /// Where the maneuver begins, map frame.
    pub pose: Pose,
    /// Ego distance to `pose` along the path, metres.
    pub distance_m: f64,
    /// Free-form detail for HMI display ("waiting for approval", …).
    pub detail: String,
}

/// An upcoming velocity behavior change reported by one module instance.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityFactor {
    pub kind: ManeuverKind,
    pub status: VelocityStatus,
    /// Where the vehicle is expected to stop or slow, map frame.
    pub pose: Pose,
    /// Ego distance to `pose` along the path, metres.
    pub distance_m: f64,
    pub detail: String,
}

// ── Batches ───────────────────────────────────────────────────────────────────

/// One cycle's steering factors across all live instances of one manager.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringFactorBatch {
    pub frame_id: String,
    pub stamp: Timestamp,
    pub factors: Vec<SteeringFactor>,
}

impl SteeringFactorBatch {
    pub fn new(stamp: Timestamp) -> Self {
        Self {
            frame_id: FACTOR_FRAME_ID.to_owned(),
            stamp,
            factors: Vec::new(),
        }
    }
}

/// One cycle's velocity factors across all live instances of one manager.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityFactorBatch {
    pub frame_id: String,
    pub stamp: Timestamp,
    pub factors: Vec<VelocityFactor>,
}

impl VelocityFactorBatch {
    pub fn new(stamp: Timestamp) -> Self {
        Self {
            frame_id: FACTOR_FRAME_ID.to_owned(),
            stamp,
            factors: Vec::new(),
        }
    }
}
