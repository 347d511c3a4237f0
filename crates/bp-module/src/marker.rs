//! Visualization markers and virtual-wall synthesis.
//!
//! Managers merge markers from several instances into one batch per output
//! channel. IDs must stay unique inside a batch, so each instance's markers
//! are offset into a per-instance ID block of [`MARKER_ID_BLOCK`]; the block
//! size exceeds the number of markers one instance is expected to emit in a
//! cycle.

use bp_core::{Pose, Timestamp};

/// Size of the per-instance marker-ID block.
pub const MARKER_ID_BLOCK: u32 = u8::MAX as u32;

// ── Marker ────────────────────────────────────────────────────────────────────

/// Geometry carried by a marker.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerShape {
    /// Vertical wall plane across the lane.
    #[default]
    WallPlane,
    /// Floating text label.
    Text,
    /// Polyline (path outlines, drivable-area bounds).
    LineStrip,
    /// Sphere at a point of interest.
    Sphere,
}

/// The kind of virtual wall a pose produces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallKind {
    Stop,
    SlowDown,
    DeadLine,
}

impl WallKind {
    /// Namespace prefix for markers synthesized from this wall kind.
    fn ns_prefix(self) -> &'static str {
        match self {
            WallKind::Stop => "stop_",
            WallKind::SlowDown => "slow_down_",
            WallKind::DeadLine => "dead_line_",
        }
    }
}

/// A single visualization marker.
///
/// `id` is unique within a `(ns, batch)` pair; managers enforce uniqueness
/// across instances via block offsetting, see [`MarkerBatch::offset_ids`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    pub ns: String,
    pub id: u32,
    pub shape: MarkerShape,
    pub pose: Pose,
    pub stamp: Timestamp,
    /// Label text for `Text` markers; empty otherwise.
    pub text: String,
}

// ── MarkerBatch ───────────────────────────────────────────────────────────────

/// An ordered collection of markers emitted as one message.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerBatch {
    pub markers: Vec<Marker>,
}

impl MarkerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Move every marker of `other` onto the end of `self`.
    pub fn append(&mut self, other: MarkerBatch) {
        self.markers.extend(other.markers);
    }

    /// Shift every marker ID by `base`. Used to place one instance's locally
    /// numbered markers into its assigned ID block.
    pub fn offset_ids(&mut self, base: u32) {
        for marker in &mut self.markers {
            marker.id += base;
        }
    }
}

// ── Virtual-wall synthesis ────────────────────────────────────────────────────

/// Synthesize the marker pair for one virtual wall: the wall plane itself
/// plus a text label naming the responsible module.
///
/// `next_id` is advanced by the number of IDs consumed, so consecutive calls
/// within one instance's block never collide.
pub fn virtual_wall(
    kind: WallKind,
    pose: Pose,
    module_name: &str,
    stamp: Timestamp,
    next_id: &mut u32,
) -> MarkerBatch {
    let wall_id = *next_id;
    let text_id = *next_id + 1;
    *next_id += 2;

    let ns = kind.ns_prefix();
    MarkerBatch {
        markers: vec![
            Marker {
                ns: format!("{ns}virtual_wall"),
                id: wall_id,
                shape: MarkerShape::WallPlane,
                pose,
                stamp,
                text: String::new(),
            },
            Marker {
                ns: format!("{ns}factor_text"),
                id: text_id,
                shape: MarkerShape::Text,
                pose,
                stamp,
                text: module_name.to_owned(),
            },
        ],
    }
}
