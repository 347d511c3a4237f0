//! Time model for the reporting surfaces.
//!
//! # Design
//!
//! The manager never reads a process-wide clock. The orchestrator stamps
//! every aggregation call with an explicit [`Timestamp`], which makes each
//! publish pass a deterministic function of its inputs and lets tests drive
//! time directly. A `Timestamp` is integer nanoseconds since the Unix epoch,
//! so stamp arithmetic is exact and comparisons are O(1).

use std::fmt;
use std::sync::mpsc;

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// An absolute point in time: nanoseconds since the Unix epoch.
///
/// Stored as `i64` — good until the year 2262, far beyond any deployment
/// horizon, and directly comparable with the planner's message stamps.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// Build a timestamp from whole seconds since the epoch.
    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1_000_000_000)
    }

    /// Build a timestamp from milliseconds since the epoch.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis * 1_000_000)
    }

    /// Nanoseconds elapsed from `earlier` to `self`, clamped at zero.
    ///
    /// Clamping makes validity-window arithmetic immune to out-of-order
    /// stamps from a host that replays logs.
    #[inline]
    pub fn saturating_since(self, earlier: Timestamp) -> u64 {
        (self.0 - earlier.0).max(0) as u64
    }

    /// Whole seconds since the epoch, truncated.
    #[inline]
    pub fn as_secs(self) -> i64 {
        self.0 / 1_000_000_000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.0 / 1_000_000_000, (self.0 % 1_000_000_000).abs())
    }
}

// ── Processing-time reporting ─────────────────────────────────────────────────

/// One processing-time measurement emitted by a module's internal stopwatch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessingTimeRecord {
    /// Name of the module (or sub-stage) that was timed.
    pub module: String,
    /// Wall time spent, microseconds.
    pub elapsed_us: u64,
}

/// Fire-and-forget channel handed to a module on registration.
///
/// Cloned freely; sends to a disconnected receiver are silently dropped, so
/// a module never has to care whether anyone is listening.
pub type TimeReporter = mpsc::Sender<ProcessingTimeRecord>;
