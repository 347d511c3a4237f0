//! The `ReportWriter` trait implemented by persisted report backends.

use bp_module::{MarkerBatch, SteeringFactorBatch, VelocityFactorBatch};

use crate::OutputResult;

/// Trait implemented by backends that persist emitted batches for offline
/// analysis (currently CSV; the live channels in [`channels`][crate::channels]
/// are independent of this).
pub trait ReportWriter {
    /// Record one steering-factor batch.
    fn write_steering_factors(&mut self, batch: &SteeringFactorBatch) -> OutputResult<()>;

    /// Record one velocity-factor batch.
    fn write_velocity_factors(&mut self, batch: &VelocityFactorBatch) -> OutputResult<()>;

    /// Record one virtual-wall batch.
    fn write_virtual_walls(&mut self, batch: &MarkerBatch) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
