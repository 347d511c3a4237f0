//! Fire-and-forget report channels.
//!
//! One `mpsc` pipe per batch kind, mirroring the original pipeline's
//! one-topic-per-surface layout. The manager holds the sending halves and
//! treats every send as best-effort: a disconnected receiver turns the send
//! into a no-op instead of an error, so tearing down one consumer never
//! perturbs the planning loop or the other channels.

use std::sync::mpsc::{channel, Receiver, Sender};

use bp_core::ProcessingTimeRecord;
use bp_module::{MarkerBatch, SteeringFactorBatch, VelocityFactorBatch};

/// Sending halves of every report surface, held by one manager.
pub struct ReportChannels {
    pub info_markers: Sender<MarkerBatch>,
    pub debug_markers: Sender<MarkerBatch>,
    pub virtual_walls: Sender<MarkerBatch>,
    pub drivable_area_markers: Sender<MarkerBatch>,
    pub steering_factors: Sender<SteeringFactorBatch>,
    pub velocity_factors: Sender<VelocityFactorBatch>,
    pub processing_time: Sender<ProcessingTimeRecord>,
}

/// Receiving halves, held by the host's output stage (or by tests).
pub struct ReportReceivers {
    pub info_markers: Receiver<MarkerBatch>,
    pub debug_markers: Receiver<MarkerBatch>,
    pub virtual_walls: Receiver<MarkerBatch>,
    pub drivable_area_markers: Receiver<MarkerBatch>,
    pub steering_factors: Receiver<SteeringFactorBatch>,
    pub velocity_factors: Receiver<VelocityFactorBatch>,
    pub processing_time: Receiver<ProcessingTimeRecord>,
}

impl ReportChannels {
    /// Create every pipe pair at once.
    pub fn create() -> (ReportChannels, ReportReceivers) {
        let (info_tx, info_rx) = channel();
        let (debug_tx, debug_rx) = channel();
        let (walls_tx, walls_rx) = channel();
        let (drivable_tx, drivable_rx) = channel();
        let (steer_tx, steer_rx) = channel();
        let (vel_tx, vel_rx) = channel();
        let (time_tx, time_rx) = channel();

        (
            ReportChannels {
                info_markers: info_tx,
                debug_markers: debug_tx,
                virtual_walls: walls_tx,
                drivable_area_markers: drivable_tx,
                steering_factors: steer_tx,
                velocity_factors: vel_tx,
                processing_time: time_tx,
            },
            ReportReceivers {
                info_markers: info_rx,
                debug_markers: debug_rx,
                virtual_walls: walls_rx,
                drivable_area_markers: drivable_rx,
                steering_factors: steer_rx,
                velocity_factors: vel_rx,
                processing_time: time_rx,
            },
        )
    }
}
