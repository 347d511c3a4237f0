//! CSV report backend.
//!
//! Creates three files in the configured output directory:
//! - `steering_factors.csv`
//! - `velocity_factors.csv`
//! - `virtual_walls.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use bp_module::{MarkerBatch, SteeringFactorBatch, VelocityFactorBatch};

use crate::writer::ReportWriter;
use crate::OutputResult;

/// Writes emitted report batches to three CSV files.
pub struct CsvReportWriter {
    steering: Writer<File>,
    velocity: Writer<File>,
    walls: Writer<File>,
    finished: bool,
}

impl CsvReportWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut steering = Writer::from_path(dir.join("steering_factors.csv"))?;
        steering.write_record(["stamp_ns", "kind", "direction", "x", "y", "distance_m", "detail"])?;

        let mut velocity = Writer::from_path(dir.join("velocity_factors.csv"))?;
        velocity.write_record(["stamp_ns", "kind", "status", "x", "y", "distance_m", "detail"])?;

        let mut walls = Writer::from_path(dir.join("virtual_walls.csv"))?;
        walls.write_record(["stamp_ns", "ns", "id", "x", "y", "text"])?;

        Ok(Self {
            steering,
            velocity,
            walls,
            finished: false,
        })
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_steering_factors(&mut self, batch: &SteeringFactorBatch) -> OutputResult<()> {
        for factor in &batch.factors {
            self.steering.write_record(&[
                batch.stamp.0.to_string(),
                format!("{:?}", factor.kind),
                format!("{:?}", factor.direction),
                factor.pose.x.to_string(),
                factor.pose.y.to_string(),
                factor.distance_m.to_string(),
                factor.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_velocity_factors(&mut self, batch: &VelocityFactorBatch) -> OutputResult<()> {
        for factor in &batch.factors {
            self.velocity.write_record(&[
                batch.stamp.0.to_string(),
                format!("{:?}", factor.kind),
                format!("{:?}", factor.status),
                factor.pose.x.to_string(),
                factor.pose.y.to_string(),
                factor.distance_m.to_string(),
                factor.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_virtual_walls(&mut self, batch: &MarkerBatch) -> OutputResult<()> {
        for marker in &batch.markers {
            self.walls.write_record(&[
                marker.stamp.0.to_string(),
                marker.ns.clone(),
                marker.id.to_string(),
                marker.pose.x.to_string(),
                marker.pose.y.to_string(),
                marker.text.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steering.flush()?;
        self.velocity.flush()?;
        self.walls.flush()?;
        Ok(())
    }
}
