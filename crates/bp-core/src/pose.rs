//! Map-frame pose type used throughout the reporting surfaces.
//!
//! Positions are metres in the local map frame; `yaw` is radians,
//! counter-clockwise from map east. `f64` throughout — these values come
//! straight from the planner and go straight into visualization batches, so
//! there is no storage pressure that would justify narrowing.

/// A position + heading in the map frame.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Heading in radians, CCW from map east.
    pub yaw: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self { x, y, z, yaw }
    }

    /// Planar (xy) Euclidean distance in metres.
    ///
    /// Elevation is deliberately ignored: stop/slow walls are placed on the
    /// road surface and compared along the path projection.
    #[inline]
    pub fn distance_xy(self, other: Pose) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
