//! Estimate Types
//!
//! [`Pose`] is the estimator's working result in radians and centimetres.
//! [`RangeBearingEstimate`] is what consumers see: compact integer units
//! matching what the rest of the firmware stores and transmits.

use crate::photometric::{deg_to_rad, pretty_angle, rad_to_deg};

/// Relative pose of another robot, receiver frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Direction towards the other robot (rad)
    pub bearing: f32,
    /// Orientation of the other robot (rad)
    pub heading: f32,
    /// Single-cell range guess (cm)
    pub initial_range: f32,
    /// Neighbourhood-averaged range (cm)
    pub range: f32,
}

/// Published range-and-bearing measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeBearingEstimate {
    /// Robot whose broadcast produced this measurement
    pub source_id: u16,
    /// Centre-to-centre distance (mm)
    pub range_mm: u16,
    /// Bearing towards the source, degrees in `(-180, 180]`
    pub bearing_deg: i16,
    /// Heading of the source, degrees in `(-180, 180]`
    pub heading_deg: i16,
    /// Trust score, higher is better
    pub confidence: u8,
}

impl RangeBearingEstimate {
    /// Quantise a pose for publication.
    ///
    /// Range is converted to millimetres and saturates at `u16::MAX`; angles
    /// are rounded to whole degrees; confidence saturates into `u8`.
    pub fn from_pose(source_id: u16, range_cm: f32, bearing: f32, heading: f32, confidence: f32) -> Self {
        Self {
            source_id,
            range_mm: libm::roundf(range_cm * 10.0) as u16,
            bearing_deg: whole_degrees(bearing),
            heading_deg: whole_degrees(heading),
            confidence: libm::roundf(confidence) as u8,
        }
    }

    /// Range in centimetres.
    pub fn range_cm(&self) -> f32 {
        self.range_mm as f32 / 10.0
    }

    /// Bearing in radians.
    pub fn bearing_rad(&self) -> f32 {
        deg_to_rad(self.bearing_deg as f32)
    }

    /// Heading in radians.
    pub fn heading_rad(&self) -> f32 {
        deg_to_rad(self.heading_deg as f32)
    }
}

fn whole_degrees(angle: f32) -> i16 {
    let deg = libm::roundf(rad_to_deg(pretty_angle(angle))) as i16;
    // -180 and 180 are the same direction
    if deg == -180 { 180 } else { deg }
}
