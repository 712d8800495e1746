use serde::{Deserialize, Serialize};

/// Tuning parameters of the nesting engine.
///
/// All lengths are in the real (unscaled) units of the input polygons.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NestConfig {
    /// Rotation search step in degrees. 360 disables the rotation search
    /// entirely (position-only placement at 0°).
    pub rotation_step: f64,
    /// Tolerance for removing near-collinear vertices during preprocessing.
    /// 0 disables simplification.
    pub simplify_tolerance: f64,
    /// Fixed-point scale factor: coordinates are multiplied by this and
    /// rounded to integers before any boolean geometry operation.
    pub accuracy: f64,
    /// Safety offset by which every part is inflated, keeping placed parts
    /// apart by at least twice this distance.
    pub offset: f64,
    /// Resolution of the staircase quantization applied to all contours
    /// entering the trace-line search.
    pub limit_edge: f64,
    /// Derived plates with less area than this are discarded.
    pub min_plate_area: f64,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            rotation_step: 90.0,
            simplify_tolerance: 0.05,
            accuracy: 100.0,
            offset: 0.5,
            limit_edge: 1.0,
            min_plate_area: 1.0,
        }
    }
}

impl NestConfig {
    /// Staircase resolution in scaled (integer) units, at least one unit.
    pub fn limit_edge_scaled(&self) -> f64 {
        (self.limit_edge * self.accuracy).round().max(1.0)
    }

    /// Keep-out margin used to clean slivers off derived plates, in scaled units.
    pub fn keepout_margin_scaled(&self) -> f64 {
        match self.offset > 0.0 {
            true => (self.offset * self.accuracy).round().max(1.0),
            false => self.limit_edge_scaled(),
        }
    }

    /// Leftover-area threshold below which a candidate position counts as
    /// fully contained, in scaled units. A fraction of one staircase cell.
    pub fn containment_tolerance_scaled(&self) -> f64 {
        0.1 * self.limit_edge_scaled().powi(2)
    }

    /// Minimum area of a derived plate in scaled units.
    pub fn min_plate_area_scaled(&self) -> f64 {
        self.min_plate_area * self.accuracy * self.accuracy
    }
}
