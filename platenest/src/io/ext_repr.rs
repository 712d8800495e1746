//! Wire format of nesting jobs and their solutions.
//! All coordinates are in real (unscaled) units.

use serde::{Deserialize, Serialize};

/// A complete nesting job: the plates to fill and the parts to place.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtJob {
    pub plates: Vec<ExtShape>,
    pub parts: Vec<ExtPart>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPart {
    pub id: u64,
    pub shape: ExtShape,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtShape {
    Rectangle { width: f64, height: f64 },
    Polygon(ExtPolygon),
}

/// An outer ring with optional holes. Rings may repeat the first point as
/// the last; the importer accepts both open and closed forms.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPolygon {
    pub outer: Vec<(f64, f64)>,
    #[serde(default)]
    pub holes: Vec<Vec<(f64, f64)>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    pub placed: Vec<ExtPlacement>,
    /// Ids of parts that fit on no plate at any rotation
    pub unplaced: Vec<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPlacement {
    pub id: u64,
    /// Final position of the part's rotation pivot
    pub position: (f64, f64),
    /// Rotation in degrees
    pub rotation: f64,
    /// Final transformed outer contour. Includes the configured safety
    /// offset: this is the keep-out footprint, not the input shape.
    pub polygon: Vec<(f64, f64)>,
    /// Holes of the placed contour, shrunk by the same safety offset
    #[serde(default)]
    pub holes: Vec<Vec<(f64, f64)>>,
}
