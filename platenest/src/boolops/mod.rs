mod geo_backend;

#[doc(inline)]
pub use geo_backend::GeoBackend;

use crate::geometry::primitives::Polygon;

/// A polygon with holes: the unit of exchange with the boolean-operations
/// backend. All rings are stored counter-clockwise; hole semantics are carried
/// structurally rather than by winding.
#[derive(Clone, Debug)]
pub struct Region {
    pub outer: Polygon,
    pub holes: Vec<Polygon>,
}

impl Region {
    pub fn simple(outer: Polygon) -> Self {
        Region {
            outer,
            holes: vec![],
        }
    }

    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        Region { outer, holes }
    }

    /// Area of the outer ring minus the area of the holes.
    pub fn area(&self) -> f64 {
        self.outer.area - self.holes.iter().map(|h| h.area).sum::<f64>()
    }
}

/// Join style used when offsetting a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStyle {
    Miter,
    Round,
}

/// The polygon boolean-operations capability the nesting engine is built on.
///
/// Implementations may assume inputs are valid and non-self-intersecting;
/// the engine feeds exclusively integer-valued (accuracy-scaled) coordinates.
pub trait BoolOps {
    /// Union of many regions into a set of disjoint regions.
    fn union(&self, regions: &[Region]) -> Vec<Region>;

    /// The area of `subject` not covered by `clip`.
    fn difference(&self, subject: &Region, clip: &Region) -> Vec<Region>;

    fn intersection(&self, a: &Region, b: &Region) -> Vec<Region>;

    /// Signed offset: positive `delta` inflates the region, negative deflates.
    /// Deflating may split a region; the result can be empty.
    fn offset(&self, region: &Region, delta: f64, join: JoinStyle) -> Vec<Region>;
}

/// Summed area of a set of regions.
pub fn total_area(regions: &[Region]) -> f64 {
    regions.iter().map(Region::area).sum()
}
