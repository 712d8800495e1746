use anyhow::Result;
use itertools::Itertools;

use crate::boolops::Region;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;
use crate::geometry::quantize;
use crate::geometry::simplification::simplify_polygon;
use crate::util::NestConfig;

/// A free region on which parts can be placed.
///
/// Initial plates come from the caller; each successful placement consumes a
/// plate and replaces it with zero or more smaller derived plates. Plates are
/// never merged. Geometry is accuracy-scaled and staircase-quantized, so all
/// boundary edges are axis-aligned.
#[derive(Clone, Debug)]
pub struct Plate {
    pub region: Region,
    area: f64,
}

impl Plate {
    /// Builds the initial plate from a caller-supplied boundary.
    pub fn from_seed(boundary: &Polygon, config: &NestConfig) -> Result<Plate> {
        let simplified = simplify_polygon(boundary, config.simplify_tolerance);
        let scaled = quantize::scale(&simplified, config.accuracy)?;
        let quantized = quantize::staircase(&scaled, config.limit_edge_scaled())?;
        Ok(Plate::from_region(Region::simple(quantized)))
    }

    /// Wraps a derived region produced by the boolean backend, re-quantizing
    /// it onto the staircase grid. Returns `None` when the outer ring
    /// degenerates at this resolution.
    pub fn from_derived(region: &Region, config: &NestConfig) -> Option<Plate> {
        let resolution = config.limit_edge_scaled();
        let outer = quantize::staircase(&region.outer, resolution).ok()?;
        let holes = region
            .holes
            .iter()
            .filter_map(|h| quantize::staircase(h, resolution).ok())
            .collect_vec();
        Some(Plate::from_region(Region::new(outer, holes)))
    }

    fn from_region(region: Region) -> Plate {
        let area = region.area();
        Plate { region, area }
    }

    /// Usable area in scaled units (outer minus holes).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Boundary rings oriented with the free area on the left-hand side:
    /// the outer ring counter-clockwise, hole rings clockwise. Trace-line
    /// generation treats all of them uniformly as contact geometry.
    pub fn contact_rings(&self) -> impl Iterator<Item = Vec<Point>> + '_ {
        let outer = std::iter::once(self.region.outer.points.clone());
        let holes = self
            .region
            .holes
            .iter()
            .map(|h| h.points.iter().rev().copied().collect_vec());
        outer.chain(holes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_plate_is_scaled_and_quantized() {
        let config = NestConfig::default();
        let boundary = Polygon::new(vec![
            Point(0.0, 0.0),
            Point(30.0, 0.0),
            Point(30.0, 30.0),
            Point(0.0, 30.0),
        ])
        .unwrap();
        let plate = Plate::from_seed(&boundary, &config).unwrap();
        let expected = (30.0 * config.accuracy).powi(2);
        assert_eq!(plate.area(), expected);
        for e in plate.region.outer.edge_iter() {
            assert!(e.start.0 == e.end.0 || e.start.1 == e.end.1);
        }
    }

    #[test]
    fn hole_rings_are_listed_clockwise() {
        let outer = Polygon::new(vec![
            Point(0.0, 0.0),
            Point(100.0, 0.0),
            Point(100.0, 100.0),
            Point(0.0, 100.0),
        ])
        .unwrap();
        let hole = Polygon::new(vec![
            Point(40.0, 40.0),
            Point(60.0, 40.0),
            Point(60.0, 60.0),
            Point(40.0, 60.0),
        ])
        .unwrap();
        let plate = Plate::from_region(Region::new(outer, vec![hole]));
        let rings = plate.contact_rings().collect_vec();
        assert_eq!(rings.len(), 2);
        assert!(Polygon::calculate_area(&rings[0]) > 0.0);
        assert!(Polygon::calculate_area(&rings[1]) < 0.0);
    }
}
