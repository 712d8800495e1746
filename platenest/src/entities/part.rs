use anyhow::Result;
use ordered_float::NotNan;

use crate::boolops::{BoolOps, JoinStyle, Region};
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;
use crate::geometry::quantize;
use crate::geometry::simplification::simplify_polygon;
use crate::util::NestConfig;

/// A shape to be placed: one outer contour plus optional holes.
///
/// Created once and preprocessed in the constructor; mutated exactly once on a
/// successful placement. An unplaced part keeps its pre-placement state.
#[derive(Clone, Debug)]
pub struct Part {
    /// Opaque identifier supplied by the caller
    pub id: u64,
    /// Contours exactly as supplied by the caller, real coordinates
    pub outer_orig: Polygon,
    pub holes_orig: Vec<Polygon>,
    /// Search contours: simplified, inflated by the safety offset,
    /// accuracy-scaled and centered so the rotation pivot (the rounded
    /// centroid) sits at the origin
    pub outer_search: Polygon,
    pub holes_search: Vec<Polygon>,
    pub state: PlacementState,
}

/// Explicit placement status; an unplaceable part is surfaced, never dropped.
#[derive(Clone, Debug)]
pub enum PlacementState {
    /// Not yet attempted
    Pending,
    Placed(Placement),
    /// Attempted on every plate and rotation without success
    Unplaceable,
}

/// The committed result for a placed part, in real coordinates.
#[derive(Clone, Debug)]
pub struct Placement {
    /// Final position of the rotation pivot
    pub position: Point,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Final transformed search contour: the simplified outline inflated by
    /// the safety offset, not the contour the caller supplied. It is the
    /// keep-out footprint of the part; re-applying the offset to it would
    /// double the clearance.
    pub outer: Polygon,
    /// Holes of the search contour, shrunk by the same safety offset
    pub holes: Vec<Polygon>,
}

impl Part {
    pub fn new(
        id: u64,
        outer: Polygon,
        holes: Vec<Polygon>,
        config: &NestConfig,
        backend: &impl BoolOps,
    ) -> Result<Part> {
        let simplified = Region::new(
            simplify_polygon(&outer, config.simplify_tolerance),
            holes
                .iter()
                .map(|h| simplify_polygon(h, config.simplify_tolerance))
                .collect(),
        );

        //scale first so the offset operation also runs on integer coordinates
        let scaled = scale_region(&simplified, config.accuracy)?;

        let inflated = match config.offset > 0.0 {
            true => {
                let delta = config.offset * config.accuracy;
                backend
                    .offset(&scaled, delta, JoinStyle::Miter)
                    .into_iter()
                    .max_by_key(|r| NotNan::new(r.area()).expect("region area is NaN"))
                    .unwrap_or(scaled)
            }
            false => scaled,
        };
        //the offset backend works in floats, re-round onto the integer grid
        let rounded = scale_region(&inflated, 1.0)?;

        //center the search contours on the rotation pivot
        let c = rounded.outer.centroid();
        let pivot = (-c.0.round(), -c.1.round());
        let outer_search = rounded.outer.translated(pivot)?;
        let holes_search = rounded
            .holes
            .iter()
            .filter_map(|h| h.translated(pivot).ok())
            .collect();

        Ok(Part {
            id,
            outer_orig: outer,
            holes_orig: holes,
            outer_search,
            holes_search,
            state: PlacementState::Pending,
        })
    }

    /// Area of the search contour in scaled units, the key for placement
    /// ordering and the plate feasibility pre-check.
    pub fn area(&self) -> f64 {
        self.outer_search.area
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, PlacementState::Placed(_))
    }
}

fn scale_region(region: &Region, accuracy: f64) -> Result<Region> {
    Ok(Region::new(
        quantize::scale(&region.outer, accuracy)?,
        region
            .holes
            .iter()
            .filter_map(|h| quantize::scale(h, accuracy).ok())
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolops::GeoBackend;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point(0.0, 0.0),
            Point(size, 0.0),
            Point(size, size),
            Point(0.0, size),
        ])
        .unwrap()
    }

    #[test]
    fn search_contour_is_centered_and_integer_valued() {
        let config = NestConfig {
            offset: 0.0,
            simplify_tolerance: 0.0,
            ..NestConfig::default()
        };
        let part = Part::new(7, square(10.0), vec![], &config, &GeoBackend).unwrap();

        let c = part.outer_search.centroid();
        assert!(c.0.abs() < 1.0 && c.1.abs() < 1.0);
        for v in &part.outer_search.points {
            assert_eq!(v.0, v.0.round());
            assert_eq!(v.1, v.1.round());
        }
        assert!(matches!(part.state, PlacementState::Pending));
    }

    #[test]
    fn safety_offset_keeps_the_part_holes() {
        let config = NestConfig {
            offset: 1.0,
            simplify_tolerance: 0.0,
            accuracy: 1.0,
            ..NestConfig::default()
        };
        let hole = Polygon::new(vec![
            Point(40.0, 40.0),
            Point(160.0, 40.0),
            Point(160.0, 160.0),
            Point(40.0, 160.0),
        ])
        .unwrap();
        let part = Part::new(3, square(200.0), vec![hole], &config, &GeoBackend).unwrap();

        //the outer contour grows by the offset while the hole shrinks by it
        assert_eq!(part.holes_search.len(), 1);
        assert_eq!(part.outer_search.area, 202.0 * 202.0);
        assert_eq!(part.holes_search[0].area, 118.0 * 118.0);
    }

    #[test]
    fn safety_offset_inflates_the_search_contour() {
        let config = NestConfig {
            offset: 1.0,
            simplify_tolerance: 0.0,
            ..NestConfig::default()
        };
        let part = Part::new(0, square(10.0), vec![], &config, &GeoBackend).unwrap();
        let plain_area = (10.0 * config.accuracy).powi(2);
        assert!(part.area() > plain_area);
    }
}
