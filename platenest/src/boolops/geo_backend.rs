use geo::BooleanOps;
use geo_types::{Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use itertools::Itertools;

use crate::boolops::{BoolOps, JoinStyle, Region};
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;

/// Default boolean-operations backend, implemented over the `geo` ecosystem:
/// clipping via [`geo::BooleanOps`], offsetting via the straight-skeleton
/// buffers of `geo-buffer`.
///
/// This is the single place where the internal [`Polygon`] representation is
/// adapted to `geo_types` and back.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoBackend;

fn ring_to_geo(poly: &Polygon) -> LineString<f64> {
    LineString::from(
        poly.points
            .iter()
            .map(|p| Coord { x: p.0, y: p.1 })
            .collect_vec(),
    )
}

fn region_to_geo(region: &Region) -> GeoPolygon<f64> {
    GeoPolygon::new(
        ring_to_geo(&region.outer),
        region.holes.iter().map(ring_to_geo).collect(),
    )
}

fn region_to_multi(region: &Region) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![region_to_geo(region)])
}

fn ring_from_geo(ring: &LineString<f64>) -> Option<Polygon> {
    //the closing vertex is implicit internally; degenerate rings are dropped
    //rather than propagated (slivers of boolean output, not errors)
    Polygon::new(ring.coords().map(|c| Point(c.x, c.y)).collect()).ok()
}

fn regions_from_multi(multi: &MultiPolygon<f64>) -> Vec<Region> {
    multi
        .iter()
        .filter_map(|poly| {
            let outer = ring_from_geo(poly.exterior())?;
            let holes = poly.interiors().iter().filter_map(ring_from_geo).collect();
            Some(Region::new(outer, holes))
        })
        .collect()
}

impl BoolOps for GeoBackend {
    fn union(&self, regions: &[Region]) -> Vec<Region> {
        let Some((first, rest)) = regions.split_first() else {
            return vec![];
        };
        let mut acc = region_to_multi(first);
        for region in rest {
            acc = acc.union(&region_to_multi(region));
        }
        regions_from_multi(&acc)
    }

    fn difference(&self, subject: &Region, clip: &Region) -> Vec<Region> {
        regions_from_multi(&region_to_multi(subject).difference(&region_to_multi(clip)))
    }

    fn intersection(&self, a: &Region, b: &Region) -> Vec<Region> {
        regions_from_multi(&region_to_multi(a).intersection(&region_to_multi(b)))
    }

    fn offset(&self, region: &Region, delta: f64, join: JoinStyle) -> Vec<Region> {
        if delta == 0.0 {
            return vec![region.clone()];
        }
        //geo-buffer reads hole semantics from ring winding, which the
        //internal representation does not carry. Buffer every ring as a
        //simple polygon instead, with the sign flipped for holes (inflating
        //a region shrinks its holes), and let the clipper re-nest the output.
        let buffer = |ring: &Polygon, d: f64| {
            let poly = GeoPolygon::new(ring_to_geo(ring), vec![]);
            match join {
                JoinStyle::Miter => geo_buffer::buffer_polygon(&poly, d),
                JoinStyle::Round => geo_buffer::buffer_polygon_rounded(&poly, d),
            }
        };
        let mut acc = buffer(&region.outer, delta);
        for hole in &region.holes {
            acc = acc.difference(&buffer(hole, -delta));
        }
        regions_from_multi(&acc)
    }
}
