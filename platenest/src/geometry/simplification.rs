use log::debug;
use ordered_float::NotNan;

use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;

/// Removes near-collinear vertices from a polygon.
///
/// A vertex is eliminated when its perpendicular deviation from the chord
/// between its neighbors stays within `tolerance`. Vertices are removed one at
/// a time, smallest deviation first, until no candidate remains or the ring is
/// down to 4 vertices.
pub fn simplify_polygon(poly: &Polygon, tolerance: f64) -> Polygon {
    if tolerance <= 0.0 {
        return poly.clone();
    }
    let mut points = poly.points.clone();

    while points.len() > 4 {
        let n = points.len();
        let candidate = (0..n)
            .filter_map(|i| {
                let deviation = vertex_deviation(&points, i)?;
                (deviation <= tolerance).then_some((i, deviation))
            })
            .min_by_key(|&(_, d)| NotNan::new(d).expect("deviation is NaN"));

        match candidate {
            Some((i, _)) => {
                points.remove(i);
            }
            None => break,
        }
    }

    match Polygon::new(points) {
        Ok(simplified) => {
            if simplified.n_vertices() < poly.n_vertices() {
                debug!(
                    "[SIMPL] reduced {} to {} vertices, {:.3}% area change",
                    poly.n_vertices(),
                    simplified.n_vertices(),
                    (simplified.area - poly.area) / poly.area * 100.0
                );
            }
            simplified
        }
        //over-aggressive removal collapsed the ring, keep the original
        Err(_) => poly.clone(),
    }
}

fn vertex_deviation(points: &[Point], i: usize) -> Option<f64> {
    let n = points.len() as isize;
    let prev = points[(i as isize - 1).rem_euclid(n) as usize];
    let next = points[(i as isize + 1).rem_euclid(n) as usize];
    let chord = Edge::new(prev, next).ok()?;
    Some(chord.distance_to(&points[i]))
}
