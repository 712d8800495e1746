use anyhow::Result;
use anyhow::ensure;
use itertools::Itertools;

use crate::geometry::geo_traits::{CollidesWith, Shape};
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Rect;

/// An ordered, closed ring of [`Point`]s.
///
/// Winding is normalized on construction: vertices are always stored
/// counter-clockwise, so `area` is positive. Consecutive duplicate vertices
/// (including a repeated closing vertex) are removed; collinear vertices and
/// non-consecutive duplicates are allowed, as both occur in staircase-quantized
/// and bridged contours.
#[derive(Clone, Debug)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub bbox: Rect,
    pub area: f64,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let mut points = points
            .into_iter()
            .coalesce(|a, b| if a == b { Ok(a) } else { Err((a, b)) })
            .collect_vec();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        ensure!(points.len() >= 3, "polygon needs at least 3 points: {points:?}");

        let area = match Polygon::calculate_area(&points) {
            a if a == 0.0 => anyhow::bail!("polygon has no area: {points:?}"),
            a if a < 0.0 => {
                //normalize to counter-clockwise
                points.reverse();
                -a
            }
            a => a,
        };
        let bbox = Rect::from_points(&points)?;

        Ok(Polygon { points, bbox, area })
    }

    /// Shoelace formula: counter-clockwise = positive, clockwise = negative.
    pub fn calculate_area(points: &[Point]) -> f64 {
        let mut sigma = 0.0;
        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();
            sigma += (y_i + y_j) * (x_i - x_j);
        }
        0.5 * sigma
    }

    pub fn n_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.points[i]
    }

    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_vertices();
        Edge {
            start: self.points[i],
            end: self.points[j],
        }
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_vertices()).map(move |i| self.edge(i))
    }

    pub fn translated(&self, offset: (f64, f64)) -> Result<Polygon> {
        Polygon::new(self.points.iter().map(|p| p.translated(offset)).collect())
    }

    pub fn rotated_around(&self, pivot: Point, angle_rad: f64) -> Result<Polygon> {
        Polygon::new(
            self.points
                .iter()
                .map(|p| p.rotated_around(pivot, angle_rad))
                .collect(),
        )
    }
}

impl Shape for Polygon {
    fn centroid(&self) -> Point {
        //https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let mut c_x = 0.0;
        let mut c_y = 0.0;
        for i in 0..self.n_vertices() {
            let j = (i + 1) % self.n_vertices();
            let Point(x_i, y_i) = self.points[i];
            let Point(x_j, y_j) = self.points[j];
            let cross = x_i * y_j - x_j * y_i;
            c_x += (x_i + x_j) * cross;
            c_y += (y_i + y_j) * cross;
        }
        Point(c_x / (6.0 * self.area), c_y / (6.0 * self.area))
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }
}

impl CollidesWith<Point> for Polygon {
    fn collides_with(&self, point: &Point) -> bool {
        //ray casting: https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
        if !self.bbox.collides_with(point) {
            return false;
        }
        let Point(px, py) = *point;
        let mut inside = false;
        for edge in self.edge_iter() {
            let Point(x1, y1) = edge.start;
            let Point(x2, y2) = edge.end;
            //horizontal ray to the right, counting crossings of the half-open edge span
            if (y1 > py) != (y2 > py) {
                let x_at_ray = x1 + (py - y1) / (y2 - y1) * (x2 - x1);
                if px < x_at_ray {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn unit_square() -> Vec<Point> {
        vec![
            Point(0.0, 0.0),
            Point(1.0, 0.0),
            Point(1.0, 1.0),
            Point(0.0, 1.0),
        ]
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let mut cw = unit_square();
        cw.reverse();
        let poly = Polygon::new(cw).unwrap();
        assert!(poly.area > 0.0);
        assert!(approx_eq!(f64, poly.area, 1.0));
    }

    #[test]
    fn closing_vertex_is_dropped() {
        let mut points = unit_square();
        points.push(Point(0.0, 0.0));
        let poly = Polygon::new(points).unwrap();
        assert_eq!(poly.n_vertices(), 4);
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(Polygon::new(vec![Point(0.0, 0.0), Point(1.0, 0.0)]).is_err());
        //collinear ring spans no area
        assert!(Polygon::new(vec![Point(0.0, 0.0), Point(1.0, 0.0), Point(2.0, 0.0)]).is_err());
    }

    #[test]
    fn centroid_of_square() {
        let poly = Polygon::new(unit_square()).unwrap();
        let c = poly.centroid();
        assert!(approx_eq!(f64, c.0, 0.5));
        assert!(approx_eq!(f64, c.1, 0.5));
    }

    #[test]
    fn point_containment() {
        let poly = Polygon::new(unit_square()).unwrap();
        assert!(poly.collides_with(&Point(0.5, 0.5)));
        assert!(!poly.collides_with(&Point(1.5, 0.5)));
    }
}
