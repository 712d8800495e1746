use anyhow::Result;
use anyhow::ensure;

use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Point;

/// Directed line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn new(start: Point, end: Point) -> Result<Self> {
        ensure!(start != end, "degenerate edge, {start:?} == {end:?}");
        Ok(Edge { start, end })
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction of the edge in degrees, normalized to `[0, 360)`.
    pub fn angle_deg(&self) -> f64 {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        dy.atan2(dx).to_degrees().rem_euclid(360.0)
    }

    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x, y) = point;

        let a = x - x1;
        let b = y - y1;
        let c = x2 - x1;
        let d = y2 - y1;

        let dot = a * c + b * d;
        let len_sq = c * c + d * d;
        let mut param = -1.0;
        if len_sq != 0.0 {
            param = dot / len_sq;
        }
        let (xx, yy) = match param {
            p if p < 0.0 => (x1, y1),              //start is the closest point
            p if p > 1.0 => (x2, y2),              //end is the closest point
            _ => (x1 + param * c, y1 + param * d), //closest point is on the edge
        };

        Point(xx, yy)
    }
}

impl DistanceTo<Point> for Edge {
    #[inline(always)]
    fn distance_to(&self, point: &Point) -> f64 {
        f64::sqrt(self.sq_distance_to(point))
    }

    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        let Point(x, y) = point;
        let Point(xx, yy) = self.closest_point_on_edge(point);

        let (dx, dy) = (x - xx, y - yy);
        dx.powi(2) + dy.powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case((1.0, 0.0), 0.0; "east")]
    #[test_case((0.0, 2.0), 90.0; "north")]
    #[test_case((-3.0, 0.0), 180.0; "west")]
    #[test_case((0.0, -1.0), 270.0; "south")]
    fn angle_of_axis_aligned_edges(end: (f64, f64), expected: f64) {
        let edge = Edge::new(Point(0.0, 0.0), end.into()).unwrap();
        assert_eq!(edge.angle_deg(), expected);
    }

    #[test]
    fn degenerate_edge_is_rejected() {
        assert!(Edge::new(Point(1.0, 1.0), Point(1.0, 1.0)).is_err());
    }

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let edge = Edge::new(Point(0.0, 0.0), Point(10.0, 0.0)).unwrap();
        assert_eq!(edge.closest_point_on_edge(&Point(-5.0, 3.0)), Point(0.0, 0.0));
        assert_eq!(edge.closest_point_on_edge(&Point(4.0, 3.0)), Point(4.0, 0.0));
        assert_eq!(edge.closest_point_on_edge(&Point(12.0, -1.0)), Point(10.0, 0.0));
    }
}
