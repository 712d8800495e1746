use anyhow::Result;
use anyhow::ensure;
use itertools::Itertools;

use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;

/// Scales all coordinates by `accuracy` and rounds them to integer values.
///
/// Every polygon entering a boolean geometry operation must pass through here
/// first; [`unscale`] maps results back to real coordinates.
pub fn scale(poly: &Polygon, accuracy: f64) -> Result<Polygon> {
    ensure!(accuracy > 0.0, "accuracy must be positive: {accuracy}");
    Polygon::new(
        poly.points
            .iter()
            .map(|p| Point((p.0 * accuracy).round(), (p.1 * accuracy).round()))
            .collect(),
    )
}

pub fn unscale(poly: &Polygon, accuracy: f64) -> Result<Polygon> {
    ensure!(accuracy > 0.0, "accuracy must be positive: {accuracy}");
    Polygon::new(
        poly.points
            .iter()
            .map(|p| Point(p.0 / accuracy, p.1 / accuracy))
            .collect(),
    )
}

pub fn unscale_point(p: Point, accuracy: f64) -> Point {
    Point(p.0 / accuracy, p.1 / accuracy)
}

/// Snaps a point onto the grid with cell size `resolution`.
#[inline]
fn snap(p: Point, resolution: f64) -> Point {
    Point(
        (p.0 / resolution).round() * resolution,
        (p.1 / resolution).round() * resolution,
    )
}

/// Replaces every oblique edge of the ring with axis-aligned micro-steps on a
/// grid with cell size `resolution` (staircase / Manhattan quantization).
///
/// All vertices of the result lie on the grid and every edge is horizontal or
/// vertical. Quantizing an already-quantized ring at the same resolution is a
/// no-op.
pub fn staircase(poly: &Polygon, resolution: f64) -> Result<Polygon> {
    ensure!(resolution > 0.0, "resolution must be positive: {resolution}");

    let snapped = poly
        .points
        .iter()
        .map(|&p| snap(p, resolution))
        .coalesce(|a, b| if a == b { Ok(a) } else { Err((a, b)) })
        .collect_vec();

    let mut out: Vec<Point> = Vec::with_capacity(snapped.len());
    for i in 0..snapped.len() {
        let a = snapped[i];
        let b = snapped[(i + 1) % snapped.len()];
        out.push(a);
        if a == b || a.0 == b.0 || a.1 == b.1 {
            continue; //already axis-aligned
        }
        //oblique: march along the segment and snap intermediate samples
        let n_steps = ((b.0 - a.0).abs() / resolution)
            .max((b.1 - a.1).abs() / resolution)
            .round() as usize;
        let mut prev = a;
        for k in 1..=n_steps {
            let t = k as f64 / n_steps as f64;
            let s = snap(Point(a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)), resolution);
            if s == prev {
                continue;
            }
            if s.0 != prev.0 && s.1 != prev.1 {
                //diagonal step, insert the L-corner
                out.push(Point(s.0, prev.1));
            }
            out.push(s);
            prev = s;
        }
        if prev.0 != b.0 && prev.1 != b.1 {
            out.push(Point(b.0, prev.1));
        }
    }

    Polygon::new(collapse_collinear(&out))
}

/// Removes exactly-collinear (and duplicate) vertices from a closed ring.
pub fn collapse_collinear(points: &[Point]) -> Vec<Point> {
    fn collinear(a: Point, b: Point, c: Point) -> bool {
        (b.0 - a.0) * (c.1 - b.1) - (b.1 - a.1) * (c.0 - b.0) == 0.0
    }

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() == Some(&p) {
            continue;
        }
        out.push(p);
        while out.len() >= 3 && collinear(out[out.len() - 3], out[out.len() - 2], out[out.len() - 1])
        {
            out.remove(out.len() - 2);
        }
    }
    //the ring wraps around, the junctions at both ends still need collapsing
    loop {
        let n = out.len();
        if n < 3 {
            break;
        }
        if out[n - 1] == out[0] {
            out.pop();
        } else if collinear(out[n - 2], out[n - 1], out[0]) {
            out.remove(n - 1);
        } else if collinear(out[n - 1], out[0], out[1]) {
            out.remove(0);
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&p| p.into()).collect()).unwrap()
    }

    #[test]
    fn scaling_rounds_to_integers() {
        let p = poly(&[(0.004, 0.0), (1.002, 0.0), (1.002, 0.998), (0.004, 0.998)]);
        let scaled = scale(&p, 100.0).unwrap();
        for v in &scaled.points {
            assert_eq!(v.0, v.0.round());
            assert_eq!(v.1, v.1.round());
        }
        let back = unscale(&scaled, 100.0).unwrap();
        assert!((back.area - p.area).abs() / p.area < 0.05);
    }

    #[test]
    fn staircase_of_axis_aligned_ring_is_identity() {
        let p = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let q = staircase(&p, 1.0).unwrap();
        assert_eq!(q.points, p.points);
    }

    #[test]
    fn staircase_is_idempotent() {
        let p = poly(&[(0.0, 0.0), (13.0, 0.0), (4.0, 9.0)]);
        let once = staircase(&p, 2.0).unwrap();
        let twice = staircase(&once, 2.0).unwrap();
        assert_eq!(once.points, twice.points);
    }

    #[test]
    fn oblique_edges_become_axis_aligned(){
        let p = poly(&[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0)]);
        let q = staircase(&p, 1.0).unwrap();
        for e in q.edge_iter() {
            assert!(e.start.0 == e.end.0 || e.start.1 == e.end.1, "oblique edge {e:?}");
        }
        //the staircase stays close to the original diagonal
        assert!((q.area - p.area).abs() <= 8.0);
    }

    #[test]
    fn collinear_runs_are_collapsed() {
        let pts: Vec<Point> = [(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
            .iter()
            .map(|&p| p.into())
            .collect();
        let collapsed = collapse_collinear(&pts);
        assert_eq!(collapsed.len(), 4);
    }
}
