use std::collections::HashMap;

use ordered_float::NotNan;

use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;

use super::trace_line::TraceLine;

const ANGLE_EPS: f64 = 1e-9;

/// Reassembles cleaned trace lines into closed rings of pivot positions.
///
/// Traversal is greedy: seed with the unused segment whose start lies closest
/// to the origin, then at each vertex take the unused outgoing segment with
/// the smallest clockwise turn relative to the incoming one. A walk ends when
/// it revisits a vertex (the revisited tail is the ring) or dead-ends (the
/// walked segments are discarded). Every segment is consumed at most once,
/// and each walk is bounded by the segment count, so termination is provable.
///
/// Two-vertex rings are kept deliberately: a corridor of exactly part width
/// collapses the feasible region to a line, and an exact-fit placement lives
/// on such a ring.
pub fn reconstruct_rings(segments: &[TraceLine]) -> Vec<Vec<Point>> {
    let n = segments.len();
    let mut outgoing: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        outgoing.entry(key(seg.start)).or_default().push(i);
    }

    let mut used = vec![false; n];
    let mut rings = vec![];

    loop {
        let seed = (0..n).filter(|&i| !used[i]).min_by_key(|&i| {
            NotNan::new(segments[i].start.sq_distance_to_origin()).expect("trace length is NaN")
        });
        let Some(seed) = seed else {
            break;
        };
        used[seed] = true;

        let mut verts = vec![key(segments[seed].start)];
        let mut incoming = seed;
        let mut closed = None;
        for _ in 0..=n {
            let at = key(segments[incoming].end);
            if let Some(pos) = verts.iter().position(|&v| v == at) {
                closed = Some(pos);
                break;
            }
            verts.push(at);

            let in_angle = trace_angle(&segments[incoming]);
            let next = outgoing
                .get(&at)
                .into_iter()
                .flatten()
                .filter(|&&j| !used[j])
                .min_by_key(|&&j| {
                    NotNan::new(clockwise_turn(in_angle, trace_angle(&segments[j])))
                        .expect("turn angle is NaN")
                });
            match next {
                Some(&j) => {
                    used[j] = true;
                    incoming = j;
                }
                None => break,
            }
        }

        if let Some(pos) = closed {
            let ring: Vec<Point> = verts[pos..]
                .iter()
                .map(|&(x, y)| Point(x as f64, y as f64))
                .collect();
            if ring.len() >= 2 {
                rings.push(ring);
            }
        }
    }
    rings
}

/// The ring point nearest the origin, the placement candidate for this ring.
/// Projects the origin onto every ring edge, so the result may lie mid-edge.
pub fn closest_ring_point(ring: &[Point]) -> Option<Point> {
    let origin = Point(0.0, 0.0);
    ring.iter()
        .enumerate()
        .map(|(i, &a)| {
            let b = ring[(i + 1) % ring.len()];
            match Edge::new(a, b) {
                Ok(e) => e.closest_point_on_edge(&origin),
                Err(_) => a,
            }
        })
        .min_by_key(|p| NotNan::new(p.sq_distance_to_origin()).expect("distance is NaN"))
}

fn key(p: Point) -> (i64, i64) {
    (p.0.round() as i64, p.1.round() as i64)
}

fn trace_angle(t: &TraceLine) -> f64 {
    (t.end.1 - t.start.1)
        .atan2(t.end.0 - t.start.0)
        .to_degrees()
        .rem_euclid(360.0)
}

/// Clockwise turn from the incoming to the outgoing direction, in (0, 360].
/// Going straight maps to 360, making it the last resort; a reversal (180)
/// ranks between a right turn and going straight.
fn clockwise_turn(in_angle: f64, out_angle: f64) -> f64 {
    let turn = (in_angle - out_angle).rem_euclid(360.0);
    match turn < ANGLE_EPS {
        true => 360.0,
        false => turn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: (f64, f64), end: (f64, f64)) -> TraceLine {
        TraceLine {
            start: start.into(),
            end: end.into(),
        }
    }

    #[test]
    fn reconstructs_a_plain_rectangle() {
        let segments = vec![
            seg((5.0, 5.0), (25.0, 5.0)),
            seg((25.0, 5.0), (25.0, 25.0)),
            seg((25.0, 25.0), (5.0, 25.0)),
            seg((5.0, 25.0), (5.0, 5.0)),
        ];
        let rings = reconstruct_rings(&segments);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!(rings[0].contains(&Point(25.0, 25.0)));
    }

    #[test]
    fn prefers_the_smallest_clockwise_turn_at_a_junction() {
        //at (10, 5) the walk can go up, straight, or down; down is the
        //tightest clockwise turn and leads to the closing segment
        let segments = vec![
            seg((0.0, 5.0), (10.0, 5.0)),
            seg((10.0, 5.0), (10.0, 10.0)),
            seg((10.0, 5.0), (20.0, 5.0)),
            seg((10.0, 5.0), (10.0, 0.0)),
            seg((10.0, 0.0), (0.0, 0.0)),
            seg((0.0, 0.0), (0.0, 5.0)),
        ];
        let rings = reconstruct_rings(&segments);
        let rect: Vec<(f64, f64)> = rings[0].iter().map(|p| (p.0, p.1)).collect();
        assert!(rect.contains(&(10.0, 0.0)));
        assert!(!rect.contains(&(10.0, 10.0)));
        assert!(!rect.contains(&(20.0, 5.0)));
    }

    #[test]
    fn dead_end_paths_are_discarded() {
        let segments = vec![seg((1.0, 1.0), (5.0, 1.0)), seg((5.0, 1.0), (9.0, 1.0))];
        assert!(reconstruct_rings(&segments).is_empty());
    }

    #[test]
    fn opposing_segments_close_a_two_vertex_ring() {
        let segments = vec![seg((5.0, 5.0), (5.0, 15.0)), seg((5.0, 15.0), (5.0, 5.0))];
        let rings = reconstruct_rings(&segments);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 2);
    }

    #[test]
    fn closest_point_projects_onto_an_edge_interior() {
        let ring = vec![Point(5.0, -10.0), Point(5.0, 10.0)];
        assert_eq!(closest_ring_point(&ring), Some(Point(5.0, 0.0)));
    }
}
