use std::collections::HashSet;

use crate::entities::Plate;
use crate::geometry::AngleRange;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Polygon;

/// A directed segment of feasible pivot positions for a part against a plate
/// at one fixed rotation. Ephemeral: produced, cleaned, assembled into rings
/// and discarded within a single rotation trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceLine {
    pub start: Point,
    pub end: Point,
}

/// Generates raw trace lines from the two contact types: a part corner
/// sliding along a plate edge, and a plate corner sliding along a part edge.
///
/// Each contact is gated by an angular cone at the corner. A part corner may
/// slide along a plate edge when the edge direction lies between the corner's
/// incoming and outgoing edge angles; a reflex part corner spans 180° or more
/// and is rejected wholesale by [`AngleRange::between`]. A plate corner may
/// carry a part edge when the edge direction lies between the corner's
/// outgoing and incoming edge angles, which only reflex plate corners (as
/// seen from the free area) satisfy: at a convex container corner the part
/// edge would pierce an adjacent wall.
///
/// The part polygon is expected in pivot-centered search coordinates, so each
/// trace point is directly a candidate pivot position.
pub fn build_trace_lines(plate: &Plate, part: &Polygon) -> Vec<TraceLine> {
    let m = part.n_vertices();
    let mut traces = vec![];

    for ring in plate.contact_rings() {
        let n = ring.len();
        if n < 3 {
            continue;
        }

        //part corner c on plate edge a -> b: the pivot travels parallel to
        //the edge, offset by -c
        for ci in 0..m {
            let c = part.vertex(ci);
            let incoming = part.edge((ci + m - 1) % m);
            let outgoing = part.edge(ci);
            let cone = AngleRange::new(incoming.angle_deg(), outgoing.angle_deg());
            for ei in 0..n {
                let (a, b) = (ring[ei], ring[(ei + 1) % n]);
                let Some(angle) = segment_angle(a, b) else {
                    continue;
                };
                if cone.between(angle) {
                    traces.push(TraceLine {
                        start: Point(a.0 - c.0, a.1 - c.1),
                        end: Point(b.0 - c.0, b.1 - c.1),
                    });
                }
            }
        }

        //plate corner q on part edge a -> b: pivot positions run from q - b
        //to q - a, keeping the free area on the left like the plate rings do
        for qi in 0..n {
            let q = ring[qi];
            let prev = ring[(qi + n - 1) % n];
            let next = ring[(qi + 1) % n];
            let (Some(s), Some(t)) = (segment_angle(prev, q), segment_angle(q, next)) else {
                continue;
            };
            let cone = AngleRange::new(t, s);
            for e in part.edge_iter() {
                if cone.between(e.angle_deg()) {
                    traces.push(TraceLine {
                        start: Point(q.0 - e.end.0, q.1 - e.end.1),
                        end: Point(q.0 - e.start.0, q.1 - e.start.1),
                    });
                }
            }
        }
    }
    traces
}

type CellKey = (i64, i64);

fn key(p: Point) -> CellKey {
    (p.0.round() as i64, p.1.round() as i64)
}

/// Splits raw trace lines at every mutual crossing and collinear-overlap
/// endpoint, so the cleaned segments meet only at shared endpoints.
///
/// Only axis-aligned crossings are considered. Both the plate and the rotated
/// part are staircase-quantized before trace generation, so every segment is
/// horizontal or vertical on the integer lattice; an oblique segment would
/// indicate unquantized input and is passed through untouched. Duplicate
/// directed segments are dropped.
pub fn clean_trace_lines(raw: Vec<TraceLine>) -> Vec<TraceLine> {
    let mut seen: HashSet<(CellKey, CellKey)> = HashSet::new();
    let segs: Vec<(CellKey, CellKey)> = raw
        .iter()
        .map(|t| (key(t.start), key(t.end)))
        .filter(|&(a, b)| a != b && seen.insert((a, b)))
        .collect();

    let mut out = vec![];
    let mut emitted: HashSet<(CellKey, CellKey)> = HashSet::new();

    for &(a, b) in &segs {
        if a.0 != b.0 && a.1 != b.1 {
            emit(&mut out, &mut emitted, a, b);
            continue;
        }
        let horizontal = a.1 == b.1;
        let (from, to) = match horizontal {
            true => (a.0, b.0),
            false => (a.1, b.1),
        };
        let fixed = if horizontal { a.1 } else { a.0 };
        let (lo, hi) = (from.min(to), from.max(to));

        let mut cuts: Vec<i64> = vec![];
        for &(c, d) in &segs {
            if (c, d) == (a, b) {
                continue;
            }
            match (horizontal, c.0 == d.0) {
                //horizontal against vertical
                (true, true) => {
                    if (lo..=hi).contains(&c.0) && (c.1.min(d.1)..=c.1.max(d.1)).contains(&fixed) {
                        cuts.push(c.0);
                    }
                }
                //vertical against horizontal
                (false, false) if c.1 == d.1 => {
                    if (lo..=hi).contains(&c.1) && (c.0.min(d.0)..=c.0.max(d.0)).contains(&fixed) {
                        cuts.push(c.1);
                    }
                }
                //collinear overlap: cut at the other segment's endpoints
                (true, false) if c.1 == fixed && d.1 == fixed => {
                    cuts.push(c.0);
                    cuts.push(d.0);
                }
                (false, true) if c.0 == fixed && d.0 == fixed => {
                    cuts.push(c.1);
                    cuts.push(d.1);
                }
                _ => {}
            }
        }

        cuts.retain(|&c| c > lo && c < hi);
        cuts.sort_unstable();
        cuts.dedup();
        if to < from {
            cuts.reverse();
        }

        let mut prev = a;
        for c in cuts {
            let mid = match horizontal {
                true => (c, fixed),
                false => (fixed, c),
            };
            emit(&mut out, &mut emitted, prev, mid);
            prev = mid;
        }
        emit(&mut out, &mut emitted, prev, b);
    }
    out
}

fn emit(
    out: &mut Vec<TraceLine>,
    emitted: &mut HashSet<(CellKey, CellKey)>,
    a: CellKey,
    b: CellKey,
) {
    if a != b && emitted.insert((a, b)) {
        out.push(TraceLine {
            start: Point(a.0 as f64, a.1 as f64),
            end: Point(b.0 as f64, b.1 as f64),
        });
    }
}

fn segment_angle(a: Point, b: Point) -> Option<f64> {
    (a != b).then(|| (b.1 - a.1).atan2(b.0 - a.0).to_degrees().rem_euclid(360.0))
}
