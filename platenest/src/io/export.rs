use itertools::Itertools;

use crate::entities::{Part, PlacementState};

use super::ext_repr::{ExtPlacement, ExtSolution};

/// Builds the external solution from a finished run. Every part shows up
/// exactly once, either placed or listed as unplaced.
pub fn build_solution(parts: &[Part]) -> ExtSolution {
    let placed = parts
        .iter()
        .filter_map(|part| match &part.state {
            PlacementState::Placed(p) => Some(ExtPlacement {
                id: part.id,
                position: (p.position.0, p.position.1),
                rotation: p.rotation,
                polygon: p.outer.points.iter().map(|v| (v.0, v.1)).collect(),
                holes: p
                    .holes
                    .iter()
                    .map(|h| h.points.iter().map(|v| (v.0, v.1)).collect())
                    .collect(),
            }),
            _ => None,
        })
        .collect_vec();
    let unplaced = parts
        .iter()
        .filter(|part| !part.is_placed())
        .map(|part| part.id)
        .collect_vec();
    ExtSolution { placed, unplaced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolops::GeoBackend;
    use crate::entities::Placement;
    use crate::geometry::primitives::{Point, Polygon};
    use crate::util::NestConfig;

    fn part(id: u64) -> Part {
        let outer = Polygon::new(vec![
            Point(0.0, 0.0),
            Point(4.0, 0.0),
            Point(4.0, 4.0),
            Point(0.0, 4.0),
        ])
        .unwrap();
        Part::new(id, outer, vec![], &NestConfig::default(), &GeoBackend).unwrap()
    }

    #[test]
    fn every_part_appears_exactly_once() {
        let hole = Polygon::new(vec![
            Point(1.0, 1.0),
            Point(3.0, 1.0),
            Point(3.0, 3.0),
            Point(1.0, 3.0),
        ])
        .unwrap();
        let mut placed = part(1);
        placed.state = PlacementState::Placed(Placement {
            position: Point(2.0, 2.0),
            rotation: 0.0,
            outer: placed.outer_orig.clone(),
            holes: vec![hole],
        });
        let stuck = part(2);

        let solution = build_solution(&[placed, stuck]);
        assert_eq!(solution.placed.len(), 1);
        assert_eq!(solution.placed[0].id, 1);
        assert_eq!(solution.placed[0].holes.len(), 1);
        assert_eq!(solution.unplaced, vec![2]);
    }
}
