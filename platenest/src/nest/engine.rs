use std::cmp::Reverse;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info, warn};
use ordered_float::NotNan;

use crate::boolops::{BoolOps, JoinStyle, Region, total_area};
use crate::entities::{Part, Placement, PlacementState, Plate};
use crate::geometry::primitives::{Point, Polygon};
use crate::geometry::quantize;
use crate::util::NestConfig;

use super::rings::{closest_ring_point, reconstruct_rings};
use super::trace_line::{build_trace_lines, clean_trace_lines};

const ORIGIN: Point = Point(0.0, 0.0);

/// The nesting engine: places parts one by one onto the available plates.
///
/// Runs synchronously and single-threaded; all state is owned by the engine
/// and mutated in place during [`Nester::run`], which consumes the engine.
pub struct Nester<B: BoolOps> {
    backend: B,
    config: NestConfig,
    parts: Vec<Part>,
    plates: Vec<Plate>,
}

/// The winning position of one rotation sweep, in scaled coordinates.
struct Candidate {
    rotation: f64,
    position: Point,
    /// Staircased outer contour, already translated to `position`
    quantized: Polygon,
}

impl<B: BoolOps> Nester<B> {
    pub fn new(backend: B, config: NestConfig, parts: Vec<Part>, plates: Vec<Plate>) -> Self {
        Nester {
            backend,
            config,
            parts,
            plates,
        }
    }

    /// Runs the placement search to completion and returns all parts, each
    /// either placed or explicitly marked unplaceable.
    ///
    /// Parts are attempted once each, largest first; plates are re-sorted by
    /// area before every part so the largest free region is tried first. The
    /// progress callback receives a fraction in [0, 1] after every part and
    /// runs synchronously in the hot loop, so it must not block.
    pub fn run(mut self, mut progress: impl FnMut(f64)) -> Vec<Part> {
        let order = (0..self.parts.len())
            .sorted_by_cached_key(|&i| {
                Reverse(NotNan::new(self.parts[i].area()).expect("part area is NaN"))
            })
            .collect_vec();
        let total = order.len().max(1);

        for (done, &idx) in order.iter().enumerate() {
            self.plates.sort_by_cached_key(|p| {
                Reverse(NotNan::new(p.area()).expect("plate area is NaN"))
            });

            let part = &self.parts[idx];
            let mut found = None;
            for (plate_idx, plate) in self.plates.iter().enumerate() {
                if plate.area() < part.area() {
                    continue;
                }
                if let Some(candidate) = self.best_candidate(plate, part) {
                    found = Some((plate_idx, candidate));
                    break;
                }
            }

            match found {
                Some((plate_idx, candidate)) => {
                    info!(
                        "[NEST] part {} placed at ({}, {}) rotated {}°",
                        self.parts[idx].id,
                        candidate.position.0,
                        candidate.position.1,
                        candidate.rotation
                    );
                    if let Err(e) = self.commit_placement(idx, plate_idx, candidate) {
                        warn!("[NEST] failed to commit part {}: {e}", self.parts[idx].id);
                        self.parts[idx].state = PlacementState::Unplaceable;
                    }
                }
                None => {
                    warn!("[NEST] part {} fits on no plate", self.parts[idx].id);
                    self.parts[idx].state = PlacementState::Unplaceable;
                }
            }
            progress((done + 1) as f64 / total as f64);
        }
        self.parts
    }

    fn rotation_angles(&self) -> Vec<f64> {
        let step = self.config.rotation_step;
        match step <= 0.0 || step >= 360.0 {
            true => vec![0.0],
            false => {
                let n = (360.0 / step).ceil() as usize;
                (0..n).map(|k| k as f64 * step).collect()
            }
        }
    }

    /// Sweeps the rotation angles against one plate and returns the verified
    /// candidate whose pivot lies closest to the origin, if any.
    ///
    /// A rotation trial that yields no closed ring, or only rings whose
    /// closest point leaves the part sticking out of the plate, is skipped
    /// rather than treated as an error.
    fn best_candidate(&self, plate: &Plate, part: &Part) -> Option<Candidate> {
        let resolution = self.config.limit_edge_scaled();
        let tolerance = self.config.containment_tolerance_scaled();
        let mut best: Option<(NotNan<f64>, Candidate)> = None;

        for angle in self.rotation_angles() {
            let Ok(rotated) = part.outer_search.rotated_around(ORIGIN, angle.to_radians()) else {
                continue;
            };
            //rotation leaves the lattice, re-round before quantizing
            let Ok(rotated) = quantize::scale(&rotated, 1.0) else {
                continue;
            };
            let Ok(stair) = quantize::staircase(&rotated, resolution) else {
                continue;
            };

            let traces = clean_trace_lines(build_trace_lines(plate, &stair));
            let rings = reconstruct_rings(&traces);
            debug!(
                "[NFP] angle {angle}°: {} trace lines, {} rings",
                traces.len(),
                rings.len()
            );

            for ring in &rings {
                let Some(p) = closest_ring_point(ring) else {
                    continue;
                };
                let p = Point(p.0.round(), p.1.round());
                let dist = NotNan::new(p.sq_distance_to_origin()).expect("distance is NaN");
                if best.as_ref().is_some_and(|(d, _)| dist >= *d) {
                    continue;
                }
                let Ok(placed) = stair.translated((p.0, p.1)) else {
                    continue;
                };
                let leftover =
                    total_area(&self.backend.difference(&Region::simple(placed.clone()), &plate.region));
                if leftover > tolerance {
                    continue;
                }
                best = Some((
                    dist,
                    Candidate {
                        rotation: angle,
                        position: p,
                        quantized: placed,
                    },
                ));
            }
        }
        best.map(|(_, c)| c)
    }

    /// Commits a placement: records the part's final transform and replaces
    /// the consumed plate with its cleaned remainders.
    ///
    /// The remainder is deflated and re-inflated by the keep-out margin and
    /// intersected with the true remainder, which erases slivers narrower
    /// than twice the margin without giving up real area. The part's holes
    /// are published as plates of their own, so later parts can nest inside
    /// them.
    fn commit_placement(
        &mut self,
        part_idx: usize,
        plate_idx: usize,
        candidate: Candidate,
    ) -> Result<()> {
        let config = self.config;
        let rad = candidate.rotation.to_radians();
        let shift = (candidate.position.0, candidate.position.1);

        let part = &self.parts[part_idx];
        let outer_scaled = quantize::scale(&part.outer_search.rotated_around(ORIGIN, rad)?, 1.0)?
            .translated(shift)?;
        let holes_scaled = part
            .holes_search
            .iter()
            .filter_map(|h| {
                let rotated = quantize::scale(&h.rotated_around(ORIGIN, rad).ok()?, 1.0).ok()?;
                rotated.translated(shift).ok()
            })
            .collect_vec();
        let placement = Placement {
            position: quantize::unscale_point(candidate.position, config.accuracy),
            rotation: candidate.rotation,
            outer: quantize::unscale(&outer_scaled, config.accuracy)?,
            holes: holes_scaled
                .iter()
                .filter_map(|h| quantize::unscale(h, config.accuracy).ok())
                .collect(),
        };

        let margin = config.keepout_margin_scaled();
        let remainder = self.backend.difference(
            &self.plates[plate_idx].region,
            &Region::simple(candidate.quantized),
        );

        let mut derived = vec![];
        for region in &remainder {
            for shrunk in self.backend.offset(region, -margin, JoinStyle::Miter) {
                for grown in self.backend.offset(&shrunk, margin, JoinStyle::Miter) {
                    for cleaned in self.backend.intersection(&grown, region) {
                        derived.extend(Plate::from_derived(&cleaned, &config));
                    }
                }
            }
        }
        for hole in &holes_scaled {
            derived.extend(Plate::from_derived(&Region::simple(hole.clone()), &config));
        }
        derived.retain(|p| p.area() >= config.min_plate_area_scaled());
        derived
            .sort_by_cached_key(|p| Reverse(NotNan::new(p.area()).expect("plate area is NaN")));
        debug!(
            "[NEST] plate {plate_idx} consumed, {} derived plate(s)",
            derived.len()
        );

        //the largest remainder takes the consumed plate's slot
        match derived.is_empty() {
            true => {
                self.plates.remove(plate_idx);
            }
            false => {
                self.plates[plate_idx] = derived.remove(0);
                self.plates.append(&mut derived);
            }
        }

        self.parts[part_idx].state = PlacementState::Placed(placement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolops::GeoBackend;
    use crate::geometry::geo_traits::Shape;

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![
            Point(0.0, 0.0),
            Point(size, 0.0),
            Point(size, size),
            Point(0.0, size),
        ])
        .unwrap()
    }

    fn config() -> NestConfig {
        NestConfig {
            rotation_step: 360.0,
            simplify_tolerance: 0.0,
            accuracy: 1.0,
            offset: 0.0,
            limit_edge: 1.0,
            min_plate_area: 1.0,
        }
    }

    fn build(part_sizes: &[f64], plate_size: f64) -> Nester<GeoBackend> {
        let config = config();
        let parts = part_sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| Part::new(i as u64, square(s), vec![], &config, &GeoBackend).unwrap())
            .collect_vec();
        let plates = vec![Plate::from_seed(&square(plate_size), &config).unwrap()];
        Nester::new(GeoBackend, config, parts, plates)
    }

    #[test]
    fn oversized_part_is_marked_unplaceable() {
        let placed = build(&[50.0], 30.0).run(|_| {});
        assert!(matches!(placed[0].state, PlacementState::Unplaceable));
    }

    #[test]
    fn exact_fit_lands_flush_with_the_lower_corner() {
        let placed = build(&[30.0], 30.0).run(|_| {});
        let PlacementState::Placed(p) = &placed[0].state else {
            panic!("part not placed");
        };
        let bbox = p.outer.bbox();
        assert_eq!((bbox.x_min, bbox.y_min), (0.0, 0.0));
        assert_eq!((bbox.x_max, bbox.y_max), (30.0, 30.0));
    }

    #[test]
    fn progress_reaches_one() {
        let mut last = 0.0;
        build(&[10.0, 10.0], 30.0).run(|f| last = f);
        assert_eq!(last, 1.0);
    }

    #[test]
    fn larger_parts_are_placed_first() {
        let placed = build(&[5.0, 20.0], 30.0).run(|_| {});
        let d0 = match &placed[0].state {
            PlacementState::Placed(p) => p.outer.centroid().sq_distance_to_origin(),
            _ => panic!("small part not placed"),
        };
        let d1 = match &placed[1].state {
            PlacementState::Placed(p) => p.outer.centroid().sq_distance_to_origin(),
            _ => panic!("large part not placed"),
        };
        //the larger part went first and grabbed the corner nearest the origin
        assert!(d1 < d0);
    }
}
