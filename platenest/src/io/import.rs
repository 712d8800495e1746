use anyhow::{Context, Result, bail, ensure};
use float_cmp::approx_eq;
use log::info;

use crate::boolops::GeoBackend;
use crate::entities::{Part, Plate};
use crate::geometry::primitives::{Point, Polygon};
use crate::util::NestConfig;

use super::ext_repr::{ExtJob, ExtShape};

/// Converts external job descriptions into preprocessed parts and plates.
pub struct Importer {
    config: NestConfig,
}

impl Importer {
    pub fn new(config: NestConfig) -> Self {
        Importer { config }
    }

    pub fn import(&self, job: &ExtJob) -> Result<(Vec<Part>, Vec<Plate>)> {
        ensure!(!job.plates.is_empty(), "job defines no plates");

        let plates = job
            .plates
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                let (outer, holes) = shape_to_rings(shape)
                    .with_context(|| format!("invalid plate {i}"))?;
                ensure!(holes.is_empty(), "plate {i} carries holes, only boundaries are accepted");
                Plate::from_seed(&outer, &self.config)
            })
            .collect::<Result<Vec<_>>>()?;

        let parts = job
            .parts
            .iter()
            .map(|ext| {
                let (outer, holes) = shape_to_rings(&ext.shape)
                    .with_context(|| format!("invalid part {}", ext.id))?;
                Part::new(ext.id, outer, holes, &self.config, &GeoBackend)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "[IMPORT] {} part(s), {} plate(s)",
            parts.len(),
            plates.len()
        );
        Ok((parts, plates))
    }
}

/// Expands an external shape into an outer ring and its holes.
pub fn shape_to_rings(shape: &ExtShape) -> Result<(Polygon, Vec<Polygon>)> {
    match shape {
        ExtShape::Rectangle { width, height } => {
            ensure!(
                *width > 0.0 && *height > 0.0,
                "rectangle must have positive dimensions: {width} x {height}"
            );
            let outer = Polygon::new(vec![
                Point(0.0, 0.0),
                Point(*width, 0.0),
                Point(*width, *height),
                Point(0.0, *height),
            ])?;
            Ok((outer, vec![]))
        }
        ExtShape::Polygon(ext) => {
            let outer = ring_to_polygon(&ext.outer)?;
            let holes = ext
                .holes
                .iter()
                .map(|h| ring_to_polygon(h))
                .collect::<Result<Vec<_>>>()?;
            Ok((outer, holes))
        }
    }
}

/// Accepts both open rings and rings closed by repeating the first point.
fn ring_to_polygon(ring: &[(f64, f64)]) -> Result<Polygon> {
    let mut points: Vec<Point> = ring.iter().map(|&p| Point::from(p)).collect();
    if let (Some(&first), Some(&last)) = (points.first(), points.last())
        && points.len() > 1
        && approx_eq!(f64, first.0, last.0)
        && approx_eq!(f64, first.1, last.1)
    {
        points.pop();
    }
    if points.len() < 3 {
        bail!("ring needs at least 3 distinct points, got {}", points.len());
    }
    Polygon::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ext_repr::{ExtPart, ExtPolygon};

    #[test]
    fn closed_and_open_rings_import_identically() {
        let open = ring_to_polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]).unwrap();
        let closed =
            ring_to_polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]).unwrap();
        assert_eq!(open.points, closed.points);
    }

    #[test]
    fn too_short_ring_is_rejected() {
        assert!(ring_to_polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 0.0)]).is_err());
    }

    #[test]
    fn rectangle_shapes_expand_to_four_corner_rings() {
        let job = ExtJob {
            plates: vec![ExtShape::Rectangle {
                width: 30.0,
                height: 20.0,
            }],
            parts: vec![ExtPart {
                id: 3,
                shape: ExtShape::Polygon(ExtPolygon {
                    outer: vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)],
                    holes: vec![],
                }),
            }],
        };
        let (parts, plates) = Importer::new(NestConfig::default()).import(&job).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].id, 3);
        assert_eq!(plates.len(), 1);
    }

    #[test]
    fn plate_with_holes_is_rejected() {
        let job = ExtJob {
            plates: vec![ExtShape::Polygon(ExtPolygon {
                outer: vec![(0.0, 0.0), (30.0, 0.0), (30.0, 30.0), (0.0, 30.0)],
                holes: vec![vec![(5.0, 5.0), (10.0, 5.0), (10.0, 10.0)]],
            })],
            parts: vec![],
        };
        assert!(Importer::new(NestConfig::default()).import(&job).is_err());
    }
}
