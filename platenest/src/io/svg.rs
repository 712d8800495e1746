use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Title};

use crate::entities::{Part, PlacementState};
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Polygon, Rect};

/// Renders the plate boundaries and all placed parts into one SVG document.
/// Unplaced parts are omitted; they have no coordinates to draw.
pub fn solution_to_svg(plate_seeds: &[Polygon], parts: &[Part]) -> Document {
    let bbox = plate_seeds
        .iter()
        .map(|p| p.bbox())
        .reduce(|a, b| Rect {
            x_min: a.x_min.min(b.x_min),
            y_min: a.y_min.min(b.y_min),
            x_max: a.x_max.max(b.x_max),
            y_max: a.y_max.max(b.y_max),
        })
        .unwrap_or(Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 1.0,
            y_max: 1.0,
        })
        .inflated(1.0);

    let stroke_width = f64::min(bbox.width(), bbox.height()) * 0.002;

    let mut plate_group = Group::new().set("id", "plates");
    for (i, plate) in plate_seeds.iter().enumerate() {
        plate_group = plate_group.add(
            data_to_path(
                polygon_data(plate),
                &[
                    ("fill", "#FFFFFF"),
                    ("stroke", "black"),
                    ("stroke-width", &format!("{}", 2.0 * stroke_width)),
                ],
            )
            .add(Title::new(format!("plate {i}"))),
        );
    }

    let mut part_group = Group::new().set("id", "parts");
    for part in parts {
        let PlacementState::Placed(placement) = &part.state else {
            continue;
        };
        let mut group = Group::new().set("id", format!("part_{}", part.id)).add(
            data_to_path(
                polygon_data(&placement.outer),
                &[
                    ("fill", "#BFDBF7"),
                    ("stroke", "#2D2D2D"),
                    ("stroke-width", &format!("{stroke_width}")),
                ],
            )
            .add(Title::new(format!(
                "part {}, rotation {}°",
                part.id, placement.rotation
            ))),
        );
        for hole in &placement.holes {
            group = group.add(data_to_path(
                polygon_data(hole),
                &[
                    ("fill", "#FFFFFF"),
                    ("stroke", "#2D2D2D"),
                    ("stroke-width", &format!("{stroke_width}")),
                ],
            ));
        }
        part_group = part_group.add(group);
    }

    Document::new()
        .set(
            "viewBox",
            (bbox.x_min, bbox.y_min, bbox.width(), bbox.height()),
        )
        .add(plate_group)
        .add(part_group)
}

fn polygon_data(poly: &Polygon) -> Data {
    let mut data = Data::new().move_to::<(f64, f64)>((poly.points[0].0, poly.points[0].1));
    for p in &poly.points[1..] {
        data = data.line_to::<(f64, f64)>((p.0, p.1));
    }
    data.close()
}

fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1);
    }
    path.set("d", data)
}
