use platenest::geometry::geo_traits::Shape;
use platenest::geometry::primitives::{Point, Rect};
use platenest::silhouette::extract_silhouette;

/// The 12 triangles of an axis-aligned rectangular prism, projected onto the
/// x/y plane. Side faces collapse to lines or points in projection.
fn prism_triangles(w: f64, h: f64) -> Vec<[Point; 3]> {
    let (a, b, c, d) = (Point(0.0, 0.0), Point(w, 0.0), Point(w, h), Point(0.0, h));
    vec![
        //bottom face
        [a, b, c],
        [a, c, d],
        //top face
        [a, c, b],
        [a, d, c],
        //front and back faces (y-normal): degenerate in projection
        [a, b, b],
        [a, b, a],
        [d, c, c],
        [d, c, d],
        //left and right faces (x-normal): collapse to vertical lines
        [a, d, d],
        [a, d, a],
        [b, c, c],
        [b, c, b],
    ]
}

#[test]
fn box_prism_yields_one_rectangle_within_one_interval() {
    let interval = 1.0;
    let bbox = Rect::new(0.0, 0.0, 10.0, 10.0).unwrap();
    let polys = extract_silhouette(&prism_triangles(10.0, 10.0), bbox, interval).unwrap();

    assert_eq!(polys.len(), 1);
    let outline = polys[0].bbox();
    for (got, want) in [
        (outline.x_min, 0.0),
        (outline.y_min, 0.0),
        (outline.x_max, 10.0),
        (outline.y_max, 10.0),
    ] {
        assert!(
            (got - want).abs() <= interval,
            "outline bound {got} vs footprint {want}"
        );
    }
    //the contour is a plain rectangle
    assert_eq!(polys[0].n_vertices(), 4);
}

#[test]
fn empty_triangle_list_yields_no_polygons() {
    let bbox = Rect::new(0.0, 0.0, 10.0, 10.0).unwrap();
    assert!(extract_silhouette(&[], bbox, 1.0).unwrap().is_empty());
}
