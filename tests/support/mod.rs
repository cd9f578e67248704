//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use gridbin::{
    BinSpec, Model,
    float_types::Real,
    mesh::{polygon::Polygon, vertex::Vertex},
    traits::CSG,
};
use nalgebra::{Point3, Vector3};

/// `[min_x, min_y, min_z, max_x, max_y, max_z]` of a model.
pub fn bounds(model: &Model) -> [Real; 6] {
    let bb = model.bounding_box();
    [
        bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z,
    ]
}

/// Asserts the model spans exactly `[0, w] × [0, d] × [0, h]` millimetres.
pub fn assert_exact_bounds(model: &Model, w: Real, d: Real, h: Real) {
    assert_eq!(bounds(model), [0.0, 0.0, 0.0, w, d, h]);
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// A valid spec, panicking with the error otherwise.
pub fn spec(width: u32, depth: u32, height: u32, wall: Real, dx: u32, dy: u32) -> BinSpec {
    BinSpec::new(width, depth, height, wall, dx, dy)
        .unwrap_or_else(|err| panic!("spec should be valid: {err}"))
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    let mut poly = Polygon::new(verts, None);
    poly.set_new_normal();
    poly
}

/// Sum of the polygon areas that face along `axis` (0 = x, 1 = y, 2 = z)
/// in the positive direction, i.e. the projected "roof" area.
pub fn facing_area<S: Clone + std::fmt::Debug>(mesh: &gridbin::mesh::Mesh<S>, axis: usize) -> Real {
    mesh.polygons
        .iter()
        .filter(|p| p.plane.normal[axis] > 0.0)
        .map(|p| p.area() * p.plane.normal[axis])
        .sum()
}

/// The mesh must be non-empty and enclose a positive volume.
pub fn assert_solid<S: Clone + std::fmt::Debug>(mesh: &gridbin::mesh::Mesh<S>) {
    assert!(!mesh.polygons.is_empty(), "mesh has no polygons");
    assert!(mesh.volume() > 0.0, "mesh volume is not positive");
    // a closed surface projects the same area up and down
    let up = facing_area(mesh, 2);
    let down = facing_area(&mesh.inverse(), 2);
    assert!(
        approx_eq(up, down, 1e-6 * up.max(1.0)),
        "surface is not closed: {up} up vs {down} down"
    );
}
