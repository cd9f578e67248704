//! Primitive solids: boxes, prisms, stacked-ring lofts and profile sweeps.
//!
//! Every shape is closed and its polygons are wound counter‑clockwise seen
//! from outside, so they can be fed straight into the boolean operations.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use crate::outline;
use crate::traits::CSG;
use nalgebra::{Point2, Point3, Vector3};
use std::fmt::Debug;

/// Build a polygon whose vertex normals all equal the fitted face normal.
fn face<S: Clone>(points: Vec<Point3<Real>>, metadata: &Option<S>) -> Polygon<S> {
    let mut poly = Polygon::new(
        points
            .into_iter()
            .map(|p| Vertex::new(p, Vector3::zeros()))
            .collect(),
        metadata.clone(),
    );
    poly.set_new_normal();
    poly
}

impl<S: Clone + Debug> Mesh<S> {
    /// Axis aligned box spanning the corners `min` and `max`.
    ///
    /// Corner coordinates are used verbatim (no transform), so faces lie
    /// exactly on the requested bounds.
    pub fn cuboid(min: [Real; 3], max: [Real; 3], metadata: Option<S>) -> Mesh<S> {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        Mesh::prism(&outline::rect([x0, y0], [x1, y1]), z0, z1, metadata)
    }

    /// Extrude a convex counter‑clockwise outline from `z0` to `z1`.
    pub fn prism(outline: &[Point2<Real>], z0: Real, z1: Real, metadata: Option<S>) -> Mesh<S> {
        Mesh::loft(&[(outline, z0), (outline, z1)], metadata)
    }

    /// Closed solid through a stack of convex outlines at increasing heights.
    ///
    /// All rings must have the same number of points, with point `i` of one
    /// ring corresponding to point `i` of the next (see
    /// [`outline::rounded_rect_inset`]). The bottom ring becomes the floor
    /// cap, the top ring the roof cap, and each pair of neighbouring rings is
    /// joined by one quad per edge.
    pub fn loft(rings: &[(&[Point2<Real>], Real)], metadata: Option<S>) -> Mesh<S> {
        let mut polygons = Vec::new();
        let (Some((bottom, z_bottom)), Some((top, z_top))) = (rings.first(), rings.last()) else {
            return Mesh::new();
        };
        if rings.len() < 2 || bottom.len() < 3 {
            return Mesh::new();
        }

        // floor faces -z: reverse the ring
        polygons.push(face(
            bottom
                .iter()
                .rev()
                .map(|p| Point3::new(p.x, p.y, *z_bottom))
                .collect(),
            &metadata,
        ));

        for pair in rings.windows(2) {
            let (lower, z_lo) = pair[0];
            let (upper, z_hi) = pair[1];
            if lower.len() != upper.len() {
                continue;
            }
            let n = lower.len();
            for i in 0..n {
                let j = (i + 1) % n;
                polygons.push(face(
                    vec![
                        Point3::new(lower[i].x, lower[i].y, z_lo),
                        Point3::new(lower[j].x, lower[j].y, z_lo),
                        Point3::new(upper[j].x, upper[j].y, z_hi),
                        Point3::new(upper[i].x, upper[i].y, z_hi),
                    ],
                    &metadata,
                ));
            }
        }

        polygons.push(face(
            top.iter().map(|p| Point3::new(p.x, p.y, *z_top)).collect(),
            &metadata,
        ));

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Upright cylinder around `center` from `z0` to `z1`.
    pub fn cylinder(
        center: [Real; 2],
        radius: Real,
        z0: Real,
        z1: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        if segments < 3 || radius <= 0.0 {
            return Mesh::new();
        }
        Mesh::prism(&outline::circle(center, radius, segments), z0, z1, metadata)
    }

    /// Sweep a profile drawn in the (y, z) plane along x from `x0` to `x1`.
    ///
    /// The profile is a counter‑clockwise loop that must be star shaped with
    /// respect to its first point; the end caps are fanned from there, so
    /// concave profiles such as a quarter-round scoop are supported.
    pub fn sweep_x(profile: &[Point2<Real>], x0: Real, x1: Real, metadata: Option<S>) -> Mesh<S> {
        let n = profile.len();
        if n < 3 {
            return Mesh::new();
        }
        let at = |x: Real, p: &Point2<Real>| Point3::new(x, p.x, p.y);
        let mut polygons = Vec::with_capacity(3 * n);

        for i in 1..n - 1 {
            // cap facing +x keeps the profile winding
            polygons.push(face(
                vec![at(x1, &profile[0]), at(x1, &profile[i]), at(x1, &profile[i + 1])],
                &metadata,
            ));
            polygons.push(face(
                vec![at(x0, &profile[0]), at(x0, &profile[i + 1]), at(x0, &profile[i])],
                &metadata,
            ));
        }

        for i in 0..n {
            let j = (i + 1) % n;
            polygons.push(face(
                vec![
                    at(x0, &profile[i]),
                    at(x0, &profile[j]),
                    at(x1, &profile[j]),
                    at(x1, &profile[i]),
                ],
                &metadata,
            ));
        }

        Mesh::from_polygons(&polygons, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;
    use crate::triangulated::Triangulated3D;

    #[test]
    fn cuboid_faces_and_bounds() {
        let cube: Mesh<()> = Mesh::cuboid([1.0, 2.0, 3.0], [4.0, 6.0, 8.0], None);
        assert_eq!(cube.polygons.len(), 6);
        let bb = cube.bounding_box();
        assert_eq!(bb.mins, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.maxs, Point3::new(4.0, 6.0, 8.0));
        approx::assert_relative_eq!(cube.volume(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn faces_point_outwards() {
        let cube: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], None);
        let center = Point3::new(0.5, 0.5, 0.5);
        for poly in &cube.polygons {
            let to_face = poly.vertices[0].pos - center;
            assert!(poly.plane.normal.dot(&to_face) > 0.0);
        }
    }

    #[test]
    fn cylinder_polygon_count() {
        let c: Mesh<()> = Mesh::cylinder([0.0, 0.0], 1.0, 0.0, 2.0, 16, None);
        // 16 sides + 2 caps
        assert_eq!(c.polygons.len(), 18);
        let expected = 0.5 * 16.0 * (2.0 * PI / 16.0).sin() * 2.0;
        approx::assert_relative_eq!(c.volume(), expected, epsilon = 1e-9);
    }

    #[test]
    fn loft_frustum_volume() {
        let bottom = outline::rect([-1.0, -1.0], [1.0, 1.0]);
        let top = outline::rect([-2.0, -2.0], [2.0, 2.0]);
        let m: Mesh<()> = Mesh::loft(&[(bottom.as_slice(), 0.0), (top.as_slice(), 3.0)], None);
        // square frustum: h/3 (A1 + A2 + sqrt(A1 A2))
        approx::assert_relative_eq!(m.volume(), 1.0 * (4.0 + 16.0 + 8.0), epsilon = 1e-9);
    }

    #[test]
    fn sweep_triangle_prism() {
        let profile = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let m: Mesh<()> = Mesh::sweep_x(&profile, 0.0, 5.0, None);
        approx::assert_relative_eq!(m.volume(), 10.0, epsilon = 1e-9);
        assert_eq!(m.triangle_count(), 2 + 3 * 2);
    }
}
