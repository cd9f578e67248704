//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::float_types::{
    EPSILON, Real,
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::Triangle,
    },
};
use crate::mesh::{bsp::Node, polygon::Polygon, vertex::Vertex};
use crate::traits::CSG;
use crate::triangulated::Triangulated3D;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Debug> {
    /// 3D polygons bounding the solid
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        let mut mesh = Mesh::new();
        mesh.polygons = polygons.to_vec();
        mesh.metadata = metadata;
        mesh
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding‑box tests
    fn partition_polys(
        polys: &[Polygon<S>],
        other_bb: &Aabb,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        polys
            .iter()
            .cloned()
            .partition(|p| p.bounding_box().intersects(other_bb))
    }

    /// Helper to collect all vertices from the mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Total surface area of all polygons.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Enclosed volume via the divergence theorem over the fan triangles.
    /// Only meaningful for a closed, consistently oriented surface.
    pub fn volume(&self) -> Real {
        let mut six_v = 0.0;
        self.visit_triangles(|[a, b, c]| {
            six_v += a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords));
        });
        six_v / 6.0
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance.
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity();

        let mut hits = Vec::new();
        self.visit_triangles(|[a, b, c]| {
            let triangle = Triangle::new(a.pos, b.pos, c.pos);
            if let Some(hit) = triangle.cast_ray_and_get_normal(&iso, &ray, Real::MAX, true) {
                hits.push((ray.point_at(hit.time_of_impact), hit.time_of_impact));
            }
        });

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        // a ray through a shared edge reports once per adjacent triangle
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < EPSILON);

        hits
    }

    /// Even-odd point containment test using a ray cast.
    pub fn contains_vertex(&self, point: &Point3<Real>) -> bool {
        // an irrational-ish direction keeps the ray off axis-aligned edges
        let direction = Vector3::new(1.0, 0.618_033_988_75, 0.414_213_562_37);
        self.ray_intersections(point, &direction).len() % 2 == 1
    }
}

impl<S: Clone + Debug> CSG for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() {
            return Mesh::from_polygons(&other.polygons, self.metadata.clone());
        }
        if other.polygons.is_empty() {
            return self.clone();
        }

        // avoid splitting obvious non‑intersecting faces
        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            return self.clone();
        }

        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);

        Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh {
            polygons: a.all_polygons(),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Apply an affine 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// A singular matrix flattens the geometry; normals are then left as they were.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_mat = mat.try_inverse().map(|inv| inv.transpose());
        let mut mesh = self.clone();

        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                vert.pos = mat.transform_point(&vert.pos);
                if let Some(normal_mat) = &normal_mat {
                    vert.normal = normal_mat.transform_vector(&vert.normal).normalize();
                }
            }
            // keep the cached plane consistent with the new vertex positions
            poly.plane = plane::Plane::from_vertices(&poly.vertices);
        }

        mesh.invalidate_bounding_box();
        mesh
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins = mins.inf(&v.pos);
                    maxs = maxs.sup(&v.pos);
                }
            }

            // If still uninitialized (e.g., no polygons), return a trivial AABB at origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}

impl<S: Clone + Debug> Triangulated3D for Mesh<S> {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for poly in &self.polygons {
            let normal = poly.plane.normal();
            for tri in poly.triangulate() {
                f(tri.map(|v| Vertex::new(v.pos, normal)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_volume_and_area() {
        let cube: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [2.0, 3.0, 4.0], None);
        approx::assert_relative_eq!(cube.volume(), 24.0, epsilon = 1e-9);
        approx::assert_relative_eq!(cube.surface_area(), 52.0, epsilon = 1e-9);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn union_of_empty_is_other() {
        let cube: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], None);
        let empty: Mesh<()> = Mesh::new();
        assert_eq!(empty.union(&cube).polygons, cube.polygons);
        assert_eq!(cube.union(&empty).polygons, cube.polygons);
        assert_eq!(cube.difference(&empty).polygons, cube.polygons);
    }

    #[test]
    fn disjoint_union_passes_polygons_through() {
        let a: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], None);
        let b: Mesh<()> = Mesh::cuboid([3.0, 0.0, 0.0], [4.0, 1.0, 1.0], None);
        let both = a.union(&b);
        assert_eq!(both.polygons.len(), 12);
        approx::assert_relative_eq!(both.volume(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn difference_carves_volume() {
        let big: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [4.0, 4.0, 4.0], None);
        let hole: Mesh<()> = Mesh::cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 5.0], None);
        let cup = big.difference(&hole);
        approx::assert_relative_eq!(cup.volume(), 64.0 - 12.0, epsilon = 1e-6);

        let bb = cup.bounding_box();
        assert_eq!(bb.mins, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.maxs, Point3::new(4.0, 4.0, 4.0));

        assert!(!cup.contains_vertex(&Point3::new(2.1, 1.7, 3.3)));
        assert!(cup.contains_vertex(&Point3::new(0.5, 2.3, 2.9)));
    }

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [2.0, 2.0, 2.0], None);
        let b: Mesh<()> = Mesh::cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0], None);
        let c = a.intersection(&b);
        approx::assert_relative_eq!(c.volume(), 1.0, epsilon = 1e-6);
        let bb = c.bounding_box();
        approx::assert_relative_eq!(bb.mins.x, 1.0, epsilon = 1e-9);
        approx::assert_relative_eq!(bb.maxs.z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn translate_moves_bounds() {
        let cube: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], None);
        let moved = cube.translate(2.0, -1.0, 0.5);
        let bb = moved.bounding_box();
        approx::assert_relative_eq!(bb.mins, Point3::new(2.0, -1.0, 0.5));
        approx::assert_relative_eq!(bb.maxs, Point3::new(3.0, 0.0, 1.5));
    }

    #[test]
    fn inverse_negates_volume() {
        let cube: Mesh<()> = Mesh::cuboid([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], None);
        approx::assert_relative_eq!(cube.inverse().volume(), -6.0, epsilon = 1e-9);
    }
}
