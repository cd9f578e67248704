//! Convex polygons with a cached plane and per-polygon metadata.

use crate::float_types::{
    Real,
    parry3d::bounding_volume::Aabb,
};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;

/// A convex polygon, defined by a list of vertices in counter‑clockwise
/// order (seen from the front side).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    /// Tag carried through every split of this polygon
    pub metadata: Option<S>,
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from vertices, fitting its plane.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Create a polygon that shares this polygon's plane and metadata.
    pub(crate) fn with_vertices(&self, vertices: Vec<Vertex>) -> Self {
        Polygon {
            vertices,
            plane: self.plane.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Recompute the plane from the current vertices and push its normal
    /// into every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    /// Fan triangulation. Polygons are convex, so the fan from the first
    /// vertex covers them exactly.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let first = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [first, pair[0], pair[1]])
            .collect()
    }

    /// Axis aligned bounds of the polygon's vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }

    /// Area of the polygon (sum of its fan triangles).
    pub fn area(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| (b.pos - a.pos).cross(&(c.pos - a.pos)).norm() * 0.5)
            .sum()
    }

    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }
}
