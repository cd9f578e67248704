//! Oriented planes and polygon classification for the BSP tree.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Classification bits, combined with `|` across a polygon's vertices
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Normal components below this are treated as zero when fitting planes.
const AXIS_SNAP: Real = EPSILON * 1e-3;

/// A plane `normal · p = w` with a unit normal pointing to the *front* side.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and the offset of
    /// the *normalized* plane equation.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Fit a plane to a polygon's vertices using Newell's method.
    ///
    /// The normal follows the counter‑clockwise winding of `vertices`.
    /// Fewer than three vertices, or collinear ones, yield the `z = 0` plane.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane::from_normal(Vector3::z(), 0.0);
        }

        let mut normal = Vector3::<Real>::zeros();
        let mut centroid = Vector3::<Real>::zeros();
        for i in 0..n {
            let a = vertices[i].pos;
            let b = vertices[(i + 1) % n].pos;
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
            centroid += a.coords;
        }

        let len = normal.norm();
        if len < Real::EPSILON {
            return Plane::from_normal(Vector3::z(), 0.0);
        }
        let normal = normal / len;

        // faces perpendicular to an axis get an exact normal and offset
        for axis in 0..3 {
            let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
            if normal[u].abs() < AXIS_SNAP && normal[v].abs() < AXIS_SNAP {
                let sign = normal[axis].signum();
                let mut exact = Vector3::<Real>::zeros();
                exact[axis] = sign;
                return Plane {
                    normal: exact,
                    w: sign * vertices[0].pos[axis],
                };
            }
        }

        let centroid = centroid / n as Real;
        Plane {
            normal,
            w: normal.dot(&centroid),
        }
    }

    /// The axis this plane is perpendicular to, if any, with the coordinate
    /// of the plane along it.
    pub fn axis_aligned(&self) -> Option<(usize, Real)> {
        (0..3).find_map(|axis| {
            let n = self.normal[axis];
            (n.abs() == 1.0).then_some((axis, self.w * n))
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Flip the plane (reverse normal and offset)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR` within `EPSILON`.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of `COPLANAR`, `FRONT`, and `BACK`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons go to the front bucket when they face the same way
    /// as the plane. Split pieces keep the plane of the source polygon.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone>(
        &self,
        polygon: &Polygon<S>,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let mut vertex_new = vertex_i.interpolate(vertex_j, t);
                            if let Some((axis, at)) = self.axis_aligned() {
                                vertex_new.pos[axis] = at;
                            }
                            split_front.push(vertex_new);
                            split_back.push(vertex_new);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(polygon.with_vertices(split_front));
                }
                if split_back.len() >= 3 {
                    back.push(polygon.with_vertices(split_back));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
