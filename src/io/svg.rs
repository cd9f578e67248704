//! SVG rendering of a mesh as seen from a fixed direction.
//!
//! The projection is orthographic. Faces turned towards the viewer are
//! flat-shaded by how squarely they face it and painted back to front, so
//! nearer faces cover farther ones. Fragments of one flat face share a shade,
//! which hides the seams left by the boolean operations.

use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::fmt::{Debug, Write as _};
use svg::Document;
use svg::node::element::{Group, Polygon};

/// Rendering settings for [`to_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Direction from the model towards the viewer.
    pub projection_dir: Vector3<Real>,
    /// Blank space left and right of the drawing, in output units.
    pub margin_left: Real,
    /// Blank space above and below the drawing, in output units.
    pub margin_top: Real,
    /// Output units per millimetre.
    pub scale: Real,
    pub stroke_width: Real,
    /// Draw every face as an unfilled outline, hidden ones included.
    pub show_hidden: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            projection_dir: Vector3::new(2.75, -2.6, 2.0),
            margin_left: 10.0,
            margin_top: 10.0,
            scale: 4.0,
            stroke_width: 0.5,
            show_hidden: false,
        }
    }
}

/// Image-plane basis for a viewer looking back along `toward_viewer`.
struct View {
    right: Vector3<Real>,
    up: Vector3<Real>,
    toward_viewer: Vector3<Real>,
}

impl View {
    fn new(direction: &Vector3<Real>) -> Self {
        let toward_viewer = direction
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::z);
        // looking straight down or up, y is the screen's up
        let hint = if toward_viewer.z.abs() > 1.0 - 1e-6 {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let right = hint.cross(&toward_viewer).normalize();
        let up = toward_viewer.cross(&right);
        Self {
            right,
            up,
            toward_viewer,
        }
    }

    /// Screen coordinates, y growing downwards.
    fn project(&self, p: &Point3<Real>) -> [Real; 2] {
        [p.coords.dot(&self.right), -p.coords.dot(&self.up)]
    }

    fn depth(&self, p: &Point3<Real>) -> Real {
        p.coords.dot(&self.toward_viewer)
    }
}

/// Render `mesh` to an SVG document.
pub fn to_svg<S: Clone + Debug>(mesh: &Mesh<S>, options: &SvgOptions) -> String {
    let view = View::new(&options.projection_dir);

    // (depth, shade, screen points) per drawn face
    let mut faces: Vec<(Real, Real, Vec<[Real; 2]>)> = mesh
        .polygons
        .iter()
        .filter_map(|poly| {
            let facing = poly.plane.normal.dot(&view.toward_viewer);
            if !options.show_hidden && facing <= 0.0 {
                return None;
            }
            let depth = poly.vertices.iter().map(|v| view.depth(&v.pos)).sum::<Real>()
                / poly.vertices.len() as Real;
            let points = poly.vertices.iter().map(|v| view.project(&v.pos)).collect();
            Some((depth, 0.35 + 0.6 * facing.max(0.0), points))
        })
        .collect();
    faces.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let (min, max) = faces
        .iter()
        .flat_map(|(_, _, points)| points.iter())
        .fold(
            ([Real::MAX; 2], [Real::MIN; 2]),
            |(min, max), &[x, y]| {
                ([min[0].min(x), min[1].min(y)], [max[0].max(x), max[1].max(y)])
            },
        );
    let (min, max) = if faces.is_empty() {
        ([0.0; 2], [0.0; 2])
    } else {
        (min, max)
    };

    let s = options.scale;
    let to_screen = |[x, y]: [Real; 2]| {
        [
            (x - min[0]) * s + options.margin_left,
            (y - min[1]) * s + options.margin_top,
        ]
    };

    let mut group = Group::new()
        .set("stroke-width", options.stroke_width)
        .set("stroke-linejoin", "round");
    for (_, shade, points) in &faces {
        let mut list = String::new();
        for point in points {
            let [x, y] = to_screen(*point);
            // writing into a String cannot fail
            let _ = write!(list, "{x:.3},{y:.3} ");
        }
        let polygon = Polygon::new().set("points", list.trim_end().to_string());
        let polygon = if options.show_hidden {
            polygon.set("fill", "none").set("stroke", "black")
        } else {
            let grey = (shade * 255.0).round().clamp(0.0, 255.0) as u8;
            let colour = format!("rgb({grey},{grey},{grey})");
            polygon.set("fill", colour.clone()).set("stroke", colour)
        };
        group = group.add(polygon);
    }

    let width = (max[0] - min[0]) * s + 2.0 * options.margin_left;
    let height = (max[1] - min[1]) * s + 2.0 * options.margin_top;
    Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width:.3} {height:.3}"))
        .add(group)
        .to_string()
}

impl<S: Clone + Debug> Mesh<S> {
    pub fn to_svg(&self, options: &SvgOptions) -> String {
        self::to_svg(self, options)
    }
}
