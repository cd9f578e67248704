use crate::triangulated::Triangulated3D;
use std::fmt::{Debug, Write};

/// Convert a shape to an **ASCII STL** string with the given solid `name`.
///
/// ```rust
/// # use gridbin::mesh::Mesh;
/// let cube = Mesh::<()>::cuboid([0.0; 3], [1.0; 3], None);
/// let text = gridbin::io::stl::to_stl_ascii(&cube, "cube");
/// assert!(text.starts_with("solid cube"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "solid {name}");

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Convert a shape to a **binary STL** byte vector.
///
/// Binary STL has no room for a solid name; its 80 byte header is left
/// blank by `stl_io`.
#[cfg(feature = "stl-io")]
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(shape.triangle_count());

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.pos;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        }
    });

    let mut cursor = std::io::Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl<S: Clone + Debug> crate::mesh::Mesh<S> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    #[cfg(feature = "stl-io")]
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;

    #[test]
    fn ascii_has_one_facet_per_triangle() {
        let cube = Mesh::<()>::cuboid([0.0; 3], [1.0, 2.0, 3.0], None);
        let text = cube.to_stl_ascii("box");
        assert!(text.starts_with("solid box\n"));
        assert!(text.ends_with("endsolid box\n"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex ").count(), 36);
        assert!(text.contains("vertex 1.000000 2.000000 3.000000"));
    }

    #[cfg(feature = "stl-io")]
    #[test]
    fn binary_size_matches_triangle_count() {
        let cube = Mesh::<()>::cuboid([0.0; 3], [1.0; 3], None);
        let bytes = cube.to_stl_binary().expect("in-memory write");
        // header + count + 50 bytes per triangle
        assert_eq!(bytes.len(), 80 + 4 + 12 * 50);
        let mut cursor = std::io::Cursor::new(bytes);
        let read = stl_io::read_stl(&mut cursor).expect("valid stl");
        assert_eq!(read.faces.len(), 12);
    }
}
