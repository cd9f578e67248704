//! AMF (Additive Manufacturing File Format) export.
//!
//! AMF is an XML format with shared, indexed vertices. Triangle corners that
//! coincide within [`tolerance`] are welded into one vertex.

use crate::float_types::{Real, tolerance};
use crate::triangulated::Triangulated3D;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::{Debug, Write as _};

/// Indexed vertex buffer plus triangles referring into it.
fn build_amf_buffers<T: Triangulated3D>(shape: &T) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::<Point3<Real>>::new();
    let mut triangles = Vec::<[usize; 3]>::new();
    let mut index = HashMap::<[i64; 3], usize>::new();
    let scale = 1.0 / tolerance();

    shape.visit_triangles(|tri| {
        let ids = tri.map(|v| {
            let key = [
                (v.pos.x * scale).round() as i64,
                (v.pos.y * scale).round() as i64,
                (v.pos.z * scale).round() as i64,
            ];
            *index.entry(key).or_insert_with(|| {
                vertices.push(v.pos);
                vertices.len() - 1
            })
        });
        // welding can collapse slivers to a point or a line
        if ids[0] != ids[1] && ids[1] != ids[2] && ids[0] != ids[2] {
            triangles.push(ids);
        }
    });

    (vertices, triangles)
}

/// Export any [`Triangulated3D`] shape as an AMF document.
///
/// * `object_name` - name of the single object in the file
/// * `units` - unit of the coordinates, e.g. `"millimeter"`
pub fn to_amf<T: Triangulated3D>(shape: &T, object_name: &str, units: &str) -> String {
    let (vertices, triangles) = build_amf_buffers(shape);

    let mut amf = String::new();
    amf.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(amf, "<amf unit=\"{units}\" version=\"1.1\">");
    amf.push_str("  <metadata type=\"producer\">gridbin</metadata>\n");
    let _ = writeln!(
        amf,
        "  <metadata type=\"name\">{}</metadata>",
        escape(object_name)
    );
    amf.push_str("  <object id=\"0\">\n");
    amf.push_str("    <mesh>\n");
    amf.push_str("      <vertices>\n");
    for vertex in &vertices {
        amf.push_str("        <vertex><coordinates>");
        let _ = write!(
            amf,
            "<x>{:.6}</x><y>{:.6}</y><z>{:.6}</z>",
            vertex.x, vertex.y, vertex.z
        );
        amf.push_str("</coordinates></vertex>\n");
    }
    amf.push_str("      </vertices>\n");
    amf.push_str("      <volume>\n");
    for [v1, v2, v3] in &triangles {
        let _ = writeln!(
            amf,
            "        <triangle><v1>{v1}</v1><v2>{v2}</v2><v3>{v3}</v3></triangle>"
        );
    }
    amf.push_str("      </volume>\n");
    amf.push_str("    </mesh>\n");
    amf.push_str("  </object>\n");
    amf.push_str("</amf>\n");
    amf
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl<S: Clone + Debug> crate::mesh::Mesh<S> {
    pub fn to_amf(&self, object_name: &str, units: &str) -> String {
        self::to_amf(self, object_name, units)
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;

    #[test]
    fn cube_welds_to_eight_vertices() {
        let cube = Mesh::<()>::cuboid([0.0; 3], [1.0; 3], None);
        let amf = cube.to_amf("cube", "millimeter");
        assert!(amf.starts_with("<?xml"));
        assert!(amf.contains("<amf unit=\"millimeter\" version=\"1.1\">"));
        assert_eq!(amf.matches("<vertex>").count(), 8);
        assert_eq!(amf.matches("<triangle>").count(), 12);
        assert_eq!(amf.matches("<object").count(), 1);
        assert!(amf.trim_end().ends_with("</amf>"));
    }

    #[test]
    fn names_are_escaped() {
        let cube = Mesh::<()>::cuboid([0.0; 3], [1.0; 3], None);
        let amf = cube.to_amf("a<b>&\"c\"", "millimeter");
        assert!(amf.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
    }
}
