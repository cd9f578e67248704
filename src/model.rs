//! The generated bin and its export.

use crate::errors::BinResult;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::Aabb,
};
use crate::layout::BinLayout;
use crate::mesh::{Mesh, polygon::Polygon};
use crate::traits::CSG;
use crate::triangulated::Triangulated3D;
use nalgebra::Point3;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// The construction step a polygon of a [`Model`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Outer walls and top rim.
    Shell,
    /// Base lugs that seat the bin in the grid.
    Base,
    /// Cell walls and floors cut into the shell.
    Cavity,
    /// Stacking recess at the top.
    Lip,
    FingerScoop,
    LabelLedge,
    MagnetHole,
    ScrewHole,
}

/// A generated bin: the solid mesh plus the layout it was built from.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh<Feature>,
    layout: BinLayout,
}

impl Model {
    pub(crate) fn new(mesh: Mesh<Feature>, layout: BinLayout) -> Self {
        Self { mesh, layout }
    }

    /// Axis aligned bounds of the solid.
    pub fn bounding_box(&self) -> Aabb {
        self.mesh.bounding_box()
    }

    pub const fn mesh(&self) -> &Mesh<Feature> {
        &self.mesh
    }

    pub const fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// Polygons produced by one construction step.
    pub fn polygons_with(&self, feature: Feature) -> impl Iterator<Item = &Polygon<Feature>> {
        self.mesh
            .polygons
            .iter()
            .filter(move |p| p.metadata == Some(feature))
    }

    /// Whether `point` lies inside the solid.
    pub fn contains_point(&self, point: [Real; 3]) -> bool {
        self.mesh
            .contains_vertex(&Point3::new(point[0], point[1], point[2]))
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Enclosed volume in cubic millimetres.
    pub fn volume(&self) -> Real {
        self.mesh.volume()
    }

    /// Write the model in the format named by the file extension.
    ///
    /// Fails with [`BinError::Io`](crate::BinError::Io) if the extension is
    /// not recognised or the file cannot be written. The file is written to a
    /// temporary sibling first and renamed into place, so a failed export
    /// never leaves a partial file at `path`.
    pub fn export(&self, path: impl AsRef<Path>) -> BinResult<()> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)?;
        self.export_as(path, format)
    }

    /// Write the model in an explicit format, ignoring the extension.
    /// SVG drawings use the default [`SvgOptions`](crate::io::svg::SvgOptions).
    pub fn export_as(&self, path: impl AsRef<Path>, format: ExportFormat) -> BinResult<()> {
        let path = path.as_ref();
        let bytes = format.encode(&self.mesh, &self.name())?;
        self.write(path, format, &bytes)
    }

    /// Write an SVG drawing of the model with explicit render settings.
    #[cfg(feature = "svg-io")]
    pub fn export_svg(
        &self,
        path: impl AsRef<Path>,
        options: &crate::io::svg::SvgOptions,
    ) -> BinResult<()> {
        let bytes = self.mesh.to_svg(options).into_bytes();
        self.write(path.as_ref(), ExportFormat::Svg, &bytes)
    }

    fn write(&self, path: &Path, format: ExportFormat, bytes: &[u8]) -> BinResult<()> {
        write_atomic(path, bytes)?;
        info!(
            path = %path.display(),
            ?format,
            bytes = bytes.len(),
            "exported bin"
        );
        Ok(())
    }

    /// Object name stored in the exported file.
    fn name(&self) -> String {
        let [w, d, h] = self.layout.size;
        format!("gridbin_{w}x{d}x{h}")
    }
}

/// Write `model` to `path`; see [`Model::export`].
pub fn export(model: &Model, path: impl AsRef<Path>) -> BinResult<()> {
    model.export(path)
}

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Binary STL.
    #[cfg(feature = "stl-io")]
    StlBinary,
    StlAscii,
    /// Additive Manufacturing File Format, in millimetres.
    Amf,
    /// Shaded drawing from the default viewpoint.
    #[cfg(feature = "svg-io")]
    Svg,
}

impl ExportFormat {
    /// Pick a format from the file extension (case-insensitive).
    ///
    /// `.stl` is binary STL when the `stl-io` feature is on, ASCII otherwise.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            #[cfg(feature = "stl-io")]
            Some("stl") => Ok(Self::StlBinary),
            #[cfg(not(feature = "stl-io"))]
            Some("stl") => Ok(Self::StlAscii),
            Some("amf") => Ok(Self::Amf),
            #[cfg(feature = "svg-io")]
            Some("svg") => Ok(Self::Svg),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported export format: {}", path.display()),
            )),
        }
    }

    fn encode<S: Clone + std::fmt::Debug>(self, mesh: &Mesh<S>, name: &str) -> io::Result<Vec<u8>> {
        match self {
            #[cfg(feature = "stl-io")]
            Self::StlBinary => mesh.to_stl_binary(),
            Self::StlAscii => Ok(mesh.to_stl_ascii(name).into_bytes()),
            Self::Amf => Ok(mesh.to_amf(name, "millimeter").into_bytes()),
            #[cfg(feature = "svg-io")]
            Self::Svg => Ok(mesh.to_svg(&Default::default()).into_bytes()),
        }
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`. The temporary file is deleted if any step fails.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    debug!(temp = %file.path().display(), "writing export");
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
