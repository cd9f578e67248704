//! Mesh serialization: STL (binary and ASCII), AMF and SVG drawings.
//!
//! Binary STL goes through `stl_io` and is behind the `stl-io` cargo
//! feature, SVG goes through `svg` behind `svg-io`; the other text formats
//! are always available.

pub mod amf;
pub mod stl;
#[cfg(feature = "svg-io")]
pub mod svg;
