//! Parametric storage bins for the **Gridfinity** modular grid, built with
//! **Constructive Solid Geometry (CSG)** on polygon meshes stored in
//! [BSP](mesh::bsp) trees.
//!
//! ```no_run
//! use gridbin::{BinSpec, generate};
//!
//! # fn main() -> Result<(), gridbin::BinError> {
//! let spec = BinSpec::builder(2, 3, 4)
//!     .wall_thickness(1.2)
//!     .dividers(1, 2)
//!     .label_ledge(true)
//!     .magnet_holes(true)
//!     .build()?;
//! let model = generate(&spec)?;
//! model.export("bin.stl")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): binary `.stl` export through `stl_io`
//! - [**svg-io**](https://en.wikipedia.org/wiki/SVG): shaded `.svg` drawings through `svg`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod generator;
pub mod io;
pub mod layout;
pub mod mesh;
pub mod model;
pub mod outline;
pub mod profile;
pub mod spec;
pub mod traits;
pub mod triangulated;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{Axis, BinError, BinResult, SpecError};
pub use generator::{generate, generate_with_profile};
pub use layout::BinLayout;
pub use model::{ExportFormat, Feature, Model, export};
pub use profile::{GridProfile, ProfileStep};
pub use spec::{BinSpec, BinSpecBuilder, RowDivision};
pub use traits::CSG;
