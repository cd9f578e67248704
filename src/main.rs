// main.rs
//
// Builds one bin from the constants below and writes it next to the binary's
// working directory as `output.stl`, `output.amf` and `output.svg`.
// Set RUST_LOG=debug to follow each construction step.

use gridbin::{BinResult, BinSpec, ExportFormat, RowDivision, float_types::Real, generate};
use tracing_subscriber::EnvFilter;

/// Grid units wide (left to right).
const UNITS_WIDE: u32 = 4;
/// Grid units long (front to back).
const UNITS_LONG: u32 = 3;
/// Height units (7 mm each).
const UNITS_HIGH: u32 = 4;

const WALL_THICKNESS: Real = 1.0;

const DRAW_FINGER_SCOOP: bool = true;
const DRAW_LABEL_LEDGE: bool = true;
const MAKE_MAGNET_HOLE: bool = false;
const MAKE_SCREW_HOLE: bool = false;
const STACKING_LIP: bool = true;

/// How each row is split, front first; one entry per unit of length.
fn divisions() -> [RowDivision; UNITS_LONG as usize] {
    [
        // three drawers, the outer two half the size of the middle one
        RowDivision::Ratios(vec![1.0, 2.0, 1.0]),
        // three equal drawers
        RowDivision::Equal(3),
        // ratios are relative, so percentages work too
        RowDivision::Ratios(vec![10.0, 90.0]),
    ]
}

fn main() -> BinResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let spec = BinSpec::builder(UNITS_WIDE, UNITS_LONG, UNITS_HIGH)
        .wall_thickness(WALL_THICKNESS)
        .dividers(0, UNITS_LONG - 1)
        .row_divisions(divisions())
        .finger_scoop(DRAW_FINGER_SCOOP)
        .label_ledge(DRAW_LABEL_LEDGE)
        .magnet_holes(MAKE_MAGNET_HOLE)
        .screw_holes(MAKE_SCREW_HOLE)
        .stacking_lip(STACKING_LIP)
        .build()?;

    let model = generate(&spec)?;
    model.export("output.stl")?;
    model.export_as("output.amf", ExportFormat::Amf)?;
    #[cfg(feature = "svg-io")]
    model.export("output.svg")?;

    let bb = model.bounding_box();
    println!(
        "wrote output.stl, output.amf and output.svg: {} triangles, {:.1} x {:.1} x {:.1} mm",
        model.triangle_count(),
        bb.maxs.x - bb.mins.x,
        bb.maxs.y - bb.mins.y,
        bb.maxs.z - bb.mins.z,
    );
    Ok(())
}
