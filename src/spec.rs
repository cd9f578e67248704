//! Validated bin parameters.

use crate::errors::{Axis, BinResult, SpecError};
use crate::float_types::{EPSILON, Real};
use crate::profile::GridProfile;

/// Smallest interior extent accepted along any axis, in millimetres.
pub const MIN_CAVITY: Real = 1e3 * EPSILON;

/// How one row of cells is split along x.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDivision {
    /// This many cells of equal width.
    Equal(u32),
    /// One cell per entry, each sized relative to the sum of all entries.
    Ratios(Vec<Real>),
}

impl RowDivision {
    /// Number of cells in the row.
    pub fn cells(&self) -> usize {
        match self {
            Self::Equal(count) => *count as usize,
            Self::Ratios(ratios) => ratios.len(),
        }
    }

    /// Relative cell widths, left to right.
    pub fn ratios(&self) -> Vec<Real> {
        match self {
            Self::Equal(count) => vec![1.0; *count as usize],
            Self::Ratios(ratios) => ratios.clone(),
        }
    }
}

impl From<u32> for RowDivision {
    fn from(count: u32) -> Self {
        Self::Equal(count)
    }
}

impl From<Vec<Real>> for RowDivision {
    fn from(ratios: Vec<Real>) -> Self {
        Self::Ratios(ratios)
    }
}

impl<const N: usize> From<[Real; N]> for RowDivision {
    fn from(ratios: [Real; N]) -> Self {
        Self::Ratios(ratios.to_vec())
    }
}

/// Split of the rows along x.
#[derive(Debug, Clone, PartialEq)]
enum Columns {
    /// `dividers_x + 1` equal cells in every row.
    Even,
    /// The same relative widths in every row.
    Ratios(Vec<Real>),
    /// Each row split on its own.
    PerRow(Vec<RowDivision>),
}

/// The parameters of one bin.
///
/// A `BinSpec` can only be obtained through [`BinSpec::new`] or
/// [`BinSpec::builder`], both of which check every invariant against the
/// default [`GridProfile`]. [`generate_with_profile`](crate::generate_with_profile)
/// re-checks against the profile it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    width: u32,
    depth: u32,
    height: u32,
    wall_thickness: Real,
    dividers_x: u32,
    dividers_y: u32,
    columns: Columns,
    label_ledge: bool,
    magnet_holes: bool,
    screw_holes: bool,
    finger_scoop: bool,
    stacking_lip: bool,
}

impl BinSpec {
    /// A plain bin: `width` × `depth` grid units, `height` height units,
    /// with the given wall thickness and equally spaced dividers.
    pub fn new(
        width: u32,
        depth: u32,
        height: u32,
        wall_thickness: Real,
        dividers_x: u32,
        dividers_y: u32,
    ) -> BinResult<Self> {
        Self::builder(width, depth, height)
            .wall_thickness(wall_thickness)
            .dividers(dividers_x, dividers_y)
            .build()
    }

    /// Start a builder with a 1.0 mm wall and no dividers or extras.
    pub fn builder(width: u32, depth: u32, height: u32) -> BinSpecBuilder {
        BinSpecBuilder {
            spec: BinSpec {
                width,
                depth,
                height,
                wall_thickness: 1.0,
                dividers_x: 0,
                dividers_y: 0,
                columns: Columns::Even,
                label_ledge: false,
                magnet_holes: false,
                screw_holes: false,
                finger_scoop: false,
                stacking_lip: false,
            },
        }
    }

    /// Grid units along x.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid units along y.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Height units along z.
    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn wall_thickness(&self) -> Real {
        self.wall_thickness
    }

    /// Dividers along x. Ignored when rows are split one by one.
    pub const fn dividers_x(&self) -> u32 {
        self.dividers_x
    }

    pub const fn dividers_y(&self) -> u32 {
        self.dividers_y
    }

    /// Relative widths shared by every row, if set.
    pub fn x_ratios(&self) -> Option<&[Real]> {
        match &self.columns {
            Columns::Ratios(ratios) => Some(ratios.as_slice()),
            _ => None,
        }
    }

    /// The split of each row, front first, if set.
    pub fn row_divisions(&self) -> Option<&[RowDivision]> {
        match &self.columns {
            Columns::PerRow(rows) => Some(rows.as_slice()),
            _ => None,
        }
    }

    /// Relative cell widths of every row, front first.
    pub fn row_ratios(&self) -> Vec<Vec<Real>> {
        let rows = self.rows() as usize;
        match &self.columns {
            Columns::Even => vec![vec![1.0; self.dividers_x as usize + 1]; rows],
            Columns::Ratios(ratios) => vec![ratios.clone(); rows],
            Columns::PerRow(divisions) => divisions.iter().map(RowDivision::ratios).collect(),
        }
    }

    pub const fn label_ledge(&self) -> bool {
        self.label_ledge
    }

    pub const fn magnet_holes(&self) -> bool {
        self.magnet_holes
    }

    pub const fn screw_holes(&self) -> bool {
        self.screw_holes
    }

    pub const fn finger_scoop(&self) -> bool {
        self.finger_scoop
    }

    pub const fn stacking_lip(&self) -> bool {
        self.stacking_lip
    }

    /// Number of rows along y.
    pub const fn rows(&self) -> u32 {
        self.dividers_y + 1
    }

    /// Check every invariant against `profile`.
    pub fn validate(&self, profile: &GridProfile) -> Result<(), SpecError> {
        profile.validate()?;

        if self.width == 0 {
            return Err(SpecError::ZeroGridUnits { axis: Axis::X });
        }
        if self.depth == 0 {
            return Err(SpecError::ZeroGridUnits { axis: Axis::Y });
        }
        if self.height == 0 {
            return Err(SpecError::ZeroHeight);
        }

        let limit = 0.5 * profile.pitch;
        let wall = self.wall_thickness;
        if !wall.is_finite() || wall <= 0.0 || wall >= limit {
            return Err(SpecError::WallThickness {
                thickness: wall,
                limit,
            });
        }

        check_dividers(Axis::Y, self.dividers_y, self.depth)?;
        match &self.columns {
            Columns::Even => check_dividers(Axis::X, self.dividers_x, self.width)?,
            Columns::Ratios(ratios) => {
                check_dividers(Axis::X, self.dividers_x, self.width)?;
                let expected = self.dividers_x as usize + 1;
                if ratios.len() != expected {
                    return Err(SpecError::RatioCount {
                        axis: Axis::X,
                        expected,
                        actual: ratios.len(),
                    });
                }
                check_ratios(ratios)?;
            }
            Columns::PerRow(divisions) => {
                let expected = self.rows() as usize;
                if divisions.len() != expected {
                    return Err(SpecError::RowCount {
                        expected,
                        actual: divisions.len(),
                    });
                }
                for (row, division) in divisions.iter().enumerate() {
                    let cells = division.cells();
                    if cells == 0 {
                        return Err(SpecError::EmptyRow { row });
                    }
                    check_dividers(Axis::X, cells as u32 - 1, self.width)?;
                    if let RowDivision::Ratios(ratios) = division {
                        check_ratios(ratios)?;
                    }
                }
            }
        }

        // the narrowest cell along each axis must keep some room
        let narrowest_x = self
            .row_ratios()
            .iter()
            .map(|ratios| {
                let free = self.free_span(self.width, ratios.len() as u32 - 1, profile);
                let total: Real = ratios.iter().sum();
                let smallest = ratios.iter().copied().fold(Real::MAX, Real::min);
                free * smallest / total
            })
            .fold(Real::MAX, Real::min);
        if narrowest_x <= MIN_CAVITY {
            return Err(SpecError::NoCavity {
                axis: Axis::X,
                size: narrowest_x,
            });
        }
        let narrowest_y = self.free_span(self.depth, self.dividers_y, profile) / self.rows() as Real;
        if narrowest_y <= MIN_CAVITY {
            return Err(SpecError::NoCavity {
                axis: Axis::Y,
                size: narrowest_y,
            });
        }

        let cavity_height = self.height as Real * profile.height_unit
            - profile.base_height()
            - self.wall_thickness;
        if cavity_height <= MIN_CAVITY {
            return Err(SpecError::NoCavity {
                axis: Axis::Z,
                size: cavity_height,
            });
        }

        Ok(())
    }

    /// Interior length along one axis once the two outer walls and all
    /// dividers are taken away.
    fn free_span(&self, units: u32, dividers: u32, profile: &GridProfile) -> Real {
        units as Real * profile.pitch - (dividers as Real + 2.0) * self.wall_thickness
    }
}

fn check_dividers(axis: Axis, count: u32, units: u32) -> Result<(), SpecError> {
    if count > units - 1 {
        return Err(SpecError::TooManyDividers {
            axis,
            count,
            max: units - 1,
            units,
        });
    }
    Ok(())
}

fn check_ratios(ratios: &[Real]) -> Result<(), SpecError> {
    match ratios
        .iter()
        .enumerate()
        .find(|(_, r)| !r.is_finite() || **r <= 0.0)
    {
        Some((index, &value)) => Err(SpecError::InvalidRatio { index, value }),
        None => Ok(()),
    }
}

/// Builder for [`BinSpec`] with optional features.
#[derive(Debug, Clone)]
pub struct BinSpecBuilder {
    spec: BinSpec,
}

impl BinSpecBuilder {
    pub fn wall_thickness(mut self, thickness: Real) -> Self {
        self.spec.wall_thickness = thickness;
        self
    }

    /// Divider counts along x and y.
    pub fn dividers(mut self, x: u32, y: u32) -> Self {
        self.spec.dividers_x = x;
        self.spec.dividers_y = y;
        self
    }

    /// Relative cell widths shared by every row; one entry per cell.
    /// Replaces any earlier [`row_divisions`](Self::row_divisions).
    pub fn x_ratios(mut self, ratios: impl Into<Vec<Real>>) -> Self {
        self.spec.columns = Columns::Ratios(ratios.into());
        self
    }

    /// Split every row on its own; one entry per row, front first.
    /// The divider count along x is then ignored. Replaces any earlier
    /// [`x_ratios`](Self::x_ratios).
    pub fn row_divisions(mut self, rows: impl IntoIterator<Item = RowDivision>) -> Self {
        self.spec.columns = Columns::PerRow(rows.into_iter().collect());
        self
    }

    pub fn label_ledge(mut self, enabled: bool) -> Self {
        self.spec.label_ledge = enabled;
        self
    }

    pub fn magnet_holes(mut self, enabled: bool) -> Self {
        self.spec.magnet_holes = enabled;
        self
    }

    /// Counterbored screw holes; these replace magnet holes when both are set.
    pub fn screw_holes(mut self, enabled: bool) -> Self {
        self.spec.screw_holes = enabled;
        self
    }

    pub fn finger_scoop(mut self, enabled: bool) -> Self {
        self.spec.finger_scoop = enabled;
        self
    }

    pub fn stacking_lip(mut self, enabled: bool) -> Self {
        self.spec.stacking_lip = enabled;
        self
    }

    /// Validate against the default profile and return the spec.
    pub fn build(self) -> BinResult<BinSpec> {
        self.build_for(&GridProfile::default())
    }

    /// Validate against `profile` and return the spec.
    pub fn build_for(self, profile: &GridProfile) -> BinResult<BinSpec> {
        self.spec.validate(profile)?;
        Ok(self.spec)
    }
}
