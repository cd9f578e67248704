//! Numeric layout of a bin.
//!
//! [`BinLayout::new`] turns a validated [`BinSpec`] and a [`GridProfile`] into
//! plain coordinates: the outer box, the cavity cells, the lug and hole
//! centres, and the parameters of every optional feature that fits. No
//! geometry is built here.

use crate::float_types::{EPSILON, Real};
use crate::profile::GridProfile;
use crate::spec::BinSpec;
use tracing::warn;

/// One cavity cell, in plan view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub column: u32,
    pub row: u32,
    pub min: [Real; 2],
    pub max: [Real; 2],
}

impl Cell {
    /// Extent along x.
    pub fn width(&self) -> Real {
        self.max[0] - self.min[0]
    }

    /// Extent along y.
    pub fn depth(&self) -> Real {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [Real; 2] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
        ]
    }

    /// Whether `(x, y)` lies strictly inside the cell outline's bounding rectangle.
    pub fn contains(&self, x: Real, y: Real) -> bool {
        x > self.min[0] && x < self.max[0] && y > self.min[1] && y < self.max[1]
    }
}

/// Which kind of hole is cut under each grid unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleKind {
    Magnet,
    /// Screw hole counterbored with a magnet pocket.
    Screw,
}

/// Recess at the top of the bin that accepts the base of a bin stacked on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lip {
    /// Bottom of the recess; dividers are cut down to this height.
    pub floor: Real,
    /// Top of the bin.
    pub top: Real,
}

/// Label ledge along the back of every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ledge {
    /// Height of the ledge's flat top.
    pub top: Real,
    /// How far the ledge reaches forward from the back of its row.
    pub depth: Real,
}

/// All coordinates of one bin, derived from its spec and profile.
#[derive(Debug, Clone, PartialEq)]
pub struct BinLayout {
    /// Outer size along x, y and z. The bin occupies `[0, size]` on each axis.
    pub size: [Real; 3],
    pub wall: Real,
    /// Top of the base lugs and bottom of the shell.
    pub floor_z: Real,
    /// Top of the solid floor inside the cells.
    pub cavity_floor: Real,
    /// Height of the dividers between cells.
    pub divider_top: Real,
    /// Cells in row‑major order, front row first.
    pub cells: Vec<Cell>,
    /// Centre of every grid unit of the footprint.
    pub lug_centres: Vec<[Real; 2]>,
    /// Hole centres under the base, empty without holes.
    pub holes: Vec<[Real; 2]>,
    pub hole_kind: Option<HoleKind>,
    pub lip: Option<Lip>,
    pub scoop_radius: Option<Real>,
    pub ledge: Option<Ledge>,
}

impl BinLayout {
    /// Compute the layout. `spec` must already be valid for `profile`.
    pub fn new(spec: &BinSpec, profile: &GridProfile) -> Self {
        let wall = spec.wall_thickness();
        let size = [
            spec.width() as Real * profile.pitch,
            spec.depth() as Real * profile.pitch,
            spec.height() as Real * profile.height_unit,
        ];
        let floor_z = profile.base_height();
        let cavity_floor = floor_z + wall;

        let rows = split_span(size[1], wall, &vec![1.0; spec.rows() as usize]);

        let mut cells = Vec::new();
        for (row, (&(y0, y1), ratios)) in rows.iter().zip(spec.row_ratios()).enumerate() {
            for (column, (x0, x1)) in split_span(size[0], wall, &ratios).into_iter().enumerate() {
                cells.push(Cell {
                    column: column as u32,
                    row: row as u32,
                    min: [x0, y0],
                    max: [x1, y1],
                });
            }
        }
        if let Some(narrowest) = cells
            .iter()
            .map(Cell::width)
            .reduce(Real::min)
            .filter(|w| *w < profile.small_cell_width)
        {
            warn!(
                width = narrowest,
                threshold = profile.small_cell_width,
                "cell narrower than recommended"
            );
        }

        let lug_centres = (0..spec.depth())
            .flat_map(|j| {
                (0..spec.width()).map(move |i| {
                    [
                        (i as Real + 0.5) * profile.pitch,
                        (j as Real + 0.5) * profile.pitch,
                    ]
                })
            })
            .collect::<Vec<_>>();

        let hole_kind = if spec.screw_holes() {
            Some(HoleKind::Screw)
        } else if spec.magnet_holes() {
            Some(HoleKind::Magnet)
        } else {
            None
        };
        let holes = match hole_kind {
            Some(_) => {
                let d = 0.5 * profile.hole_spacing;
                lug_centres
                    .iter()
                    .flat_map(|&[cx, cy]| {
                        [
                            [cx - d, cy - d],
                            [cx + d, cy - d],
                            [cx + d, cy + d],
                            [cx - d, cy + d],
                        ]
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let lip = if spec.stacking_lip() {
            let lip_floor = size[2] - floor_z;
            if lip_floor > cavity_floor + EPSILON {
                Some(Lip {
                    floor: lip_floor,
                    top: size[2],
                })
            } else {
                warn!(
                    height = size[2],
                    "bin is too short for a stacking lip, skipping it"
                );
                None
            }
        } else {
            None
        };
        let divider_top = lip.map_or(size[2], |lip| lip.floor);
        let usable_height = divider_top - cavity_floor;
        let row_depth = rows
            .iter()
            .map(|&(y0, y1)| y1 - y0)
            .fold(Real::MAX, Real::min);

        let scoop_radius = spec.finger_scoop().then(|| {
            (profile.scoop_height_fraction * usable_height)
                .min(profile.scoop_depth_fraction * row_depth)
        });

        let ledge = if spec.label_ledge() {
            let depth = profile.label_ledge_depth.min(0.75 * row_depth);
            if usable_height < depth + 0.5 {
                warn!(
                    height = usable_height,
                    ledge_depth = depth,
                    "label ledges cannot be drawn as the bin is too low"
                );
                None
            } else {
                Some(Ledge {
                    top: divider_top,
                    depth,
                })
            }
        } else {
            None
        };

        BinLayout {
            size,
            wall,
            floor_z,
            cavity_floor,
            divider_top,
            cells,
            lug_centres,
            holes,
            hole_kind,
            lip,
            scoop_radius,
            ledge,
        }
    }

    /// The `(min_y, max_y)` span of every row, front first.
    pub fn row_spans(&self) -> Vec<(Real, Real)> {
        self.cells
            .iter()
            .filter(|c| c.column == 0)
            .map(|c| (c.min[1], c.max[1]))
            .collect()
    }

    /// The x centre of every divider wall between neighbouring cells of `row`.
    pub fn divider_centres_x(&self, row: u32) -> Vec<Real> {
        let cells: Vec<&Cell> = self.cells.iter().filter(|c| c.row == row).collect();
        cells
            .windows(2)
            .map(|pair| 0.5 * (pair[0].max[0] + pair[1].min[0]))
            .collect()
    }

    /// The y centre of every divider wall between neighbouring rows.
    pub fn divider_centres_y(&self) -> Vec<Real> {
        self.row_spans()
            .windows(2)
            .map(|pair| 0.5 * (pair[0].1 + pair[1].0))
            .collect()
    }

    /// The cell containing `(x, y)` in plan view, if any.
    pub fn cell_at(&self, x: Real, y: Real) -> Option<&Cell> {
        self.cells.iter().find(|c| c.contains(x, y))
    }
}

/// Split `[wall, length - wall]` into cells with the given relative sizes,
/// separated by partitions of thickness `wall`.
fn split_span(length: Real, wall: Real, ratios: &[Real]) -> Vec<(Real, Real)> {
    let free = length - (ratios.len() as Real + 1.0) * wall;
    let total: Real = ratios.iter().sum();
    let mut spans = Vec::with_capacity(ratios.len());
    let mut start = wall;
    for (i, ratio) in ratios.iter().enumerate() {
        let end = if i + 1 == ratios.len() {
            length - wall
        } else {
            start + free * ratio / total
        };
        spans.push((start, end));
        start = end + wall;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::RowDivision;
    use approx::assert_relative_eq;

    #[test]
    fn two_equal_cells_along_x() {
        let spec = BinSpec::new(2, 3, 1, 1.0, 1, 0).expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        assert_eq!(layout.size, [84.0, 126.0, 7.0]);
        assert_eq!(layout.cells.len(), 2);
        assert_relative_eq!(layout.cells[0].width(), 40.5, epsilon = 1e-9);
        assert_relative_eq!(layout.cells[1].width(), 40.5, epsilon = 1e-9);
        assert_relative_eq!(layout.cells[0].depth(), 124.0, epsilon = 1e-9);
        assert_eq!(layout.divider_centres_x(0), vec![42.0]);
        assert!(layout.divider_centres_y().is_empty());
        assert_eq!(layout.lug_centres.len(), 6);
        assert!(layout.holes.is_empty());
        assert_relative_eq!(layout.cavity_floor, 5.75, epsilon = 1e-12);
    }

    #[test]
    fn ratios_scale_cells() {
        let spec = BinSpec::builder(4, 1, 3)
            .dividers(2, 0)
            .x_ratios([1.0, 2.0, 1.0])
            .build()
            .expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        let widths: Vec<Real> = layout.cells.iter().map(Cell::width).collect();
        // 168 - 4 walls = 164 free
        assert_relative_eq!(widths[0], 41.0, epsilon = 1e-9);
        assert_relative_eq!(widths[1], 82.0, epsilon = 1e-9);
        assert_relative_eq!(widths[2], 41.0, epsilon = 1e-9);
        assert_eq!(layout.cells[2].max[0], 167.0);
    }

    #[test]
    fn rows_split_independently() {
        let spec = BinSpec::builder(4, 3, 4)
            .dividers(0, 2)
            .row_divisions([
                RowDivision::Ratios(vec![1.0, 2.0, 1.0]),
                RowDivision::Equal(3),
                RowDivision::Ratios(vec![10.0, 90.0]),
            ])
            .build()
            .expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        assert_eq!(layout.cells.len(), 8);
        assert_eq!(layout.row_spans().len(), 3);

        let widths = |row: u32| -> Vec<Real> {
            layout
                .cells
                .iter()
                .filter(|c| c.row == row)
                .map(Cell::width)
                .collect()
        };
        // 168 - 4 walls = 164 free with three cells, 165 with two
        assert_relative_eq!(widths(0)[1], 82.0, epsilon = 1e-9);
        for width in widths(1) {
            assert_relative_eq!(width, 164.0 / 3.0, epsilon = 1e-9);
        }
        assert_relative_eq!(widths(2)[0], 16.5, epsilon = 1e-9);
        assert_relative_eq!(widths(2)[1], 148.5, epsilon = 1e-9);

        assert_eq!(layout.divider_centres_x(0).len(), 2);
        assert_relative_eq!(layout.divider_centres_x(0)[0], 42.5, epsilon = 1e-9);
        assert_relative_eq!(layout.divider_centres_x(2)[0], 18.0, epsilon = 1e-9);
        assert!(layout.divider_centres_x(3).is_empty());
        for row in 0..3 {
            let last = layout.cells.iter().rev().find(|c| c.row == row);
            assert_eq!(last.map(|c| c.max[0]), Some(167.0));
        }
    }

    #[test]
    fn row_major_cells() {
        let spec = BinSpec::new(2, 2, 3, 1.2, 1, 1).expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        let order: Vec<(u32, u32)> = layout.cells.iter().map(|c| (c.row, c.column)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(layout.row_spans().len(), 2);
        assert!(layout.cell_at(20.0, 20.0).is_some());
        assert!(layout.cell_at(42.0, 20.0).is_none());
    }

    #[test]
    fn holes_four_per_unit_and_screw_wins() {
        let spec = BinSpec::builder(2, 1, 3)
            .magnet_holes(true)
            .screw_holes(true)
            .build()
            .expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        assert_eq!(layout.hole_kind, Some(HoleKind::Screw));
        assert_eq!(layout.holes.len(), 8);
        assert!(layout.holes.contains(&[8.0, 8.0]));
        assert!(layout.holes.contains(&[76.0, 34.0]));
    }

    #[test]
    fn optional_features_dropped_when_too_low() {
        let spec = BinSpec::builder(1, 1, 1)
            .label_ledge(true)
            .stacking_lip(true)
            .finger_scoop(true)
            .build()
            .expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        assert_eq!(layout.lip, None);
        assert_eq!(layout.ledge, None);
        assert_eq!(layout.divider_top, 7.0);
        assert!(layout.scoop_radius.is_some());
    }

    #[test]
    fn tall_bin_keeps_features() {
        let spec = BinSpec::builder(2, 2, 6)
            .dividers(0, 1)
            .label_ledge(true)
            .stacking_lip(true)
            .finger_scoop(true)
            .build()
            .expect("valid");
        let layout = BinLayout::new(&spec, &GridProfile::default());
        let lip = layout.lip.expect("lip fits");
        assert_relative_eq!(lip.floor, 42.0 - 4.75, epsilon = 1e-12);
        assert_eq!(layout.divider_top, lip.floor);
        let ledge = layout.ledge.expect("ledge fits");
        assert_eq!(ledge.depth, 12.75);
        assert_eq!(ledge.top, lip.floor);
        let r = layout.scoop_radius.expect("scoop");
        assert!(r > 0.0 && r < layout.divider_top - layout.cavity_floor);
    }
}
