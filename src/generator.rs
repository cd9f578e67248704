//! Bin construction.
//!
//! The solid is assembled in a fixed order:
//!
//! 1. the rounded shell from the top of the base to the full height, united
//!    with one stepped lug per grid unit underneath;
//! 2. every cell cut out of the shell down to the cavity floor;
//! 3. the stacking recess cut into the top;
//! 4. finger scoops and label ledges added back into the cells;
//! 5. magnet or screw holes drilled into the underside.
//!
//! Cutting tools always reach past the faces they open (cells rise above
//! the top, holes start below the bottom) and added pieces are sunk into the
//! solid they attach to, so no boolean operation works on coincident faces
//! except where a flat top is meant to stay flush.

use crate::errors::BinResult;
use crate::float_types::Real;
use crate::layout::{BinLayout, HoleKind, Ledge};
use crate::mesh::Mesh;
use crate::model::{Feature, Model};
use crate::outline;
use crate::profile::GridProfile;
use crate::spec::BinSpec;
use crate::traits::CSG;
use nalgebra::Point2;
use tracing::{debug, info};

/// Build a bin on the default Gridfinity profile.
pub fn generate(spec: &BinSpec) -> BinResult<Model> {
    generate_with_profile(spec, &GridProfile::default())
}

/// Build a bin on an explicit grid profile.
///
/// `spec` is validated against `profile` before any geometry is computed.
/// The result depends only on the two arguments.
pub fn generate_with_profile(spec: &BinSpec, profile: &GridProfile) -> BinResult<Model> {
    spec.validate(profile)?;
    let layout = BinLayout::new(spec, profile);
    info!(
        width = spec.width(),
        depth = spec.depth(),
        height = spec.height(),
        cells = layout.cells.len(),
        "generating bin"
    );

    let parts = Parts {
        profile,
        layout: &layout,
    };

    let mut solid = parts.shell().union(&parts.lugs());
    debug!(polygons = solid.polygons.len(), "shell and base");

    solid = solid.difference(&parts.cells());
    debug!(polygons = solid.polygons.len(), "cells cut");

    if let Some(pocket) = parts.lip_pocket() {
        solid = solid.difference(&pocket);
        debug!(polygons = solid.polygons.len(), "stacking lip cut");
    }

    if let Some(extras) = parts.scoops_and_ledges() {
        solid = solid.union(&extras);
        debug!(polygons = solid.polygons.len(), "scoops and ledges added");
    }

    if let Some(holes) = parts.holes() {
        solid = solid.difference(&holes);
        debug!(polygons = solid.polygons.len(), "base holes drilled");
    }

    let model = Model::new(solid, layout);
    info!(
        polygons = model.mesh().polygons.len(),
        triangles = model.triangle_count(),
        "bin generated"
    );
    Ok(model)
}

/// Builds the individual solids of one bin.
struct Parts<'a> {
    profile: &'a GridProfile,
    layout: &'a BinLayout,
}

impl Parts<'_> {
    /// How far attached pieces reach into the walls and floor.
    fn embed(&self) -> Real {
        0.5 * self.layout.wall
    }

    fn shell(&self) -> Mesh<Feature> {
        let [w, d, h] = self.layout.size;
        let outline = outline::rounded_rect(
            [0.0, 0.0],
            [w, d],
            self.profile.corner_radius,
            self.profile.corner_segments,
        );
        Mesh::prism(&outline, self.layout.floor_z, h, Some(Feature::Shell))
    }

    /// Stepped rings following the base profile inside `[min, max]`, whose
    /// top outline sits half the clearance inside the rectangle. Rings are
    /// lifted by `z0`.
    fn profile_rings(
        &self,
        min: [Real; 2],
        max: [Real; 2],
        z0: Real,
    ) -> Vec<(Vec<Point2<Real>>, Real)> {
        let p = self.profile;
        let margin = 0.5 * p.clearance;
        p.base_profile
            .iter()
            .map(|step| {
                (
                    outline::rounded_rect_inset(
                        min,
                        max,
                        p.corner_radius + margin,
                        margin + step.inset,
                        p.corner_segments,
                    ),
                    z0 + step.z,
                )
            })
            .collect()
    }

    /// One lug per grid unit, each rising half a wall into the shell floor.
    fn lugs(&self) -> Mesh<Feature> {
        let half = 0.5 * self.profile.pitch;
        let lugs: Vec<Mesh<Feature>> = self
            .layout
            .lug_centres
            .iter()
            .map(|&[cx, cy]| {
                let mut rings =
                    self.profile_rings([cx - half, cy - half], [cx + half, cy + half], 0.0);
                if let Some(top) = rings.last().map(|(outline, _)| outline.clone()) {
                    rings.push((top, self.layout.floor_z + self.embed()));
                }
                loft(&rings, Feature::Base)
            })
            .collect();
        Mesh::union_all(&lugs)
    }

    /// All cells, each open above the top of the bin.
    fn cells(&self) -> Mesh<Feature> {
        let top = self.layout.size[2] + 1.0;
        let cells: Vec<Mesh<Feature>> = self
            .layout
            .cells
            .iter()
            .map(|cell| {
                let outline = outline::rounded_rect(
                    cell.min,
                    cell.max,
                    self.profile.cell_radius,
                    self.profile.corner_segments,
                );
                Mesh::prism(&outline, self.layout.cavity_floor, top, Some(Feature::Cavity))
            })
            .collect();
        Mesh::union_all(&cells)
    }

    /// The base profile scaled to the whole footprint and stood on the lip
    /// floor, extended straight up past the top.
    fn lip_pocket(&self) -> Option<Mesh<Feature>> {
        let lip = self.layout.lip?;
        let [w, d, _] = self.layout.size;
        let mut rings = self.profile_rings([0.0, 0.0], [w, d], lip.floor);
        if let Some(top) = rings.last().map(|(outline, _)| outline.clone()) {
            rings.push((top, lip.top + 1.0));
        }
        Some(loft(&rings, Feature::Lip))
    }

    /// Finger scoops along the front and label ledges along the back of every
    /// row, trimmed to stay inside the outer walls.
    ///
    /// Scoops reach half a wall into the walls, ledges a quarter, and the trim
    /// outline sits a quarter wall inside the outer surface, so none of their
    /// faces coincide.
    fn scoops_and_ledges(&self) -> Option<Mesh<Feature>> {
        let layout = self.layout;
        let e = self.embed();
        let [w, d, h] = layout.size;
        let (x0, x1) = (layout.wall - e, w - layout.wall + e);
        let ledge_e = 0.5 * e;

        let mut pieces = Vec::new();
        for (y0, y1) in layout.row_spans() {
            if let Some(r) = layout.scoop_radius {
                pieces.push(Mesh::sweep_x(
                    &scoop_profile(y0, layout.cavity_floor, r, e),
                    x0,
                    x1,
                    Some(Feature::FingerScoop),
                ));
            }
            if let Some(ledge) = layout.ledge {
                pieces.push(Mesh::sweep_x(
                    &ledge_profile(y1, ledge, ledge_e),
                    layout.wall - ledge_e,
                    w - layout.wall + ledge_e,
                    Some(Feature::LabelLedge),
                ));
            }
        }
        if pieces.is_empty() {
            return None;
        }

        // the rounded outer corners cut through the buried ends
        let trim = Mesh::prism(
            &outline::rounded_rect_inset(
                [0.0, 0.0],
                [w, d],
                self.profile.corner_radius,
                0.5 * e,
                self.profile.corner_segments,
            ),
            layout.floor_z,
            h + 1.0,
            Some(Feature::Shell),
        );
        Some(Mesh::union_all(&pieces).intersection(&trim))
    }

    /// Magnet pockets, or screw holes counterbored with a magnet pocket.
    fn holes(&self) -> Option<Mesh<Feature>> {
        let kind = self.layout.hole_kind?;
        let p = self.profile;
        let segments = p.circle_segments;
        let feature = match kind {
            HoleKind::Magnet => Feature::MagnetHole,
            HoleKind::Screw => Feature::ScrewHole,
        };
        // stays clear of the cavity floor
        let screw_top = p
            .screw_depth
            .min(self.layout.cavity_floor - self.embed());

        let holes: Vec<Mesh<Feature>> = self
            .layout
            .holes
            .iter()
            .map(|&center| {
                let pocket = Mesh::cylinder(
                    center,
                    0.5 * p.magnet_diameter,
                    -1.0,
                    p.magnet_depth,
                    segments,
                    Some(feature),
                );
                match kind {
                    HoleKind::Screw if screw_top > 0.5 * p.magnet_depth => {
                        let shaft = Mesh::cylinder(
                            center,
                            0.5 * p.screw_diameter,
                            0.5 * p.magnet_depth,
                            screw_top,
                            segments,
                            Some(feature),
                        );
                        pocket.union(&shaft)
                    }
                    _ => pocket,
                }
            })
            .collect();
        Some(Mesh::union_all(&holes))
    }
}

fn loft(rings: &[(Vec<Point2<Real>>, Real)], feature: Feature) -> Mesh<Feature> {
    let rings: Vec<(&[Point2<Real>], Real)> = rings
        .iter()
        .map(|(outline, z)| (outline.as_slice(), *z))
        .collect();
    Mesh::loft(&rings, Some(feature))
}

/// Quarter-round ramp in the (y, z) plane: filled between the front wall at
/// `y0`, the cavity floor at `z0` and an arc of radius `r`. Star shaped
/// around its first point, which is buried `e` inside the wall and floor.
fn scoop_profile(y0: Real, z0: Real, r: Real, e: Real) -> Vec<Point2<Real>> {
    use crate::float_types::PI;
    const ARC_SEGMENTS: usize = 8;

    let mut points = vec![
        Point2::new(y0 - e, z0 - e),
        Point2::new(y0 + r, z0 - e),
    ];
    let (cy, cz) = (y0 + r, z0 + r);
    // from straight below the centre round to straight left of it
    points.extend((0..=ARC_SEGMENTS).map(|i| {
        let angle = 1.5 * PI - 0.5 * PI * i as Real / ARC_SEGMENTS as Real;
        Point2::new(cy + r * angle.cos(), cz + r * angle.sin())
    }));
    points.push(Point2::new(y0 - e, z0 + r));
    points
}

/// Triangular shelf hanging from the back wall at `y1`, flush with
/// `ledge.top`, sloping down at 45° underneath. Buried `e` into the wall.
fn ledge_profile(y1: Real, ledge: Ledge, e: Real) -> Vec<Point2<Real>> {
    vec![
        Point2::new(y1 + e, ledge.top),
        Point2::new(y1 - ledge.depth, ledge.top),
        Point2::new(y1 + e, ledge.top - ledge.depth - e),
    ]
}
