//! Closed 2D outlines (counter‑clockwise point loops) used as extrusion and loft profiles.

use crate::float_types::{EPSILON, FRAC_PI_2, PI, Real, TAU};
use nalgebra::Point2;

/// Axis aligned rectangle with rounded corners, counter‑clockwise, starting
/// at the bottom‑left arc.
///
/// Every outline produced with the same `corner_segments` has the same
/// number of points, and points with the same index on two outlines that
/// differ only by an inset have parallel edges, so they can be lofted.
///
/// Points on the outer edges are snapped onto `min` / `max` exactly.
pub fn rounded_rect(
    min: [Real; 2],
    max: [Real; 2],
    corner_radius: Real,
    corner_segments: usize,
) -> Vec<Point2<Real>> {
    let [x0, y0] = min;
    let [x1, y1] = max;
    let half_extent = 0.5 * (x1 - x0).min(y1 - y0);
    // stay clear of half the extent so straight edges keep a nonzero length
    let r = corner_radius.min(half_extent * 0.95);
    if r <= EPSILON || corner_segments == 0 {
        return rect(min, max);
    }

    let step = FRAC_PI_2 / corner_segments as Real;
    let corner = |cx: Real, cy: Real, start_angle: Real| {
        (0..=corner_segments).map(move |i| {
            let angle = start_angle + (i as Real) * step;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
    };

    let snap = |v: Real, lo: Real, hi: Real| {
        if (v - lo).abs() < EPSILON {
            lo
        } else if (v - hi).abs() < EPSILON {
            hi
        } else {
            v
        }
    };

    corner(x0 + r, y0 + r, PI) // Bottom-left
        .chain(corner(x1 - r, y0 + r, 1.5 * PI)) // Bottom-right
        .chain(corner(x1 - r, y1 - r, 0.0)) // Top-right
        .chain(corner(x0 + r, y1 - r, 0.5 * PI)) // Top-left
        .map(|(x, y)| Point2::new(snap(x, x0, x1), snap(y, y0, y1)))
        .collect()
}

/// [`rounded_rect`] shrunk by `inset` on every side; the corner radius
/// shrinks with it so the result is a true offset curve.
pub fn rounded_rect_inset(
    min: [Real; 2],
    max: [Real; 2],
    corner_radius: Real,
    inset: Real,
    corner_segments: usize,
) -> Vec<Point2<Real>> {
    rounded_rect(
        [min[0] + inset, min[1] + inset],
        [max[0] - inset, max[1] - inset],
        corner_radius - inset,
        corner_segments,
    )
}

/// Plain axis aligned rectangle, counter‑clockwise from `min`.
pub fn rect(min: [Real; 2], max: [Real; 2]) -> Vec<Point2<Real>> {
    vec![
        Point2::new(min[0], min[1]),
        Point2::new(max[0], min[1]),
        Point2::new(max[0], max[1]),
        Point2::new(min[0], max[1]),
    ]
}

/// Regular polygon approximating a circle, counter‑clockwise.
pub fn circle(center: [Real; 2], radius: Real, segments: usize) -> Vec<Point2<Real>> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as Real / segments as Real;
            Point2::new(
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            )
        })
        .collect()
}

/// Signed area of a closed outline; positive for counter‑clockwise loops.
pub fn signed_area(points: &[Point2<Real>]) -> Real {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<Real>()
        * 0.5
}
