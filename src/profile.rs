//! Grid dimensions and calibration values.
//!
//! Everything the generator needs to know about the grid system lives in a
//! [`GridProfile`] that is passed in explicitly; [`GridProfile::default`] is
//! the Gridfinity profile.

use crate::errors::SpecError;
use crate::float_types::Real;

/// One ring of the stepped base profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileStep {
    /// Height above the bottom of the lug.
    pub z: Real,
    /// How far the ring sits inside the lug's top outline.
    pub inset: Real,
}

impl ProfileStep {
    pub const fn new(z: Real, inset: Real) -> Self {
        Self { z, inset }
    }
}

/// Grid system dimensions and printing tolerances, in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct GridProfile {
    /// Size of one grid unit along x and y.
    pub pitch: Real,
    /// Size of one height unit.
    pub height_unit: Real,
    /// Total gap between the lugs of neighbouring bins.
    pub clearance: Real,
    /// Outer corner radius of the shell and of each lug top.
    pub corner_radius: Real,
    /// Corner radius of the cavity cells.
    pub cell_radius: Real,
    /// Lug rings from the bottom up; the last ring is the lug top outline.
    pub base_profile: Vec<ProfileStep>,
    /// Arc segments per 90° corner.
    pub corner_segments: usize,
    /// Segments used for round holes.
    pub circle_segments: usize,
    pub magnet_diameter: Real,
    pub magnet_depth: Real,
    pub screw_diameter: Real,
    pub screw_depth: Real,
    /// Distance between the four hole centres of one grid unit.
    pub hole_spacing: Real,
    /// Depth of a label ledge, measured from the back of its row.
    pub label_ledge_depth: Real,
    /// Cells narrower than this are reported as a warning.
    pub small_cell_width: Real,
    /// Finger scoop radius as a fraction of the usable cavity height.
    pub scoop_height_fraction: Real,
    /// Finger scoop radius as a fraction of the row depth.
    pub scoop_depth_fraction: Real,
}

impl Default for GridProfile {
    fn default() -> Self {
        Self {
            pitch: 42.0,
            height_unit: 7.0,
            clearance: 0.5,
            corner_radius: 3.75,
            cell_radius: 3.0,
            base_profile: vec![
                ProfileStep::new(0.0, 2.95),
                ProfileStep::new(0.8, 2.15),
                ProfileStep::new(2.6, 2.15),
                ProfileStep::new(4.75, 0.0),
            ],
            corner_segments: 4,
            circle_segments: 16,
            magnet_diameter: 6.5,
            magnet_depth: 2.4,
            screw_diameter: 3.0,
            screw_depth: 6.0,
            hole_spacing: 26.0,
            label_ledge_depth: 12.75,
            small_cell_width: 15.0,
            scoop_height_fraction: 0.6,
            scoop_depth_fraction: 0.9,
        }
    }
}

impl GridProfile {
    /// Height of the base: the z of the last profile ring.
    pub fn base_height(&self) -> Real {
        self.base_profile.last().map_or(0.0, |step| step.z)
    }

    /// Side length of a lug's top outline.
    pub fn lug_size(&self) -> Real {
        self.pitch - self.clearance
    }

    /// Largest inset of any base profile ring.
    pub fn max_inset(&self) -> Real {
        self.base_profile
            .iter()
            .map(|step| step.inset)
            .fold(0.0, Real::max)
    }

    /// Check that the profile describes buildable geometry.
    pub fn validate(&self) -> Result<(), SpecError> {
        let positive = [
            ("pitch", self.pitch),
            ("height_unit", self.height_unit),
            ("corner_radius", self.corner_radius),
            ("cell_radius", self.cell_radius),
            ("magnet_diameter", self.magnet_diameter),
            ("magnet_depth", self.magnet_depth),
            ("screw_diameter", self.screw_diameter),
            ("screw_depth", self.screw_depth),
            ("hole_spacing", self.hole_spacing),
            ("label_ledge_depth", self.label_ledge_depth),
            ("scoop_height_fraction", self.scoop_height_fraction),
            ("scoop_depth_fraction", self.scoop_depth_fraction),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SpecError::invalid_profile(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("clearance", self.clearance),
            ("small_cell_width", self.small_cell_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_profile(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.clearance >= self.pitch {
            return Err(SpecError::invalid_profile(
                "clearance must be smaller than the pitch",
            ));
        }
        if self.corner_segments < 1 {
            return Err(SpecError::invalid_profile(
                "corner_segments must be at least 1",
            ));
        }
        if self.circle_segments < 3 {
            return Err(SpecError::invalid_profile(
                "circle_segments must be at least 3",
            ));
        }

        if self.base_profile.len() < 2 {
            return Err(SpecError::invalid_profile(
                "base_profile needs at least two rings",
            ));
        }
        if self.base_profile[0].z != 0.0 {
            return Err(SpecError::invalid_profile(
                "base_profile must start at z = 0",
            ));
        }
        for pair in self.base_profile.windows(2) {
            if !(pair[1].z > pair[0].z) {
                return Err(SpecError::invalid_profile(
                    "base_profile heights must be strictly increasing",
                ));
            }
        }
        if self
            .base_profile
            .iter()
            .any(|step| !step.inset.is_finite() || step.inset < 0.0)
        {
            return Err(SpecError::invalid_profile(
                "base_profile insets must not be negative",
            ));
        }
        if self.base_profile.last().map(|step| step.inset) != Some(0.0) {
            return Err(SpecError::invalid_profile(
                "the last base_profile ring must have zero inset",
            ));
        }
        // every ring keeps a rounded corner so rings stay loftable
        if self.corner_radius <= self.max_inset() {
            return Err(SpecError::invalid_profile(
                "corner_radius must exceed the largest base profile inset",
            ));
        }
        if 2.0 * self.max_inset() >= self.lug_size() {
            return Err(SpecError::invalid_profile(
                "base_profile insets are too large for the pitch",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        let profile = GridProfile::default();
        assert_eq!(profile.validate(), Ok(()));
        assert_eq!(profile.base_height(), 4.75);
        assert_eq!(profile.lug_size(), 41.5);
        assert_eq!(profile.max_inset(), 2.95);
    }

    #[test]
    fn rejects_non_monotonic_base() {
        let mut profile = GridProfile::default();
        profile.base_profile[2].z = 0.5;
        assert!(matches!(
            profile.validate(),
            Err(SpecError::InvalidProfile(_))
        ));
    }

    #[test]
    fn rejects_bad_scalars() {
        let profile = GridProfile {
            pitch: Real::NAN,
            ..GridProfile::default()
        };
        assert!(profile.validate().is_err());

        let profile = GridProfile {
            circle_segments: 2,
            ..GridProfile::default()
        };
        assert!(profile.validate().is_err());

        let profile = GridProfile {
            corner_radius: 2.0,
            ..GridProfile::default()
        };
        assert!(profile.validate().is_err());
    }
}
