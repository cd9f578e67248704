//! Error types for bin generation and export.

use crate::float_types::Real;
use thiserror::Error;

/// Result type alias for generator operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced by the generator.
#[derive(Debug, Error)]
pub enum BinError {
    /// A [`BinSpec`](crate::spec::BinSpec) or
    /// [`GridProfile`](crate::profile::GridProfile) invariant is violated.
    /// Raised before any geometry is built.
    #[error("invalid bin specification: {0}")]
    InvalidSpec(#[from] SpecError),

    /// Writing the model failed. No partial output file is left behind.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl BinError {
    /// Returns the violated invariant, if this is a specification error.
    #[must_use]
    pub const fn spec_error(&self) -> Option<&SpecError> {
        match self {
            Self::InvalidSpec(err) => Some(err),
            Self::Io(_) => None,
        }
    }

    /// Whether this error was raised by validation.
    #[must_use]
    pub const fn is_invalid_spec(&self) -> bool {
        matches!(self, Self::InvalidSpec(_))
    }
}

/// The individual invariants a bin specification can violate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// Width or depth is zero grid units.
    #[error("{axis} must be at least 1 grid unit")]
    ZeroGridUnits { axis: Axis },

    /// Height is zero height units.
    #[error("height must be at least 1 height unit")]
    ZeroHeight,

    /// Wall thickness is not finite, not positive, or at least half a grid unit.
    #[error("wall thickness {thickness} must be positive and less than {limit}")]
    WallThickness { thickness: Real, limit: Real },

    /// More dividers requested along an axis than it has grid units to split.
    #[error("{count} dividers along {axis} exceed the limit of {max} for {units} grid units")]
    TooManyDividers {
        axis: Axis,
        count: u32,
        max: u32,
        units: u32,
    },

    /// Walls and dividers leave less than
    /// [`MIN_CAVITY`](crate::spec::MIN_CAVITY) of interior space along an axis.
    #[error("walls and dividers leave no cavity along {axis} (cell size {size})")]
    NoCavity { axis: Axis, size: Real },

    /// Per-row divisions do not list exactly one entry per row.
    #[error("expected {expected} row divisions, got {actual}")]
    RowCount { expected: usize, actual: usize },

    /// A row division asks for no cells at all.
    #[error("row {row} must have at least one cell")]
    EmptyRow { row: usize },

    /// The relative cell widths do not match the divider count.
    #[error("expected {expected} cell ratios along {axis}, got {actual}")]
    RatioCount {
        axis: Axis,
        expected: usize,
        actual: usize,
    },

    /// A relative cell width is not a positive finite number.
    #[error("cell ratio {value} at index {index} must be positive and finite")]
    InvalidRatio { index: usize, value: Real },

    /// The grid profile itself is unusable.
    #[error("invalid grid profile: {0}")]
    InvalidProfile(String),
}

impl SpecError {
    /// Create an invalid profile error.
    #[must_use]
    pub fn invalid_profile(details: impl Into<String>) -> Self {
        Self::InvalidProfile(details.into())
    }
}

/// A horizontal axis of the bin footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right (grid width).
    X,
    /// Front to back (grid depth).
    Y,
    /// Vertical.
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}
