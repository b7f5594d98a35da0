//! MappingError: Unified error type for fe-field-mapping public APIs
//!
//! Every fallible operation in the crate (basis construction, DOF lookup,
//! mapping construction and the forward/inverse queries) reports through this
//! single enum so callers can match on the failure they care about.

use crate::cell::CellId;
use thiserror::Error;

/// Unified error type for mapping operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingError {
    /// Newton iteration ran out of budget (or stalled) before reaching tolerance.
    ///
    /// `best` is the reference iterate with the smallest residual seen.
    #[error(
        "Newton iteration did not converge after {iterations} iterations (residual {residual:e}, best iterate {best:?})"
    )]
    NonConvergence {
        iterations: usize,
        residual: f64,
        best: Vec<f64>,
    },
    /// The Jacobian is singular or numerically rank deficient at an iterate.
    #[error(
        "degenerate mapping at iteration {iteration}: Jacobian is singular at reference point {point:?} (pivot ratio {pivot_ratio:e})"
    )]
    DegenerateMapping {
        iteration: usize,
        point: Vec<f64>,
        pivot_ratio: f64,
    },
    /// The component mask selects a number of components different from the space dimension.
    #[error("component mask selects {found} components, expected {expected} (space dimension)")]
    MaskCardinalityMismatch { expected: usize, found: usize },
    /// The component mask length does not match the number of vector components.
    #[error("component mask has {found} entries, basis has {expected} vector components")]
    MaskLengthMismatch { expected: usize, found: usize },
    /// A component index is outside the mask.
    #[error("component {component} out of range for mask of length {len}")]
    ComponentOutOfRange { component: usize, len: usize },
    /// A point or matrix had the wrong number of coordinates.
    #[error("{context}: expected dimension {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    /// Unsupported combination of reference and space dimension.
    #[error("unsupported dimensions: dim = {dim}, spacedim = {spacedim}")]
    InvalidDimension { dim: usize, spacedim: usize },
    /// A cell carries a different number of DOFs than the basis expects.
    #[error("cell {cell} has {found} DOFs, expected {expected}")]
    DofCountMismatch {
        cell: CellId,
        expected: usize,
        found: usize,
    },
    /// A DOF index points past the end of the field vector.
    #[error("cell {cell} references DOF index {index}, field vector has length {len}")]
    DofIndexOutOfRange { cell: CellId, index: usize, len: usize },
    /// The cell is not known to the DOF map.
    #[error("cell {0} is not present in the DOF map")]
    MissingCell(CellId),
    /// Attempted to construct a CellId with a zero value (invalid).
    #[error("CellId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidCellId,
    /// A basis label could not be resolved.
    #[error("unsupported basis '{0}'")]
    UnsupportedBasis(String),
    /// A basis or system was constructed with invalid parameters.
    #[error("invalid basis: {0}")]
    InvalidBasis(String),
    /// Inverse mapping options failed validation.
    #[error("invalid inverse mapping options: {0}")]
    InvalidOptions(String),
}

impl MappingError {
    /// True for [`MappingError::NonConvergence`].
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, MappingError::NonConvergence { .. })
    }

    /// True for [`MappingError::DegenerateMapping`].
    pub fn is_degenerate(&self) -> bool {
        matches!(self, MappingError::DegenerateMapping { .. })
    }
}
