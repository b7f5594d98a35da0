//! # fe-field-mapping
//!
//! fe-field-mapping evaluates reference-to-physical maps of finite-element cells whose
//! geometry is described by a vector-valued finite-element field, and inverts them with
//! a Newton iteration (Gauss-Newton least squares when the cell lives in a higher
//! dimensional space, e.g. a curve in 2D or a surface patch in 3D).
//!
//! ## Features
//! - Tensor-product Lagrange and Bernstein bases on `[0,1]^dim`, `dim ∈ {1,2,3}`
//! - Composite vector bases ([`FeSystem`](crate::fe::system::FeSystem)) with a component
//!   mask selecting which components carry the geometry
//! - Borrowed field views: the mapping never copies or outlives the caller's field vector
//! - Configurable inverse iteration with several initial-guess strategies and typed
//!   failures for non-convergence and degenerate Jacobians
//! - Optional Rayon parallelism for batched inverse queries (`rayon` feature)
//!
//! ## Usage
//!
//! ```rust
//! use fe_field_mapping::prelude::*;
//!
//! let cell = CellId::new(1)?;
//! let system = FeSystem::from_labels(&[("q1", 1), ("bernstein2", 2)], 2)?;
//! let dof_map = DofMap::contiguous(&[cell], system.n_dofs())?;
//! let mask = ComponentMask::from_bools(vec![false, true, true]);
//! let field = position_vector(&system, &dof_map, &mask, |_, xi| {
//!     vec![2.0 * xi[0] - 1.0, xi[1] + 0.25 * xi[0] * xi[0]]
//! })?;
//!
//! let mapping = MappingFeField::new(2, &system, &dof_map, &field, mask)?;
//! let x = mapping.forward(cell, &[0.2, 0.6])?;
//! let xi = mapping.inverse(cell, &x)?;
//! assert!((xi[0] - 0.2).abs() < 1e-10 && (xi[1] - 0.6).abs() < 1e-10);
//! # Ok::<(), fe_field_mapping::mapping_error::MappingError>(())
//! ```
//!
//! ## Determinism
//!
//! Forward evaluation and the inverse iteration hold no state between calls; repeated
//! queries with the same inputs return bit-identical results.

pub mod cell;
pub mod fe;
pub mod linalg;
pub mod mapping;
pub mod mapping_error;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::cell::CellId;
    pub use crate::fe::component_mask::ComponentMask;
    pub use crate::fe::dof_map::{DofAccess, DofMap, FieldView};
    pub use crate::fe::evaluator::{BasisEvaluator, BasisTabulation};
    pub use crate::fe::interpolate::{interpolate_position, position_vector};
    pub use crate::fe::scalar_basis::ScalarBasis;
    pub use crate::fe::system::FeSystem;
    pub use crate::linalg::Jacobian;
    pub use crate::mapping::fe_field::{CellSample, MappingFeField};
    pub use crate::mapping::options::{InitialGuess, InverseOptions};
    pub use crate::mapping_error::MappingError;
}
