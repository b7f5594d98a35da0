//! Finite-element collaborators of the mapping engine: bases, component
//! masks, DOF bookkeeping and position initialization.

pub mod component_mask;
pub mod dof_map;
pub mod evaluator;
pub mod interpolate;
pub mod scalar_basis;
pub mod system;

pub use component_mask::ComponentMask;
pub use dof_map::{DofAccess, DofMap, FieldView};
pub use evaluator::{BasisEvaluator, BasisTabulation};
pub use interpolate::{interpolate_position, position_vector};
pub use scalar_basis::ScalarBasis;
pub use system::{DofEntry, FeSystem};
