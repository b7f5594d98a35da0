//! Forward and inverse evaluation of FE-field mappings.

pub mod batch;
pub mod fe_field;
pub mod newton;
pub mod options;

pub use fe_field::{CellSample, MappingFeField};
pub use options::{InitialGuess, InverseOptions};
