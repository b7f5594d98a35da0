//! Many queries against one cell.
//!
//! The cell's DOF values are gathered once and shared by every point. With the
//! `rayon` feature the inverse queries run in parallel over that shared sample.

use crate::cell::CellId;
use crate::fe::evaluator::BasisEvaluator;
use crate::mapping::fe_field::MappingFeField;
use crate::mapping_error::MappingError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

impl<B: BasisEvaluator + Sync> MappingFeField<'_, B> {
    /// Physical images of `reference_points` in `cell`.
    pub fn transform_unit_to_real(
        &self,
        cell: CellId,
        reference_points: &[Vec<f64>],
    ) -> Result<Vec<Vec<f64>>, MappingError> {
        let sample = self.sample(cell)?;
        reference_points.iter().map(|p| sample.point(p)).collect()
    }

    /// Reference coordinates of each of `physical_points` in `cell`.
    ///
    /// The outer result fails only when the cell is unknown; each point
    /// carries its own inverse outcome.
    pub fn transform_real_to_unit(
        &self,
        cell: CellId,
        physical_points: &[Vec<f64>],
    ) -> Result<Vec<Result<Vec<f64>, MappingError>>, MappingError> {
        let sample = self.sample(cell)?;
        #[cfg(feature = "rayon")]
        let results = physical_points
            .par_iter()
            .map(|x| sample.inverse(x))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let results = physical_points.iter().map(|x| sample.inverse(x)).collect();
        Ok(results)
    }
}
