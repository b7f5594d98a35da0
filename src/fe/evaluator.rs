//! Basis evaluation interface consumed by the mapping engine.

use crate::mapping_error::MappingError;

/// Basis function tabulation at a single reference point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasisTabulation {
    /// Reference dimension (row length of `gradients`).
    pub dim: usize,
    /// Basis values: `[basis]`.
    pub values: Vec<f64>,
    /// Reference gradients, row-major: `[basis][dim]`.
    pub gradients: Vec<f64>,
}

impl BasisTabulation {
    /// Zeroed tabulation for `n` basis functions.
    pub fn zeros(n: usize, dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; n],
            gradients: vec![0.0; n * dim],
        }
    }

    /// Number of tabulated basis functions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no basis function was tabulated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reference gradient of basis function `i`.
    #[inline]
    pub fn gradient(&self, i: usize) -> &[f64] {
        &self.gradients[i * self.dim..(i + 1) * self.dim]
    }
}

/// A (possibly vector-valued) finite-element basis on a reference cell.
///
/// Local basis functions are numbered `0..n_dofs()`; each one is scalar and
/// contributes to exactly one vector component.
pub trait BasisEvaluator {
    /// Reference dimension.
    fn dimension(&self) -> usize;

    /// Number of local basis functions.
    fn n_dofs(&self) -> usize;

    /// Number of vector components.
    fn n_components(&self) -> usize;

    /// Vector component that basis function `i` belongs to.
    fn component_of(&self, i: usize) -> usize;

    /// Polynomial degree of the functions feeding component `component`.
    fn component_degree(&self, component: usize) -> usize;

    /// Value of basis function `i` at `point`.
    fn value(&self, i: usize, point: &[f64]) -> f64;

    /// Reference gradient of basis function `i` at `point`.
    fn gradient(&self, i: usize, point: &[f64]) -> Vec<f64>;

    /// Values and gradients of every basis function at `point`.
    fn tabulate(&self, point: &[f64]) -> Result<BasisTabulation, MappingError> {
        let dim = self.dimension();
        if point.len() != dim {
            return Err(MappingError::DimensionMismatch {
                context: "reference point",
                expected: dim,
                found: point.len(),
            });
        }
        let n = self.n_dofs();
        let mut tab = BasisTabulation::zeros(n, dim);
        for i in 0..n {
            tab.values[i] = self.value(i, point);
            tab.gradients[i * dim..(i + 1) * dim].copy_from_slice(&self.gradient(i, point));
        }
        Ok(tab)
    }
}
