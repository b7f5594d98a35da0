//! Inverse mapping: physical point to reference coordinates.
//!
//! Each initial guess runs a Newton iteration on `F(ξ) = x`. Steps solve the
//! normal equations `JᵀJ Δξ = Jᵀr`, which is exact Newton for square
//! Jacobians and Gauss-Newton when the cell is embedded in a higher
//! dimensional space. The first guess that converges wins.

use crate::cell::CellId;
use crate::fe::evaluator::BasisEvaluator;
use crate::linalg::{Jacobian, least_squares};
use crate::mapping::fe_field::{CellSample, MappingFeField, diameter, reference_vertices};
use crate::mapping::options::InitialGuess;
use crate::mapping_error::MappingError;

impl<B: BasisEvaluator> MappingFeField<'_, B> {
    /// Reference coordinates of `physical_point` in `cell`.
    pub fn inverse(&self, cell: CellId, physical_point: &[f64]) -> Result<Vec<f64>, MappingError> {
        self.sample(cell)?.inverse(physical_point)
    }

    /// Like [`inverse`](Self::inverse), trying `hint` before the configured guesses.
    pub fn inverse_with_hint(
        &self,
        cell: CellId,
        physical_point: &[f64],
        hint: &[f64],
    ) -> Result<Vec<f64>, MappingError> {
        self.sample(cell)?.inverse_with_hint(physical_point, hint)
    }
}

impl<B: BasisEvaluator> CellSample<'_, '_, B> {
    /// Reference coordinates of `physical_point`.
    pub fn inverse(&self, physical_point: &[f64]) -> Result<Vec<f64>, MappingError> {
        self.inverse_from(physical_point, None)
    }

    /// Reference coordinates of `physical_point`, starting from `hint` first.
    pub fn inverse_with_hint(
        &self,
        physical_point: &[f64],
        hint: &[f64],
    ) -> Result<Vec<f64>, MappingError> {
        if hint.len() != self.dimension() {
            return Err(MappingError::DimensionMismatch {
                context: "initial guess",
                expected: self.dimension(),
                found: hint.len(),
            });
        }
        self.inverse_from(physical_point, Some(hint))
    }

    fn inverse_from(
        &self,
        target: &[f64],
        hint: Option<&[f64]>,
    ) -> Result<Vec<f64>, MappingError> {
        let (dim, spacedim) = (self.dimension(), self.space_dimension());
        if target.len() != spacedim {
            return Err(MappingError::DimensionMismatch {
                context: "physical point",
                expected: spacedim,
                found: target.len(),
            });
        }
        let vertices = self.vertices()?;
        let scale = match diameter(&vertices) {
            d if d > 0.0 && d.is_finite() => d,
            _ => 1.0,
        };

        let options = self.options();
        let hinted = hint.map(|h| InitialGuess::Point(h.to_vec()));
        let mut best_failure: Option<MappingError> = None;
        let mut first_degenerate: Option<MappingError> = None;

        for guess in hinted.iter().chain(&options.initial_guesses) {
            let start = match guess {
                InitialGuess::Centroid => vec![0.5; dim],
                InitialGuess::Point(p) => p.clone(),
                InitialGuess::AffineApproximation => {
                    match affine_guess(&vertices, target, dim, options.singular_tolerance) {
                        Ok(start) => start,
                        Err(err) => {
                            log::debug!("affine initial guess skipped: {err}");
                            first_degenerate.get_or_insert(err);
                            continue;
                        }
                    }
                }
            };
            match self.newton(target, start, scale) {
                Ok(xi) => return Ok(xi),
                Err(err @ MappingError::NonConvergence { .. }) => {
                    log::debug!("cell {}: initial guess {guess:?} failed: {err}", self.cell());
                    if best_failure
                        .as_ref()
                        .is_none_or(|best| residual_of(&err) < residual_of(best))
                    {
                        best_failure = Some(err);
                    }
                }
                Err(err @ MappingError::DegenerateMapping { .. }) => {
                    log::debug!("cell {}: initial guess {guess:?} failed: {err}", self.cell());
                    first_degenerate.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        let err = best_failure.or(first_degenerate).unwrap_or_else(|| {
            MappingError::InvalidOptions("no initial guess was tried".to_string())
        });
        log::warn!(
            "inverse mapping of {target:?} in cell {} failed for every initial guess: {err}",
            self.cell()
        );
        Err(err)
    }

    /// One Newton run from `start`.
    fn newton(&self, target: &[f64], start: Vec<f64>, scale: f64) -> Result<Vec<f64>, MappingError> {
        let options = self.options();
        let bound = options.tolerance * scale;
        let embedded = self.space_dimension() > self.dimension();

        let mut xi = start;
        let mut best_residual = f64::INFINITY;
        let mut best_point = xi.clone();
        let mut best_step = f64::INFINITY;
        let mut stalled = 0;

        for iteration in 0..=options.max_iterations {
            let (x, jac) = self.point_and_jacobian(&xi)?;
            let residual: Vec<f64> = target.iter().zip(&x).map(|(t, x)| t - x).collect();
            let residual_norm = norm_of(&residual);
            log::trace!("newton iteration {iteration}: xi = {xi:?}, |r| = {residual_norm:e}");

            if !residual_norm.is_finite() {
                return Err(non_convergence(iteration, best_residual, best_point));
            }
            if residual_norm < best_residual {
                best_residual = residual_norm;
                best_point.clone_from(&xi);
            }
            // A rank-deficient Jacobian is reported even when the residual is small.
            let step = least_squares(&jac, &residual, options.singular_tolerance).map_err(|e| {
                MappingError::DegenerateMapping {
                    iteration,
                    point: xi.clone(),
                    pivot_ratio: e.pivot_ratio,
                }
            })?;
            if residual_norm < bound || (embedded && tangential_residual(&jac, &residual) < bound) {
                return Ok(xi);
            }
            if iteration == options.max_iterations {
                break;
            }

            let step_norm = norm_of(&step);
            if step_norm < best_step {
                best_step = step_norm;
                stalled = 0;
            } else {
                stalled += 1;
                if stalled >= options.stall_window {
                    log::trace!("newton stalled after {} iterations", iteration + 1);
                    return Err(non_convergence(iteration + 1, best_residual, best_point));
                }
            }
            for (a, d) in xi.iter_mut().zip(&step) {
                *a += d;
            }
        }
        Err(non_convergence(options.max_iterations, best_residual, best_point))
    }
}

/// Least-squares inverse of the affine map fitted to the vertex images.
///
/// With centered vertex coordinates `c_v = ξ_v - 1/2` the fit decouples:
/// the offset is the vertex mean and column `k` of the linear part is
/// `Σ_v x_v c_vk / (2^dim / 4)`.
fn affine_guess(
    vertices: &[Vec<f64>],
    target: &[f64],
    dim: usize,
    singular_tolerance: f64,
) -> Result<Vec<f64>, MappingError> {
    let spacedim = target.len();
    let n = vertices.len() as f64;
    let mut offset = vec![0.0; spacedim];
    let mut linear = Jacobian::zeros(spacedim, dim);
    for (vertex, x) in reference_vertices(dim).iter().zip(vertices) {
        for r in 0..spacedim {
            offset[r] += x[r] / n;
            for (k, xi) in vertex.iter().enumerate() {
                linear.add(r, k, x[r] * (xi - 0.5) / (0.25 * n));
            }
        }
    }
    let rhs: Vec<f64> = target.iter().zip(&offset).map(|(t, o)| t - o).collect();
    let centered = least_squares(&linear, &rhs, singular_tolerance).map_err(|e| {
        MappingError::DegenerateMapping {
            iteration: 0,
            point: vec![0.5; dim],
            pivot_ratio: e.pivot_ratio,
        }
    })?;
    Ok(centered.into_iter().map(|c| c + 0.5).collect())
}

fn tangential_residual(jac: &Jacobian, residual: &[f64]) -> f64 {
    let scale = jac.frobenius_norm();
    if scale > 0.0 {
        norm_of(&jac.transpose_apply(residual)) / scale
    } else {
        f64::INFINITY
    }
}

fn non_convergence(iterations: usize, residual: f64, best: Vec<f64>) -> MappingError {
    MappingError::NonConvergence {
        iterations,
        residual,
        best,
    }
}

fn residual_of(err: &MappingError) -> f64 {
    match err {
        MappingError::NonConvergence { residual, .. } => *residual,
        _ => f64::INFINITY,
    }
}

fn norm_of(v: &[f64]) -> f64 {
    v.iter().map(|a| a * a).sum::<f64>().sqrt()
}
