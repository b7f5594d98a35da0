//! Configuration of the inverse mapping iteration.

use crate::mapping_error::MappingError;
use serde::{Deserialize, Serialize};

/// Starting point for one Newton run of the inverse mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InitialGuess {
    /// Center of the reference cell, `(0.5, …, 0.5)`.
    Centroid,
    /// Least-squares inverse of the affine map fitted to the vertex images.
    AffineApproximation,
    /// An explicit reference point.
    Point(Vec<f64>),
}

/// Tolerances, budgets and starting points for [`inverse`](crate::mapping::fe_field::MappingFeField::inverse).
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverseOptions {
    /// Convergence when `‖x - F(ξ)‖ < tolerance * cell_diameter`.
    pub tolerance: f64,
    /// Iteration ceiling per initial guess.
    pub max_iterations: usize,
    /// Consecutive iterations without a new smallest step before giving up.
    pub stall_window: usize,
    /// Relative pivot size below which the Jacobian counts as singular.
    pub singular_tolerance: f64,
    /// Initial guesses, tried in order until one converges.
    pub initial_guesses: Vec<InitialGuess>,
}

impl Default for InverseOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 50,
            stall_window: 5,
            singular_tolerance: 1e-12,
            initial_guesses: vec![InitialGuess::Centroid],
        }
    }
}

impl InverseOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_stall_window(mut self, stall_window: usize) -> Self {
        self.stall_window = stall_window;
        self
    }

    pub fn with_singular_tolerance(mut self, singular_tolerance: f64) -> Self {
        self.singular_tolerance = singular_tolerance;
        self
    }

    pub fn with_initial_guesses(mut self, initial_guesses: Vec<InitialGuess>) -> Self {
        self.initial_guesses = initial_guesses;
        self
    }

    /// Check the options against a reference dimension.
    pub fn validate(&self, dim: usize) -> Result<(), MappingError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MappingError::InvalidOptions(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if !(self.singular_tolerance.is_finite() && self.singular_tolerance >= 0.0) {
            return Err(MappingError::InvalidOptions(format!(
                "singular_tolerance must be non-negative and finite, got {}",
                self.singular_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MappingError::InvalidOptions(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.stall_window == 0 {
            return Err(MappingError::InvalidOptions(
                "stall_window must be at least 1".to_string(),
            ));
        }
        if self.initial_guesses.is_empty() {
            return Err(MappingError::InvalidOptions(
                "at least one initial guess is required".to_string(),
            ));
        }
        for guess in &self.initial_guesses {
            if let InitialGuess::Point(p) = guess {
                if p.len() != dim {
                    return Err(MappingError::InvalidOptions(format!(
                        "initial guess {p:?} has {} coordinates, reference dimension is {dim}",
                        p.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
