//! Small dense linear algebra for Jacobians and Newton steps.
//!
//! Matrices are stored row-major in flat `Vec<f64>` buffers. Sizes are tiny
//! (at most 3 x 3 for Newton steps, `(p + 1)^dim` for collocation), so plain
//! Gaussian elimination with partial pivoting is used throughout.

use crate::fe::scalar_basis::MAX_DIMENSION;
use crate::mapping_error::MappingError;

/// Jacobian of a mapping at one reference point.
///
/// Shape `(spacedim, dim)`, row-major: entry `(r, k)` is `∂x_r / ∂ξ_k`.
#[derive(Clone, Debug, PartialEq)]
pub struct Jacobian {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Jacobian {
    /// Zero matrix of shape `(rows, cols)`.
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer; `cols` is a reference dimension in `1..=MAX_DIMENSION`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, MappingError> {
        if !(1..=MAX_DIMENSION).contains(&cols) || rows < cols {
            return Err(MappingError::InvalidDimension {
                dim: cols,
                spacedim: rows,
            });
        }
        if data.len() != rows * cols {
            return Err(MappingError::DimensionMismatch {
                context: "jacobian buffer",
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows (space dimension).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (reference dimension).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry `(r, c)`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub(crate) fn add(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] += value;
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// `J v` for a reference-space vector `v`.
    pub fn apply(&self, v: &[f64]) -> Vec<f64> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c) * v[c]).sum())
            .collect()
    }

    /// `Jᵀ w` for a physical-space vector `w`.
    pub fn transpose_apply(&self, w: &[f64]) -> Vec<f64> {
        (0..self.cols)
            .map(|c| (0..self.rows).map(|r| self.get(r, c) * w[r]).sum())
            .collect()
    }

    /// Gram matrix `JᵀJ`, shape `(cols, cols)`, row-major.
    pub fn gram(&self) -> Vec<f64> {
        let n = self.cols;
        let mut g = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let v: f64 = (0..self.rows).map(|r| self.get(r, i) * self.get(r, j)).sum();
                g[i * n + j] = v;
                g[j * n + i] = v;
            }
        }
        g
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Generalized volume element `sqrt(det(JᵀJ))`.
    ///
    /// Equals `|det J|` for square Jacobians; zero for rank-deficient ones.
    pub fn measure(&self) -> f64 {
        determinant(self.cols, &self.gram()).max(0.0).sqrt()
    }
}

/// Pivot breakdown during elimination.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SingularMatrix {
    /// Smallest pivot relative to the largest matrix entry.
    pub pivot_ratio: f64,
}

/// Solve `A x = b` in place (`b` becomes `x`) for a row-major `n x n` matrix.
///
/// Fails when a pivot drops to `rel_tol` times the largest entry of `A` or
/// below, or when `A` holds non-finite entries.
pub(crate) fn solve_in_place(
    n: usize,
    a: &mut [f64],
    b: &mut [f64],
    rel_tol: f64,
) -> Result<(), SingularMatrix> {
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(b.len(), n);
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if !scale.is_finite() || scale == 0.0 {
        return Err(SingularMatrix {
            pivot_ratio: if scale == 0.0 { 0.0 } else { f64::NAN },
        });
    }

    for col in 0..n {
        let (pivot_row, pivot_abs) = (col..n)
            .map(|r| (r, a[r * n + col].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        let ratio = pivot_abs / scale;
        if ratio.is_nan() || ratio <= rel_tol {
            return Err(SingularMatrix { pivot_ratio: ratio });
        }
        if pivot_row != col {
            for c in 0..n {
                a.swap(col * n + c, pivot_row * n + c);
            }
            b.swap(col, pivot_row);
        }
        let pivot = a[col * n + col];
        for r in col + 1..n {
            let factor = a[r * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[r * n + c] -= factor * a[col * n + c];
            }
            b[r] -= factor * b[col];
        }
    }

    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|c| a[row * n + c] * b[c]).sum();
        b[row] = (b[row] - tail) / a[row * n + row];
    }
    Ok(())
}

/// Least-squares solve of `J x ≈ r` through the normal equations `JᵀJ x = Jᵀr`.
///
/// For square `J` this is the exact solve.
pub(crate) fn least_squares(
    jacobian: &Jacobian,
    rhs: &[f64],
    rel_tol: f64,
) -> Result<Vec<f64>, SingularMatrix> {
    let mut gram = jacobian.gram();
    let mut x = jacobian.transpose_apply(rhs);
    solve_in_place(jacobian.cols(), &mut gram, &mut x, rel_tol)?;
    Ok(x)
}

/// Determinant of a row-major `n x n` matrix, `n <= MAX_DIMENSION`.
fn determinant(n: usize, m: &[f64]) -> f64 {
    match n {
        0 => 1.0,
        1 => m[0],
        2 => m[0] * m[3] - m[1] * m[2],
        _ => {
            debug_assert_eq!(n, 3);
            m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
                + m[2] * (m[3] * m[7] - m[4] * m[6])
        }
    }
}
