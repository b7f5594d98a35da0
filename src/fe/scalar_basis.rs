//! Scalar tensor-product bases on the unit hypercube `[0, 1]^dim`.
//!
//! Basis functions are numbered lexicographically with the first reference
//! coordinate running fastest: for degree `p` the function with multi-index
//! `(i0, i1, i2)` has local number `i0 + (p + 1) * i1 + (p + 1)^2 * i2`.

use crate::mapping_error::MappingError;
use serde::{Deserialize, Serialize};

/// Largest reference dimension supported by the tensor-product bases.
pub const MAX_DIMENSION: usize = 3;

/// Supported scalar basis families.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarBasis {
    /// Lagrange polynomials of degree `degree` on equispaced nodes `k / degree`.
    LagrangeQ { dim: usize, degree: usize },
    /// Bernstein polynomials `C(p, k) x^k (1 - x)^(p - k)` of degree `degree`.
    Bernstein { dim: usize, degree: usize },
}

impl ScalarBasis {
    /// Tensor-product Lagrange basis of the given degree.
    pub fn lagrange(dim: usize, degree: usize) -> Result<Self, MappingError> {
        validate(dim, degree)?;
        Ok(Self::LagrangeQ { dim, degree })
    }

    /// Tensor-product Bernstein basis of the given degree.
    pub fn bernstein(dim: usize, degree: usize) -> Result<Self, MappingError> {
        validate(dim, degree)?;
        Ok(Self::Bernstein { dim, degree })
    }

    /// Resolve a basis from a label such as `"q1"`, `"lagrange_q2"` or `"bernstein2"`.
    pub fn from_label(name: &str, dim: usize) -> Result<Self, MappingError> {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "linear" | "bilinear" | "trilinear" => return Self::lagrange(dim, 1),
            "quadratic" | "biquadratic" | "triquadratic" => return Self::lagrange(dim, 2),
            _ => {}
        }
        let unsupported = || MappingError::UnsupportedBasis(name.to_string());
        let (is_lagrange, digits) = if let Some(rest) = ["lagrange_q", "fe_q", "q"]
            .iter()
            .find_map(|prefix| normalized.strip_prefix(prefix))
        {
            (true, rest)
        } else if let Some(rest) = ["fe_bernstein", "bernstein", "b"]
            .iter()
            .find_map(|prefix| normalized.strip_prefix(prefix))
        {
            (false, rest)
        } else {
            return Err(unsupported());
        };
        let degree: usize = digits.parse().map_err(|_| unsupported())?;
        if is_lagrange {
            Self::lagrange(dim, degree)
        } else {
            Self::bernstein(dim, degree)
        }
    }

    /// Reference dimension of the basis.
    pub fn dimension(&self) -> usize {
        match self {
            ScalarBasis::LagrangeQ { dim, .. } | ScalarBasis::Bernstein { dim, .. } => *dim,
        }
    }

    /// Polynomial degree in each reference direction.
    pub fn degree(&self) -> usize {
        match self {
            ScalarBasis::LagrangeQ { degree, .. } | ScalarBasis::Bernstein { degree, .. } => {
                *degree
            }
        }
    }

    /// Number of basis functions per cell.
    pub fn n_dofs(&self) -> usize {
        (self.degree() + 1).pow(self.dimension() as u32)
    }

    /// Whether the basis is interpolatory at its support points.
    pub fn is_nodal(&self) -> bool {
        matches!(self, ScalarBasis::LagrangeQ { .. })
    }

    /// Equispaced lattice `{k / degree}^dim` in local basis order.
    ///
    /// These are the nodes of the Lagrange basis and the collocation points
    /// used when interpolating into a Bernstein basis.
    pub fn support_points(&self) -> Vec<Vec<f64>> {
        let dim = self.dimension();
        let p = self.degree();
        (0..self.n_dofs())
            .map(|i| {
                multi_index(i, p, dim)
                    .iter()
                    .map(|&k| k as f64 / p as f64)
                    .collect()
            })
            .collect()
    }

    /// Value of basis function `i` at `point`.
    ///
    /// `point` must hold `dimension()` coordinates; use
    /// [`tabulate_into`](Self::tabulate_into) for a checked evaluation.
    pub fn value(&self, i: usize, point: &[f64]) -> f64 {
        debug_assert_eq!(point.len(), self.dimension());
        let p = self.degree();
        multi_index(i, p, self.dimension())
            .iter()
            .zip(point)
            .map(|(&k, &x)| self.value_1d(k, x))
            .product()
    }

    /// Reference gradient of basis function `i` at `point`.
    ///
    /// Same length precondition as [`value`](Self::value).
    pub fn gradient(&self, i: usize, point: &[f64]) -> Vec<f64> {
        let dim = self.dimension();
        debug_assert_eq!(point.len(), dim);
        let index = multi_index(i, self.degree(), dim);
        (0..dim)
            .map(|d| {
                (0..dim)
                    .map(|k| {
                        if k == d {
                            self.derivative_1d(index[k], point[k])
                        } else {
                            self.value_1d(index[k], point[k])
                        }
                    })
                    .product()
            })
            .collect()
    }

    /// Evaluate all basis functions at `point`.
    ///
    /// `values` must hold `n_dofs()` entries and `gradients` `n_dofs() * dim`
    /// entries (row-major, one row per basis function).
    pub fn tabulate_into(
        &self,
        point: &[f64],
        values: &mut [f64],
        gradients: &mut [f64],
    ) -> Result<(), MappingError> {
        let dim = self.dimension();
        let n = self.n_dofs();
        if point.len() != dim {
            return Err(MappingError::DimensionMismatch {
                context: "reference point",
                expected: dim,
                found: point.len(),
            });
        }
        if values.len() != n || gradients.len() != n * dim {
            return Err(MappingError::DimensionMismatch {
                context: "tabulation buffer",
                expected: n,
                found: values.len(),
            });
        }
        let p = self.degree();
        // 1D values and derivatives per reference direction
        let tables: Vec<(Vec<f64>, Vec<f64>)> = point
            .iter()
            .map(|&x| {
                (0..=p)
                    .map(|k| (self.value_1d(k, x), self.derivative_1d(k, x)))
                    .unzip()
            })
            .collect();
        let val = |d: usize, k: usize| tables[d].0[k];
        let der = |d: usize, k: usize| tables[d].1[k];

        for i in 0..n {
            let index = multi_index(i, p, dim);
            values[i] = (0..dim).map(|d| val(d, index[d])).product();
            for g in 0..dim {
                gradients[i * dim + g] = (0..dim)
                    .map(|d| {
                        if d == g {
                            der(d, index[d])
                        } else {
                            val(d, index[d])
                        }
                    })
                    .product();
            }
        }
        Ok(())
    }

    fn value_1d(&self, k: usize, x: f64) -> f64 {
        match self {
            ScalarBasis::LagrangeQ { degree, .. } => lagrange_1d(*degree, k, x),
            ScalarBasis::Bernstein { degree, .. } => bernstein_1d(*degree, k as isize, x),
        }
    }

    fn derivative_1d(&self, k: usize, x: f64) -> f64 {
        match self {
            ScalarBasis::LagrangeQ { degree, .. } => lagrange_derivative_1d(*degree, k, x),
            ScalarBasis::Bernstein { degree, .. } => {
                let p = *degree;
                let k = k as isize;
                p as f64 * (bernstein_1d(p - 1, k - 1, x) - bernstein_1d(p - 1, k, x))
            }
        }
    }
}

fn validate(dim: usize, degree: usize) -> Result<(), MappingError> {
    if dim == 0 || dim > MAX_DIMENSION {
        return Err(MappingError::InvalidBasis(format!(
            "reference dimension {dim} not in 1..={MAX_DIMENSION}"
        )));
    }
    if degree == 0 {
        return Err(MappingError::InvalidBasis(
            "polynomial degree must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Split a local basis number into its per-direction 1D indices.
pub(crate) fn multi_index(i: usize, degree: usize, dim: usize) -> [usize; MAX_DIMENSION] {
    let base = degree + 1;
    let mut out = [0; MAX_DIMENSION];
    let mut rest = i;
    for slot in out.iter_mut().take(dim) {
        *slot = rest % base;
        rest /= base;
    }
    out
}

fn lagrange_1d(p: usize, k: usize, x: f64) -> f64 {
    let xk = k as f64 / p as f64;
    (0..=p)
        .filter(|&m| m != k)
        .map(|m| {
            let xm = m as f64 / p as f64;
            (x - xm) / (xk - xm)
        })
        .product()
}

fn lagrange_derivative_1d(p: usize, k: usize, x: f64) -> f64 {
    let node = |m: usize| m as f64 / p as f64;
    let xk = node(k);
    (0..=p)
        .filter(|&l| l != k)
        .map(|l| {
            let others: f64 = (0..=p)
                .filter(|&m| m != k && m != l)
                .map(|m| (x - node(m)) / (xk - node(m)))
                .product();
            others / (xk - node(l))
        })
        .sum()
}

/// Bernstein polynomial `B_{k,p}`; zero for `k < 0` or `k > p`.
fn bernstein_1d(p: usize, k: isize, x: f64) -> f64 {
    if k < 0 || k as usize > p {
        return 0.0;
    }
    let k = k as usize;
    binomial(p, k) * x.powi(k as i32) * (1.0 - x).powi((p - k) as i32)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, j| acc * (n - j) as f64 / (j + 1) as f64)
}
