//! Mapping whose geometry is a finite-element field.
//!
//! A [`MappingFeField`] binds a basis, a DOF map, a caller-owned field vector
//! and a component mask. The physical coordinate `r` of a reference point is
//! the field value of the `r`-th selected component, and its reference
//! gradient is row `r` of the Jacobian. Construction validates everything a
//! query could trip over except the cell itself, so queries only fail on an
//! unknown cell, a malformed point, or (for the inverse) the iteration.

use crate::cell::CellId;
use crate::fe::component_mask::ComponentMask;
use crate::fe::dof_map::{DofAccess, DofMap, FieldView};
use crate::fe::evaluator::BasisEvaluator;
use crate::fe::scalar_basis::MAX_DIMENSION;
use crate::fe::system::FeSystem;
use crate::linalg::Jacobian;
use crate::mapping::options::InverseOptions;
use crate::mapping_error::MappingError;
use itertools::{Itertools, izip};

/// Read-only mapping defined by an FE field over a DOF map.
#[derive(Clone, Debug)]
pub struct MappingFeField<'a, B: BasisEvaluator = FeSystem> {
    spacedim: usize,
    basis: &'a B,
    field: FieldView<'a>,
    mask: ComponentMask,
    /// Output coordinate of each local DOF, `None` for unselected components.
    dof_ranks: Vec<Option<usize>>,
    options: InverseOptions,
}

impl<'a, B: BasisEvaluator> MappingFeField<'a, B> {
    /// Bind a mapping with default [`InverseOptions`].
    pub fn new(
        space_dimension: usize,
        basis: &'a B,
        dof_map: &'a DofMap,
        field: &'a [f64],
        mask: ComponentMask,
    ) -> Result<Self, MappingError> {
        Self::with_options(
            space_dimension,
            basis,
            dof_map,
            field,
            mask,
            InverseOptions::default(),
        )
    }

    /// Bind a mapping with explicit inverse options.
    pub fn with_options(
        space_dimension: usize,
        basis: &'a B,
        dof_map: &'a DofMap,
        field: &'a [f64],
        mask: ComponentMask,
        options: InverseOptions,
    ) -> Result<Self, MappingError> {
        let dim = basis.dimension();
        if !(1..=MAX_DIMENSION).contains(&dim) || space_dimension < dim {
            return Err(MappingError::InvalidDimension {
                dim,
                spacedim: space_dimension,
            });
        }
        if mask.len() != basis.n_components() {
            return Err(MappingError::MaskLengthMismatch {
                expected: basis.n_components(),
                found: mask.len(),
            });
        }
        if mask.n_selected() != space_dimension {
            return Err(MappingError::MaskCardinalityMismatch {
                expected: space_dimension,
                found: mask.n_selected(),
            });
        }
        if let Some(cell) = dof_map.cells().next() {
            if dof_map.dofs_per_cell() != basis.n_dofs() {
                return Err(MappingError::DofCountMismatch {
                    cell,
                    expected: basis.n_dofs(),
                    found: dof_map.dofs_per_cell(),
                });
            }
        }
        let field = FieldView::new(dof_map, field)?;
        options.validate(dim)?;

        let component_ranks = mask.ranks();
        let dof_ranks = (0..basis.n_dofs())
            .map(|i| component_ranks[basis.component_of(i)])
            .collect();

        log::debug!(
            "FE-field mapping: dim={dim}, spacedim={space_dimension}, {} local DOFs, {} cells, geometry components {:?}",
            basis.n_dofs(),
            dof_map.n_cells(),
            mask.selected_components()
        );
        Ok(Self {
            spacedim: space_dimension,
            basis,
            field,
            mask,
            dof_ranks,
            options,
        })
    }

    /// Reference dimension.
    pub fn dimension(&self) -> usize {
        self.basis.dimension()
    }

    /// Physical dimension.
    pub fn space_dimension(&self) -> usize {
        self.spacedim
    }

    /// Highest polynomial degree among the components feeding the geometry.
    pub fn degree(&self) -> usize {
        self.mask
            .selected_components()
            .into_iter()
            .map(|c| self.basis.component_degree(c))
            .max()
            .unwrap_or(0)
    }

    pub fn mask(&self) -> &ComponentMask {
        &self.mask
    }

    pub fn options(&self) -> &InverseOptions {
        &self.options
    }

    pub fn basis(&self) -> &'a B {
        self.basis
    }

    /// Gather the DOF values of `cell` for repeated queries.
    pub fn sample(&self, cell: CellId) -> Result<CellSample<'_, 'a, B>, MappingError> {
        Ok(CellSample {
            mapping: self,
            cell,
            local: self.field.local_dof_values(cell)?,
        })
    }

    /// Physical image of `reference_point` in `cell`.
    ///
    /// Points outside the unit cell are extrapolated.
    pub fn forward(&self, cell: CellId, reference_point: &[f64]) -> Result<Vec<f64>, MappingError> {
        self.sample(cell)?.point(reference_point)
    }

    /// Jacobian `∂x/∂ξ` of the map at `reference_point` in `cell`.
    pub fn jacobian(&self, cell: CellId, reference_point: &[f64]) -> Result<Jacobian, MappingError> {
        self.sample(cell)?.jacobian(reference_point)
    }

    /// Images of the `2^dim` reference vertices, first coordinate running fastest.
    pub fn vertices(&self, cell: CellId) -> Result<Vec<Vec<f64>>, MappingError> {
        self.sample(cell)?.vertices()
    }

    /// Largest distance between two vertex images of `cell`.
    pub fn cell_diameter(&self, cell: CellId) -> Result<f64, MappingError> {
        Ok(diameter(&self.sample(cell)?.vertices()?))
    }
}

/// DOF values of one cell bound to its mapping.
#[derive(Clone, Debug)]
pub struct CellSample<'m, 'a, B: BasisEvaluator> {
    mapping: &'m MappingFeField<'a, B>,
    cell: CellId,
    local: Vec<f64>,
}

impl<B: BasisEvaluator> CellSample<'_, '_, B> {
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// Local DOF values in basis order.
    pub fn local_values(&self) -> &[f64] {
        &self.local
    }

    pub(crate) fn options(&self) -> &InverseOptions {
        &self.mapping.options
    }

    pub(crate) fn dimension(&self) -> usize {
        self.mapping.dimension()
    }

    pub(crate) fn space_dimension(&self) -> usize {
        self.mapping.spacedim
    }

    /// Physical image of `reference_point`.
    pub fn point(&self, reference_point: &[f64]) -> Result<Vec<f64>, MappingError> {
        let tab = self.mapping.basis.tabulate(reference_point)?;
        let mut x = vec![0.0; self.mapping.spacedim];
        for (rank, value, phi) in izip!(&self.mapping.dof_ranks, &self.local, &tab.values) {
            if let Some(r) = *rank {
                x[r] += value * phi;
            }
        }
        Ok(x)
    }

    /// Jacobian at `reference_point`.
    pub fn jacobian(&self, reference_point: &[f64]) -> Result<Jacobian, MappingError> {
        let tab = self.mapping.basis.tabulate(reference_point)?;
        let dim = tab.dim;
        let mut jac = Jacobian::zeros(self.mapping.spacedim, dim);
        for (i, (rank, value)) in self.mapping.dof_ranks.iter().zip(&self.local).enumerate() {
            let Some(r) = *rank else { continue };
            for (k, g) in tab.gradient(i).iter().enumerate() {
                jac.add(r, k, value * g);
            }
        }
        Ok(jac)
    }

    /// Point and Jacobian from a single tabulation.
    pub(crate) fn point_and_jacobian(
        &self,
        reference_point: &[f64],
    ) -> Result<(Vec<f64>, Jacobian), MappingError> {
        let tab = self.mapping.basis.tabulate(reference_point)?;
        let mut x = vec![0.0; self.mapping.spacedim];
        let mut jac = Jacobian::zeros(self.mapping.spacedim, tab.dim);
        for (i, (rank, value)) in self.mapping.dof_ranks.iter().zip(&self.local).enumerate() {
            let Some(r) = *rank else { continue };
            x[r] += value * tab.values[i];
            for (k, g) in tab.gradient(i).iter().enumerate() {
                jac.add(r, k, value * g);
            }
        }
        Ok((x, jac))
    }

    /// Images of the reference vertices.
    pub fn vertices(&self) -> Result<Vec<Vec<f64>>, MappingError> {
        reference_vertices(self.dimension())
            .iter()
            .map(|v| self.point(v))
            .collect()
    }
}

/// Vertices of `[0,1]^dim`, first coordinate running fastest.
pub(crate) fn reference_vertices(dim: usize) -> Vec<Vec<f64>> {
    (0..1usize << dim)
        .map(|v| (0..dim).map(|k| ((v >> k) & 1) as f64).collect())
        .collect()
}

pub(crate) fn diameter(points: &[Vec<f64>]) -> f64 {
    points
        .iter()
        .tuple_combinations()
        .map(|(a, b)| distance(a, b))
        .fold(0.0, f64::max)
}

pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
