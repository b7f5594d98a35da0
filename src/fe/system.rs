//! Composite vector-valued bases built from scalar blocks.
//!
//! An [`FeSystem`] is an ordered list of `(ScalarBasis, multiplicity)` blocks.
//! Vector components are numbered block by block, and local DOFs are ordered
//! component-blocked: every DOF of component 0 first, then component 1, and so
//! on. Each DOF is described by a [`DofEntry`] so evaluation is a table lookup
//! into the owning scalar basis.

use crate::fe::evaluator::{BasisEvaluator, BasisTabulation};
use crate::fe::scalar_basis::ScalarBasis;
use crate::mapping_error::MappingError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Location of one local DOF inside the composite basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DofEntry {
    /// Index of the scalar block.
    pub base: usize,
    /// Local DOF number inside the scalar basis.
    pub base_dof: usize,
    /// Vector component the DOF contributes to.
    pub component: usize,
}

/// Composite basis made of scalar blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct FeSystem {
    blocks: Vec<(ScalarBasis, usize)>,
    dofs: Vec<DofEntry>,
    /// `component_offsets[c]..component_offsets[c + 1]` are the DOFs of component `c`.
    component_offsets: Vec<usize>,
    component_base: Vec<usize>,
    dim: usize,
}

impl FeSystem {
    /// Build a system from `(scalar basis, multiplicity)` blocks.
    pub fn new(blocks: Vec<(ScalarBasis, usize)>) -> Result<Self, MappingError> {
        let dim = blocks
            .first()
            .map(|(basis, _)| basis.dimension())
            .ok_or_else(|| MappingError::InvalidBasis("system has no blocks".to_string()))?;

        let mut dofs = Vec::new();
        let mut component_offsets = vec![0];
        let mut component_base = Vec::new();
        for (base, (basis, multiplicity)) in blocks.iter().enumerate() {
            if basis.dimension() != dim {
                return Err(MappingError::DimensionMismatch {
                    context: "system block reference dimension",
                    expected: dim,
                    found: basis.dimension(),
                });
            }
            if *multiplicity == 0 {
                return Err(MappingError::InvalidBasis(format!(
                    "block {base} has multiplicity 0"
                )));
            }
            for _ in 0..*multiplicity {
                let component = component_base.len();
                dofs.extend((0..basis.n_dofs()).map(|base_dof| DofEntry {
                    base,
                    base_dof,
                    component,
                }));
                component_base.push(base);
                component_offsets.push(dofs.len());
            }
        }
        Ok(Self {
            blocks,
            dofs,
            component_offsets,
            component_base,
            dim,
        })
    }

    /// Build a system from basis labels, e.g. `[("q1", 1), ("bernstein2", 2)]`.
    pub fn from_labels(labels: &[(&str, usize)], dim: usize) -> Result<Self, MappingError> {
        let blocks = labels
            .iter()
            .map(|&(name, multiplicity)| Ok((ScalarBasis::from_label(name, dim)?, multiplicity)))
            .collect::<Result<Vec<_>, MappingError>>()?;
        Self::new(blocks)
    }

    /// The scalar blocks and their multiplicities.
    pub fn blocks(&self) -> &[(ScalarBasis, usize)] {
        &self.blocks
    }

    /// Per-DOF description table.
    pub fn dof_entries(&self) -> &[DofEntry] {
        &self.dofs
    }

    /// Local DOFs belonging to `component`.
    pub fn component_dofs(&self, component: usize) -> Range<usize> {
        self.component_offsets[component]..self.component_offsets[component + 1]
    }

    /// Scalar basis feeding `component`.
    pub fn component_basis(&self, component: usize) -> &ScalarBasis {
        &self.blocks[self.component_base[component]].0
    }
}

impl BasisEvaluator for FeSystem {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn n_dofs(&self) -> usize {
        self.dofs.len()
    }

    fn n_components(&self) -> usize {
        self.component_base.len()
    }

    fn component_of(&self, i: usize) -> usize {
        self.dofs[i].component
    }

    fn component_degree(&self, component: usize) -> usize {
        self.component_basis(component).degree()
    }

    fn value(&self, i: usize, point: &[f64]) -> f64 {
        let entry = self.dofs[i];
        self.blocks[entry.base].0.value(entry.base_dof, point)
    }

    fn gradient(&self, i: usize, point: &[f64]) -> Vec<f64> {
        let entry = self.dofs[i];
        self.blocks[entry.base].0.gradient(entry.base_dof, point)
    }

    /// Tabulates each scalar block once and scatters it to every copy.
    fn tabulate(&self, point: &[f64]) -> Result<BasisTabulation, MappingError> {
        let dim = self.dim;
        let block_tabs = self
            .blocks
            .iter()
            .map(|(basis, _)| {
                let mut tab = BasisTabulation::zeros(basis.n_dofs(), dim);
                basis.tabulate_into(point, &mut tab.values, &mut tab.gradients)?;
                Ok(tab)
            })
            .collect::<Result<Vec<_>, MappingError>>()?;

        let mut out = BasisTabulation::zeros(self.dofs.len(), dim);
        for (i, entry) in self.dofs.iter().enumerate() {
            let tab = &block_tabs[entry.base];
            out.values[i] = tab.values[entry.base_dof];
            out.gradients[i * dim..(i + 1) * dim].copy_from_slice(tab.gradient(entry.base_dof));
        }
        Ok(out)
    }
}
