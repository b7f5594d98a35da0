//! Per-cell DOF numbering and read-only access to field values.

use crate::cell::CellId;
use crate::mapping_error::MappingError;
use std::collections::BTreeMap;

/// Mapping from cells to the global indices of their local DOFs.
///
/// Every cell carries the same number of DOFs, listed in the local order of
/// the basis evaluator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DofMap {
    cells: BTreeMap<CellId, Vec<usize>>,
    dofs_per_cell: Option<usize>,
}

impl DofMap {
    /// Empty DOF map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discontinuous numbering: the `k`-th cell owns indices
    /// `k * dofs_per_cell..(k + 1) * dofs_per_cell`.
    pub fn contiguous(cells: &[CellId], dofs_per_cell: usize) -> Result<Self, MappingError> {
        let mut map = Self::new();
        for (k, &cell) in cells.iter().enumerate() {
            let start = k * dofs_per_cell;
            map.insert(cell, (start..start + dofs_per_cell).collect())?;
        }
        Ok(map)
    }

    /// Register the DOF indices of `cell`, replacing any previous entry.
    pub fn insert(&mut self, cell: CellId, indices: Vec<usize>) -> Result<(), MappingError> {
        match self.dofs_per_cell {
            Some(expected) if expected != indices.len() => {
                return Err(MappingError::DofCountMismatch {
                    cell,
                    expected,
                    found: indices.len(),
                });
            }
            _ => self.dofs_per_cell = Some(indices.len()),
        }
        self.cells.insert(cell, indices);
        Ok(())
    }

    /// Global DOF indices of `cell`.
    pub fn cell_dofs(&self, cell: CellId) -> Result<&[usize], MappingError> {
        self.cells
            .get(&cell)
            .map(Vec::as_slice)
            .ok_or(MappingError::MissingCell(cell))
    }

    /// Number of DOFs per cell (0 for an empty map).
    pub fn dofs_per_cell(&self) -> usize {
        self.dofs_per_cell.unwrap_or(0)
    }

    /// Number of registered cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Registered cells in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    /// Largest global index referenced by any cell.
    pub fn max_index(&self) -> Option<usize> {
        self.cells.values().flatten().copied().max()
    }

    /// Smallest field length able to hold every referenced index.
    pub fn n_global_dofs(&self) -> usize {
        self.max_index().map_or(0, |m| m + 1)
    }

    /// Check that every index fits into a field vector of length `len`.
    pub fn validate_against(&self, len: usize) -> Result<(), MappingError> {
        for (&cell, indices) in &self.cells {
            if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                return Err(MappingError::DofIndexOutOfRange { cell, index, len });
            }
        }
        Ok(())
    }
}

/// Source of per-cell DOF values, ordered like the basis evaluator's local DOFs.
pub trait DofAccess {
    /// Number of local DOFs each cell provides.
    fn dofs_per_cell(&self) -> usize;

    /// Local DOF values of `cell`.
    fn local_dof_values(&self, cell: CellId) -> Result<Vec<f64>, MappingError>;
}

/// Borrowed view of a caller-owned field vector through a DOF map.
///
/// The view cannot outlive either the field vector or the DOF map, and the
/// field vector cannot be mutated while the view exists.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    dof_map: &'a DofMap,
    values: &'a [f64],
}

impl<'a> FieldView<'a> {
    /// Bind `values` through `dof_map`, checking every index once.
    pub fn new(dof_map: &'a DofMap, values: &'a [f64]) -> Result<Self, MappingError> {
        dof_map.validate_against(values.len())?;
        Ok(Self { dof_map, values })
    }

    /// The DOF map the view reads through.
    pub fn dof_map(&self) -> &'a DofMap {
        self.dof_map
    }

    /// The underlying field vector.
    pub fn values(&self) -> &'a [f64] {
        self.values
    }
}

impl DofAccess for FieldView<'_> {
    fn dofs_per_cell(&self) -> usize {
        self.dof_map.dofs_per_cell()
    }

    fn local_dof_values(&self, cell: CellId) -> Result<Vec<f64>, MappingError> {
        Ok(self
            .dof_map
            .cell_dofs(cell)?
            .iter()
            .map(|&i| self.values[i])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(raw: u64) -> CellId {
        CellId::new(raw).unwrap()
    }

    #[test]
    fn contiguous_numbering() {
        let map = DofMap::contiguous(&[cid(3), cid(1)], 4).unwrap();
        assert_eq!(map.n_cells(), 2);
        assert_eq!(map.dofs_per_cell(), 4);
        assert_eq!(map.cell_dofs(cid(3)).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(map.cell_dofs(cid(1)).unwrap(), &[4, 5, 6, 7]);
        assert_eq!(map.n_global_dofs(), 8);
        assert_eq!(map.cells().collect::<Vec<_>>(), vec![cid(1), cid(3)]);
    }

    #[test]
    fn uniform_dof_count_enforced() {
        let mut map = DofMap::new();
        map.insert(cid(1), vec![0, 1, 2]).unwrap();
        assert_eq!(
            map.insert(cid(2), vec![3, 4]),
            Err(MappingError::DofCountMismatch {
                cell: cid(2),
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn field_view_gathers_shared_dofs() {
        let mut map = DofMap::new();
        map.insert(cid(1), vec![0, 1]).unwrap();
        map.insert(cid(2), vec![1, 2]).unwrap();
        let values = [10.0, 20.0, 30.0];
        let view = FieldView::new(&map, &values).unwrap();
        assert_eq!(view.local_dof_values(cid(2)).unwrap(), vec![20.0, 30.0]);
        assert_eq!(
            view.local_dof_values(cid(9)),
            Err(MappingError::MissingCell(cid(9)))
        );
    }

    #[test]
    fn field_view_rejects_short_vector() {
        let map = DofMap::contiguous(&[cid(1)], 3).unwrap();
        let values = [1.0, 2.0];
        assert_eq!(
            FieldView::new(&map, &values).unwrap_err(),
            MappingError::DofIndexOutOfRange {
                cell: cid(1),
                index: 2,
                len: 2
            }
        );
    }
}
