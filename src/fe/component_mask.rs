//! Selection of the vector components that supply geometric coordinates.
//!
//! A selected component feeds the physical coordinate equal to the number of
//! selected components before it, so mask order is coordinate order.

use crate::mapping_error::MappingError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Boolean mask over the vector components of a composite basis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentMask {
    selected: Vec<bool>,
}

impl ComponentMask {
    /// Mask of `n_components` entries, all set to `initial`.
    pub fn new(n_components: usize, initial: bool) -> Self {
        Self {
            selected: vec![initial; n_components],
        }
    }

    /// Mask from explicit flags.
    pub fn from_bools(selected: impl Into<Vec<bool>>) -> Self {
        Self {
            selected: selected.into(),
        }
    }

    /// Set the flag of `component`.
    pub fn set(&mut self, component: usize, value: bool) -> Result<(), MappingError> {
        let len = self.selected.len();
        let slot = self
            .selected
            .get_mut(component)
            .ok_or(MappingError::ComponentOutOfRange { component, len })?;
        *slot = value;
        Ok(())
    }

    /// Number of components covered by the mask.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True for a mask over zero components.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `component` is selected; components past the end are not.
    pub fn is_selected(&self, component: usize) -> bool {
        self.selected.get(component).copied().unwrap_or(false)
    }

    /// Number of selected components.
    pub fn n_selected(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    /// First selected component, if any.
    pub fn first_selected(&self) -> Option<usize> {
        self.selected.iter().position(|&s| s)
    }

    /// Selected component indices in mask order.
    pub fn selected_components(&self) -> Vec<usize> {
        self.selected.iter().positions(|&s| s).collect()
    }

    /// Output coordinate fed by each component, or `None` when unselected.
    pub fn ranks(&self) -> Vec<Option<usize>> {
        let mut next = 0;
        self.selected
            .iter()
            .map(|&s| {
                s.then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }

    /// Iterate over the flags.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.selected.iter().copied()
    }
}
