//! `CellId`: a strong, zero-cost handle for mesh cells
//!
//! The mapping engine holds no mesh; callers identify the cell a query refers
//! to through this opaque handle, and the [`DofMap`](crate::fe::dof_map::DofMap)
//! resolves it to the cell's DOF indices. `CellId` wraps a nonzero `u64` so
//! that 0 stays available as an invalid or sentinel value on the caller side.

use crate::mapping_error::MappingError;
use std::{fmt, num::NonZeroU64};

/// Identifier of a cell queried through a mapping.
///
/// This type is `repr(transparent)` and has the same layout as `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct CellId(NonZeroU64);

impl CellId {
    /// Creates a new `CellId` from a raw `u64` value.
    ///
    /// Returns [`MappingError::InvalidCellId`] if `raw == 0`.
    ///
    /// ```rust
    /// # use fe_field_mapping::cell::CellId;
    /// let c = CellId::new(1)?;
    /// assert_eq!(c.get(), 1);
    /// # Ok::<(), fe_field_mapping::mapping_error::MappingError>(())
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MappingError> {
        NonZeroU64::new(raw)
            .map(CellId)
            .ok_or(MappingError::InvalidCellId)
    }

    /// Returns the inner `u64` value of this `CellId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellId").field(&self.get()).finish()
    }
}

/// Prints only the raw integer.
impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
