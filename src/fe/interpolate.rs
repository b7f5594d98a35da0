//! Position-vector initialization.
//!
//! Fills the geometry components of a field vector from a caller-supplied
//! position function, so that the resulting FE-field mapping reproduces that
//! function at the support points of each scalar basis. The position function
//! is where callers put their own boundary or manifold description.

use crate::cell::CellId;
use crate::fe::component_mask::ComponentMask;
use crate::fe::dof_map::DofMap;
use crate::fe::evaluator::BasisEvaluator;
use crate::fe::system::FeSystem;
use crate::linalg::solve_in_place;
use crate::mapping_error::MappingError;

const COLLOCATION_TOLERANCE: f64 = 1e-13;

/// Local DOF values of one cell whose selected components interpolate `position`.
///
/// `position` maps a reference point to a physical point with one coordinate
/// per selected mask component. Unselected components are left at zero.
pub fn interpolate_position<F>(
    system: &FeSystem,
    mask: &ComponentMask,
    position: F,
) -> Result<Vec<f64>, MappingError>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    if mask.len() != system.n_components() {
        return Err(MappingError::MaskLengthMismatch {
            expected: system.n_components(),
            found: mask.len(),
        });
    }
    let spacedim = mask.n_selected();
    let mut local = vec![0.0; system.n_dofs()];

    for (component, rank) in mask.ranks().into_iter().enumerate() {
        let Some(rank) = rank else { continue };
        let basis = system.component_basis(component);
        let points = basis.support_points();
        let mut coefficients = points
            .iter()
            .map(|point| {
                let x = position(point);
                if x.len() != spacedim {
                    return Err(MappingError::DimensionMismatch {
                        context: "position function output",
                        expected: spacedim,
                        found: x.len(),
                    });
                }
                Ok(x[rank])
            })
            .collect::<Result<Vec<_>, MappingError>>()?;

        if !basis.is_nodal() {
            let n = basis.n_dofs();
            let mut collocation = Vec::with_capacity(n * n);
            for point in &points {
                collocation.extend((0..n).map(|i| basis.value(i, point)));
            }
            solve_in_place(n, &mut collocation, &mut coefficients, COLLOCATION_TOLERANCE).map_err(
                |e| {
                    MappingError::InvalidBasis(format!(
                        "singular collocation matrix for component {component} (pivot ratio {:e})",
                        e.pivot_ratio
                    ))
                },
            )?;
        }
        local[system.component_dofs(component)].copy_from_slice(&coefficients);
    }
    Ok(local)
}

/// Global field vector whose selected components interpolate `position` on every cell.
///
/// DOFs shared between cells receive the value from the last cell visited
/// (ascending `CellId`), which is consistent whenever the position is.
pub fn position_vector<F>(
    system: &FeSystem,
    dof_map: &DofMap,
    mask: &ComponentMask,
    position: F,
) -> Result<Vec<f64>, MappingError>
where
    F: Fn(CellId, &[f64]) -> Vec<f64>,
{
    let mut field = vec![0.0; dof_map.n_global_dofs()];
    for cell in dof_map.cells() {
        let indices = dof_map.cell_dofs(cell)?;
        if indices.len() != system.n_dofs() {
            return Err(MappingError::DofCountMismatch {
                cell,
                expected: system.n_dofs(),
                found: indices.len(),
            });
        }
        let local = interpolate_position(system, mask, |xi| position(cell, xi))?;
        for (i, (&global, value)) in indices.iter().zip(local).enumerate() {
            if mask.is_selected(system.component_of(i)) {
                field[global] = value;
            }
        }
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fe::scalar_basis::ScalarBasis;

    fn system(dim: usize) -> FeSystem {
        FeSystem::new(vec![
            (ScalarBasis::lagrange(dim, 1).unwrap(), 1),
            (ScalarBasis::bernstein(dim, 2).unwrap(), dim),
        ])
        .unwrap()
    }

    fn geometry_mask(dim: usize) -> ComponentMask {
        let mut mask = ComponentMask::new(dim + 1, true);
        mask.set(0, false).unwrap();
        mask
    }

    #[test]
    fn bernstein_reproduces_quadratic_position() {
        let system = system(2);
        let mask = geometry_mask(2);
        let position = |xi: &[f64]| vec![xi[0] * xi[0] + xi[1], 2.0 * xi[1] - xi[0] * xi[1]];
        let local = interpolate_position(&system, &mask, position).unwrap();

        // scalar component untouched
        assert!(local[system.component_dofs(0)].iter().all(|&v| v == 0.0));

        let point = [0.37, 0.81];
        let tab = system.tabulate(&point).unwrap();
        let mut x = [0.0; 2];
        for i in 0..system.n_dofs() {
            match system.component_of(i) {
                1 => x[0] += local[i] * tab.values[i],
                2 => x[1] += local[i] * tab.values[i],
                _ => {}
            }
        }
        let expected = position(&point);
        assert!((x[0] - expected[0]).abs() < 1e-12);
        assert!((x[1] - expected[1]).abs() < 1e-12);
    }

    #[test]
    fn bernstein_vertex_coefficients_equal_vertex_positions() {
        // Bernstein polynomials interpolate at the end points of each direction.
        let system = system(1);
        let mask = geometry_mask(1);
        let local = interpolate_position(&system, &mask, |xi| vec![3.0 * xi[0] - 1.0]).unwrap();
        let dofs = system.component_dofs(1);
        assert!((local[dofs.start] + 1.0).abs() < 1e-12);
        assert!((local[dofs.end - 1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_position_length_is_reported() {
        let system = system(2);
        let mask = geometry_mask(2);
        assert!(matches!(
            interpolate_position(&system, &mask, |_| vec![0.0]),
            Err(MappingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn global_vector_skips_unselected_components() {
        let system = system(1);
        let mask = geometry_mask(1);
        let cells = [CellId::new(1).unwrap(), CellId::new(2).unwrap()];
        let dof_map = DofMap::contiguous(&cells, system.n_dofs()).unwrap();
        let field = position_vector(&system, &dof_map, &mask, |cell, xi| {
            vec![cell.get() as f64 + xi[0]]
        })
        .unwrap();
        assert_eq!(field.len(), 2 * system.n_dofs());
        // cell 2: scalar DOFs at 5..7 stay zero, geometry DOFs end at 3.0
        assert_eq!(&field[5..7], &[0.0, 0.0]);
        assert!((field[9] - 3.0).abs() < 1e-12);
    }
}
