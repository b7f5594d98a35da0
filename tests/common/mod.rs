#![allow(dead_code)]
use fe_field_mapping::prelude::*;

pub fn cid(u: u64) -> CellId {
    CellId::new(u).unwrap()
}

/// Tensor lattice `{0, 1/n, …, (n-1)/n}^dim`, first coordinate running fastest.
pub fn lattice(dim: usize, n: usize) -> Vec<Vec<f64>> {
    let total = n.pow(dim as u32);
    (0..total)
        .map(|mut idx| {
            (0..dim)
                .map(|_| {
                    let k = idx % n;
                    idx /= n;
                    k as f64 / n as f64
                })
                .collect()
        })
        .collect()
}

/// Unit cell mapped onto `[-1,1]^dim` whose face `x = -1` is bulged onto the
/// sphere of radius `sqrt(dim)` through the origin-centered vertices. Extra
/// physical coordinates (`spacedim > dim`) carry a small bump so embedded
/// cells are genuinely curved.
pub fn spherical_face_position(dim: usize, spacedim: usize, xi: &[f64]) -> Vec<f64> {
    let y: Vec<f64> = xi.iter().map(|v| 2.0 * v - 1.0).collect();
    let tangential: f64 = y[1..].iter().map(|v| v * v).sum();
    let on_sphere = -(dim as f64 - tangential).sqrt();
    let mut x = Vec::with_capacity(spacedim);
    x.push((1.0 - xi[0]) * on_sphere + xi[0]);
    x.extend_from_slice(&y[1..]);
    let bump: f64 = 0.1 * y.iter().map(|v| 1.0 - v * v).product::<f64>();
    x.resize(spacedim, bump);
    x
}

/// A field-defined geometry: one scalar Q1 component followed by `spacedim`
/// Bernstein-2 components that carry the coordinates.
pub struct Geometry {
    pub dim: usize,
    pub spacedim: usize,
    pub system: FeSystem,
    pub dof_map: DofMap,
    pub field: Vec<f64>,
    pub mask: ComponentMask,
}

impl Geometry {
    /// Build a single-cell geometry (cell id 1) from a position function.
    pub fn new(
        dim: usize,
        spacedim: usize,
        position: impl Fn(&[f64]) -> Vec<f64>,
    ) -> Self {
        let system = FeSystem::new(vec![
            (ScalarBasis::lagrange(dim, 1).unwrap(), 1),
            (ScalarBasis::bernstein(dim, 2).unwrap(), spacedim),
        ])
        .unwrap();
        let dof_map = DofMap::contiguous(&[cid(1)], system.n_dofs()).unwrap();
        let mut mask = ComponentMask::new(spacedim + 1, true);
        mask.set(0, false).unwrap();
        let mut field = position_vector(&system, &dof_map, &mask, |_, xi| position(xi)).unwrap();
        // The scalar component must not leak into the geometry.
        for i in system.component_dofs(0) {
            field[i] = 7.0 + i as f64;
        }
        Self {
            dim,
            spacedim,
            system,
            dof_map,
            field,
            mask,
        }
    }

    pub fn spherical_face(dim: usize, spacedim: usize) -> Self {
        Self::new(dim, spacedim, |xi| spherical_face_position(dim, spacedim, xi))
    }

    pub fn mapping(&self) -> MappingFeField<'_> {
        MappingFeField::new(
            self.spacedim,
            &self.system,
            &self.dof_map,
            &self.field,
            self.mask.clone(),
        )
        .unwrap()
    }

    pub fn mapping_with(&self, options: InverseOptions) -> MappingFeField<'_> {
        MappingFeField::with_options(
            self.spacedim,
            &self.system,
            &self.dof_map,
            &self.field,
            self.mask.clone(),
            options,
        )
        .unwrap()
    }
}

pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
