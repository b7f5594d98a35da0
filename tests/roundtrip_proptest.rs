mod common;

use common::{Geometry, cid, distance};
use fe_field_mapping::prelude::*;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn square_cells_round_trip(a in 0.0f64..1.0, b in 0.0f64..1.0, c in 0.0f64..1.0) {
        let geometry = Geometry::spherical_face(3, 3);
        let mapping = geometry.mapping();
        let xi = [a, b, c];
        let x = mapping.forward(cid(1), &xi).unwrap();
        let back = mapping.inverse(cid(1), &x).unwrap();
        prop_assert!(distance(&back, &xi) < 1e-10, "{:?} -> {:?}", xi, back);
    }

    #[test]
    fn embedded_cells_round_trip(a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let geometry = Geometry::spherical_face(2, 3);
        let mapping = geometry.mapping();
        let xi = [a, b];
        let x = mapping.forward(cid(1), &xi).unwrap();
        let back = mapping.inverse(cid(1), &x).unwrap();
        prop_assert!(distance(&back, &xi) < 1e-10, "{:?} -> {:?}", xi, back);
    }

    #[test]
    fn forward_is_deterministic(a in -1.0f64..2.0, b in -1.0f64..2.0) {
        let geometry = Geometry::spherical_face(2, 2);
        let mapping = geometry.mapping();
        let first = mapping.forward(cid(1), &[a, b]).unwrap();
        let second = mapping.forward(cid(1), &[a, b]).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn perturbed_cells_round_trip() {
    // Fixed seed keeps the perturbations reproducible.
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..8 {
        let mut geometry = Geometry::spherical_face(2, 2);
        for c in 1..=2 {
            for i in geometry.system.component_dofs(c) {
                geometry.field[i] += rng.gen_range(-0.05..0.05);
            }
        }
        let mapping = geometry.mapping();
        for xi in common::lattice(2, 5) {
            let x = mapping.forward(cid(1), &xi).unwrap();
            let back = mapping.inverse(cid(1), &x).unwrap();
            assert!(distance(&back, &xi) < 1e-10, "{xi:?} -> {back:?}");
        }
    }
}
