mod common;

use common::{Geometry, cid, distance, lattice};
use fe_field_mapping::prelude::*;

fn check_round_trip(dim: usize, spacedim: usize) {
    let geometry = Geometry::spherical_face(dim, spacedim);
    let mapping = geometry.mapping();
    assert_eq!(mapping.dimension(), dim);
    assert_eq!(mapping.space_dimension(), spacedim);
    assert_eq!(mapping.degree(), 2);

    for xi in lattice(dim, 5) {
        let x = mapping.forward(cid(1), &xi).unwrap();
        assert_eq!(x.len(), spacedim);
        let back = mapping
            .inverse(cid(1), &x)
            .unwrap_or_else(|e| panic!("dim {dim}, spacedim {spacedim}, xi {xi:?}: {e}"));
        assert!(
            distance(&back, &xi) < 1e-10,
            "dim {dim}, spacedim {spacedim}: {xi:?} -> {x:?} -> {back:?}"
        );
    }
}

#[test]
fn round_trip_1d() {
    check_round_trip(1, 1);
}

#[test]
fn round_trip_2d() {
    check_round_trip(2, 2);
}

#[test]
fn round_trip_3d() {
    check_round_trip(3, 3);
}

#[test]
fn round_trip_curve_in_plane() {
    check_round_trip(1, 2);
}

#[test]
fn round_trip_surface_in_space() {
    check_round_trip(2, 3);
}

#[test]
fn face_vertices_lie_on_sphere() {
    for dim in 2..=3 {
        let geometry = Geometry::spherical_face(dim, dim);
        let vertices = geometry.mapping().vertices(cid(1)).unwrap();
        let radius = (dim as f64).sqrt();
        // vertices with xi_0 = 0 are the even ones
        for v in vertices.iter().step_by(2) {
            let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
            assert!((norm - radius).abs() < 1e-12, "{v:?}");
        }
        for v in vertices.iter().skip(1).step_by(2) {
            assert!((v[0] - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn off_surface_point_projects_to_foot_point() {
    // Flat square embedded in 3D at z = 0.
    let geometry = Geometry::new(2, 3, |xi| vec![2.0 * xi[0], 3.0 * xi[1], 0.0]);
    let mapping = geometry.mapping();
    let xi = mapping.inverse(cid(1), &[0.5, 1.5, 0.4]).unwrap();
    assert!(distance(&xi, &[0.25, 0.5]) < 1e-10, "{xi:?}");
}

#[test]
fn off_curve_point_has_orthogonal_residual() {
    let geometry = Geometry::spherical_face(1, 2);
    let mapping = geometry.mapping();
    let on_curve = mapping.forward(cid(1), &[0.3]).unwrap();
    let jac = mapping.jacobian(cid(1), &[0.3]).unwrap();
    // step a little along the normal of the curve
    let normal = [-jac.get(1, 0), jac.get(0, 0)];
    let len = (normal[0] * normal[0] + normal[1] * normal[1]).sqrt();
    let target = [
        on_curve[0] + 0.01 * normal[0] / len,
        on_curve[1] + 0.01 * normal[1] / len,
    ];

    let xi = mapping.inverse(cid(1), &target).unwrap();
    assert!((xi[0] - 0.3).abs() < 1e-3);
    let foot = mapping.forward(cid(1), &xi).unwrap();
    let jac = mapping.jacobian(cid(1), &xi).unwrap();
    let residual = [target[0] - foot[0], target[1] - foot[1]];
    let tangential = jac.transpose_apply(&residual)[0].abs() / jac.frobenius_norm();
    assert!(tangential < 1e-10, "{tangential:e}");
}
