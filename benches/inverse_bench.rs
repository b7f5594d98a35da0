use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use fe_field_mapping::prelude::*;

fn cid(raw: u64) -> CellId {
    CellId::new(raw).expect("nonzero CellId")
}

/// Single Bernstein-2 cell over `[-1,1]^dim` with a bulged first face.
fn geometry(dim: usize) -> (FeSystem, DofMap, Vec<f64>, ComponentMask) {
    let system = FeSystem::new(vec![
        (ScalarBasis::lagrange(dim, 1).expect("q1"), 1),
        (ScalarBasis::bernstein(dim, 2).expect("b2"), dim),
    ])
    .expect("system");
    let dof_map = DofMap::contiguous(&[cid(1)], system.n_dofs()).expect("dof map");
    let mut mask = ComponentMask::new(dim + 1, true);
    mask.set(0, false).expect("mask");
    let field = position_vector(&system, &dof_map, &mask, |_, xi| {
        let y: Vec<f64> = xi.iter().map(|v| 2.0 * v - 1.0).collect();
        let tangential: f64 = y[1..].iter().map(|v| v * v).sum();
        let mut x = vec![(1.0 - xi[0]) * -(dim as f64 - tangential).sqrt() + xi[0]];
        x.extend_from_slice(&y[1..]);
        x
    })
    .expect("field");
    (system, dof_map, field, mask)
}

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("fe_field_mapping");

    for dim in 1..=3usize {
        let (system, dof_map, field, mask) = geometry(dim);
        let mapping = MappingFeField::new(dim, &system, &dof_map, &field, mask).expect("mapping");
        let xi = vec![0.3; dim];
        let x = mapping.forward(cid(1), &xi).expect("forward");

        group.bench_with_input(BenchmarkId::new("forward", dim), &dim, |b, _| {
            b.iter(|| black_box(mapping.forward(cid(1), black_box(&xi))));
        });

        group.bench_with_input(BenchmarkId::new("inverse", dim), &dim, |b, _| {
            b.iter(|| black_box(mapping.inverse(cid(1), black_box(&x))));
        });

        let sample = mapping.sample(cid(1)).expect("sample");
        group.bench_with_input(BenchmarkId::new("inverse_sampled", dim), &dim, |b, _| {
            b.iter(|| black_box(sample.inverse(black_box(&x))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mapping);
criterion_main!(benches);
