// benches/hkr_benchmarks.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hkr_sphere::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_hkr_operations(c: &mut Criterion) {
    let manifold = S2Manifold::new(64, Device::Cpu).unwrap();
    let kernel = SpectralHeatKernel::new(&manifold, 0.01).unwrap();
    let functional = HkrFunctional::new(&manifold, &kernel);
    let field = manifold.random_field(&mut StdRng::seed_from_u64(0), DEFAULT_FIELD_SCALE);

    c.bench_function("laplacian_64", |b| {
        b.iter(|| manifold.laplacian(black_box(&field)).unwrap());
    });

    c.bench_function("spectral_apply_64", |b| {
        b.iter(|| kernel.apply(black_box(&field)).unwrap());
    });

    c.bench_function("energy_and_grad_64", |b| {
        b.iter(|| functional.energy_and_grad(black_box(&field)).unwrap());
    });

    c.bench_function("spectral_kernel_build_64", |b| {
        b.iter(|| SpectralHeatKernel::new(black_box(&manifold), 0.01).unwrap());
    });

    c.bench_function("adam_evolution_16x50", |b| {
        let small = S2Manifold::new(16, Device::Cpu).unwrap();
        let hk = SpectralHeatKernel::new(&small, 0.01).unwrap();
        let f = HkrFunctional::new(&small, &hk);
        let start = small.random_field(&mut StdRng::seed_from_u64(1), DEFAULT_FIELD_SCALE);
        let trainer = HkrTrainer::new(&f, 1e-2, 50);
        b.iter(|| trainer.run(black_box(&start)).unwrap());
    });
}

criterion_group!(benches, benchmark_hkr_operations);
criterion_main!(benches);
