//! Benchmarks for the dynamical core and a full model step.
//!
//! Run with: `cargo bench --bench time_stepping_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectral_gcm::{
    Boundaries, InitialConditions, Model, ModelConfig, NewtonianRelaxation, NumberFormat,
};

fn model<NF: NumberFormat>(truncation: usize, n_levels: usize) -> Model<NF> {
    let config = ModelConfig::default()
        .with_truncation(truncation)
        .with_levels(n_levels)
        .with_time_step(1200.0);
    Model::builder(config)
        .with_initial_conditions(InitialConditions::RossbyHaurwitz {
            wavenumber: 4,
            amplitude: 7.848e-6,
        })
        .with_parameterization(NewtonianRelaxation::held_suarez())
        .build()
        .expect("valid model")
}

/// The three tendency stages on their own.
fn bench_tendencies(c: &mut Criterion) {
    let mut group = c.benchmark_group("tendencies");

    for (t, levels) in [(21, 8), (42, 8)] {
        let m = model::<f64>(t, levels);
        let core = m.dynamics();
        let vars = m.state().present();
        let boundaries = Boundaries::aquaplanet(m.transform());

        group.bench_with_input(BenchmarkId::new("dynamics", format!("T{}L{}", t, levels)), &t, |b, _| {
            b.iter(|| core.tendencies(black_box(vars), black_box(&boundaries)));
        });

        let grid = core.grid_variables(vars);
        group.bench_with_input(BenchmarkId::new("nonlinear", format!("T{}L{}", t, levels)), &t, |b, _| {
            b.iter(|| core.nonlinear_terms(black_box(&grid)));
        });
    }

    group.finish();
}

/// One semi-implicit leapfrog step including physics and the stability check.
fn bench_model_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_step");
    group.sample_size(20);

    for t in [21, 42] {
        let mut m64 = model::<f64>(t, 8);
        group.bench_with_input(BenchmarkId::new("f64", format!("T{}", t)), &t, |b, _| {
            b.iter(|| black_box(m64.step().is_ok()));
        });

        let mut m32 = model::<f32>(t, 8);
        group.bench_with_input(BenchmarkId::new("f32", format!("T{}", t)), &t, |b, _| {
            b.iter(|| black_box(m32.step().is_ok()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tendencies, bench_model_step);
criterion_main!(benches);
