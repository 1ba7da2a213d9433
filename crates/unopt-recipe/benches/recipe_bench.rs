//! Benchmarks for the unoptimization recipe
//!
//! Run with: cargo bench -p unopt-recipe

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use unopt_ir::Circuit;
use unopt_recipe::insertion::haar_unitary;
use unopt_recipe::{DecompositionMethod, Recipe, RecipeConfig};

/// Benchmark Haar sampling
fn bench_haar(c: &mut Criterion) {
    let mut group = c.benchmark_group("haar_unitary");

    for num_qubits in &[1usize, 2, 3] {
        group.bench_with_input(BenchmarkId::from_parameter(num_qubits), num_qubits, |b, &n| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| haar_unitary(black_box(n), &mut rng).unwrap());
        });
    }

    group.finish();
}

/// Benchmark full recipe runs per decomposition method
fn bench_recipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("recipe");
    let circuit = Circuit::qft(4).unwrap();

    for method in [
        DecompositionMethod::Default,
        DecompositionMethod::Kak,
        DecompositionMethod::Basis,
    ] {
        let recipe = Recipe::new(
            RecipeConfig::new()
                .with_iterations(2)
                .with_decomposition_method(method)
                .with_seed(7),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("qft4", method), &circuit, |b, circuit| {
            b.iter(|| recipe.run(black_box(circuit)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haar, bench_recipe);
criterion_main!(benches);
