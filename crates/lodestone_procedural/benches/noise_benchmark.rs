//! Benchmark for the procedural oracle's hot queries.
//!
//! Biome lookups dominate search cost, so this is what to watch.
//!
//! Run with: cargo bench --package lodestone_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lodestone_procedural::{OracleContext, ProceduralOracle, SimplexField, WorldOracle};
use lodestone_shared::{BiomeCell, Dimension, Position, Seed, StructureKind};

fn benchmark_noise_sample(c: &mut Criterion) {
    let field = SimplexField::new(42);

    c.bench_function("simplex_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(field.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_biome_lookup(c: &mut Criterion) {
    let mut ctx = ProceduralOracle::new()
        .create_context()
        .expect("procedural contexts never fail");
    let seed = Seed::new(8_675_309);

    let mut group = c.benchmark_group("biome_lookup");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("1000_cells", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let cell = BiomeCell::at_structure_layer(Position::new(i * 8, -i * 8));
                black_box(ctx.biome_at(seed, Dimension::Overworld, cell).ok());
            }
        });
    });
    group.finish();
}

fn benchmark_candidate_grid(c: &mut Criterion) {
    let mut ctx = ProceduralOracle::new()
        .create_context()
        .expect("procedural contexts never fail");

    c.bench_function("village_candidates_9x9", |b| {
        let mut seed = 0i64;
        b.iter(|| {
            seed += 1;
            for rx in -4..=4 {
                for rz in -4..=4 {
                    black_box(
                        ctx.candidate_position(Seed::new(seed), StructureKind::Village, rx, rz)
                            .ok(),
                    );
                }
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_noise_sample,
    benchmark_biome_lookup,
    benchmark_candidate_grid,
);
criterion_main!(benches);
