//! Benchmarks for the CPU-side simulation and mesh generation.
//!
//! Run with: `cargo bench`

use bouncebox::gpu::mesh::{self, ArrowShape};
use bouncebox::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    group.bench_function("free_flight", |b| {
        let config = SceneConfig::default()
            .with_initial_position(Vec3::ZERO)
            .with_initial_velocity(Vec3::new(0.001, 0.0, 0.0))
            .with_duration(None);
        let mut sim = Simulation::new(&config).unwrap();
        b.iter(|| black_box(sim.step(black_box(0.005))))
    });

    group.bench_function("bouncing", |b| {
        let config = SceneConfig::default().with_duration(None);
        let mut sim = Simulation::new(&config).unwrap();
        b.iter(|| black_box(sim.step(black_box(0.005))))
    });

    group.finish();
}

fn bench_reflect(c: &mut Criterion) {
    let bounds = Cuboid::cube(12.0);
    let ball = Ball::new(Vec3::new(5.8, -5.8, 5.8), Vec3::new(10.0, -10.0, 10.0), 0.5);

    c.bench_function("reflect_corner", |b| {
        b.iter(|| {
            let mut ball = ball;
            black_box(bounds.reflect(black_box(&mut ball)))
        })
    });
}

fn bench_headless_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_headless");

    for trail_length in [0usize, 2000, 20_000] {
        group.bench_with_input(
            BenchmarkId::new("trail", trail_length),
            &trail_length,
            |b, &trail_length| {
                let config = SceneConfig::default().with_trail(trail_length, 0.0);
                b.iter(|| {
                    let mut sim = Simulation::new(&config).unwrap();
                    black_box(sim.run_headless(|_, _| {}).unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_meshes(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh");

    for stacks in [8u32, 16, 32] {
        group.bench_with_input(BenchmarkId::new("uv_sphere", stacks), &stacks, |b, &stacks| {
            b.iter(|| black_box(mesh::uv_sphere(stacks, stacks * 2)))
        });
    }

    group.bench_function("arrow", |b| {
        b.iter(|| black_box(mesh::arrow(ArrowShape::default(), 16)))
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_reflect, bench_headless_run, bench_meshes);
criterion_main!(benches);
