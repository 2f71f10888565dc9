//! Benchmarks for the broad phase and the full world step.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use collision_sim::collision::{brute_force_pairs, detect_contacts};
use collision_sim::grid::SpatialGrid;
use collision_sim::{scenario, Bounds, SimConfig, World};

fn config(count: usize) -> SimConfig {
    SimConfig {
        body_count: count,
        bounds: Bounds::rect(1000.0, 1000.0).expect("valid bounds"),
        min_radius: 2.0,
        max_radius: 4.0,
        max_speed: 50.0,
        seed: Some(1),
        ..SimConfig::default()
    }
    .with_auto_cell_size()
}

fn populated_world(count: usize) -> World {
    let config = config(count);
    let mut rng = scenario::rng_for(&config);
    let mut world = World::new(config).expect("valid config");
    scenario::populate(&mut world, &mut rng).expect("populate");
    world
}

// ============================================================================
// Broad Phase
// ============================================================================

fn bench_grid_vs_brute_force(c: &mut Criterion) {
    let world = populated_world(1000);
    let bodies = world.bodies();
    let mut grid = SpatialGrid::new(world.config().cell_size).expect("valid cell size");
    let mut contacts = Vec::new();

    c.bench_function("grid_contacts_1000", |b| {
        b.iter(|| {
            grid.rebuild(bodies);
            contacts.clear();
            black_box(detect_contacts(bodies, grid.candidate_pairs(), &mut contacts))
        })
    });

    c.bench_function("brute_force_contacts_1000", |b| {
        b.iter(|| black_box(brute_force_pairs(bodies)))
    });
}

// ============================================================================
// World Step
// ============================================================================

fn bench_world_step(c: &mut Criterion) {
    for count in [1000, 5000] {
        let mut world = populated_world(count);
        c.bench_function(&format!("world_substep_{count}"), |b| {
            b.iter(|| black_box(world.single_step()))
        });
    }
}

criterion_group!(benches, bench_grid_vs_brute_force, bench_world_step);
criterion_main!(benches);
