use collision_sim::collision::brute_force_pairs;
use collision_sim::grid::SpatialGrid;
use collision_sim::{scenario, Body, Bounds, SimConfig, World};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::{Duration, Instant};

const DT: f32 = 1.0 / 120.0;

fn config(width: f32, height: f32) -> SimConfig {
    SimConfig {
        bounds: Bounds::rect(width, height).unwrap(),
        cell_size: 4.0,
        ..SimConfig::default()
    }
}

fn ball(x: f32, y: f32, vx: f32, vy: f32) -> Body {
    Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 1.0, 1.0, 1.0).unwrap()
}

fn random_world(seed: u64, count: usize, bounds: Bounds, max_speed: f32) -> World {
    let config = SimConfig {
        body_count: count,
        bounds,
        min_radius: 1.0,
        max_radius: 3.0,
        max_speed,
        seed: Some(seed),
        ..SimConfig::default()
    }
    .with_auto_cell_size();
    let mut rng = scenario::rng_for(&config);
    let mut world = World::new(config).unwrap();
    scenario::populate(&mut world, &mut rng).unwrap();
    world
}

#[test]
fn bodies_at_rest_stay_put() {
    let mut world = World::new(config(100.0, 100.0)).unwrap();
    for i in 0..10 {
        for j in 0..10 {
            world.spawn_body(ball(5.0 + 9.0 * i as f32, 5.0 + 9.0 * j as f32, 0.0, 0.0));
        }
    }
    let before = world.bodies().to_vec();

    for _ in 0..240 {
        world.step(1.0 / 60.0);
    }

    assert_eq!(world.bodies(), before.as_slice());
}

#[test]
fn zero_elapsed_time_changes_nothing() {
    let mut world = random_world(7, 200, Bounds::rect(300.0, 300.0).unwrap(), 40.0);
    world.step(0.5);
    let before = world.bodies().to_vec();

    let report = world.step(0.0);

    assert_eq!(report.substeps, 0);
    assert_eq!(world.bodies(), before.as_slice());
}

#[test]
fn head_on_collision_swaps_velocities() {
    let mut world = World::new(config(100.0, 100.0)).unwrap();
    let a = world.spawn_body(ball(50.0, 50.0, 1.0, 0.0));
    let b = world.spawn_body(ball(51.9, 50.0, -1.0, 0.0));

    let report = world.step(DT);
    assert_eq!(report.contacts, 1);

    let (a, b) = (world.body(a).unwrap(), world.body(b).unwrap());
    assert!((a.position - b.position).length() >= 2.0 - 1e-4);
    assert!((a.velocity.x + 1.0).abs() < 1e-5);
    assert!((b.velocity.x - 1.0).abs() < 1e-5);
}

#[test]
fn elastic_collisions_preserve_kinetic_energy() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut world = World::new(config(400.0, 400.0)).unwrap();

    // Well separated pairs, each already overlapping and closing in, at
    // speeds from a crawl up to a few units per second
    for i in 0..20 {
        for j in 0..20 {
            let center = Vec2::new(10.0 + 20.0 * i as f32, 10.0 + 20.0 * j as f32);
            let axis = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
            let speed = if (i + j) % 2 == 0 {
                rng.gen_range(0.001f32..0.1)
            } else {
                rng.gen_range(0.1f32..5.0)
            };
            let gap = rng.gen_range(1.9f32..1.99) * 0.5;
            let a = center - axis * gap;
            let b = center + axis * gap;
            world.spawn_body(ball(a.x, a.y, axis.x * speed, axis.y * speed));
            world.spawn_body(ball(b.x, b.y, -axis.x * speed, -axis.y * speed));
        }
    }
    let before = world.kinetic_energy();

    let report = world.step(DT);

    assert_eq!(report.substeps, 1);
    assert_eq!(report.contacts, 400);
    assert_eq!(report.impulses, 400);
    assert_eq!(report.boundary_hits, 0);
    let after = world.kinetic_energy();
    assert!(
        (before - after).abs() <= 1e-4 * before,
        "energy changed from {before} to {after}"
    );
}

#[test]
fn bodies_never_leave_rectangular_bounds() {
    let mut world = random_world(21, 300, Bounds::rect(200.0, 200.0).unwrap(), 80.0);
    world.set_gravity(Vec2::new(0.0, -50.0)).unwrap();

    for _ in 0..200 {
        world.step(1.0 / 60.0);
        for body in world.bodies() {
            assert!(
                world.bounds().contains_circle(body.position, body.radius()),
                "body escaped at {}",
                body.position
            );
        }
    }
}

#[test]
fn bodies_never_leave_circular_bounds() {
    let bounds = Bounds::circle(Vec2::new(100.0, 100.0), 100.0).unwrap();
    let mut world = random_world(5, 250, bounds, 80.0);

    for _ in 0..200 {
        world.step(1.0 / 60.0);
        for body in world.bodies() {
            assert!(world.bounds().contains_circle(body.position, body.radius()));
        }
    }
}

#[test]
fn dropped_body_settles_on_the_floor() {
    let mut world = World::new(SimConfig {
        gravity: Vec2::new(0.0, -9.8),
        ..config(20.0, 20.0)
    })
    .unwrap();
    let body = Body::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 1.0, 1.0, 0.5).unwrap();
    let id = world.spawn_body(body);

    for _ in 0..30 * 60 {
        world.step(1.0 / 60.0);
    }

    let body = world.body(id).unwrap();
    assert!((body.position.y - 1.0).abs() < 1e-3, "resting at {}", body.position.y);
    assert!(body.velocity.length() < 0.1, "still moving at {}", body.velocity);
}

#[test]
fn grid_finds_every_overlap_found_by_brute_force() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut grid = SpatialGrid::new(5.0).unwrap();

    for _ in 0..10 {
        let bodies: Vec<Body> = (0..300)
            .map(|_| {
                Body::new(
                    Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)),
                    Vec2::ZERO,
                    rng.gen_range(0.5..8.0),
                    1.0,
                    1.0,
                )
                .unwrap()
            })
            .collect();
        grid.rebuild(&bodies);

        let candidates: HashSet<(usize, usize)> = grid.candidate_pairs().collect();
        for pair in brute_force_pairs(&bodies) {
            assert!(candidates.contains(&pair), "grid missed {pair:?}");
        }
    }
}

#[test]
fn thousand_bodies_avoid_quadratic_candidates() {
    let mut world = random_world(42, 1000, Bounds::rect(1000.0, 1000.0).unwrap(), 50.0);
    let all_pairs = 1000 * 999 / 2;

    let start = Instant::now();
    let report = world.single_step();
    for _ in 0..60 {
        world.step(1.0 / 60.0);
    }
    let elapsed = start.elapsed();

    assert!(
        report.candidates * 50 < all_pairs,
        "{} candidates for {} bodies",
        report.candidates,
        world.len()
    );
    assert!(elapsed < Duration::from_secs(20), "took {elapsed:?}");
}

#[test]
fn broad_phase_work_grows_linearly_at_fixed_density() {
    // Same density, twice the bodies: candidates should roughly double
    let candidates = |count: usize, side: f32| {
        let mut world = random_world(42, count, Bounds::rect(side, side).unwrap(), 50.0);
        world.single_step().candidates
    };
    let small = candidates(1000, 1000.0);
    let large = candidates(2000, 1000.0 * std::f32::consts::SQRT_2);

    assert!(small > 0);
    assert!(
        (large as f32) < 2.5 * small as f32,
        "{small} candidates at 1000 bodies, {large} at 2000"
    );
}
