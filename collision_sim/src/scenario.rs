//! Initial body layouts and user spawns

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::{Body, BodyId};
use crate::bounds::Bounds;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::world::World;

/// RNG seeded from the config, or from entropy when no seed is set
pub fn rng_for(config: &SimConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Bright random colour (every channel at least ~0.2)
pub fn random_color<R: Rng>(rng: &mut R) -> [f32; 4] {
    [
        rng.gen_range(50..=255) as f32 / 255.0,
        rng.gen_range(50..=255) as f32 / 255.0,
        rng.gen_range(50..=255) as f32 / 255.0,
        1.0,
    ]
}

fn random_point<R: Rng>(rng: &mut R, bounds: &Bounds, margin: f32) -> Vec2 {
    match *bounds {
        Bounds::Rect { min, max } => {
            let lo = min + Vec2::splat(margin);
            let hi = max - Vec2::splat(margin);
            let pick = |rng: &mut R, lo: f32, hi: f32| {
                if lo < hi {
                    rng.gen_range(lo..hi)
                } else {
                    (lo + hi) * 0.5
                }
            };
            Vec2::new(pick(rng, lo.x, hi.x), pick(rng, lo.y, hi.y))
        }
        Bounds::Circle { center, radius } => {
            let room = (radius - margin).max(0.0);
            // sqrt keeps the density uniform over the disc
            let r = room * rng.gen::<f32>().sqrt();
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * r
        }
    }
}

fn random_radius<R: Rng>(rng: &mut R, config: &SimConfig) -> f32 {
    if config.max_radius > config.min_radius {
        rng.gen_range(config.min_radius..=config.max_radius)
    } else {
        config.min_radius
    }
}

/// A body with random radius, colour, and velocity, placed anywhere inside
/// the bounds
pub fn random_body<R: Rng>(rng: &mut R, config: &SimConfig) -> Result<Body, SimError> {
    let radius = random_radius(rng, config);
    let position = random_point(rng, &config.bounds, radius);
    let velocity = if config.max_speed > 0.0 {
        Vec2::new(
            rng.gen_range(-config.max_speed..=config.max_speed),
            rng.gen_range(-config.max_speed..=config.max_speed),
        )
    } else {
        Vec2::ZERO
    };

    Ok(
        Body::with_density(position, velocity, radius, config.density, config.restitution)?
            .with_color(random_color(rng)),
    )
}

/// Spawn `config.body_count` random bodies into the world
pub fn populate<R: Rng>(world: &mut World, rng: &mut R) -> Result<(), SimError> {
    let config = world.config().clone();
    for _ in 0..config.body_count {
        world.spawn_body(random_body(rng, &config)?);
    }
    log::info!("Spawned {} bodies", config.body_count);
    Ok(())
}

/// Clear the world and fill it again
pub fn reset<R: Rng>(world: &mut World, rng: &mut R) -> Result<(), SimError> {
    world.clear();
    populate(world, rng)
}

/// Spawn one body at rest at `position` (a user click)
pub fn spawn_at<R: Rng>(world: &mut World, rng: &mut R, position: Vec2) -> Result<BodyId, SimError> {
    let config = world.config();
    let radius = random_radius(rng, config);
    let body = Body::with_density(position, Vec2::ZERO, radius, config.density, config.restitution)?
        .with_color(random_color(rng));
    let id = world.spawn_body(body);
    log::debug!("Spawned body {id} at {position}");
    Ok(id)
}
