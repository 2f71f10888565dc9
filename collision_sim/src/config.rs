//! Simulation parameters

use glam::Vec2;

use crate::bounds::Bounds;
use crate::error::{ensure_positive, ensure_unit, SimError};
use crate::resolver::ResolverSettings;

/// Default world size in world units
pub const WORLD_WIDTH: f32 = 6000.0;
pub const WORLD_HEIGHT: f32 = 4500.0;

/// Everything needed to build and populate a [`World`](crate::world::World)
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Bodies created by [`populate`](crate::scenario::populate)
    pub body_count: usize,
    /// Constant acceleration applied to every dynamic body
    pub gravity: Vec2,
    pub bounds: Bounds,
    /// Side of one broad-phase grid cell
    pub cell_size: f32,
    /// Fixed sub-step length in seconds
    pub timestep: f32,
    /// Cap on sub-steps per `step` call
    pub max_substeps: u32,
    /// Restitution of spawned bodies
    pub restitution: f32,
    /// Spawned body mass is `density * radius²`
    pub density: f32,
    /// Spawned radii are drawn uniformly from `min_radius..=max_radius`
    pub min_radius: f32,
    pub max_radius: f32,
    /// Spawned speed per axis is drawn from `-max_speed..=max_speed`
    pub max_speed: f32,
    pub resolver: ResolverSettings,
    /// Seed for the spawning RNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            body_count: 1000,
            gravity: Vec2::ZERO,
            bounds: Bounds::Rect {
                min: Vec2::ZERO,
                max: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            },
            cell_size: 64.0,
            timestep: 1.0 / 120.0,
            max_substeps: 8,
            restitution: 1.0,
            density: 1.0,
            min_radius: 13.0,
            max_radius: 19.0,
            max_speed: 300.0,
            resolver: ResolverSettings::default(),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Mean diameter of spawned bodies
    pub fn mean_diameter(&self) -> f32 {
        self.min_radius + self.max_radius
    }

    /// Set the grid cell to twice the mean body diameter
    pub fn with_auto_cell_size(mut self) -> Self {
        self.cell_size = 2.0 * self.mean_diameter();
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        ensure_positive("cell_size", self.cell_size)?;
        ensure_positive("timestep", self.timestep)?;
        ensure_positive("density", self.density)?;
        ensure_positive("min_radius", self.min_radius)?;
        ensure_positive("max_radius", self.max_radius)?;
        ensure_unit("restitution", self.restitution)?;
        ensure_unit("boundary_restitution", self.resolver.boundary_restitution)?;
        ensure_unit("correction_percent", self.resolver.correction_percent)?;

        if self.max_substeps == 0 {
            return Err(SimError::invalid(
                "max_substeps",
                0.0,
                "must be at least 1",
            ));
        }
        if self.max_radius < self.min_radius {
            return Err(SimError::invalid(
                "max_radius",
                self.max_radius,
                "must not be below min_radius",
            ));
        }
        for (name, value) in [
            ("max_speed", self.max_speed),
            ("slop", self.resolver.slop),
            ("resting_speed", self.resolver.resting_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::invalid(name, value, "must be finite and >= 0"));
            }
        }
        if !self.gravity.is_finite() {
            return Err(SimError::invalid("gravity", self.gravity.length(), "must be finite"));
        }

        let extent = self.bounds.extent();
        ensure_positive("bounds width", extent.x)?;
        ensure_positive("bounds height", extent.y)?;
        Ok(())
    }
}
