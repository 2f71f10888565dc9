//! Command-line options

use clap::{Parser, ValueEnum};
use collision_sim::config::{WORLD_HEIGHT, WORLD_WIDTH};
use collision_sim::{Bounds, RestitutionRule, SimConfig, SimError};
use glam::Vec2;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleArg {
    Min,
    Max,
    Average,
    Product,
}

impl From<RuleArg> for RestitutionRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Min => RestitutionRule::Min,
            RuleArg::Max => RestitutionRule::Max,
            RuleArg::Average => RestitutionRule::Average,
            RuleArg::Product => RestitutionRule::Product,
        }
    }
}

/// 2D collision simulation
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Number of bodies spawned at start and on reset
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub bodies: usize,

    /// Downward gravitational acceleration in world units/s²
    #[arg(short, long, default_value_t = 0.0)]
    pub gravity: f32,

    /// World width
    #[arg(long, default_value_t = WORLD_WIDTH)]
    pub width: f32,

    /// World height
    #[arg(long, default_value_t = WORLD_HEIGHT)]
    pub height: f32,

    /// Use a circular arena (diameter = min(width, height)) instead of a rectangle
    #[arg(long)]
    pub circular: bool,

    /// Grid cell size; defaults to twice the mean body diameter
    #[arg(long)]
    pub cell_size: Option<f32>,

    /// Fixed simulation sub-step in seconds
    #[arg(long, default_value_t = 1.0 / 120.0)]
    pub timestep: f32,

    /// Maximum sub-steps per frame before time is dropped
    #[arg(long, default_value_t = 8)]
    pub max_substeps: u32,

    /// Restitution of spawned bodies, 0..=1
    #[arg(short, long, default_value_t = 1.0)]
    pub restitution: f32,

    /// Restitution of the world boundary, 0..=1
    #[arg(long, default_value_t = 1.0)]
    pub wall_restitution: f32,

    /// How two restitution coefficients are combined
    #[arg(long, value_enum, default_value_t = RuleArg::Min)]
    pub restitution_rule: RuleArg,

    /// Mass per squared radius
    #[arg(long, default_value_t = 1.0)]
    pub density: f32,

    #[arg(long, default_value_t = 13.0)]
    pub min_radius: f32,

    #[arg(long, default_value_t = 19.0)]
    pub max_radius: f32,

    /// Maximum initial speed per axis
    #[arg(long, default_value_t = 300.0)]
    pub max_speed: f32,

    /// Seed for reproducible layouts
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Args {
    pub fn into_config(self) -> Result<SimConfig, SimError> {
        let bounds = if self.circular {
            let radius = self.width.min(self.height) * 0.5;
            Bounds::circle(Vec2::new(self.width, self.height) * 0.5, radius)?
        } else {
            Bounds::rect(self.width, self.height)?
        };

        let defaults = SimConfig::default();
        let mut config = SimConfig {
            body_count: self.bodies,
            gravity: Vec2::new(0.0, -self.gravity),
            bounds,
            timestep: self.timestep,
            max_substeps: self.max_substeps,
            restitution: self.restitution,
            density: self.density,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            max_speed: self.max_speed,
            seed: self.seed,
            ..defaults
        }
        .with_auto_cell_size();

        config.resolver.rule = self.restitution_rule.into();
        config.resolver.boundary_restitution = self.wall_restitution;
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_large_world() {
        let config = Args::parse_from(["collision_sim"]).into_config().unwrap();
        assert_eq!(config.body_count, 1000);
        assert_eq!(config.bounds.extent(), Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));
        assert_eq!(config.cell_size, 64.0);
        assert_eq!(config.gravity, Vec2::ZERO);
    }

    #[test]
    fn parses_overrides() {
        let config = Args::parse_from([
            "collision_sim",
            "-n",
            "50",
            "--gravity",
            "9.8",
            "--circular",
            "--cell-size",
            "12",
            "--restitution-rule",
            "product",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.body_count, 50);
        assert_eq!(config.gravity, Vec2::new(0.0, -9.8));
        assert!(matches!(config.bounds, Bounds::Circle { .. }));
        assert_eq!(config.cell_size, 12.0);
        assert_eq!(config.resolver.rule, RestitutionRule::Product);
    }

    #[test]
    fn rejects_invalid_values() {
        let args = Args::parse_from(["collision_sim", "--cell-size", "0"]);
        assert!(args.into_config().is_err());
    }
}
