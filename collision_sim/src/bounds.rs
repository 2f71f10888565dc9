//! World boundary shapes

use glam::Vec2;

use crate::error::{ensure_positive, SimError};
use crate::math;

/// Region that bodies are confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Axis-aligned rectangle
    Rect { min: Vec2, max: Vec2 },
    /// Circular arena
    Circle { center: Vec2, radius: f32 },
}

impl Bounds {
    /// Rectangle spanning `(0, 0)` to `(width, height)`
    pub fn rect(width: f32, height: f32) -> Result<Self, SimError> {
        let width = ensure_positive("bounds width", width)?;
        let height = ensure_positive("bounds height", height)?;
        Ok(Bounds::Rect {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        })
    }

    pub fn circle(center: Vec2, radius: f32) -> Result<Self, SimError> {
        let radius = ensure_positive("bounds radius", radius)?;
        Ok(Bounds::Circle { center, radius })
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Bounds::Rect { min, max } => (min + max) * 0.5,
            Bounds::Circle { center, .. } => center,
        }
    }

    /// Size of the bounding rectangle
    pub fn extent(&self) -> Vec2 {
        match *self {
            Bounds::Rect { min, max } => max - min,
            Bounds::Circle { radius, .. } => Vec2::splat(radius * 2.0),
        }
    }

    /// Whether a circle lies inside the bounds, allowing for rounding error
    /// left behind by clamping
    pub fn contains_circle(&self, position: Vec2, radius: f32) -> bool {
        let tolerance = 1e-5 * self.extent().max_element().max(1.0);
        let clamped = self.clamp_circle(position, radius);
        (clamped - position).length() <= tolerance
    }

    /// Nearest position to `position` at which a circle of `radius` fits.
    /// Circles larger than the bounds are centred.
    pub fn clamp_circle(&self, position: Vec2, radius: f32) -> Vec2 {
        match *self {
            Bounds::Rect { min, max } => {
                let lo = min + Vec2::splat(radius);
                let hi = max - Vec2::splat(radius);
                let center = (min + max) * 0.5;
                Vec2::new(
                    if lo.x <= hi.x { position.x.clamp(lo.x, hi.x) } else { center.x },
                    if lo.y <= hi.y { position.y.clamp(lo.y, hi.y) } else { center.y },
                )
            }
            Bounds::Circle { center, radius: arena } => {
                let room = arena - radius;
                if room <= 0.0 {
                    return center;
                }
                match math::direction_and_length(position - center) {
                    Some((dir, dist)) if dist > room => center + dir * room,
                    _ => position,
                }
            }
        }
    }

    /// Closed outline for drawing, as a list of points
    pub fn outline(&self, segments: usize) -> Vec<Vec2> {
        match *self {
            Bounds::Rect { min, max } => vec![
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
                min,
            ],
            Bounds::Circle { center, radius } => {
                let segments = segments.max(8);
                (0..=segments)
                    .map(|i| {
                        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
                        center + Vec2::new(angle.cos(), angle.sin()) * radius
                    })
                    .collect()
            }
        }
    }
}
