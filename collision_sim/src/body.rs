//! Rigid circular bodies

use std::fmt;

use glam::Vec2;

use crate::error::{ensure_positive, ensure_unit, SimError};
use crate::math;

/// Colour given to bodies that were not assigned one
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Stable identifier of a body inside a [`World`](crate::world::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision geometry of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
}

impl Shape {
    /// Radius of the smallest circle around the body centre enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
        }
    }
}

/// A body in the simulation with position, velocity, mass and bounciness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: [f32; 4],
    shape: Shape,
    mass: f32,
    inv_mass: f32,
    restitution: f32,
}

impl Body {
    /// Create a dynamic circle with an explicit mass.
    ///
    /// Fails with [`SimError::InvalidParameter`] if `radius` or `mass` is not
    /// strictly positive or `restitution` is outside `[0, 1]`.
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        mass: f32,
        restitution: f32,
    ) -> Result<Self, SimError> {
        let radius = ensure_positive("radius", radius)?;
        let mass = ensure_positive("mass", mass)?;
        let restitution = ensure_unit("restitution", restitution)?;

        Ok(Self {
            position,
            velocity,
            color: DEFAULT_COLOR,
            shape: Shape::Circle { radius },
            mass,
            inv_mass: 1.0 / mass,
            restitution,
        })
    }

    /// Create a dynamic circle whose mass follows from a uniform density:
    /// `mass = density * radius²`.
    pub fn with_density(
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        density: f32,
        restitution: f32,
    ) -> Result<Self, SimError> {
        let radius = ensure_positive("radius", radius)?;
        let density = ensure_positive("density", density)?;
        Self::new(position, velocity, radius, density * radius * radius, restitution)
    }

    /// Create an immovable circle (infinite mass, zero inverse mass).
    pub fn anchor(position: Vec2, radius: f32, restitution: f32) -> Result<Self, SimError> {
        let radius = ensure_positive("radius", radius)?;
        let restitution = ensure_unit("restitution", restitution)?;

        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            color: DEFAULT_COLOR,
            shape: Shape::Circle { radius },
            mass: f32::INFINITY,
            inv_mass: 0.0,
            restitution,
        })
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn radius(&self) -> f32 {
        self.shape.bounding_radius()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn is_anchor(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) -> Result<(), SimError> {
        self.restitution = ensure_unit("restitution", restitution)?;
        Ok(())
    }

    /// Kinetic energy; anchors never move and contribute nothing
    pub fn kinetic_energy(&self) -> f32 {
        if self.is_anchor() {
            0.0
        } else {
            math::kinetic_energy(self.mass, self.velocity)
        }
    }

    pub fn momentum(&self) -> Vec2 {
        if self.is_anchor() {
            Vec2::ZERO
        } else {
            self.velocity * self.mass
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.radius());
        (self.position - r, self.position + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_radius_and_mass() {
        assert!(Body::new(Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, 0.5).is_err());
        assert!(Body::new(Vec2::ZERO, Vec2::ZERO, 1.0, -2.0, 0.5).is_err());
        assert!(Body::with_density(Vec2::ZERO, Vec2::ZERO, 1.0, 0.0, 0.5).is_err());
        assert!(Body::anchor(Vec2::ZERO, -1.0, 0.5).is_err());
    }

    #[test]
    fn rejects_restitution_outside_unit_interval() {
        assert!(Body::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0, 1.5).is_err());
        let mut body = Body::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0, 0.5).unwrap();
        assert!(body.set_restitution(-0.1).is_err());
        assert_eq!(body.restitution(), 0.5);
    }

    #[test]
    fn density_derives_mass_from_radius_squared() {
        let body = Body::with_density(Vec2::ZERO, Vec2::ZERO, 3.0, 2.0, 1.0).unwrap();
        assert_eq!(body.mass(), 18.0);
        assert!((body.inverse_mass() - 1.0 / 18.0).abs() < 1e-7);
    }

    #[test]
    fn anchors_have_zero_inverse_mass() {
        let anchor = Body::anchor(Vec2::new(1.0, 2.0), 5.0, 0.3).unwrap();
        assert!(anchor.is_anchor());
        assert_eq!(anchor.inverse_mass(), 0.0);
        assert_eq!(anchor.kinetic_energy(), 0.0);
    }

    #[test]
    fn aabb_encloses_circle() {
        let body = Body::new(Vec2::new(2.0, -1.0), Vec2::ZERO, 0.5, 1.0, 1.0).unwrap();
        assert_eq!(body.aabb(), (Vec2::new(1.5, -1.5), Vec2::new(2.5, -0.5)));
    }
}
