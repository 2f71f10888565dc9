//! Impulse-based collision response
//!
//! Each confirmed contact gets one velocity impulse along the contact normal
//! followed by a positional correction that pushes the bodies apart by their
//! inverse-mass share of the penetration. Contacts are handled one at a time
//! in the order given; with several overlapping pairs the result depends on
//! that order, which is accepted as a first-order approximation.

use crate::body::Body;
use crate::bounds::Bounds;
use crate::collision::{test_boundary, Contact};

/// How the restitution coefficients of two colliding bodies are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestitutionRule {
    /// The less bouncy body wins; keeps energy bounded
    #[default]
    Min,
    Max,
    Average,
    Product,
}

impl RestitutionRule {
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            RestitutionRule::Min => a.min(b),
            RestitutionRule::Max => a.max(b),
            RestitutionRule::Average => (a + b) * 0.5,
            RestitutionRule::Product => a * b,
        }
    }
}

/// Tuning for the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    pub rule: RestitutionRule,
    /// Restitution of the world boundary, combined with the body's own
    pub boundary_restitution: f32,
    /// Fraction of the penetration (beyond `slop`) removed per contact
    pub correction_percent: f32,
    /// Penetration tolerated without correction
    pub slop: f32,
    /// Wall approach speeds below this bounce with zero restitution.
    /// Body pairs always use the combined restitution.
    pub resting_speed: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            rule: RestitutionRule::Min,
            boundary_restitution: 1.0,
            correction_percent: 1.0,
            slop: 0.0,
            resting_speed: 0.0,
        }
    }
}

impl ResolverSettings {
    fn wall_restitution(&self, approach_speed: f32, body: f32) -> f32 {
        if approach_speed < self.resting_speed {
            0.0
        } else {
            self.rule.combine(body, self.boundary_restitution)
        }
    }
}

/// Resolve one contact between `bodies[contact.a]` and `bodies[contact.b]`.
///
/// Returns `true` if a velocity impulse was applied (the bodies were
/// approaching). Positional correction is applied either way.
pub fn resolve_contact(bodies: &mut [Body], contact: &Contact, settings: &ResolverSettings) -> bool {
    debug_assert!(contact.a < contact.b, "contacts must be ordered");
    let (head, tail) = bodies.split_at_mut(contact.b);
    let a = &mut head[contact.a];
    let b = &mut tail[0];

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return false;
    }

    let n = contact.normal;
    let approach = (b.velocity - a.velocity).dot(n);

    let mut impulse_applied = false;
    if approach < 0.0 {
        let e = settings.rule.combine(a.restitution(), b.restitution());
        let j = -(1.0 + e) * approach / inv_sum;
        a.velocity -= n * (j * inv_a);
        b.velocity += n * (j * inv_b);
        impulse_applied = true;
    }

    let correction = (contact.depth - settings.slop).max(0.0) * settings.correction_percent / inv_sum;
    a.position -= n * (correction * inv_a);
    b.position += n * (correction * inv_b);

    impulse_applied
}

/// Reflect a body off every wall it penetrates and clamp it back inside.
///
/// Anchors never move, so they are exempt from containment and are left
/// untouched. Returns the number of walls hit.
pub fn resolve_boundary(body: &mut Body, bounds: &Bounds, settings: &ResolverSettings) -> usize {
    if body.is_anchor() {
        return 0;
    }

    let hits = test_boundary(body, bounds);
    if hits.is_empty() {
        return 0;
    }

    for hit in hits.iter() {
        let normal_speed = body.velocity.dot(hit.normal);
        if normal_speed < 0.0 {
            let e = settings.wall_restitution(-normal_speed, body.restitution());
            body.velocity -= hit.normal * ((1.0 + e) * normal_speed);
        }
    }

    body.position = bounds.clamp_circle(body.position, body.radius());
    hits.len()
}
