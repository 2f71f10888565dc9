//! Simulation world: owns the bodies and runs the collision pipeline
//!
//! Each fixed sub-step runs, in order: integrate → rebuild grid → narrow
//! phase → resolve pair contacts (ascending index order) → resolve boundary
//! contacts. Boundary resolution runs last so every body ends the sub-step
//! inside the bounds.

use glam::Vec2;

use crate::body::{Body, BodyId};
use crate::bounds::Bounds;
use crate::collision::{detect_contacts, Contact};
use crate::config::SimConfig;
use crate::error::{Diagnostic, SimError};
use crate::grid::SpatialGrid;
use crate::integrator::{integrate, FixedTimestep};
use crate::resolver::{resolve_boundary, resolve_contact, ResolverSettings};

/// What happened during one call to [`World::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub substeps: u32,
    /// Broad-phase candidate pairs examined by the narrow phase
    pub candidates: usize,
    /// Confirmed overlapping pairs
    pub contacts: usize,
    /// Contacts that received a velocity impulse
    pub impulses: usize,
    pub boundary_hits: usize,
    /// Seconds discarded by the catch-up cap
    pub dropped_time: f32,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct World {
    config: SimConfig,
    bodies: Vec<Body>,
    /// Parallel to `bodies`, strictly ascending
    ids: Vec<BodyId>,
    next_id: u64,
    grid: SpatialGrid,
    clock: FixedTimestep,
    contacts: Vec<Contact>,
    paused: bool,
}

impl World {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = SpatialGrid::new(config.cell_size)?;
        let clock = FixedTimestep::new(config.timestep, config.max_substeps)?;

        log::info!(
            "World created: bounds {:?}, cell size {}, timestep {:.5}s, gravity {}",
            config.bounds,
            config.cell_size,
            config.timestep,
            config.gravity
        );

        Ok(Self {
            config,
            bodies: Vec::new(),
            ids: Vec::new(),
            next_id: 0,
            grid,
            clock,
            contacts: Vec::new(),
            paused: false,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.config.bounds
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<(), SimError> {
        if !gravity.is_finite() {
            return Err(SimError::invalid("gravity", gravity.length(), "must be finite"));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Read-only view of all bodies, in spawn order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Ids of all bodies, parallel to [`bodies`](Self::bodies)
    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|index| &self.bodies[index])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |index| &mut self.bodies[index])
    }

    /// Add a body and return its id. Bodies placed outside the bounds are
    /// pushed inside on the next sub-step.
    pub fn spawn_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(body);
        self.ids.push(id);
        id
    }

    /// Remove a body, keeping the order of the others
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        self.ids.remove(index);
        Some(self.bodies.remove(index))
    }

    /// Remove every body and forget carried-over time
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.ids.clear();
        self.contacts.clear();
        self.clock.reset();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Flip the pause flag and return the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::debug!("Simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Advance by `elapsed` wall-clock seconds using fixed sub-steps.
    /// Does nothing while paused.
    pub fn step(&mut self, elapsed: f32) -> StepReport {
        let mut report = StepReport::default();
        if self.paused {
            return report;
        }

        let advance = self.clock.advance(elapsed);
        if advance.dropped > 0.0 {
            log::warn!(
                "Simulation fell behind: dropped {:.3}s after {} sub-steps",
                advance.dropped,
                advance.substeps
            );
        }
        report.dropped_time = advance.dropped;

        let dt = self.clock.step();
        for _ in 0..advance.substeps {
            self.substep(dt, &mut report);
        }

        log::trace!(
            "step: {} sub-steps, {} candidates, {} contacts, {} wall hits",
            report.substeps,
            report.candidates,
            report.contacts,
            report.boundary_hits
        );
        report
    }

    /// Run exactly one fixed sub-step, paused or not. Used for frame-by-frame
    /// stepping.
    pub fn single_step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        let dt = self.clock.step();
        self.substep(dt, &mut report);
        report
    }

    fn substep(&mut self, dt: f32, report: &mut StepReport) {
        let settings = self.settings_for(dt);

        integrate(&mut self.bodies, self.config.gravity, dt);
        self.sanitize(report);

        self.grid.rebuild(&self.bodies);
        self.contacts.clear();
        report.candidates += detect_contacts(&self.bodies, self.grid.candidate_pairs(), &mut self.contacts);
        report.contacts += self.contacts.len();

        for contact in &self.contacts {
            if contact.degenerate {
                let (a, b) = (self.ids[contact.a], self.ids[contact.b]);
                log::debug!("Bodies {a} and {b} share a centre; separating along fallback axis");
                report.diagnostics.push(Diagnostic::DegenerateGeometry { a, b });
            }
            if resolve_contact(&mut self.bodies, contact, &settings) {
                report.impulses += 1;
            }
        }

        let bounds = self.config.bounds;
        for body in &mut self.bodies {
            report.boundary_hits += resolve_boundary(body, &bounds, &settings);
        }

        self.sanitize(report);
        report.substeps += 1;
    }

    /// Resolver settings for one sub-step. The wall resting threshold never
    /// drops below twice the speed gravity adds per sub-step, so bodies lying
    /// on the floor stop instead of hopping.
    fn settings_for(&self, dt: f32) -> ResolverSettings {
        let mut settings = self.config.resolver;
        settings.resting_speed = settings
            .resting_speed
            .max(2.0 * self.config.gravity.length() * dt);
        settings
    }

    /// Reset any body whose state went non-finite
    fn sanitize(&mut self, report: &mut StepReport) {
        let center = self.config.bounds.center();
        for (body, &id) in self.bodies.iter_mut().zip(&self.ids) {
            if body.is_finite() {
                continue;
            }
            log::warn!(
                "Body {id} became non-finite (position {}, velocity {}); resetting",
                body.position,
                body.velocity
            );
            if !body.position.is_finite() {
                body.position = center;
            }
            body.velocity = Vec2::ZERO;
            report.diagnostics.push(Diagnostic::NumericalInstability { body: id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(SimConfig {
            bounds: Bounds::rect(100.0, 100.0).unwrap(),
            cell_size: 4.0,
            ..SimConfig::default()
        })
        .unwrap()
    }

    fn ball(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SimConfig {
            cell_size: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(World::new(config), Err(SimError::InvalidParameter { name: "cell_size", .. })));
    }

    #[test]
    fn ids_stay_valid_after_removal() {
        let mut world = world();
        let a = world.spawn_body(ball(10.0, 10.0));
        let b = world.spawn_body(ball(20.0, 10.0));
        let c = world.spawn_body(ball(30.0, 10.0));

        assert_eq!(world.remove_body(b).map(|body| body.position.x), Some(20.0));
        assert!(world.remove_body(b).is_none());
        assert_eq!(world.body(a).unwrap().position.x, 10.0);
        assert_eq!(world.body(c).unwrap().position.x, 30.0);
        assert_eq!(world.ids(), &[a, c]);
    }

    #[test]
    fn paused_world_does_not_move() {
        let mut world = world();
        let mut body = ball(50.0, 50.0);
        body.velocity = Vec2::new(10.0, 0.0);
        let id = world.spawn_body(body);

        world.set_paused(true);
        let report = world.step(1.0);
        assert_eq!(report.substeps, 0);
        assert_eq!(world.body(id).unwrap().position, Vec2::new(50.0, 50.0));

        assert!(!world.toggle_pause());
        world.step(1.0 / 60.0);
        assert!(world.body(id).unwrap().position.x > 50.0);
    }

    #[test]
    fn single_step_runs_while_paused() {
        let mut world = world();
        let mut body = ball(50.0, 50.0);
        body.velocity = Vec2::new(12.0, 0.0);
        let id = world.spawn_body(body);
        world.set_paused(true);

        assert_eq!(world.single_step().substeps, 1);
        let expected = 50.0 + 12.0 * world.config().timestep;
        assert!((world.body(id).unwrap().position.x - expected).abs() < 1e-4);
    }

    #[test]
    fn non_finite_body_is_reset_and_reported() {
        let mut world = world();
        let id = world.spawn_body(ball(50.0, 50.0));
        world.spawn_body(ball(20.0, 20.0));
        world.body_mut(id).unwrap().velocity = Vec2::new(f32::NAN, 0.0);

        let report = world.step(1.0 / 120.0);
        assert!(report
            .diagnostics
            .contains(&Diagnostic::NumericalInstability { body: id }));
        let body = world.body(id).unwrap();
        assert!(body.is_finite());
        assert!(world.bounds().contains_circle(body.position, body.radius()));
    }

    #[test]
    fn coincident_bodies_are_separated_and_reported() {
        let mut world = world();
        let a = world.spawn_body(ball(50.0, 50.0));
        let b = world.spawn_body(ball(50.0, 50.0));

        let report = world.step(1.0 / 120.0);
        assert!(report.diagnostics.contains(&Diagnostic::DegenerateGeometry { a, b }));
        let gap = world.body(b).unwrap().position - world.body(a).unwrap().position;
        assert!(gap.length() >= 2.0 - 1e-4);
    }

    #[test]
    fn rejects_non_finite_gravity() {
        let mut world = world();
        assert!(world.set_gravity(Vec2::new(0.0, f32::NAN)).is_err());
        assert_eq!(world.gravity(), Vec2::ZERO);
        world.set_gravity(Vec2::new(0.0, -9.8)).unwrap();
        assert_eq!(world.gravity(), Vec2::new(0.0, -9.8));
    }

    #[test]
    fn slow_elastic_pair_keeps_its_energy() {
        let mut world = world();
        let a = world.spawn_body(Body::new(Vec2::new(50.0, 50.0), Vec2::new(0.04, 0.0), 1.0, 1.0, 1.0).unwrap());
        let b = world.spawn_body(Body::new(Vec2::new(51.99, 50.0), Vec2::new(-0.04, 0.0), 1.0, 1.0, 1.0).unwrap());
        let before = world.kinetic_energy();

        let report = world.step(1.0 / 120.0);

        assert_eq!(report.contacts, 1);
        assert!((world.kinetic_energy() - before).abs() < 1e-6);
        assert!((world.body(a).unwrap().velocity.x + 0.04).abs() < 1e-6);
        assert!((world.body(b).unwrap().velocity.x - 0.04).abs() < 1e-6);
    }

    #[test]
    fn anchor_touching_a_wall_stays_put() {
        let mut world = world();
        let id = world.spawn_body(Body::anchor(Vec2::new(0.5, 50.0), 2.0, 1.0).unwrap());
        let report = world.step(1.0 / 120.0);
        assert_eq!(report.boundary_hits, 0);
        assert_eq!(world.body(id).unwrap().position, Vec2::new(0.5, 50.0));
    }

    #[test]
    fn clear_removes_everything() {
        let mut world = world();
        world.spawn_body(ball(10.0, 10.0));
        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.step(0.1).contacts, 0);
    }
}
