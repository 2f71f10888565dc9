//! Time integration: semi-implicit Euler with a fixed-timestep accumulator

use glam::Vec2;

use crate::body::Body;
use crate::error::{ensure_positive, SimError};

/// Result of feeding elapsed time into a [`FixedTimestep`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Advance {
    /// Number of fixed sub-steps to run now
    pub substeps: u32,
    /// Whole sub-steps of time thrown away by the catch-up cap, in seconds
    pub dropped: f32,
}

/// Converts variable frame times into a whole number of fixed sub-steps.
///
/// Time that does not fill a sub-step is carried to the next call. At most
/// `max_substeps` run per call; anything beyond that is dropped so a long
/// stall cannot snowball into an ever longer frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Result<Self, SimError> {
        let step = ensure_positive("timestep", step)?;
        if max_substeps == 0 {
            return Err(SimError::invalid(
                "max_substeps",
                max_substeps as f32,
                "must be at least 1",
            ));
        }
        Ok(Self {
            step,
            max_substeps,
            accumulator: 0.0,
        })
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over, always below one sub-step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Add `elapsed` seconds and take as many whole sub-steps as allowed.
    /// Negative or non-finite times are ignored.
    pub fn advance(&mut self, elapsed: f32) -> Advance {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return Advance::default();
        }

        self.accumulator += elapsed;
        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }

        let mut dropped = 0.0;
        if self.accumulator >= self.step {
            let leftover = self.accumulator % self.step;
            dropped = self.accumulator - leftover;
            self.accumulator = leftover;
        }

        Advance { substeps, dropped }
    }
}

/// Apply gravity and move every non-anchor body by one sub-step:
/// `v += g·dt`, then `p += v·dt`.
pub fn integrate(bodies: &mut [Body], gravity: Vec2, dt: f32) {
    for body in bodies.iter_mut().filter(|body| !body.is_anchor()) {
        body.velocity += gravity * dt;
        body.position += body.velocity * dt;
    }
}
